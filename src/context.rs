use std::path::PathBuf;
use zip::DateTime;

/// Context passed throughout the application containing global configuration
#[derive(Clone, Debug)]
pub struct Context {
    /// Enable verbose output (debug-level logging)
    pub verbose: bool,

    /// Working directory holding the static files and artifact directories
    pub base_dir: PathBuf,

    /// Folder receiving the archives
    pub output_dir: PathBuf,

    /// Package remaining variants after one fails
    pub keep_going: bool,

    /// Modification time stamped on every archive entry
    pub timestamp: DateTime,
}

impl Context {
    pub fn new(base_dir: PathBuf, output_dir: Option<PathBuf>) -> Self {
        let output_dir = output_dir.unwrap_or_else(|| base_dir.clone());

        Self {
            verbose: false,
            base_dir,
            output_dir,
            keep_going: false,
            timestamp: DateTime::default(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime) -> Self {
        self.timestamp = timestamp;
        self
    }
}
