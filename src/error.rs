use std::path::PathBuf;
use thiserror::Error;
use zip::result::ZipError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    WalkDir(#[from] walkdir::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Release config not found: {0}")]
    ConfigNotFound(String),

    #[error("Invalid release config: {0}")]
    InvalidManifest(String),

    /// A source directory does not hold exactly one entry.
    #[error(
        "Expected a single file in {}, but got {}: {entries:?}",
        .directory.display(),
        .entries.len()
    )]
    DirectoryContents {
        directory: PathBuf,
        entries: Vec<String>,
    },

    #[error("{} is not a regular file", .path.display())]
    NotAFile { path: PathBuf },

    #[error("Archive error in {}: {source}", .archive.display())]
    ArchiveIo {
        archive: PathBuf,
        #[source]
        source: ZipError,
    },

    #[error("Invalid archive entry name: {0}")]
    InvalidEntryName(String),

    #[error("Invalid source date epoch: {0}")]
    InvalidTimestamp(String),

    #[error("{failed} of {total} variants failed to package")]
    BatchFailed { failed: usize, total: usize },
}
