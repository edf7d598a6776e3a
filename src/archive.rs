use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::utils;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const STATIC_FILE_MODE: u32 = 0o644;
const ARTIFACT_MODE: u32 = 0o755;

/// Non-fatal condition raised while writing an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A zero-length file was added
    EmptyFile { source: PathBuf },
    /// An artifact does not carry the platform's library extension
    UnexpectedExtension { artifact: String, platform: String },
    /// An archive from an earlier run was replaced
    Overwrote { path: PathBuf },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::EmptyFile { source } => write!(f, "{} is empty", source.display()),
            Warning::UnexpectedExtension { artifact, platform } => {
                write!(f, "{} does not look like a {} library", artifact, platform)
            }
            Warning::Overwrote { path } => write!(f, "replaced existing {}", path.display()),
        }
    }
}

/// What a finished archive holds
#[derive(Debug, Clone)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    pub entries: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// Zip archive being populated for one variant.
///
/// Every entry lands under `root`. A writer dropped before
/// [`ArchiveWriter::finish`] leaves a zip holding the entries added so far.
pub struct ArchiveWriter {
    path: PathBuf,
    base_dir: PathBuf,
    root: String,
    zip: ZipWriter<File>,
    options: SimpleFileOptions,
    entries: Vec<String>,
    warnings: Vec<Warning>,
}

impl ArchiveWriter {
    /// Create (or truncate) the archive at `path`
    pub fn create(ctx: &Context, path: &Path, root: &str, compression_level: i64) -> Result<Self> {
        let replaced = path.exists();
        let file = File::create(path).map_err(|e| archive_error(path, e.into()))?;

        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(compression_level))
            .last_modified_time(ctx.timestamp);

        let mut writer = Self {
            path: path.to_path_buf(),
            base_dir: ctx.base_dir.clone(),
            root: root.to_string(),
            zip: ZipWriter::new(file),
            options,
            entries: Vec::new(),
            warnings: Vec::new(),
        };

        if replaced {
            writer.warn(Warning::Overwrote {
                path: path.to_path_buf(),
            });
        }

        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add `source` (relative to the working directory) as `root/target`,
    /// or as `root/source` when no target is given
    pub fn add_static_file(&mut self, source: &str, target: Option<&str>) -> Result<()> {
        self.add(source, target.unwrap_or(source), STATIC_FILE_MODE)
    }

    /// Add the build artifact `source` as `root/target/file_name`
    pub fn add_artifact(&mut self, source: &str, target: &str, file_name: &str) -> Result<()> {
        self.add(source, &format!("{}/{}", target, file_name), ARTIFACT_MODE)
    }

    /// Report a non-fatal condition
    pub fn warn(&mut self, warning: Warning) {
        log::warn!("Warning: {}", warning);
        self.warnings.push(warning);
    }

    /// Write the central directory and close the file
    pub fn finish(self) -> Result<ArchiveSummary> {
        let Self {
            path,
            zip,
            entries,
            warnings,
            ..
        } = self;

        zip.finish().map_err(|e| archive_error(&path, e))?;
        log::debug!("Finalized {} ({} entries)", path.display(), entries.len());

        Ok(ArchiveSummary {
            path,
            entries,
            warnings,
        })
    }

    fn add(&mut self, source: &str, name: &str, mode: u32) -> Result<()> {
        let entry_name = utils::entry_path(&self.root, name)?;
        let source_path = self.base_dir.join(source);
        log::info!("[Add File] {} -> {}", source, entry_name);

        let mut file = File::open(&source_path).map_err(|e| self.error(e.into()))?;
        let len = fs::metadata(&source_path)
            .map_err(|e| self.error(e.into()))?
            .len();

        self.zip
            .start_file(entry_name.as_str(), self.options.unix_permissions(mode))
            .map_err(|e| self.error(e))?;
        io::copy(&mut file, &mut self.zip).map_err(|e| self.error(e.into()))?;

        if len == 0 {
            self.warn(Warning::EmptyFile {
                source: source_path,
            });
        }
        self.entries.push(entry_name);
        Ok(())
    }

    fn error(&self, source: ZipError) -> Error {
        archive_error(&self.path, source)
    }
}

fn archive_error(path: &Path, source: ZipError) -> Error {
    let error = Error::ArchiveIo {
        archive: path.to_path_buf(),
        source,
    };
    log::error!("Error: {}", error);
    error
}
