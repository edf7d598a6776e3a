use crate::error::Error;
use crate::result::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};
use time::OffsetDateTime;

/// Default release config file name looked up in the working directory
pub const CONFIG_FILE: &str = "release.toml";

/// Locate the release config.
///
/// An explicit path must exist (a directory is searched for `release.toml`).
/// Without one, `release.toml` in `base_dir` is used when present and
/// `None` means the built-in defaults apply.
pub fn find_config(base_dir: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let Some(path) = explicit else {
        let candidate = base_dir.join(CONFIG_FILE);
        return Ok(candidate.is_file().then_some(candidate));
    };

    let config_path = if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    };

    if !config_path.is_file() {
        return Err(Error::ConfigNotFound(config_path.display().to_string()));
    }

    Ok(Some(config_path))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Join archive path segments with `/`, rejecting anything that would
/// escape the archive root on extraction
pub fn entry_path(root: &str, name: &str) -> Result<String> {
    let name = name.replace('\\', "/");
    let relative = Path::new(&name);

    let escapes = name.starts_with('/')
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes || name.is_empty() {
        return Err(Error::InvalidEntryName(name));
    }

    let segments: Vec<&str> = root
        .split('/')
        .chain(name.split('/'))
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    Ok(segments.join("/"))
}

/// Convert seconds since the Unix epoch into a zip entry timestamp
pub fn entry_timestamp(epoch: i64) -> Result<zip::DateTime> {
    let datetime = OffsetDateTime::from_unix_timestamp(epoch)
        .map_err(|e| Error::InvalidTimestamp(format!("{}: {}", epoch, e)))?;

    zip::DateTime::try_from(datetime)
        .map_err(|e| Error::InvalidTimestamp(format!("{}: {}", epoch, e)))
}
