use crate::error::Error;
use crate::result::Result;
use std::path::Path;
use walkdir::WalkDir;

/// Name of the only file inside `directory`.
///
/// Build directories are expected to hold exactly one compiled artifact;
/// anything else (nothing, leftovers from an older build) fails with
/// [`Error::DirectoryContents`] carrying the sorted listing.
pub fn resolve_single_artifact(directory: &Path) -> Result<String> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        entries.push(entry?);
    }

    if entries.len() != 1 {
        let listing: Vec<String> = entries
            .iter()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        log::error!(
            "Expected a single file in {}, but got {}: {:?}",
            directory.display(),
            listing.len(),
            listing
        );
        return Err(Error::DirectoryContents {
            directory: directory.to_path_buf(),
            entries: listing,
        });
    }

    let entry = &entries[0];
    if !entry.path().is_file() {
        return Err(Error::NotAFile {
            path: entry.path().to_path_buf(),
        });
    }

    Ok(entry.file_name().to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;

    #[test]
    fn returns_the_only_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("libgodot_fluent_translation.so"), b"elf").unwrap();

        assert_eq!(
            resolve_single_artifact(dir.path()).unwrap(),
            "libgodot_fluent_translation.so"
        );
    }

    #[rstest]
    #[case(&[])]
    #[case(&["a.dll", "b.dll"])]
    #[case(&[".hidden", "godot_fluent_translation.dll", "godot_fluent_translation.pdb"])]
    fn rejects_other_counts_with_listing(#[case] files: &[&str]) {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            fs::write(dir.path().join(file), b"").unwrap();
        }

        match resolve_single_artifact(dir.path()) {
            Err(Error::DirectoryContents { directory, entries }) => {
                assert_eq!(directory, dir.path());
                let mut expected: Vec<String> = files.iter().map(|f| f.to_string()).collect();
                expected.sort();
                assert_eq!(entries, expected);
            }
            other => panic!("expected DirectoryContents, got {:?}", other),
        }
    }

    #[test]
    fn rejects_a_lone_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        assert!(matches!(
            resolve_single_artifact(dir.path()),
            Err(Error::NotAFile { .. })
        ));
    }

    #[test]
    fn missing_directory_is_an_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_single_artifact(&dir.path().join("default.linux.x.debug"));
        assert!(matches!(result, Err(Error::WalkDir(_))));
    }
}
