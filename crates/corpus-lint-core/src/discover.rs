//! Corpus file discovery for batch runs.
//!
//! When no files are named on the command line, every utility scans a single
//! directory (non-recursively) for files matching a glob such as `*.txt`.

use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobMatcher};

use crate::error::{ConfigError, ConfigResult};

/// Glob used when none is configured.
pub const DEFAULT_FILE_GLOB: &str = "*.txt";

/// Compile a file-name glob.
pub fn compile_glob(pattern: &str) -> ConfigResult<GlobMatcher> {
    Glob::new(pattern)
        .map(|glob| glob.compile_matcher())
        .map_err(|source| ConfigError::InvalidGlob {
            pattern: pattern.to_string(),
            source,
        })
}

/// List files in `dir` whose names match `pattern`, sorted by name.
///
/// Entries that cannot be read or whose names are not UTF-8 are skipped
/// with a warning.
#[tracing::instrument(skip_all, fields(dir = %dir, pattern))]
pub fn discover_files(dir: &Utf8Path, pattern: &str) -> ConfigResult<Vec<Utf8PathBuf>> {
    let matcher = compile_glob(pattern)?;

    let entries = match std::fs::read_dir(dir.as_std_path()) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(error = %e, "could not read directory");
            return Ok(Vec::new());
        }
    };

    let mut files: Vec<Utf8PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
        .filter_map(|entry| {
            let path = Utf8PathBuf::from_path_buf(entry.path())
                .inspect_err(|p| tracing::warn!(path = %p.display(), "skipping non-UTF-8 path"))
                .ok()?;
            let name = path.file_name()?;
            matcher.is_match(name).then(|| dir.join(name))
        })
        .collect();

    files.sort();
    tracing::debug!(count = files.len(), "discovered corpus files");
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_matching_files_sorted() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.txt"), "b").unwrap();
        fs::write(tmp.path().join("a.txt"), "a").unwrap();
        fs::write(tmp.path().join("notes.md"), "n").unwrap();
        fs::create_dir(tmp.path().join("dir.txt")).unwrap();

        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let files = discover_files(&dir, DEFAULT_FILE_GLOB).unwrap();
        let names: Vec<&str> = files.iter().filter_map(|p| p.file_name()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn custom_glob() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("one.corpus"), "x").unwrap();
        fs::write(tmp.path().join("two.txt"), "y").unwrap();

        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let files = discover_files(&dir, "*.corpus").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].as_str().ends_with("one.corpus"));
    }

    #[test]
    fn invalid_glob_is_config_error() {
        let err = compile_glob("[").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidGlob { .. }));
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        assert!(discover_files(&dir, "*.txt").unwrap().is_empty());
    }
}
