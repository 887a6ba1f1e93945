//! Command implementations.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use corpus_lint_core::config::Config;
use corpus_lint_core::discover;
use indicatif::{ProgressBar, ProgressStyle};

pub mod count;
pub mod duplicates;
pub mod info;
pub mod length;
pub mod validate;

/// Settings shared by the corpus commands.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    /// Global `--json` flag.
    pub json: bool,
    /// Whether batch runs may draw a progress bar.
    pub progress: bool,
    /// Working directory scanned when no files are given.
    pub cwd: &'a Utf8Path,
    /// Loaded configuration.
    pub config: &'a Config,
}

impl RunContext<'_> {
    /// The configured input size limit.
    pub fn max_input_bytes(&self) -> Option<usize> {
        self.config.input_limit()
    }

    /// Files named on the command line, or the configured glob's matches in
    /// the working directory when none are named.
    pub fn resolve_inputs(&self, files: Vec<Utf8PathBuf>) -> anyhow::Result<Vec<Utf8PathBuf>> {
        if !files.is_empty() {
            return Ok(files);
        }
        let pattern = self.config.file_glob();
        let found = discover::discover_files(self.cwd, pattern)
            .with_context(|| format!("failed to scan {} for {pattern}", self.cwd))?;
        Ok(found
            .into_iter()
            .map(|path| {
                path.strip_prefix(self.cwd)
                    .map_or_else(|_| path.clone(), Utf8Path::to_path_buf)
            })
            .collect())
    }

    /// A progress bar for `len` files. Hidden unless this is a multi-file
    /// run on a terminal.
    pub fn batch_progress(&self, len: usize) -> ProgressBar {
        if !self.progress || len < 2 {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("=> "));
        bar
    }
}

/// "1 file" / "3 files".
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn named_files_are_used_as_given() {
        let config = Config::default();
        let ctx = RunContext {
            json: false,
            progress: false,
            cwd: Utf8Path::new("/nonexistent"),
            config: &config,
        };
        let files = vec![Utf8PathBuf::from("b.txt"), Utf8PathBuf::from("a.txt")];
        assert_eq!(ctx.resolve_inputs(files.clone()).unwrap(), files);
    }

    #[test]
    fn empty_file_list_scans_cwd_with_configured_glob() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("z.corpus"), "x").unwrap();
        fs::write(tmp.path().join("a.corpus"), "x").unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();
        let cwd = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let config = Config {
            file_glob: Some("*.corpus".to_string()),
            ..Config::default()
        };
        let ctx = RunContext {
            json: false,
            progress: false,
            cwd: &cwd,
            config: &config,
        };
        let files = ctx.resolve_inputs(Vec::new()).unwrap();
        assert_eq!(
            files,
            vec![Utf8PathBuf::from("a.corpus"), Utf8PathBuf::from("z.corpus")]
        );
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "file"), "1 file");
        assert_eq!(plural(0, "file"), "0 files");
    }
}
