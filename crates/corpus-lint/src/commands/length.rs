//! Length command: report samples over the character limit.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use corpus_lint_core::length::{self, OversizedSample};
use corpus_lint_core::source;

use super::{RunContext, plural};

/// Arguments for the `length` subcommand.
#[derive(Args, Debug)]
pub struct LengthArgs {
    /// Files to check (default: every file matching `file_glob` in the working directory).
    pub files: Vec<Utf8PathBuf>,

    /// Maximum characters per sample (overrides `max_sample_chars`).
    #[arg(long, value_name = "N")]
    pub max_chars: Option<usize>,
}

#[derive(Debug, Serialize)]
struct FileLength {
    file: Utf8PathBuf,
    oversized: Vec<OversizedSample>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct LengthReport {
    max_chars: usize,
    files: Vec<FileLength>,
    files_with_oversized: usize,
    total_oversized: usize,
}

/// Find samples longer than the character limit.
///
/// Fails when any sample is over the limit.
#[instrument(name = "cmd_length", skip_all, fields(files = args.files.len()))]
pub fn cmd_length(args: LengthArgs, ctx: &RunContext<'_>) -> anyhow::Result<()> {
    let max_chars = args.max_chars.unwrap_or_else(|| ctx.config.max_sample_chars());
    let files = ctx.resolve_inputs(args.files)?;
    debug!(count = files.len(), max_chars, "executing length command");

    if files.is_empty() && !ctx.json {
        println!("No files matching '{}' found.", ctx.config.file_glob());
        return Ok(());
    }

    let bar = ctx.batch_progress(files.len());
    let mut results = Vec::with_capacity(files.len());
    for file in files {
        bar.set_message(file.to_string());
        let result = match source::read_source(&file, ctx.max_input_bytes()) {
            Ok(text) => FileLength {
                oversized: length::find_oversized(&text.text, max_chars),
                file,
                error: None,
            },
            Err(err) => {
                warn!(file = %file, error = %err, "skipping unreadable file");
                FileLength {
                    file,
                    oversized: Vec::new(),
                    error: Some(err.to_string()),
                }
            }
        };
        results.push(result);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let report = LengthReport {
        max_chars,
        files_with_oversized: results.iter().filter(|r| !r.oversized.is_empty()).count(),
        total_oversized: results.iter().map(|r| r.oversized.len()).sum(),
        files: results,
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.total_oversized > 0 {
        bail!(
            "{} exceeding {max_chars} characters across {}",
            plural(report.total_oversized, "sample"),
            plural(report.files_with_oversized, "file")
        );
    }
    Ok(())
}

fn print_report(report: &LengthReport) {
    println!(
        "Checking {} for samples over {} characters...",
        plural(report.files.len(), "file"),
        report.max_chars
    );

    for result in &report.files {
        if let Some(ref error) = result.error {
            println!();
            println!("{} {}: {}", "ERROR:".red(), result.file, error);
            continue;
        }
        if result.oversized.is_empty() {
            continue;
        }
        println!();
        println!("{}", format!("=== FILE: {} ===", result.file).bold());
        println!(
            "Found {} over {} characters:",
            plural(result.oversized.len(), "sample"),
            report.max_chars
        );
        for sample in &result.oversized {
            println!();
            println!("Sample #{}:", sample.sample);
            println!("  - Character count: {}", sample.char_count);
            println!("  - Content starts at line: {}", sample.start_line);
            println!("  - Content ends at line: {}", sample.end_line);
            println!("  - Exceeds limit by: {} characters", sample.excess);
        }
    }

    println!();
    println!("{}", "=== SUMMARY ===".bold());
    println!("Files analyzed: {}", report.files.len());
    println!("Files with oversized samples: {}", report.files_with_oversized);
    println!("Total oversized samples: {}", report.total_oversized);
    if report.total_oversized == 0 {
        println!(
            "{} all samples are within the {} character limit",
            "PASS:".green(),
            report.max_chars
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use corpus_lint_core::config::Config;
    use std::fs;
    use tempfile::TempDir;

    fn run(contents: &str, max_chars: Option<usize>, config: &Config) -> anyhow::Result<()> {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("corpus.txt")).unwrap();
        fs::write(&path, contents).unwrap();
        let ctx = RunContext {
            json: false,
            progress: false,
            cwd: Utf8Path::new("."),
            config,
        };
        cmd_length(
            LengthArgs {
                files: vec![path],
                max_chars,
            },
            &ctx,
        )
    }

    #[test]
    fn within_limit_succeeds() {
        assert!(run("short\n---\nshort", None, &Config::default()).is_ok());
    }

    #[test]
    fn flag_overrides_config_limit() {
        let config = Config {
            max_sample_chars: Some(3),
            ..Config::default()
        };
        assert!(run("abcdef", None, &config).is_err());
        assert!(run("abcdef", Some(10), &config).is_ok());
    }

    #[test]
    fn oversized_error_names_counts() {
        let err = run("abcdef\n---\nxyzxyz", Some(5), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("2 samples exceeding 5 characters across 1 file"));
    }
}
