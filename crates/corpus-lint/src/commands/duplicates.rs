//! Duplicates command: samples that open with the same word.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use corpus_lint_core::duplicates::{self, DuplicateReport};
use corpus_lint_core::source;

use super::RunContext;

/// Arguments for the `duplicates` subcommand.
#[derive(Args, Debug)]
pub struct DuplicatesArgs {
    /// Files to check (default: every file matching `file_glob` in the working directory).
    pub files: Vec<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct FileDuplicates {
    file: Utf8PathBuf,
    #[serde(flatten)]
    report: Option<DuplicateReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Report likely duplicate samples. Informational only.
#[instrument(name = "cmd_duplicates", skip_all, fields(files = args.files.len()))]
pub fn cmd_duplicates(args: DuplicatesArgs, ctx: &RunContext<'_>) -> anyhow::Result<()> {
    let files = ctx.resolve_inputs(args.files)?;
    debug!(count = files.len(), "executing duplicates command");

    if files.is_empty() && !ctx.json {
        println!("No files matching '{}' found.", ctx.config.file_glob());
        return Ok(());
    }

    let bar = ctx.batch_progress(files.len());
    let mut results = Vec::with_capacity(files.len());
    for file in files {
        bar.set_message(file.to_string());
        let result = match source::read_source(&file, ctx.max_input_bytes()) {
            Ok(text) => FileDuplicates {
                report: Some(duplicates::find_duplicates(&text.text)),
                file,
                error: None,
            },
            Err(err) => {
                warn!(file = %file, error = %err, "skipping unreadable file");
                FileDuplicates {
                    file,
                    report: None,
                    error: Some(err.to_string()),
                }
            }
        };
        results.push(result);
        bar.inc(1);
    }
    bar.finish_and_clear();

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        match (&result.report, &result.error) {
            (Some(report), _) => print_report(&result.file, report),
            (None, Some(error)) => println!("{} {}: {}", "ERROR:".red(), result.file, error),
            (None, None) => {}
        }
    }
    Ok(())
}

fn print_report(file: &Utf8Path, report: &DuplicateReport) {
    println!("{}", format!("=== DUPLICATE SAMPLE ANALYSIS: {file} ===").bold());
    println!();

    if report.has_duplicates() {
        for group in &report.groups {
            println!(
                "First word '{}' appears {} times:",
                group.word,
                group.occurrences.len()
            );
            for occurrence in &group.occurrences {
                println!(
                    "  - Sample #{} at line {}",
                    occurrence.sample, occurrence.line
                );
            }
            println!();
        }
    } else {
        println!("No potential duplicates found based on first words.");
        println!();
    }

    println!("{}", "=== SUMMARY ===".bold());
    println!("Total samples analyzed: {}", report.total_samples);
    println!("Unique first words: {}", report.unique_first_words);
    if report.has_duplicates() {
        println!("Groups with potential duplicates: {}", report.duplicate_groups());
        println!(
            "Total potential duplicate samples: {}",
            report.potential_duplicates()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpus_lint_core::config::Config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn duplicates_are_informational() {
        let tmp = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().join("corpus.txt")).unwrap();
        fs::write(&path, "same start\n---\nsame again").unwrap();
        let config = Config::default();
        let ctx = RunContext {
            json: false,
            progress: false,
            cwd: Utf8Path::new("."),
            config: &config,
        };
        assert!(cmd_duplicates(DuplicatesArgs { files: vec![path] }, &ctx).is_ok());
    }
}
