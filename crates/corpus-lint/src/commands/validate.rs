//! Validate command: markup checks with a grouped report.

use anyhow::bail;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use corpus_lint_core::validate::{self, ErrorKind, FileValidation, MarkupValidator};

use super::{RunContext, plural};

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Corpus file to validate.
    pub file: Utf8PathBuf,
}

/// Validate the markup of every sample in a file.
///
/// Fails when any finding is recorded, so the process exits non-zero.
#[instrument(name = "cmd_validate", skip_all, fields(file = %args.file))]
pub fn cmd_validate(args: ValidateArgs, ctx: &RunContext<'_>) -> anyhow::Result<()> {
    debug!(file = %args.file, "executing validate command");

    let validator = MarkupValidator::new(ctx.config.vocabulary());
    let result = validate::validate_file(&args.file, &validator, ctx.max_input_bytes());

    if let [only] = result.errors.as_slice()
        && only.kind == ErrorKind::FileError
    {
        if ctx.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        bail!("{}", only.message);
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.valid {
        println!(
            "{} '{}' is valid ({})",
            "PASS:".green(),
            args.file,
            plural(result.sample_count, "sample")
        );
    } else {
        print_report(&result);
    }

    if !result.valid {
        bail!(
            "{} has {}",
            args.file,
            plural(result.errors.len(), "markup error")
        );
    }
    Ok(())
}

fn print_report(result: &FileValidation) {
    println!(
        "{} found {} in '{}':",
        "FAIL:".red(),
        plural(result.errors.len(), "error"),
        result.file
    );
    println!();
    for (kind, errors) in result.grouped() {
        println!("{}", format!("## {}", kind.title()).bold());
        for error in errors {
            println!("  {} {}", format!("Line {}:", error.line).dimmed(), error.message);
        }
        println!();
    }
}
