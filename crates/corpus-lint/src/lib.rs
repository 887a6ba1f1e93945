//! Library interface for the `corpus-lint` CLI.
//!
//! This crate exposes the CLI's argument parser and command structure as a library,
//! primarily for documentation generation and testing. The actual entry point is
//! in `main.rs`.
//!
//! # Structure
//!
//! - [`Cli`] - The root argument parser (clap derive)
//! - [`Commands`] - Available subcommands
//! - [`commands`] - Command implementations
//!
//! The [`command()`] function returns the clap `Command` that `xtask` uses
//! for man pages and shell completions.

pub mod commands;

use clap::{CommandFactory, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Set the global color mode. Call once at startup.
    pub fn apply(self) {
        match self {
            Self::Auto => {}
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }

    /// Whether log lines written to stderr should carry ANSI escapes.
    pub fn ansi_for_stderr(self) -> bool {
        match self {
            Self::Auto => std::io::stderr().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                        Log filter (e.g., debug, corpus_lint=trace)
    CORPUS_LINT_LOG_PATH            Explicit JSONL log file path
    CORPUS_LINT_LOG_DIR             JSONL log directory
    CORPUS_LINT_FILE_GLOB           Batch file glob (default: *.txt)
    CORPUS_LINT_MAX_SAMPLE_CHARS    Per-sample character limit (default: 2000)
";

/// Command-line interface definition for corpus-lint.
#[derive(Parser)]
#[command(name = "corpus-lint")]
#[command(about = "Validate and analyze delimited citation corpora", long_about = None)]
#[command(version, arg_required_else_help = true)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Print only the version number (for scripting)
    #[arg(long)]
    pub version_only: bool,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Run as if started in DIR
    #[arg(short = 'C', long, global = true)]
    pub chdir: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, global = true, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available subcommands for the CLI.
#[derive(Subcommand)]
pub enum Commands {
    /// Check sample markup in a corpus file
    Validate(commands::validate::ValidateArgs),

    /// Count samples with and without <quote> tags
    Count(commands::count::CountArgs),

    /// Find samples over the character limit
    Length(commands::length::LengthArgs),

    /// Find samples that start with the same word
    Duplicates(commands::duplicates::DuplicatesArgs),

    /// Show package information and effective configuration
    Info(commands::info::InfoArgs),
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_color_choice_controls_log_ansi() {
        assert!(ColorChoice::Always.ansi_for_stderr());
        assert!(!ColorChoice::Never.ansi_for_stderr());
    }
}
