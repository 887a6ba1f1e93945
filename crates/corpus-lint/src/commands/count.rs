//! Count command: positive/negative sample census across files.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use corpus_lint_core::census::{self, Balance, SampleCensus};
use corpus_lint_core::source;

use super::RunContext;

/// Arguments for the `count` subcommand.
#[derive(Args, Debug)]
pub struct CountArgs {
    /// Files to count (default: every file matching `file_glob` in the working directory).
    pub files: Vec<Utf8PathBuf>,
}

#[derive(Debug, Serialize)]
struct FileCount {
    file: Utf8PathBuf,
    #[serde(flatten)]
    census: SampleCensus,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct CountReport {
    files: Vec<FileCount>,
    total: SampleCensus,
    positive_percent: f64,
    negative_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    balance: Option<Balance>,
}

/// Count samples with and without `<quote>` tags.
#[instrument(name = "cmd_count", skip_all, fields(files = args.files.len()))]
pub fn cmd_count(args: CountArgs, ctx: &RunContext<'_>) -> anyhow::Result<()> {
    let files = ctx.resolve_inputs(args.files)?;
    debug!(count = files.len(), "executing count command");

    if files.is_empty() && !ctx.json {
        println!("No files matching '{}' found.", ctx.config.file_glob());
        return Ok(());
    }

    let bar = ctx.batch_progress(files.len());
    let mut rows = Vec::with_capacity(files.len());
    let mut total = SampleCensus::default();
    for file in files {
        bar.set_message(file.to_string());
        let row = match source::read_source(&file, ctx.max_input_bytes()) {
            Ok(text) => {
                let census = census::census(&text.text);
                total += census;
                FileCount {
                    file,
                    census,
                    error: None,
                }
            }
            Err(err) => {
                warn!(file = %file, error = %err, "skipping unreadable file");
                FileCount {
                    file,
                    census: SampleCensus::default(),
                    error: Some(err.to_string()),
                }
            }
        };
        rows.push(row);
        bar.inc(1);
    }
    bar.finish_and_clear();

    let report = CountReport {
        positive_percent: total.positive_percent(),
        negative_percent: total.negative_percent(),
        balance: (total.total > 0).then(|| total.balance()),
        files: rows,
        total,
    };

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    Ok(())
}

fn print_table(report: &CountReport) {
    let rule = "=".repeat(80);
    println!("{rule}");
    println!(
        "{:<30} {:<8} {:<12} {:<15} {:<10}",
        "File", "Total", "With <quote>", "Without <quote>", "Negative %"
    );
    println!("{}", "-".repeat(80));
    for row in &report.files {
        if let Some(ref error) = row.error {
            println!("{:<30} {}", row.file.as_str(), error.red());
            continue;
        }
        print_row(row.file.as_str(), &row.census);
    }
    println!("{rule}");
    print_row("TOTAL", &report.total);
    println!();

    let total = &report.total;
    println!("{}", "SUMMARY:".bold());
    println!("  Total samples: {}", total.total);
    println!(
        "  Positive examples (with <quote> tags): {} ({:.1}%)",
        total.with_quote, report.positive_percent
    );
    println!(
        "  Negative examples (without <quote> tags): {} ({:.1}%)",
        total.without_quote, report.negative_percent
    );
    println!("  Files processed: {}", report.files.len());

    if let Some(balance) = report.balance {
        println!();
        println!("{}", "DATASET BALANCE:".bold());
        match balance {
            Balance::Balanced => println!("  {}", balance.describe().green()),
            Balance::ModerateImbalance => println!("  {}", balance.describe().cyan()),
            Balance::SkewedNegative | Balance::SkewedPositive => {
                println!("  {}", balance.describe().yellow());
            }
        }
    }
}

fn print_row(label: &str, census: &SampleCensus) {
    println!(
        "{:<30} {:<8} {:<12} {:<15} {:<10.1}%",
        label,
        census.total,
        census.with_quote,
        census.without_quote,
        census.negative_percent()
    );
}
