//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess to verify
//! that the CLI behaves correctly from a user's perspective.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a Command configured to run our binary.
///
/// Note: `cargo_bin` is marked deprecated for edge cases involving custom
/// cargo build directories, but works correctly for standard project layouts.
#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Command running in `dir` with colors off.
fn cmd_in(dir: &Path) -> Command {
    let mut c = cmd();
    c.args(["--color", "never", "-C", dir.to_str().unwrap()]);
    c
}

fn corpus_dir(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, contents) in files {
        fs::write(tmp.path().join(name), contents).unwrap();
    }
    tmp
}

const VALID: &str = "---\n<author id=\"a1\">Nāgārjuna</author> in the\n<title id=\"t1\" type=\"generic\">Kārikā</title>:\n<quote id=\"q1\" authorid=\"a1\" titleid=\"t1\">na svato</quote>\n---\nA sentence without citations.\n";

const BROKEN: &str = "<foo>bar</foo>\n---\n<quote id=\"a\">x</quote><quote id=\"a\">y</quote>\n---\n<author>x</quote>\n";

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn long_help_lists_environment_variables() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("CORPUS_LINT_LOG_DIR"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn no_arguments_shows_help_and_fails() {
    cmd().assert().failure().stderr(predicate::str::contains("Usage:"));
}

// =============================================================================
// Info Command
// =============================================================================

#[test]
fn info_shows_package_name_and_version() {
    cmd()
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_NAME")))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().arg("info").arg("--json").assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value =
        serde_json::from_str(&stdout).expect("info --json should output valid JSON");

    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["config"]["tags"][0], "quote");
}

// =============================================================================
// Global Flags
// =============================================================================

#[test]
fn quiet_flag_accepted() {
    cmd().args(["--quiet", "info"]).assert().success();
}

#[test]
fn multiple_verbose_flags_accepted() {
    cmd().args(["-vv", "info"]).assert().success();
}

#[test]
fn color_never_accepted() {
    cmd().args(["--color", "never", "info"]).assert().success();
}

#[test]
fn chdir_to_missing_directory_fails() {
    cmd()
        .args(["-C", "/definitely/not/here", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to change directory"));
}

// =============================================================================
// Validate Command
// =============================================================================

#[test]
fn validate_valid_file_passes() {
    let tmp = corpus_dir(&[("ok.txt", VALID)]);
    cmd_in(tmp.path())
        .args(["validate", "ok.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS:"))
        .stdout(predicate::str::contains("2 samples"));
}

#[test]
fn validate_broken_file_groups_errors_and_fails() {
    let tmp = corpus_dir(&[("bad.txt", BROKEN)]);
    cmd_in(tmp.path())
        .args(["validate", "bad.txt"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("## Invalid Tag"))
        .stdout(predicate::str::contains("## Duplicate Id"))
        .stdout(predicate::str::contains("## Mismatched Tag"))
        .stdout(predicate::str::contains("Line 5:"))
        .stderr(predicate::str::contains("markup error"));
}

#[test]
fn validate_json_reports_error_kinds() {
    let tmp = corpus_dir(&[("bad.txt", BROKEN)]);
    let output = cmd_in(tmp.path())
        .args(["validate", "bad.txt", "--json"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valid"], false);
    assert_eq!(json["sample_count"], 3);
    let kinds: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["kind"].as_str())
        .collect();
    // The invalid tag appears twice (<foo> and </foo>).
    assert_eq!(
        kinds,
        vec![
            "INVALID_TAG",
            "INVALID_TAG",
            "DUPLICATE_ID",
            "MISMATCHED_TAG",
            "UNCLOSED_TAG"
        ]
    );
}

#[test]
fn validate_missing_file_fails() {
    let tmp = TempDir::new().unwrap();
    cmd_in(tmp.path())
        .args(["validate", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn validate_latin1_file_is_decoded() {
    let tmp = TempDir::new().unwrap();
    // "café" in Latin-1 is not valid UTF-8.
    fs::write(tmp.path().join("old.txt"), b"caf\xe9 <quote>x</quote>\n").unwrap();
    cmd_in(tmp.path())
        .args(["validate", "old.txt"])
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("latin-1"));
}

#[test]
fn validate_json_missing_file_reports_read_error() {
    let tmp = TempDir::new().unwrap();
    cmd_in(tmp.path())
        .args(["--json", "validate", "nope.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"))
        .stderr(predicate::str::contains("markup error").not());
}

#[test]
fn color_never_keeps_log_lines_plain() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("old.txt"), b"caf\xe9\n").unwrap();
    cmd_in(tmp.path())
        .args(["validate", "old.txt"])
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("latin-1"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn validate_requires_file_argument() {
    cmd().arg("validate").assert().failure();
}

// =============================================================================
// Count Command
// =============================================================================

#[test]
fn count_scans_txt_files_in_directory() {
    let tmp = corpus_dir(&[
        ("a.txt", "<quote>x</quote>\n---\nplain"),
        ("b.txt", "<quote>y</quote>\n---\n<quote>z</quote>"),
        ("ignored.md", "plain"),
    ]);
    cmd_in(tmp.path())
        .arg("count")
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"))
        .stdout(predicate::str::contains("b.txt"))
        .stdout(predicate::str::contains("ignored.md").not())
        .stdout(predicate::str::contains("Total samples: 4"))
        .stdout(predicate::str::contains("skewed towards positive"));
}

#[test]
fn count_json_totals() {
    let tmp = corpus_dir(&[("a.txt", "<quote>x</quote>\n---\nplain\n---\nmore")]);
    let output = cmd_in(tmp.path())
        .args(["count", "a.txt", "--json"])
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&output.get_output().stdout).unwrap();
    assert_eq!(json["total"]["total"], 3);
    assert_eq!(json["total"]["with_quote"], 1);
    assert_eq!(json["balance"], "skewed-negative");
}

#[test]
fn count_continues_past_unreadable_file() {
    let tmp = corpus_dir(&[("a.txt", "one\n---\ntwo")]);
    cmd_in(tmp.path())
        .args(["count", "missing.txt", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("file not found"))
        .stdout(predicate::str::contains("Total samples: 2"));
}

#[test]
fn count_with_no_matching_files() {
    let tmp = TempDir::new().unwrap();
    cmd_in(tmp.path())
        .arg("count")
        .assert()
        .success()
        .stdout(predicate::str::contains("No files matching '*.txt' found."));
}

// =============================================================================
// Length Command
// =============================================================================

#[test]
fn length_within_limit_passes() {
    let tmp = corpus_dir(&[("a.txt", "short\n---\nalso short")]);
    cmd_in(tmp.path())
        .arg("length")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total oversized samples: 0"));
}

#[test]
fn length_reports_oversized_sample_and_fails() {
    let long = "x".repeat(30);
    let tmp = corpus_dir(&[("a.txt", &format!("ok\n---\n{long}\n"))]);
    cmd_in(tmp.path())
        .args(["length", "--max-chars", "20"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Sample #2:"))
        .stdout(predicate::str::contains("Character count: 30"))
        .stdout(predicate::str::contains("Content starts at line: 3"))
        .stdout(predicate::str::contains("Exceeds limit by: 10"))
        .stderr(predicate::str::contains("1 sample exceeding 20 characters"));
}

// =============================================================================
// Duplicates Command
// =============================================================================

#[test]
fn duplicates_reports_groups_and_succeeds() {
    let tmp = corpus_dir(&[("a.txt", "Yathā one\n---\nother\n---\nyathā two")]);
    cmd_in(tmp.path())
        .args(["duplicates", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("First word 'yathā' appears 2 times:"))
        .stdout(predicate::str::contains("Sample #3 at line 5"))
        .stdout(predicate::str::contains("Total potential duplicate samples: 1"));
}

#[test]
fn duplicates_none_found() {
    let tmp = corpus_dir(&[("a.txt", "alpha\n---\nbeta")]);
    cmd_in(tmp.path())
        .args(["duplicates", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No potential duplicates found"));
}
