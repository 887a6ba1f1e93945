//! Logging setup for the CLI.
//!
//! Human-readable events go to stderr. When a log file location is known
//! (`CORPUS_LINT_LOG_PATH`, `CORPUS_LINT_LOG_DIR`, or `log_dir` in config),
//! events are also written there as JSON lines through a non-blocking writer.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_PATH_ENV: &str = "CORPUS_LINT_LOG_PATH";
const LOG_DIR_ENV: &str = "CORPUS_LINT_LOG_DIR";
const LOG_FILE_NAME: &str = "corpus-lint.jsonl";

/// Where JSONL logs should be written, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Exact log file path. Wins over `log_dir`.
    pub log_path: Option<PathBuf>,
    /// Directory for a daily-rotated log file.
    pub log_dir: Option<PathBuf>,
}

impl ObservabilityConfig {
    /// Read the environment, falling back to the configured log directory.
    pub fn from_env_with_overrides(config_log_dir: Option<PathBuf>) -> Self {
        let env_path = std::env::var_os(LOG_PATH_ENV).map(PathBuf::from);
        let env_dir = std::env::var_os(LOG_DIR_ENV).map(PathBuf::from);
        Self::resolve(env_path, env_dir, config_log_dir)
    }

    fn resolve(
        env_path: Option<PathBuf>,
        env_dir: Option<PathBuf>,
        config_log_dir: Option<PathBuf>,
    ) -> Self {
        let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();
        Self {
            log_path: env_path.filter(non_empty),
            log_dir: env_dir.filter(non_empty).or(config_log_dir),
        }
    }

    /// Returns `true` if a file layer will be installed.
    pub const fn writes_file(&self) -> bool {
        self.log_path.is_some() || self.log_dir.is_some()
    }
}

/// Build the event filter.
///
/// `-q` and `-v` win over `RUST_LOG`, which wins over the configured level.
pub fn env_filter(quiet: bool, verbose: u8, config_level: &str) -> EnvFilter {
    let directive = match (quiet, verbose) {
        (true, _) => Some("error"),
        (false, 0) => None,
        (false, 1) => Some("debug"),
        (false, _) => Some("trace"),
    };
    match directive {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level)),
    }
}

/// Install the global subscriber.
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the life of the process.
pub fn init_observability(
    cfg: &ObservabilityConfig,
    filter: EnvFilter,
    ansi: bool,
) -> anyhow::Result<Option<WorkerGuard>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .without_time();

    let (file_layer, guard) = match file_appender(cfg)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(guard)
}

fn file_appender(
    cfg: &ObservabilityConfig,
) -> anyhow::Result<Option<tracing_appender::rolling::RollingFileAppender>> {
    if let Some(ref path) = cfg.log_path {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let file_name = path
            .file_name()
            .with_context(|| format!("log path has no file name: {}", path.display()))?;
        ensure_dir(dir)?;
        return Ok(Some(tracing_appender::rolling::never(dir, file_name)));
    }
    if let Some(ref dir) = cfg.log_dir {
        ensure_dir(dir)?;
        return Ok(Some(tracing_appender::rolling::daily(dir, LOG_FILE_NAME)));
    }
    Ok(None)
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))
}
