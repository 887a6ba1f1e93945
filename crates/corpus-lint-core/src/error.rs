//! Error types for corpus-lint-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// A configured glob pattern could not be compiled.
    #[error("invalid file glob '{pattern}': {source}")]
    InvalidGlob {
        /// The pattern as written in the configuration.
        pattern: String,
        /// Underlying globset error.
        source: globset::Error,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while reading a corpus file.
///
/// These are the only failures that stop analysis of a file. Markup problems
/// are reported as [`ValidationError`](crate::validate::ValidationError) records.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The file does not exist.
    #[error("file not found: {path}")]
    NotFound {
        /// Path that was requested.
        path: Utf8PathBuf,
    },

    /// The file exceeds the configured input limit.
    #[error("input too large: {path} is {size} bytes (limit: {limit} bytes)")]
    TooLarge {
        /// Path that was requested.
        path: Utf8PathBuf,
        /// Actual file size in bytes.
        size: u64,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Any other I/O failure.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was requested.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl SourceError {
    /// Build a [`SourceError`] from an I/O error, mapping `NotFound` to its own variant.
    pub fn from_io(path: &camino::Utf8Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type alias using [`SourceError`].
pub type SourceResult<T> = Result<T, SourceError>;
