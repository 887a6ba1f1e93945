//! Core library for corpus-lint.
//!
//! Checks and summarizes plain-text corpora of citation samples, where
//! samples are separated by `---` lines and may carry a small
//! `<quote>`/`<author>`/`<title>` markup.
//!
//! # Modules
//!
//! - [`samples`] - Splitting text into numbered samples
//! - [`markup`] - Markup vocabulary and tag scanning
//! - [`validate`] - Markup validation
//! - [`census`] - Positive/negative sample counts
//! - [`length`] - Oversized sample detection
//! - [`duplicates`] - First-word duplicate detection
//! - [`source`] - Reading and decoding corpus files
//! - [`discover`] - Batch file discovery
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use corpus_lint_core::MarkupValidator;
//!
//! let text = std::fs::read_to_string("corpus.txt").unwrap();
//! for error in MarkupValidator::default().validate(&text) {
//!     println!("{error}");
//! }
//! ```
#![deny(unsafe_code)]

pub mod census;
pub mod config;
pub mod discover;
pub mod duplicates;
pub mod error;
pub mod length;
pub mod markup;
pub mod samples;
pub mod source;
pub mod validate;

pub use census::{Balance, SampleCensus, census};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use duplicates::{DuplicateReport, find_duplicates};
pub use error::{ConfigError, ConfigResult, SourceError, SourceResult};
pub use length::{DEFAULT_MAX_SAMPLE_CHARS, OversizedSample, find_oversized};
pub use markup::Vocabulary;
pub use samples::{Sample, split_samples};
pub use source::{Encoding, SourceText, read_source};
pub use validate::{ErrorKind, FileValidation, MarkupValidator, ValidationError, validate_file};

/// Default maximum input size in bytes (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
