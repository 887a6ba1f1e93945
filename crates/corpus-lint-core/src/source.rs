//! Reading corpus files from disk.
//!
//! Corpus files are expected to be UTF-8. Files that fail to decode are
//! re-read as ISO-8859-1 (Latin-1), where every byte maps to the code point
//! of the same value, so decoding itself never fails.

use camino::Utf8Path;
use serde::Serialize;

use crate::error::{SourceError, SourceResult};

/// Text encoding a file was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// The file was valid UTF-8.
    Utf8,
    /// The file was not valid UTF-8 and was decoded as Latin-1.
    Latin1,
}

impl Encoding {
    /// Returns the encoding label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }
}

/// Decoded contents of a corpus file.
#[derive(Debug, Clone)]
pub struct SourceText {
    /// Full decoded text.
    pub text: String,
    /// Encoding used to decode the bytes.
    pub encoding: Encoding,
}

/// Read and decode a corpus file.
///
/// When `max_bytes` is set, the file size is checked from metadata before
/// anything is read into memory.
#[tracing::instrument(skip_all, fields(path = %path))]
pub fn read_source(path: &Utf8Path, max_bytes: Option<usize>) -> SourceResult<SourceText> {
    let metadata =
        std::fs::metadata(path.as_std_path()).map_err(|e| SourceError::from_io(path, e))?;
    if let Some(limit) = max_bytes
        && metadata.len() > limit as u64
    {
        return Err(SourceError::TooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            limit,
        });
    }

    let bytes = std::fs::read(path.as_std_path()).map_err(|e| SourceError::from_io(path, e))?;
    let source = decode(bytes);
    if source.encoding == Encoding::Latin1 {
        tracing::warn!(
            %path,
            "file is not valid UTF-8, decoded as {}",
            source.encoding.as_str()
        );
    }
    Ok(source)
}

/// Decode raw bytes, falling back to Latin-1 when they are not UTF-8.
pub fn decode(bytes: Vec<u8>) -> SourceText {
    match String::from_utf8(bytes) {
        Ok(text) => SourceText {
            text,
            encoding: Encoding::Utf8,
        },
        Err(err) => SourceText {
            text: err.into_bytes().into_iter().map(char::from).collect(),
            encoding: Encoding::Latin1,
        },
    }
}
