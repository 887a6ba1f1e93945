//! Markup validation for corpus samples.
//!
//! Each sample is checked in two passes:
//!
//! 1. Vocabulary: every tag name, attribute name, `type` value, attribute
//!    placement, and `id` uniqueness.
//! 2. Nesting: a tag stack verifies that every opened tag is closed in
//!    last-opened, first-closed order.
//!
//! Tags never span samples. Each call to [`MarkupValidator::validate_sample`]
//! owns its stack and its set of seen ids. Findings are collected, never
//! raised: malformed markup always produces a complete list of
//! [`ValidationError`] records.

use std::collections::HashSet;
use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;

use crate::markup::{self, ID_ATTRIBUTE, TYPE_ATTRIBUTE, TagOccurrence, Vocabulary};
use crate::samples::{self, Sample};
use crate::source::{self, Encoding};

/// Category of a validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Tag name outside the vocabulary.
    InvalidTag,
    /// Attribute text contains `=` but no quoted pair could be parsed.
    MalformedAttribute,
    /// Attribute name outside the vocabulary.
    InvalidAttribute,
    /// An `id` value already used in the same sample.
    DuplicateId,
    /// A `type` value outside the permitted set.
    InvalidTypeValue,
    /// An attribute placed on a tag that may not carry it.
    InvalidAttributeUsage,
    /// A closing tag with nothing open.
    UnmatchedClosingTag,
    /// A closing tag that does not match the innermost open tag.
    MismatchedTag,
    /// An opening tag still open at the end of the sample.
    UnclosedTag,
    /// The file could not be read. Always the only entry when present.
    FileError,
}

impl ErrorKind {
    /// Machine-readable name, e.g. `INVALID_TAG`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidTag => "INVALID_TAG",
            Self::MalformedAttribute => "MALFORMED_ATTRIBUTE",
            Self::InvalidAttribute => "INVALID_ATTRIBUTE",
            Self::DuplicateId => "DUPLICATE_ID",
            Self::InvalidTypeValue => "INVALID_TYPE_VALUE",
            Self::InvalidAttributeUsage => "INVALID_ATTRIBUTE_USAGE",
            Self::UnmatchedClosingTag => "UNMATCHED_CLOSING_TAG",
            Self::MismatchedTag => "MISMATCHED_TAG",
            Self::UnclosedTag => "UNCLOSED_TAG",
            Self::FileError => "FILE_ERROR",
        }
    }

    /// Heading used when grouping findings in a report.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::InvalidTag => "Invalid Tag",
            Self::MalformedAttribute => "Malformed Attribute",
            Self::InvalidAttribute => "Invalid Attribute",
            Self::DuplicateId => "Duplicate Id",
            Self::InvalidTypeValue => "Invalid Type Value",
            Self::InvalidAttributeUsage => "Invalid Attribute Usage",
            Self::UnmatchedClosingTag => "Unmatched Closing Tag",
            Self::MismatchedTag => "Mismatched Tag",
            Self::UnclosedTag => "Unclosed Tag",
            Self::FileError => "File Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// File line number (0 for file-level errors).
    pub line: usize,
    /// Finding category.
    pub kind: ErrorKind,
    /// Human-readable explanation.
    pub message: String,
}

impl ValidationError {
    fn new(line: usize, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: [{}] {}", self.line, self.kind, self.message)
    }
}

/// Validates samples against a [`Vocabulary`].
#[derive(Debug, Clone, Default)]
pub struct MarkupValidator {
    vocabulary: Vocabulary,
}

impl MarkupValidator {
    /// Create a validator for the given vocabulary.
    pub const fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Validate every sample in `text`, in file order.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn validate(&self, text: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut sample_count = 0usize;
        for sample in samples::samples(text) {
            sample_count += 1;
            errors.extend(self.validate_sample(&sample));
        }
        tracing::debug!(sample_count, error_count = errors.len(), "validation complete");
        errors
    }

    /// Validate a single sample.
    pub fn validate_sample(&self, sample: &Sample) -> Vec<ValidationError> {
        let tags: Vec<TagOccurrence> = sample
            .lines()
            .flat_map(|(line_number, line)| markup::scan_tags(line, line_number))
            .collect();

        let mut errors = Vec::new();
        let mut used_ids: HashSet<String> = HashSet::new();

        for tag in &tags {
            if !self.vocabulary.is_tag(&tag.name) {
                errors.push(ValidationError::new(
                    tag.line,
                    ErrorKind::InvalidTag,
                    format!(
                        "Invalid tag '<{}>' in prompt {}. Valid tags are: {}",
                        tag.raw_name,
                        sample.index,
                        self.vocabulary.tags().join(", ")
                    ),
                ));
                continue;
            }
            if tag.closing {
                continue;
            }
            let raw = tag.attributes.trim();
            if !raw.is_empty() {
                self.check_attributes(tag, raw, sample.index, &mut used_ids, &mut errors);
            }
        }

        self.check_nesting(&tags, sample.index, &mut errors);
        errors
    }

    fn check_attributes(
        &self,
        tag: &TagOccurrence,
        raw: &str,
        prompt: usize,
        used_ids: &mut HashSet<String>,
        errors: &mut Vec<ValidationError>,
    ) {
        let parsed = markup::parse_attributes(raw);
        if parsed.is_empty() {
            if raw.contains('=') {
                errors.push(ValidationError::new(
                    tag.line,
                    ErrorKind::MalformedAttribute,
                    format!("Malformed attribute syntax in prompt {prompt}: '{raw}'"),
                ));
            }
            return;
        }

        // Repeated names collapse to one entry holding the last value.
        let mut attributes: Vec<(String, String)> = Vec::with_capacity(parsed.len());
        for attr in parsed {
            match attributes.iter_mut().find(|(name, _)| *name == attr.name) {
                Some(existing) => existing.1 = attr.value,
                None => attributes.push((attr.name, attr.value)),
            }
        }
        let value_of = |name: &str| {
            attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };

        for (name, _) in &attributes {
            if !self.vocabulary.is_attribute(name) {
                errors.push(ValidationError::new(
                    tag.line,
                    ErrorKind::InvalidAttribute,
                    format!(
                        "Invalid attribute '{name}' in prompt {prompt}. Valid attributes are: {}",
                        self.vocabulary.attributes().join(", ")
                    ),
                ));
            }
        }

        if let Some(id) = value_of(ID_ATTRIBUTE)
            && !used_ids.insert(id.to_string())
        {
            errors.push(ValidationError::new(
                tag.line,
                ErrorKind::DuplicateId,
                format!("Duplicate ID '{id}' in prompt {prompt}"),
            ));
        }

        if let Some(value) = value_of(TYPE_ATTRIBUTE)
            && !self.vocabulary.is_type_value(value)
        {
            errors.push(ValidationError::new(
                tag.line,
                ErrorKind::InvalidTypeValue,
                format!(
                    "Invalid type value '{value}' in prompt {prompt}. Valid values are: {}",
                    self.vocabulary.type_values().join(", ")
                ),
            ));
        }

        for (attr, allowed_tag) in self.vocabulary.restrictions() {
            if tag.name != allowed_tag && value_of(attr).is_some() {
                errors.push(ValidationError::new(
                    tag.line,
                    ErrorKind::InvalidAttributeUsage,
                    format!(
                        "Attribute '{attr}' should only be used in <{allowed_tag}> tags, not <{}> in prompt {prompt}",
                        tag.name
                    ),
                ));
            }
        }
    }

    fn check_nesting(
        &self,
        tags: &[TagOccurrence],
        prompt: usize,
        errors: &mut Vec<ValidationError>,
    ) {
        let mut stack: Vec<(&str, usize)> = Vec::new();

        for tag in tags.iter().filter(|t| self.vocabulary.is_tag(&t.name)) {
            if !tag.closing {
                stack.push((tag.name.as_str(), tag.line));
                continue;
            }
            match stack.last() {
                None => errors.push(ValidationError::new(
                    tag.line,
                    ErrorKind::UnmatchedClosingTag,
                    format!(
                        "Closing tag </{}> without matching opening tag in prompt {prompt}",
                        tag.name
                    ),
                )),
                Some(&(open, open_line)) if open != tag.name => {
                    errors.push(ValidationError::new(
                        tag.line,
                        ErrorKind::MismatchedTag,
                        format!(
                            "Closing tag </{}> doesn't match opening tag <{open}> from line {open_line} in prompt {prompt}",
                            tag.name
                        ),
                    ));
                }
                Some(_) => {
                    stack.pop();
                }
            }
        }

        // Innermost first, the order the stack would unwind.
        for (name, line) in stack.into_iter().rev() {
            errors.push(ValidationError::new(
                line,
                ErrorKind::UnclosedTag,
                format!("Opening tag <{name}> not closed in prompt {prompt}"),
            ));
        }
    }
}

/// Outcome of validating one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileValidation {
    /// Path that was validated.
    pub file: Utf8PathBuf,
    /// Encoding the file was decoded with; `None` when it could not be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<Encoding>,
    /// Number of non-empty samples.
    pub sample_count: usize,
    /// `true` when no findings were recorded.
    pub valid: bool,
    /// Findings in discovery order.
    pub errors: Vec<ValidationError>,
}

impl FileValidation {
    /// Findings grouped by kind, groups in order of first appearance.
    pub fn grouped(&self) -> Vec<(ErrorKind, Vec<&ValidationError>)> {
        let mut groups: Vec<(ErrorKind, Vec<&ValidationError>)> = Vec::new();
        for error in &self.errors {
            match groups.iter_mut().find(|(kind, _)| *kind == error.kind) {
                Some((_, members)) => members.push(error),
                None => groups.push((error.kind, vec![error])),
            }
        }
        groups
    }
}

/// Read and validate a file.
///
/// A read failure becomes a single [`ErrorKind::FileError`] entry instead of
/// an `Err`, so batch callers can keep going.
#[tracing::instrument(skip_all, fields(path = %path))]
pub fn validate_file(
    path: &Utf8Path,
    validator: &MarkupValidator,
    max_bytes: Option<usize>,
) -> FileValidation {
    match source::read_source(path, max_bytes) {
        Ok(source) => {
            let sample_count = samples::samples(&source.text).count();
            let errors = validator.validate(&source.text);
            FileValidation {
                file: path.to_path_buf(),
                encoding: Some(source.encoding),
                sample_count,
                valid: errors.is_empty(),
                errors,
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not read file");
            FileValidation {
                file: path.to_path_buf(),
                encoding: None,
                sample_count: 0,
                valid: false,
                errors: vec![ValidationError::new(0, ErrorKind::FileError, err.to_string())],
            }
        }
    }
}
