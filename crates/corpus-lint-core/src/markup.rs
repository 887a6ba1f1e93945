//! Inline citation markup: vocabulary, tag scanning, and attribute parsing.
//!
//! Samples may carry a small tag-like markup:
//!
//! ```text
//! <quote id="q1" authorid="a1" titleid="t1">...</quote>
//! <author id="a1">Nāgārjuna</author>
//! <title id="t1" type="generic">Mūlamadhyamakakārikā</title>
//! ```
//!
//! The permitted tags, attributes, and `type` values live in [`Vocabulary`]
//! as plain data. Adding a tag or a type value does not touch the validator.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tag names permitted by default, in display order.
const TAGS: &[&str] = &["quote", "author", "title"];

/// Attribute names permitted by default, in display order.
const ATTRIBUTES: &[&str] = &["id", "authorid", "titleid", "type"];

/// Values permitted for the `type` attribute by default.
const TYPE_VALUES: &[&str] = &["generic"];

/// Attributes that may only appear on one specific tag: (attribute, tag).
const ATTRIBUTE_RESTRICTIONS: &[(&str, &str)] =
    &[("authorid", "quote"), ("titleid", "quote"), ("type", "title")];

/// Attribute whose values must be unique within a sample.
pub const ID_ATTRIBUTE: &str = "id";

/// Attribute whose value is checked against [`Vocabulary::type_values`].
pub const TYPE_ATTRIBUTE: &str = "type";

/// Matches `<tag ...>` and `</tag>` shapes within a single line.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)(\w+)([^>]*)>").expect("valid regex"));

/// Matches `name="value"` or `name='value'` pairs.
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\w+)=(?:"([^"']*)"|'([^"']*)')"#).expect("valid regex")
});

/// The fixed markup vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    tags: Vec<String>,
    attributes: Vec<String>,
    type_values: Vec<String>,
    restrictions: Vec<(String, String)>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        let owned = |items: &[&str]| -> Vec<String> {
            items.iter().map(|s| (*s).to_string()).collect()
        };
        Self {
            tags: owned(TAGS),
            attributes: owned(ATTRIBUTES),
            type_values: owned(TYPE_VALUES),
            restrictions: ATTRIBUTE_RESTRICTIONS
                .iter()
                .map(|(attr, tag)| ((*attr).to_string(), (*tag).to_string()))
                .collect(),
        }
    }
}

impl Vocabulary {
    /// Extend the permitted `type` values. Built-in values are kept and
    /// duplicates are ignored.
    pub fn with_type_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            let value = value.into();
            if !self.type_values.contains(&value) {
                self.type_values.push(value);
            }
        }
        self
    }

    /// Returns `true` if `name` is a permitted tag name.
    pub fn is_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// Returns `true` if `name` is a permitted attribute name.
    pub fn is_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }

    /// Returns `true` if `value` is a permitted `type` value.
    pub fn is_type_value(&self, value: &str) -> bool {
        self.type_values.iter().any(|v| v == value)
    }

    /// Permitted tag names.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Permitted attribute names.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Permitted `type` values.
    pub fn type_values(&self) -> &[String] {
        &self.type_values
    }

    /// Attribute-to-tag restrictions, in declaration order.
    pub fn restrictions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.restrictions
            .iter()
            .map(|(attr, tag)| (attr.as_str(), tag.as_str()))
    }
}

/// A tag matched within one line of a sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagOccurrence {
    /// Lowercased tag name.
    pub name: String,
    /// Tag name as written in the source.
    pub raw_name: String,
    /// `true` for `</tag>`.
    pub closing: bool,
    /// Everything between the tag name and `>`, untrimmed.
    pub attributes: String,
    /// File line number.
    pub line: usize,
}

/// A `name="value"` pair parsed from a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name (case-sensitive).
    pub name: String,
    /// Attribute value without quotes.
    pub value: String,
}

/// Find every tag-shaped substring in `line`.
pub fn scan_tags(line: &str, line_number: usize) -> Vec<TagOccurrence> {
    TAG_RE
        .captures_iter(line)
        .map(|cap| {
            let raw_name = cap[2].to_string();
            TagOccurrence {
                name: raw_name.to_lowercase(),
                raw_name,
                closing: !cap[1].is_empty(),
                attributes: cap[3].to_string(),
                line: line_number,
            }
        })
        .collect()
}

/// Extract quoted attribute pairs from a tag's attribute text, in source order.
pub fn parse_attributes(raw: &str) -> Vec<Attribute> {
    ATTRIBUTE_RE
        .captures_iter(raw)
        .map(|cap| Attribute {
            name: cap[1].to_string(),
            value: cap
                .get(2)
                .or_else(|| cap.get(3))
                .map_or_else(String::new, |m| m.as_str().to_string()),
        })
        .collect()
}

/// Returns `true` if `text` contains an opening `<quote>` tag, with or without attributes.
pub fn has_quote_tag(text: &str) -> bool {
    static QUOTE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)<quote[^>]*>").expect("valid regex"));
    QUOTE_RE.is_match(text)
}
