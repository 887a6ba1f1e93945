//! Likely-duplicate detection by first word.
//!
//! Two samples that open with the same word are flagged as potential
//! duplicates. This is a cheap heuristic for catching copy-paste in a
//! hand-edited corpus, not a similarity measure.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::samples;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid regex"));

/// Where a first word was seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    /// 1-based sample number.
    pub sample: usize,
    /// File line number of the sample's first non-blank line.
    pub line: usize,
}

/// All samples sharing one first word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FirstWordGroup {
    /// Lowercased first word.
    pub word: String,
    /// Samples opening with this word, in file order.
    pub occurrences: Vec<Occurrence>,
}

/// Result of duplicate detection over one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    /// Groups with more than one occurrence, in first-seen order.
    pub groups: Vec<FirstWordGroup>,
    /// Samples that had a first word.
    pub total_samples: usize,
    /// Distinct first words.
    pub unique_first_words: usize,
}

impl DuplicateReport {
    /// Number of duplicate groups.
    pub fn duplicate_groups(&self) -> usize {
        self.groups.len()
    }

    /// Samples beyond the first in each group.
    pub fn potential_duplicates(&self) -> usize {
        self.groups.iter().map(|g| g.occurrences.len() - 1).sum()
    }

    /// Returns `true` if any group was found.
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }
}

/// Group samples in `text` by the first word of their first non-blank line.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn find_duplicates(text: &str) -> DuplicateReport {
    let mut order: Vec<String> = Vec::new();
    let mut seen: HashMap<String, Vec<Occurrence>> = HashMap::new();

    for sample in samples::samples(text) {
        let Some((line, content)) = sample.first_content_line() else {
            continue;
        };
        let Some(word) = WORD_RE.find(content) else {
            continue;
        };
        let word = word.as_str().to_lowercase();
        let occurrence = Occurrence {
            sample: sample.index,
            line,
        };
        seen.entry(word.clone())
            .or_insert_with(|| {
                order.push(word);
                Vec::new()
            })
            .push(occurrence);
    }

    let total_samples = seen.values().map(Vec::len).sum();
    let unique_first_words = seen.len();
    let groups = order
        .into_iter()
        .filter_map(|word| {
            let occurrences = seen.remove(&word)?;
            (occurrences.len() > 1).then_some(FirstWordGroup { word, occurrences })
        })
        .collect();

    DuplicateReport {
        groups,
        total_samples,
        unique_first_words,
    }
}
