//! Oversized sample detection.

use serde::Serialize;

use crate::samples;

/// Default maximum number of characters per sample.
pub const DEFAULT_MAX_SAMPLE_CHARS: usize = 2000;

/// A sample whose trimmed content exceeds the character limit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OversizedSample {
    /// 1-based sample number.
    pub sample: usize,
    /// Characters in the trimmed content (Unicode scalar values).
    pub char_count: usize,
    /// File line number of the first non-blank line.
    pub start_line: usize,
    /// File line number of the last non-blank line.
    pub end_line: usize,
    /// Characters over the limit.
    pub excess: usize,
}

/// Find samples in `text` longer than `max_chars`.
///
/// Leading and trailing blank lines are not counted; interior blank lines
/// and newlines are.
#[tracing::instrument(skip(text), fields(text_len = text.len()))]
pub fn find_oversized(text: &str, max_chars: usize) -> Vec<OversizedSample> {
    samples::samples(text)
        .filter_map(|sample| {
            let bounds = sample.content_bounds();
            let char_count = bounds.text().chars().count();
            (char_count > max_chars).then(|| OversizedSample {
                sample: sample.index,
                char_count,
                start_line: bounds.first_line,
                end_line: bounds.last_line,
                excess: char_count - max_chars,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_samples_pass() {
        assert!(find_oversized("short\n---\nalso short", 2000).is_empty());
    }

    #[test]
    fn reports_oversized_sample_with_bounds() {
        let body = "x".repeat(30);
        let text = format!("tiny\n---\n\n{body}\n{body}\n\n---\nok");
        let found = find_oversized(&text, 50);
        assert_eq!(found.len(), 1);
        let o = &found[0];
        assert_eq!(o.sample, 2);
        assert_eq!(o.char_count, 61);
        assert_eq!(o.start_line, 4);
        assert_eq!(o.end_line, 5);
        assert_eq!(o.excess, 11);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // Each "ā" is two bytes in UTF-8 but one character.
        let text = "ā".repeat(10);
        assert!(find_oversized(&text, 10).is_empty());
        assert_eq!(find_oversized(&text, 9)[0].char_count, 10);
    }

    #[test]
    fn exactly_at_limit_is_not_oversized() {
        let text = "y".repeat(2000);
        assert!(find_oversized(&text, DEFAULT_MAX_SAMPLE_CHARS).is_empty());
    }
}
