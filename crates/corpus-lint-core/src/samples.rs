//! Splitting corpus text into samples.
//!
//! A corpus file is a sequence of samples separated by lines whose trimmed
//! content is exactly `---`. Spans that contain only whitespace are skipped
//! and do not consume a sample number.
//!
//! Line numbers are 1-based and always refer to the original file, so blank
//! lines at the top of a sample still count toward the numbering.

use std::iter::Enumerate;
use std::str::Split;

use serde::Serialize;

/// The delimiter line that separates samples.
pub const DELIMITER: &str = "---";

/// One delimited unit of the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    /// 1-based ordinal among non-empty samples.
    pub index: usize,
    /// File line number of the first line after the preceding delimiter.
    pub start_line: usize,
    /// Raw sample lines joined with `\n` (line endings stripped).
    pub content: String,
}

/// Span of a sample once leading and trailing blank lines are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentBounds<'a> {
    /// File line number of the first non-blank line.
    pub first_line: usize,
    /// File line number of the last non-blank line.
    pub last_line: usize,
    /// Lines from `first_line` through `last_line`.
    pub lines: Vec<&'a str>,
}

impl ContentBounds<'_> {
    /// The trimmed content joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl Sample {
    /// Iterate over `(file line number, line)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        let start = self.start_line;
        self.content
            .split('\n')
            .enumerate()
            .map(move |(offset, line)| (start + offset, line))
    }

    /// Locate the non-blank content of the sample.
    pub fn content_bounds(&self) -> ContentBounds<'_> {
        let numbered: Vec<(usize, &str)> = self.lines().collect();
        let first = numbered
            .iter()
            .position(|(_, line)| !line.trim().is_empty())
            .unwrap_or(0);
        let last = numbered
            .iter()
            .rposition(|(_, line)| !line.trim().is_empty())
            .unwrap_or(first);

        ContentBounds {
            first_line: numbered.get(first).map_or(self.start_line, |(n, _)| *n),
            last_line: numbered.get(last).map_or(self.start_line, |(n, _)| *n),
            lines: numbered[first..=last.max(first)]
                .iter()
                .map(|(_, line)| *line)
                .collect(),
        }
    }

    /// The first non-blank line and its file line number.
    pub fn first_content_line(&self) -> Option<(usize, &str)> {
        self.lines().find(|(_, line)| !line.trim().is_empty())
    }
}

/// Returns `true` if `line` is a sample delimiter.
pub fn is_delimiter(line: &str) -> bool {
    line.trim() == DELIMITER
}

/// Lazy iterator over the samples of a text.
#[derive(Debug)]
pub struct Samples<'a> {
    lines: Enumerate<Split<'a, char>>,
    start_line: usize,
    next_index: usize,
    finished: bool,
}

impl<'a> Samples<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.split('\n').enumerate(),
            start_line: 1,
            next_index: 1,
            finished: false,
        }
    }

    fn emit(&mut self, start_line: usize, buffer: &[&str]) -> Option<Sample> {
        if buffer.iter().all(|line| line.trim().is_empty()) {
            return None;
        }
        let sample = Sample {
            index: self.next_index,
            start_line,
            content: buffer.join("\n"),
        };
        self.next_index += 1;
        Some(sample)
    }
}

impl Iterator for Samples<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        if self.finished {
            return None;
        }

        let mut buffer: Vec<&str> = Vec::new();
        loop {
            let Some((idx, raw)) = self.lines.next() else {
                self.finished = true;
                let start = self.start_line;
                return self.emit(start, &buffer);
            };

            let line = raw.strip_suffix('\r').unwrap_or(raw);
            if is_delimiter(line) {
                let start = std::mem::replace(&mut self.start_line, idx + 2);
                if let Some(sample) = self.emit(start, &buffer) {
                    return Some(sample);
                }
                buffer.clear();
            } else {
                buffer.push(line);
            }
        }
    }
}

/// Lazily split `text` into samples.
pub fn samples(text: &str) -> Samples<'_> {
    Samples::new(text)
}

/// Split `text` into an ordered list of samples.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_samples(text: &str) -> Vec<Sample> {
    let samples: Vec<Sample> = samples(text).collect();
    tracing::debug!(count = samples.len(), "split samples");
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_delimiters_is_one_sample() {
        let text = "first line\nsecond line\n";
        let samples = split_samples(text);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].index, 1);
        assert_eq!(samples[0].start_line, 1);
        assert_eq!(samples[0].content, "first line\nsecond line\n");
    }

    #[test]
    fn delimiters_and_blank_lines_only_yield_nothing() {
        assert!(split_samples("").is_empty());
        assert!(split_samples("---\n\n  \n---\n---").is_empty());
        assert!(split_samples("\n\n\t\n").is_empty());
    }

    #[test]
    fn start_line_follows_delimiter() {
        let text = "---\n\nalpha\n---\nbeta\ngamma\n---\n";
        let samples = split_samples(text);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].start_line, 2);
        assert_eq!(samples[1].start_line, 5);
        assert_eq!(samples[1].content, "beta\ngamma");
    }

    #[test]
    fn numbering_skips_empty_spans() {
        let text = "one\n---\n   \n---\ntwo\n---\n---\nthree";
        let indices: Vec<usize> = split_samples(text).iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn delimiter_tolerates_surrounding_whitespace() {
        let text = "one\n  ---  \ntwo";
        assert_eq!(split_samples(text).len(), 2);
        // Other characters on the line do not delimit.
        assert_eq!(split_samples("one\n--- x\ntwo").len(), 1);
        assert_eq!(split_samples("one\n----\ntwo").len(), 1);
    }

    #[test]
    fn crlf_line_endings_are_stripped() {
        let text = "one\r\n---\r\ntwo\r\n";
        let samples = split_samples(text);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].content, "one");
        assert_eq!(samples[1].start_line, 3);
        assert!(!samples[1].content.contains('\r'));
    }

    #[test]
    fn lines_carry_file_line_numbers() {
        let text = "---\nx\n---\n\nfirst\nsecond";
        let samples = split_samples(text);
        let lines: Vec<(usize, &str)> = samples[1].lines().collect();
        assert_eq!(lines, vec![(4, ""), (5, "first"), (6, "second")]);
    }

    #[test]
    fn content_bounds_trim_blank_edges() {
        let text = "---\n\n\nbody one\nbody two\n\n---";
        let samples = split_samples(text);
        let bounds = samples[0].content_bounds();
        assert_eq!(bounds.first_line, 4);
        assert_eq!(bounds.last_line, 5);
        assert_eq!(bounds.text(), "body one\nbody two");
    }

    #[test]
    fn first_content_line_skips_blanks() {
        let samples = split_samples("---\n\n  \nHello world\n");
        assert_eq!(samples[0].first_content_line(), Some((4, "Hello world")));
    }

    #[test]
    fn iterator_is_lazy_and_matches_eager_split() {
        let text = "a\n---\nb\n---\nc";
        let mut iter = samples(text);
        assert_eq!(iter.next().map(|s| s.content), Some("a".to_string()));
        let rest: Vec<Sample> = iter.collect();
        assert_eq!(rest.len(), 2);
        assert_eq!(split_samples(text)[1..], rest[..]);
    }
}
