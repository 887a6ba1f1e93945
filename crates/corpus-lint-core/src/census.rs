//! Sample counting and quote classification.
//!
//! A sample that contains an opening `<quote>` tag is a positive example;
//! one without is a negative example. The ratio between the two tells
//! whether a dataset is balanced.

use std::ops::AddAssign;

use serde::Serialize;

use crate::markup;
use crate::samples;

/// Sample counts for one file or an aggregate of files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SampleCensus {
    /// Non-empty samples.
    pub total: usize,
    /// Samples containing a `<quote>` tag.
    pub with_quote: usize,
    /// Samples without a `<quote>` tag.
    pub without_quote: usize,
}

impl SampleCensus {
    /// Share of negative samples, 0--100. Zero when there are no samples.
    #[allow(clippy::cast_precision_loss)]
    pub fn negative_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.without_quote as f64 / self.total as f64 * 100.0
        }
    }

    /// Share of positive samples, 0--100. Zero when there are no samples.
    #[allow(clippy::cast_precision_loss)]
    pub fn positive_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.with_quote as f64 / self.total as f64 * 100.0
        }
    }

    /// Classify the positive/negative balance.
    pub fn balance(&self) -> Balance {
        Balance::classify(self.positive_percent(), self.negative_percent())
    }
}

impl AddAssign for SampleCensus {
    fn add_assign(&mut self, rhs: Self) {
        self.total += rhs.total;
        self.with_quote += rhs.with_quote;
        self.without_quote += rhs.without_quote;
    }
}

/// Dataset balance between positive and negative samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Balance {
    /// Positive share within 10 points of 50%.
    Balanced,
    /// More than 60% negative samples.
    SkewedNegative,
    /// More than 60% positive samples.
    SkewedPositive,
    /// Neither balanced nor strongly skewed.
    ModerateImbalance,
}

impl Balance {
    /// Classify from positive and negative percentages.
    pub fn classify(positive_percent: f64, negative_percent: f64) -> Self {
        if (positive_percent - 50.0).abs() < 10.0 {
            Self::Balanced
        } else if negative_percent > 60.0 {
            Self::SkewedNegative
        } else if positive_percent > 60.0 {
            Self::SkewedPositive
        } else {
            Self::ModerateImbalance
        }
    }

    /// One-line description for reports.
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Balanced => "Dataset is well-balanced",
            Self::SkewedNegative => "Dataset is skewed towards negative examples",
            Self::SkewedPositive => "Dataset is skewed towards positive examples",
            Self::ModerateImbalance => "Dataset has moderate class imbalance",
        }
    }
}

/// Count samples in `text` and classify each by quote presence.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn census(text: &str) -> SampleCensus {
    let mut result = SampleCensus::default();
    for sample in samples::samples(text) {
        result.total += 1;
        if markup::has_quote_tag(&sample.content) {
            result.with_quote += 1;
        } else {
            result.without_quote += 1;
        }
    }
    result
}
