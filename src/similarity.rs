//! Heading-to-outline similarity gate.
//!
//! The text stream and the outline come from independent passes over the same document, so they
//! disagree on whitespace, case and punctuation. A heading line is only accepted as the next
//! outline entry when its score clears the gate of the active strategy.

use crate::error::{Error, Result};
use similar::TextDiff;
use std::fmt;
use std::str::FromStr;

/// Threshold used by [`MatchStrategy::Ratio`] unless configured otherwise.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
/// How a heading line is compared to the expected outline title.
pub enum MatchStrategy {
    /// Case-insensitive containment of the outline title in the heading text.
    #[default]
    Contains,
    /// Character-level similarity ratio strictly above `threshold`.
    Ratio {
        /// Minimum ratio (exclusive) in `0.0..=1.0`.
        threshold: f64,
    },
}

impl MatchStrategy {
    /// Builds a ratio strategy, rejecting thresholds outside `0.0..=1.0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for out-of-range or NaN thresholds.
    pub fn ratio(threshold: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&threshold) {
            Ok(Self::Ratio { threshold })
        } else {
            Err(Error::InvalidConfig(format!(
                "similarity threshold {threshold} is outside 0.0..=1.0"
            )))
        }
    }

    #[must_use]
    /// Scores a heading against a title in `0.0..=1.0`.
    ///
    /// Containment is all-or-nothing, so it scores either `0.0` or `1.0`.
    pub fn score(&self, heading: &str, title: &str) -> f64 {
        match self {
            Self::Contains => {
                if heading.to_lowercase().contains(&title.to_lowercase()) {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Ratio { .. } => f64::from(TextDiff::from_chars(heading, title).ratio()),
        }
    }

    #[must_use]
    /// Whether the heading clears the gate for the given title.
    pub fn accepts(&self, heading: &str, title: &str) -> bool {
        match self {
            Self::Contains => self.score(heading, title) > 0.0,
            Self::Ratio { threshold } => self.score(heading, title) > *threshold,
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains => write!(f, "contains"),
            Self::Ratio { threshold } => write!(f, "ratio>{threshold}"),
        }
    }
}

impl FromStr for MatchStrategy {
    type Err = Error;

    /// Parses `contains` or `ratio`; the ratio threshold starts at [`DEFAULT_THRESHOLD`].
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "contains" => Ok(Self::Contains),
            "ratio" => Self::ratio(DEFAULT_THRESHOLD),
            other => Err(Error::InvalidConfig(format!(
                "unknown match mode {other:?}, expected \"contains\" or \"ratio\""
            ))),
        }
    }
}

#[cfg(test)]
#[path = "tests/similarity.rs"]
mod tests;
