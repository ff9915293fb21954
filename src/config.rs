//! Configuration to acknowledge developer preferences as well as set defaults.
//!
//! Specifically, we try to find a sectree.toml, and if present we load settings from there.
//! This provides the heading-match strategy, the clustering tolerance and the heading marker.
//! The heuristic constants are not claimed to be optimal, which is why they live here.

use crate::error::{Error, Result};
use crate::formats::{HeadingMarker, DEFAULT_MARKER};
use crate::level::{SizeClusterer, DEFAULT_TOLERANCE};
use crate::outline::{OutlineExtractor, DEFAULT_ROMAN_LEVEL};
use crate::similarity::{MatchStrategy, DEFAULT_THRESHOLD};
use facet::Facet;
use std::fs;
use std::path::Path;
use tracing::warn;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "sectree.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from sectree.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "contains".to_string())]
    /// Heading match strategy: `contains` or `ratio`.
    pub match_mode: String,
    #[facet(default = DEFAULT_THRESHOLD)]
    /// Exclusive similarity threshold for the `ratio` strategy.
    pub similarity_threshold: f64,
    #[facet(default = DEFAULT_TOLERANCE)]
    /// Glyph-height difference still treated as the same heading size.
    pub size_tolerance: i64,
    #[facet(default = DEFAULT_ROMAN_LEVEL)]
    /// Level assigned to Roman-numeral headings.
    pub roman_level: usize,
    #[facet(default = DEFAULT_MARKER.to_string())]
    /// Single character that marks heading lines in the flat text.
    pub heading_marker: String,
    #[facet(default = false)]
    /// Report unreadable outline sources instead of falling through.
    pub strict_source: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            match_mode: "contains".to_string(),
            similarity_threshold: DEFAULT_THRESHOLD,
            size_tolerance: DEFAULT_TOLERANCE,
            roman_level: DEFAULT_ROMAN_LEVEL,
            heading_marker: DEFAULT_MARKER.to_string(),
            strict_source: false,
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from sectree.toml if present.
    ///
    /// A malformed file is reported and ignored.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from a specific file, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            return Self::default();
        };
        match Self::from_toml(&contents) {
            Ok(config) => config,
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring configuration file");
                Self::default()
            }
        }
    }

    /// Parse configuration from TOML text; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the TOML does not match the expected fields.
    pub fn from_toml(contents: &str) -> Result<Self> {
        facet_toml::from_str::<Self>(contents).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// The configured heading-match strategy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for an unknown mode or out-of-range threshold.
    pub fn match_strategy(&self) -> Result<MatchStrategy> {
        match self.match_mode.parse::<MatchStrategy>()? {
            MatchStrategy::Ratio { .. } => MatchStrategy::ratio(self.similarity_threshold),
            strategy @ MatchStrategy::Contains => Ok(strategy),
        }
    }

    /// The configured heading marker.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] unless the marker is exactly one non-whitespace
    /// character.
    pub fn marker(&self) -> Result<HeadingMarker> {
        let mut chars = self.heading_marker.chars();
        match (chars.next(), chars.next()) {
            (Some(marker), None) if !marker.is_whitespace() => Ok(HeadingMarker(marker)),
            _ => Err(Error::InvalidConfig(format!(
                "heading marker must be a single character, got {:?}",
                self.heading_marker
            ))),
        }
    }

    #[must_use]
    /// Outline extractor using the configured clustering and numbering settings.
    pub fn extractor(&self) -> OutlineExtractor {
        OutlineExtractor::new(
            SizeClusterer::new(self.size_tolerance),
            self.roman_level,
            self.strict_source,
        )
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
