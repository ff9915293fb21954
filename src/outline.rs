//! Outline extraction picks the best available structural signal for a document.
//!
//! Three sources are tried in priority order:
//!
//! 1. embedded bookmarks, which already carry levels;
//! 2. numbered headings (`2.3.1 Title`, `IV. Title`), whose numbering encodes the level;
//! 3. visual heading sizes, clustered into levels by [`SizeClusterer`].
//!
//! A source that cannot be read falls through to the next heuristic unless the extractor is
//! strict. A document with no usable signal yields an empty outline, which later produces a
//! root-only tree.

use crate::error::{Error, Result};
use crate::level::SizeClusterer;
use regex::Regex;
use std::fmt;
use std::io::Write;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Level given to Roman-numeral headings unless configured otherwise.
pub const DEFAULT_ROMAN_LEVEL: usize = 1;

static NUMBERED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)*)\.?\s").expect("valid numbered heading regex")
});

static ROMAN_HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IVXLCDM]+\.\s").expect("valid roman heading regex"));

#[derive(Clone, Debug, PartialEq, Eq)]
/// One entry of a document's embedded bookmark outline.
pub struct Bookmark {
    /// Declared nesting level (1 for top-level bookmarks).
    pub level: usize,
    /// Bookmark title.
    pub title: String,
}

impl Bookmark {
    #[must_use]
    /// Creates a bookmark.
    pub fn new(level: usize, title: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// A heading reported by the document converter, optionally with its glyph box.
pub struct HeadingMeta {
    /// Heading title as reported by the converter.
    pub title: String,
    /// Top edge of the heading's bounding box.
    pub top_y: Option<f64>,
    /// Bottom edge of the heading's bounding box.
    pub bottom_y: Option<f64>,
}

impl HeadingMeta {
    #[must_use]
    /// A heading with no geometry, as found in the flat text itself.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            top_y: None,
            bottom_y: None,
        }
    }

    #[must_use]
    /// A heading with its bounding box edges.
    pub fn with_box(title: impl Into<String>, top_y: f64, bottom_y: f64) -> Self {
        Self {
            title: title.into(),
            top_y: Some(top_y),
            bottom_y: Some(bottom_y),
        }
    }

    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    /// Rounded vertical extent of the glyph box (ties to even), if both edges are known.
    pub fn size(&self) -> Option<i64> {
        let height = self.bottom_y? - self.top_y?;
        height.is_finite().then(|| height.round_ties_even() as i64)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Transient heading record between extraction and level assignment.
pub struct HeadingCandidate {
    /// Nesting level when the source provides one.
    pub level: Option<usize>,
    /// Heading title.
    pub title: String,
    /// Rounded glyph height, only for the visual-size source.
    pub raw_size: Option<i64>,
}

impl HeadingCandidate {
    #[must_use]
    /// A candidate whose level is already known.
    pub fn leveled(level: usize, title: impl Into<String>) -> Self {
        Self {
            level: Some(level),
            title: title.into(),
            raw_size: None,
        }
    }

    #[must_use]
    /// A candidate awaiting level assignment from its size.
    pub fn sized(title: impl Into<String>, raw_size: Option<i64>) -> Self {
        Self {
            level: None,
            title: title.into(),
            raw_size,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A resolved outline entry: the next heading the tree builder expects.
pub struct OutlineEntry {
    /// Nesting level, always at least 1 so entries sit below the root.
    pub level: usize,
    /// Title matched against heading lines.
    pub title: String,
}

impl OutlineEntry {
    #[must_use]
    /// Creates an entry, raising levels below 1 to 1.
    pub fn new(level: usize, title: impl Into<String>) -> Self {
        Self {
            level: level.max(1),
            title: title.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which heuristic produced an outline.
pub enum OutlineOrigin {
    /// Embedded bookmark metadata.
    Bookmarks,
    /// Numbered-heading convention.
    Numbered,
    /// Visual heading-size clustering.
    Visual,
    /// No structural signal was found.
    Empty,
}

impl fmt::Display for OutlineOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bookmarks => "bookmarks",
            Self::Numbered => "numbered headings",
            Self::Visual => "heading sizes",
            Self::Empty => "none",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Ordered outline entries together with the heuristic that produced them.
pub struct Outline {
    /// Heuristic used.
    pub origin: OutlineOrigin,
    /// Entries in document order.
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    #[must_use]
    /// An outline with no entries.
    pub fn empty() -> Self {
        Self {
            origin: OutlineOrigin::Empty,
            entries: Vec::new(),
        }
    }

    #[must_use]
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    /// True when no structural signal was found.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the outline as `level;title;;;` lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink fails.
    pub fn write_toc<W: Write>(&self, mut sink: W) -> Result<()> {
        for entry in &self.entries {
            writeln!(sink, "{};{};;;", entry.level, entry.title)?;
        }
        sink.flush()?;
        Ok(())
    }
}

/// Narrow interface to the external collaborators that describe a document's structure.
pub trait DocumentSource {
    /// Embedded bookmarks, or `Ok(None)` when the document has none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnreadable`] when the document cannot be opened or parsed.
    fn bookmarks(&self) -> Result<Option<Vec<Bookmark>>>;

    /// Converter heading metadata, or `Ok(None)` when none is available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnreadable`] when the metadata cannot be opened or parsed.
    fn headings(&self) -> Result<Option<Vec<HeadingMeta>>>;
}

#[must_use]
/// Level implied by a numbered title, if it follows a numbering convention.
///
/// Dot-separated integers give one level per component (`2.3.1 Title` is level 3); a trailing
/// period does not count (`2. Title` is level 1). Roman numerals map to `roman_level`.
pub fn numbered_level(title: &str, roman_level: usize) -> Option<usize> {
    if let Some(captures) = NUMBERED_HEADING.captures(title) {
        let number = captures.get(1)?.as_str();
        return Some(number.matches('.').count() + 1);
    }
    ROMAN_HEADING.is_match(title).then_some(roman_level)
}

fn clean_title(title: &str) -> Option<String> {
    let cleaned = title.replace('\n', " ");
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

#[derive(Clone, Copy, Debug)]
/// Produces an [`Outline`] from a [`DocumentSource`], falling through the heuristics.
pub struct OutlineExtractor {
    clusterer: SizeClusterer,
    roman_level: usize,
    strict_source: bool,
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new(SizeClusterer::default(), DEFAULT_ROMAN_LEVEL, false)
    }
}

impl OutlineExtractor {
    #[must_use]
    /// Creates an extractor.
    ///
    /// With `strict_source`, unreadable sources are reported instead of skipped.
    pub fn new(clusterer: SizeClusterer, roman_level: usize, strict_source: bool) -> Self {
        Self {
            clusterer,
            roman_level,
            strict_source,
        }
    }

    /// Builds the outline for a document.
    ///
    /// `text_headings` supplies the heading list found in the flat text; it is only consulted
    /// when the source has neither bookmarks nor converter heading metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnreadable`] only in strict mode; otherwise unreadable sources
    /// are logged and the next heuristic is tried.
    pub fn extract<S, F>(&self, source: &S, text_headings: F) -> Result<Outline>
    where
        S: DocumentSource + ?Sized,
        F: FnOnce() -> Vec<HeadingMeta>,
    {
        match source.bookmarks() {
            Ok(Some(bookmarks)) => {
                if let Some(outline) = Self::from_bookmarks(bookmarks) {
                    return Ok(outline);
                }
                debug!("bookmark outline is empty");
            }
            Ok(None) => debug!("document has no bookmarks"),
            Err(e) => self.recover(e)?,
        }

        let headings = match source.headings() {
            Ok(Some(headings)) => headings,
            Ok(None) => text_headings(),
            Err(e) => {
                self.recover(e)?;
                text_headings()
            }
        };

        Ok(self.from_headings(headings))
    }

    fn recover(&self, error: Error) -> Result<()> {
        if self.strict_source {
            return Err(error);
        }
        warn!(%error, "falling back to the next outline heuristic");
        Ok(())
    }

    #[must_use]
    /// Outline from bookmarks, or `None` if no bookmark has a usable title.
    pub fn from_bookmarks(bookmarks: Vec<Bookmark>) -> Option<Outline> {
        let candidates: Vec<HeadingCandidate> = bookmarks
            .into_iter()
            .filter_map(|bookmark| {
                clean_title(&bookmark.title)
                    .map(|title| HeadingCandidate::leveled(bookmark.level, title))
            })
            .collect();

        (!candidates.is_empty()).then(|| resolved(OutlineOrigin::Bookmarks, candidates))
    }

    #[must_use]
    /// Outline from a heading list: numbered headings if any, otherwise heading sizes.
    pub fn from_headings(&self, headings: Vec<HeadingMeta>) -> Outline {
        let headings: Vec<HeadingMeta> = headings
            .into_iter()
            .filter_map(|heading| {
                clean_title(&heading.title).map(|title| HeadingMeta { title, ..heading })
            })
            .collect();

        let numbered: Vec<HeadingCandidate> = headings
            .iter()
            .filter_map(|heading| {
                numbered_level(&heading.title, self.roman_level)
                    .map(|level| HeadingCandidate::leveled(level, heading.title.clone()))
            })
            .collect();
        if !numbered.is_empty() {
            debug!(count = numbered.len(), "using numbered headings");
            return resolved(OutlineOrigin::Numbered, numbered);
        }

        let sized: Vec<HeadingCandidate> = headings
            .into_iter()
            .map(|heading| {
                let size = heading.size();
                HeadingCandidate::sized(heading.title, size)
            })
            .collect();
        let entries = self.clusterer.assign(sized);
        if entries.is_empty() {
            debug!("no structural signal found");
            return Outline::empty();
        }

        debug!(count = entries.len(), "using heading sizes");
        Outline {
            origin: OutlineOrigin::Visual,
            entries,
        }
    }
}

fn resolved(origin: OutlineOrigin, candidates: Vec<HeadingCandidate>) -> Outline {
    let entries = candidates
        .into_iter()
        .map(|candidate| OutlineEntry::new(candidate.level.unwrap_or(1), candidate.title))
        .collect();
    Outline { origin, entries }
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;
