//! Format trait and heading-marker conventions for flat heading-marked text.
//!
//! The tree builder classifies the flat text one line at a time with a [`HeadingMarker`]. The
//! heading list used by the outline heuristics comes from a tree-sitter parse of the same text,
//! described by a [`Format`] (markdown ATX headings for now).

pub mod markdown;

use crate::error::{Error, Result};
use crate::outline::HeadingMeta;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Default heading marker character.
pub const DEFAULT_MARKER: char = '#';

/// Tree-sitter grammar and query describing where heading titles live in a document format.
pub trait Format {
    /// Grammar used to parse the text.
    fn language(&self) -> tree_sitter::Language;
    /// Query capturing each heading's title text.
    fn title_query(&self) -> &str;
}

/// Extracts heading titles, in document order, using a format's tree-sitter query.
///
/// # Errors
///
/// Returns an error if the grammar cannot be loaded, the query does not compile, or the text
/// cannot be parsed.
pub fn extract_headings(text: &str, format: &dyn Format) -> Result<Vec<HeadingMeta>> {
    Ok(extract_heading_lines(text, format)?
        .into_iter()
        .map(|(_, heading)| heading)
        .collect())
}

/// Like [`extract_headings`], pairing each heading with the zero-based line it starts on.
///
/// # Errors
///
/// Returns an error if the grammar cannot be loaded, the query does not compile, or the text
/// cannot be parsed.
pub fn extract_heading_lines(
    text: &str,
    format: &dyn Format,
) -> Result<Vec<(usize, HeadingMeta)>> {
    let language = format.language();
    let mut parser = Parser::new();
    parser.set_language(&language)?;
    let tree = parser.parse(text, None).ok_or(Error::SyntaxTree)?;

    let query = Query::new(&language, format.title_query())?;
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), text.as_bytes());

    let mut headings = Vec::new();
    while let Some(found) = matches.next() {
        for capture in found.captures {
            if let Ok(title) = capture.node.utf8_text(text.as_bytes()) {
                let row = capture.node.start_position().row;
                headings.push((row, HeadingMeta::new(title.trim())));
            }
        }
    }
    Ok(headings)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// How a single line of flat text reads.
pub enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// Marker run, whitespace, then heading text.
    Heading {
        /// Number of marker characters.
        depth: usize,
        /// Heading text with surrounding whitespace trimmed.
        text: &'a str,
    },
    /// A marker run with nothing after it.
    Malformed,
    /// Anything else.
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The leading symbol that marks heading lines, e.g. `#` in `## Section Title`.
pub struct HeadingMarker(pub char);

impl Default for HeadingMarker {
    fn default() -> Self {
        Self(DEFAULT_MARKER)
    }
}

impl HeadingMarker {
    /// Leading spaces allowed before the marker run, as for ATX headings.
    pub const MAX_INDENT: usize = 3;

    /// Longest `#` run that still opens a heading.
    pub const MAX_ATX_DEPTH: usize = 6;

    #[must_use]
    /// Classifies one line (without its terminator).
    ///
    /// Follows the ATX rules: up to three leading spaces, a marker run followed by whitespace,
    /// and an optional closing marker run that is not part of the text. With the default `#`
    /// marker, runs longer than six are plain text.
    pub fn classify<'a>(self, line: &'a str) -> LineKind<'a> {
        if line.trim().is_empty() {
            return LineKind::Blank;
        }

        let body = line.trim_start_matches(' ');
        if line.len() - body.len() > Self::MAX_INDENT {
            return LineKind::Text;
        }

        let rest = body.trim_start_matches(self.0);
        let depth = (body.len() - rest.len()) / self.0.len_utf8();
        if depth == 0 || (self.0 == DEFAULT_MARKER && depth > Self::MAX_ATX_DEPTH) {
            return LineKind::Text;
        }

        let text = self.strip_closing(rest.trim());
        if text.is_empty() {
            LineKind::Malformed
        } else if rest.starts_with([' ', '\t']) {
            LineKind::Heading { depth, text }
        } else {
            LineKind::Text
        }
    }

    /// Every heading line in `text`, in document order.
    pub fn headings(self, text: &str) -> impl Iterator<Item = &str> {
        text.lines().filter_map(move |line| match self.classify(line) {
            LineKind::Heading { text, .. } => Some(text),
            _ => None,
        })
    }

    /// Drops a closing marker run, which only counts when whitespace (or nothing) precedes it.
    fn strip_closing(self, text: &str) -> &str {
        let open = text.trim_end_matches(self.0);
        if open.len() == text.len() {
            text
        } else if open.is_empty() {
            open
        } else if open.ends_with([' ', '\t']) {
            open.trim_end()
        } else {
            text
        }
    }
}

#[cfg(test)]
#[path = "tests/formats.rs"]
mod tests;
