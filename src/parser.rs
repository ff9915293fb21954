//! End-to-end section parsing: outline extraction, level assignment, heading matching.
//!
//! Each stage consumes the complete output of the one before it. The parser holds no mutable
//! state, so one instance can process many documents, including from several threads at once.

use crate::builder::TreeBuilder;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::formats::{
    extract_heading_lines, markdown::MarkdownFormat, HeadingMarker, LineKind, DEFAULT_MARKER,
};
use crate::node::Tree;
use crate::outline::{DocumentSource, HeadingMeta, Outline, OutlineExtractor};
use crate::serialize::{self, NestedSection};
use crate::similarity::MatchStrategy;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
/// A parsed document: the outline that drove matching and the resulting tree.
pub struct ParsedDocument {
    /// Outline consumed by the heading matcher.
    pub outline: Outline,
    /// Reconstructed section tree.
    pub tree: Tree,
    /// Outline entries that were matched to heading lines.
    pub matched: usize,
}

impl ParsedDocument {
    #[must_use]
    /// Nested `{heading: {content, children}}` document.
    pub fn to_nested(&self) -> NestedSection {
        serialize::to_nested(&self.tree)
    }

    #[must_use]
    /// Flat pre-order text rendering.
    pub fn to_flat_text(&self) -> String {
        serialize::to_flat_text(&self.tree)
    }
}

#[derive(Clone, Copy, Debug)]
/// Runs the whole pipeline for one document at a time.
pub struct SectionParser {
    extractor: OutlineExtractor,
    strategy: MatchStrategy,
    marker: HeadingMarker,
}

impl Default for SectionParser {
    fn default() -> Self {
        Self::new(
            OutlineExtractor::default(),
            MatchStrategy::default(),
            HeadingMarker::default(),
        )
    }
}

impl SectionParser {
    #[must_use]
    /// Creates a parser from its parts.
    pub fn new(extractor: OutlineExtractor, strategy: MatchStrategy, marker: HeadingMarker) -> Self {
        Self {
            extractor,
            strategy,
            marker,
        }
    }

    /// Creates a parser from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a bad match mode, threshold or marker.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.extractor(),
            config.match_strategy()?,
            config.marker()?,
        ))
    }

    /// Builds the outline for `text` from the best available source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnreadable`] only when the extractor is strict.
    pub fn outline<S: DocumentSource + ?Sized>(&self, text: &str, source: &S) -> Result<Outline> {
        self.extractor.extract(source, || text_headings(text, self.marker))
    }

    /// Parses a flat heading-marked text against the structure reported by `source`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnreadable`] only when the extractor is strict.
    pub fn parse<S: DocumentSource + ?Sized>(&self, text: &str, source: &S) -> Result<ParsedDocument> {
        let outline = self.outline(text, source)?;
        let mut builder = TreeBuilder::new(&outline.entries, self.strategy, self.marker);
        builder.feed_text(text);
        let matched = builder.cursor();
        let tree = builder.finish();
        Ok(finished(outline, tree, matched))
    }

    /// Like [`SectionParser::parse`], checking `cancel` between lines.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] if the flag is set during tree construction.
    pub fn parse_cancellable<S: DocumentSource + ?Sized>(
        &self,
        text: &str,
        source: &S,
        cancel: &AtomicBool,
    ) -> Result<ParsedDocument> {
        let outline = self.outline(text, source)?;
        let mut builder = TreeBuilder::new(&outline.entries, self.strategy, self.marker);
        builder.feed_text_cancellable(text, cancel)?;
        let matched = builder.cursor();
        let tree = builder.finish();
        Ok(finished(outline, tree, matched))
    }

    /// Reads a text file whole, then parses it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TextUnreadable`] if the file cannot be read, which is the one fatal
    /// condition of the pipeline.
    pub fn parse_file<S: DocumentSource + ?Sized>(
        &self,
        path: &Path,
        source: &S,
    ) -> Result<ParsedDocument> {
        let text = fs::read_to_string(path).map_err(|source| Error::TextUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let document = self.parse(&text, source)?;
        info!(
            path = %path.display(),
            origin = %document.outline.origin,
            sections = document.tree.len() - 1,
            "parsed document"
        );
        Ok(document)
    }
}

fn finished(outline: Outline, tree: Tree, matched: usize) -> ParsedDocument {
    if matched < outline.len() {
        warn!(
            matched,
            expected = outline.len(),
            "not every outline entry was found in the text"
        );
    }
    ParsedDocument {
        outline,
        tree,
        matched,
    }
}

/// Heading list for the outline fallback, restricted to lines the tree builder will also read
/// as headings.
///
/// Markdown text goes through tree-sitter, so code blocks and similar constructs do not
/// contribute headings. Any other marker is read line by line with the same classifier.
fn text_headings(text: &str, marker: HeadingMarker) -> Vec<HeadingMeta> {
    if marker.0 != DEFAULT_MARKER {
        return marker.headings(text).map(HeadingMeta::new).collect();
    }

    let found = extract_heading_lines(text, &MarkdownFormat).unwrap_or_else(|error| {
        warn!(%error, "could not extract headings from text");
        Vec::new()
    });
    let lines: Vec<&str> = text.lines().collect();
    found
        .into_iter()
        .filter_map(|(row, heading)| {
            let line = lines.get(row)?;
            match marker.classify(line) {
                LineKind::Heading { .. } => Some(heading),
                _ => {
                    debug!(
                        row,
                        title = %heading.title,
                        "skipping heading the line reader would miss"
                    );
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
