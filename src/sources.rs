//! Adapters for the collaborators that describe a document's structure.
//!
//! The binary-to-text converter and the bookmark reader run outside this crate. What reaches us
//! is a TOC file of `level;title;dest;action;se` lines and the converter's JSON metadata with a
//! `table_of_contents` list of headings and their glyph polygons. Each file is read whole and
//! released before parsing.

use crate::error::{Error, Result};
use crate::outline::{Bookmark, DocumentSource, HeadingMeta};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Parses TOC text into bookmarks.
///
/// Blank input means the document has no bookmarks. Trailing fields after the title are
/// ignored.
///
/// # Errors
///
/// Returns [`Error::SourceUnreadable`] if any non-blank line is not `level;title[;...]`.
pub fn parse_toc(text: &str, source_name: &str) -> Result<Option<Vec<Bookmark>>> {
    let mut bookmarks = Vec::new();

    for (number, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.splitn(3, ';');
        let level = fields.next().unwrap_or_default().trim();
        let Some(title) = fields.next() else {
            return Err(Error::unreadable(
                source_name,
                format!("line {} has no title field", number + 1),
            ));
        };
        let level = level.parse::<usize>().map_err(|e| {
            Error::unreadable(
                source_name,
                format!("line {} has a bad level {level:?}: {e}", number + 1),
            )
        })?;
        bookmarks.push(Bookmark::new(level, title));
    }

    Ok((!bookmarks.is_empty()).then_some(bookmarks))
}

#[derive(Deserialize)]
struct ConverterMeta {
    #[serde(default)]
    table_of_contents: Vec<ConverterHeading>,
}

#[derive(Deserialize)]
struct ConverterHeading {
    title: String,
    #[serde(default)]
    polygon: Vec<Vec<f64>>,
}

impl From<ConverterHeading> for HeadingMeta {
    fn from(heading: ConverterHeading) -> Self {
        let y = |corner: usize| heading.polygon.get(corner).and_then(|point| point.get(1)).copied();
        Self {
            top_y: y(0),
            bottom_y: y(2),
            title: heading.title,
        }
    }
}

/// Parses converter JSON metadata into the heading list it reports.
///
/// The heading box height is taken from the first and third polygon corners.
///
/// # Errors
///
/// Returns [`Error::SourceUnreadable`] if the JSON does not have the converter's shape.
pub fn parse_converter_meta(json: &str, source_name: &str) -> Result<Vec<HeadingMeta>> {
    let meta: ConverterMeta =
        serde_json::from_str(json).map_err(|e| Error::unreadable(source_name, e.to_string()))?;
    Ok(meta
        .table_of_contents
        .into_iter()
        .map(HeadingMeta::from)
        .collect())
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| Error::unreadable(path.display().to_string(), e.to_string()))
}

#[derive(Clone, Debug, Default)]
/// Structure metadata stored in files next to the converted text.
pub struct FileSource {
    /// TOC file with one `level;title` bookmark per line.
    pub toc: Option<PathBuf>,
    /// Converter metadata JSON with a `table_of_contents` list.
    pub meta: Option<PathBuf>,
}

impl FileSource {
    #[must_use]
    /// Creates a source from optional TOC and metadata paths.
    pub fn new(toc: Option<PathBuf>, meta: Option<PathBuf>) -> Self {
        Self { toc, meta }
    }
}

impl DocumentSource for FileSource {
    fn bookmarks(&self) -> Result<Option<Vec<Bookmark>>> {
        let Some(path) = &self.toc else {
            return Ok(None);
        };
        debug!(path = %path.display(), "reading bookmarks");
        let text = read_source(path)?;
        parse_toc(&text, &path.display().to_string())
    }

    fn headings(&self) -> Result<Option<Vec<HeadingMeta>>> {
        let Some(path) = &self.meta else {
            return Ok(None);
        };
        debug!(path = %path.display(), "reading converter metadata");
        let json = read_source(path)?;
        parse_converter_meta(&json, &path.display().to_string()).map(Some)
    }
}

#[derive(Clone, Debug, Default)]
/// Structure metadata already held in memory.
pub struct StaticSource {
    /// Bookmarks, `None` when the document has none.
    pub bookmarks: Option<Vec<Bookmark>>,
    /// Converter headings, `None` when no metadata is available.
    pub headings: Option<Vec<HeadingMeta>>,
}

impl StaticSource {
    #[must_use]
    /// A source with bookmarks only.
    pub fn with_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            bookmarks: Some(bookmarks),
            headings: None,
        }
    }

    #[must_use]
    /// A source with converter headings only.
    pub fn with_headings(headings: Vec<HeadingMeta>) -> Self {
        Self {
            bookmarks: None,
            headings: Some(headings),
        }
    }
}

impl DocumentSource for StaticSource {
    fn bookmarks(&self) -> Result<Option<Vec<Bookmark>>> {
        Ok(self.bookmarks.clone())
    }

    fn headings(&self) -> Result<Option<Vec<HeadingMeta>>> {
        Ok(self.headings.clone())
    }
}

#[cfg(test)]
#[path = "tests/sources.rs"]
mod tests;
