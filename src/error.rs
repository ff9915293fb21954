//! Error taxonomy for section tree reconstruction.
//!
//! Only a handful of conditions ever reach the caller. Heading mismatches and documents without
//! any structural signal are not errors at all: they degrade into content lines and root-only
//! trees respectively.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
/// Failures surfaced by the extraction pipeline and its collaborators.
pub enum Error {
    /// Outline or heading metadata exists but could not be opened or parsed.
    ///
    /// Distinct from a document that simply has no bookmarks, which is a normal outcome.
    #[error("outline source {source_name} is unreadable: {reason}")]
    SourceUnreadable {
        /// Human-readable name of the collaborator (usually a file path).
        source_name: String,
        /// What went wrong while reading it.
        reason: String,
    },

    /// The flat heading-marked text could not be read at all.
    #[error("cannot read text stream {}: {source}", path.display())]
    TextUnreadable {
        /// Location of the text stream.
        path: PathBuf,
        /// Underlying read failure.
        source: io::Error,
    },

    /// Writing to an output sink failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// JSON encoding or decoding failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The tree-sitter grammar could not be loaded.
    #[error(transparent)]
    Language(#[from] tree_sitter::LanguageError),

    /// A tree-sitter heading query failed to compile.
    #[error(transparent)]
    Query(#[from] tree_sitter::QueryError),

    /// Tree-sitter produced no syntax tree for the text.
    #[error("tree-sitter could not parse the text stream")]
    SyntaxTree,

    /// A configuration value is out of range or malformed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A nested document does not have the `{heading: {content, children}}` shape.
    #[error("invalid nested document: {0}")]
    InvalidNested(String),

    /// Tree construction observed its cancellation flag.
    #[error("tree construction cancelled")]
    Cancelled,
}

impl Error {
    #[must_use]
    /// Builds a [`Error::SourceUnreadable`] for the named collaborator.
    pub fn unreadable(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SourceUnreadable {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
