//! sectree: rebuild a document's section tree from flat heading-marked text.
//!
//! A flat text rendering loses its heading hierarchy: every heading looks the same. The
//! document's own structure (bookmarks, numbered titles or heading glyph sizes) is turned into a
//! leveled outline, and a single pass over the text matches heading lines against that outline
//! to rebuild the tree, which can then be written as nested JSON or flat text.
#![allow(clippy::multiple_crate_versions)]

pub mod builder;
pub mod config;
pub mod error;
pub mod formats;
pub mod level;
pub mod node;
pub mod outline;
pub mod parser;
pub mod render;
pub mod serialize;
pub mod similarity;
pub mod sources;

pub use error::{Error, Result};
pub use node::{Node, NodeId, Tree};
pub use outline::{Outline, OutlineEntry};
pub use parser::{ParsedDocument, SectionParser};
