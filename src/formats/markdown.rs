//! Markdown format implementation using tree-sitter-md.
//!
//! This module provides the tree-sitter query for extracting heading titles from ATX-style
//! headings (# syntax), which is how document converters mark headings in their flat output.

use crate::formats::Format;

/// Tree-sitter query for ATX-style markdown headings (# syntax).
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn language(&self) -> tree_sitter::Language {
        tree_sitter_md::LANGUAGE.into()
    }

    fn title_query(&self) -> &'static str {
        "(atx_heading (inline) @title)"
    }
}
