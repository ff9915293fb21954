//! Serialisers for finished section trees.
//!
//! Two shapes leave the crate: a nested JSON document where each node is keyed by its heading,
//! and a flat text rendering that lists every heading followed by its body in pre-order. Both
//! are pure traversals; writing goes through an explicit sink rather than redirected stdout.

use crate::error::{Error, Result};
use crate::node::{Node, NodeId, Tree};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

#[derive(Clone, Debug, PartialEq, Eq)]
/// One node of the nested document: `{"<heading>": {"content": [...], "children": [...]}}`.
pub struct NestedSection {
    /// Heading text, used as the single key of the JSON object.
    pub heading: String,
    /// Body lines in document order.
    pub content: Vec<String>,
    /// Child sections in document order.
    pub children: Vec<NestedSection>,
}

#[derive(Serialize)]
struct BodyRef<'a> {
    content: &'a [String],
    children: &'a [NestedSection],
}

#[derive(Deserialize)]
struct Body {
    #[serde(default)]
    content: Vec<String>,
    #[serde(default)]
    children: Vec<NestedSection>,
}

impl Serialize for NestedSection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(
            &self.heading,
            &BodyRef {
                content: &self.content,
                children: &self.children,
            },
        )?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for NestedSection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = BTreeMap::<String, Body>::deserialize(deserializer)?;
        if map.len() != 1 {
            return Err(de::Error::invalid_length(map.len(), &"exactly one heading key"));
        }
        let Some((heading, body)) = map.into_iter().next() else {
            return Err(de::Error::invalid_length(0, &"exactly one heading key"));
        };
        Ok(Self {
            heading,
            content: body.content,
            children: body.children,
        })
    }
}

impl NestedSection {
    /// Parses a nested JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNested`] if any object does not have exactly one heading key with
    /// a `{content, children}` body.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidNested(e.to_string()))
    }

    #[must_use]
    /// Number of sections in this subtree, itself included.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Self::count).sum::<usize>()
    }
}

#[must_use]
/// Nested document for the subtree rooted at `id`, if the id exists.
pub fn nested_from(tree: &Tree, id: NodeId) -> Option<NestedSection> {
    tree.get(id).map(|node| nested_node(tree, node))
}

fn nested_node(tree: &Tree, node: &Node) -> NestedSection {
    NestedSection {
        heading: node.heading.clone(),
        content: node.content.clone(),
        children: node
            .children_indices
            .iter()
            .filter_map(|&child| tree.get(child))
            .map(|child| nested_node(tree, child))
            .collect(),
    }
}

#[must_use]
/// Nested document for the whole tree, rooted at `"root"`.
pub fn to_nested(tree: &Tree) -> NestedSection {
    nested_node(tree, tree.root())
}

/// Writes the nested document as JSON.
///
/// # Errors
///
/// Returns an error if encoding or the sink fails.
pub fn write_json<W: Write>(tree: &Tree, mut sink: W, pretty: bool) -> Result<()> {
    let nested = to_nested(tree);
    if pretty {
        serde_json::to_writer_pretty(&mut sink, &nested)?;
    } else {
        serde_json::to_writer(&mut sink, &nested)?;
    }
    writeln!(sink)?;
    sink.flush()?;
    Ok(())
}

/// Writes every heading followed by its body lines and a blank line, in pre-order.
///
/// # Errors
///
/// Returns an error if the sink fails.
pub fn write_flat_text<W: Write>(tree: &Tree, mut sink: W) -> Result<()> {
    sink.write_all(to_flat_text(tree).as_bytes())?;
    sink.flush()?;
    Ok(())
}

#[must_use]
/// The flat text rendering as a string.
pub fn to_flat_text(tree: &Tree) -> String {
    let mut out = String::new();
    for node in tree.preorder().filter_map(|id| tree.get(id)) {
        out.push_str(&node.heading);
        out.push('\n');
        for line in &node.content {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
    }
    out
}

#[must_use]
/// Rebuilds a tree by replaying a nested document's headings, content and children.
///
/// The nested form carries no levels, so each node's level is its depth below the root. The
/// top-level object's content is replayed into the root sentinel.
pub fn tree_from_nested(nested: &NestedSection) -> Tree {
    let mut tree = Tree::new();
    for line in &nested.content {
        tree.push_content(Tree::ROOT, line.as_str());
    }
    replay_children(&mut tree, Tree::ROOT, 1, &nested.children);
    tree
}

fn replay_children(tree: &mut Tree, parent: NodeId, level: usize, children: &[NestedSection]) {
    for child in children {
        let id = tree.append_child(parent, level, child.heading.clone());
        for line in &child.content {
            tree.push_content(id, line.as_str());
        }
        replay_children(tree, id, level + 1, &child.children);
    }
}

#[cfg(test)]
#[path = "tests/serialize.rs"]
mod tests;
