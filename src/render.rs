//! Box-drawing view of a section tree for terminals.
//!
//! Each heading is printed on its own line under its parent with `├──`/`└──` branches, and a
//! content-line count when the section carries body text.

use crate::node::{NodeId, Tree};
use crate::outline::Outline;

/// Generate box-drawing prefix for tree structure
fn tree_prefix(depth: usize, is_last: bool, open_ancestors: &[bool]) -> String {
    if depth == 0 {
        return String::new();
    }

    let mut prefix = String::new();

    // Draw vertical lines for ancestors that still have siblings below
    for i in 0..depth.saturating_sub(1) {
        if open_ancestors.get(i).copied().unwrap_or(false) {
            prefix.push_str("│   ");
        } else {
            prefix.push_str("    ");
        }
    }

    // Draw branch for current depth
    if is_last {
        prefix.push_str("└── ");
    } else {
        prefix.push_str("├── ");
    }

    prefix
}

#[must_use]
/// Renders the tree's headings with box-drawing branches.
pub fn render_tree(tree: &Tree) -> String {
    let mut out = String::new();
    let mut open_ancestors = Vec::new();
    render_node(tree, Tree::ROOT, 0, true, &mut open_ancestors, &mut out);
    out
}

fn render_node(
    tree: &Tree,
    id: NodeId,
    depth: usize,
    is_last: bool,
    open_ancestors: &mut Vec<bool>,
    out: &mut String,
) {
    let Some(node) = tree.get(id) else {
        return;
    };

    out.push_str(&tree_prefix(depth, is_last, open_ancestors));
    out.push_str(&node.heading);
    if !node.content.is_empty() {
        let lines = node.content.len();
        let unit = if lines == 1 { "line" } else { "lines" };
        out.push_str(&format!(" ({lines} {unit})"));
    }
    out.push('\n');

    if depth > 0 {
        open_ancestors.push(!is_last);
    }
    let count = node.children_indices.len();
    for (i, &child) in node.children_indices.iter().enumerate() {
        render_node(tree, child, depth + 1, i + 1 == count, open_ancestors, out);
    }
    if depth > 0 {
        open_ancestors.pop();
    }
}

#[must_use]
/// Renders an outline as `level title` lines indented by level.
pub fn render_outline(outline: &Outline) -> String {
    outline
        .entries
        .iter()
        .map(|entry| {
            format!(
                "{}{} {}\n",
                "  ".repeat(entry.level.saturating_sub(1)),
                entry.level,
                entry.title
            )
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/render.rs"]
mod tests;
