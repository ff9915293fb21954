//! The heading matcher that turns flat text plus an outline into a section tree.
//!
//! A single forward pass reads the text line by line. Heading lines are compared against the
//! next expected outline entry only; the cursor never looks ahead or backtracks, so a
//! near-miss can never consume the same entry twice. Anything that is not an accepted heading
//! becomes body text of the node accepted most recently.
//!
//! ```text
//! root (0)
//! ├── Intro (1)        <- current while "Hello" is read
//! │   └── Details (2)  <- attached under current because 2 > 1
//! └── Outro (1)        <- 1 <= 2, so the frontier supplies the level-0 ancestor
//! ```

use crate::error::{Error, Result};
use crate::formats::{HeadingMarker, LineKind};
use crate::node::{NodeId, Tree, ROOT_LEVEL};
use crate::outline::OutlineEntry;
use crate::similarity::MatchStrategy;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// Incremental tree construction over a flat heading-marked text stream.
///
/// Holds the state carried across lines: the current node, the level frontier (most recent node
/// per level) and the outline cursor.
pub struct TreeBuilder<'a> {
    outline: &'a [OutlineEntry],
    cursor: usize,
    strategy: MatchStrategy,
    marker: HeadingMarker,
    tree: Tree,
    current: NodeId,
    frontier: BTreeMap<usize, NodeId>,
}

impl<'a> TreeBuilder<'a> {
    #[must_use]
    /// Starts a builder at the root with the cursor on the first outline entry.
    pub fn new(outline: &'a [OutlineEntry], strategy: MatchStrategy, marker: HeadingMarker) -> Self {
        Self {
            outline,
            cursor: 0,
            strategy,
            marker,
            tree: Tree::new(),
            current: Tree::ROOT,
            frontier: BTreeMap::from([(ROOT_LEVEL, Tree::ROOT)]),
        }
    }

    #[must_use]
    /// Index of the outline entry expected next.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    /// The outline entry expected next, if any remain.
    pub fn expected(&self) -> Option<&'a OutlineEntry> {
        self.outline.get(self.cursor)
    }

    #[must_use]
    /// Node currently receiving body text.
    pub fn current(&self) -> NodeId {
        self.current
    }

    #[must_use]
    /// The tree built so far.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Consumes one line of text (without its terminator).
    pub fn feed_line(&mut self, line: &str) {
        match self.marker.classify(line) {
            LineKind::Blank => {}
            LineKind::Heading { text, .. } => {
                match self.expected() {
                    Some(entry) if self.strategy.accepts(text, &entry.title) => {
                        self.cursor += 1;
                        self.accept(entry.level, text);
                    }
                    Some(entry) => {
                        trace!(heading = text, expected = %entry.title, "heading rejected");
                        self.tree.push_content(self.current, line);
                    }
                    None => self.tree.push_content(self.current, line),
                }
            }
            LineKind::Malformed | LineKind::Text => self.tree.push_content(self.current, line),
        }
    }

    /// Consumes every line of `text`.
    pub fn feed_text(&mut self, text: &str) {
        for line in text.lines() {
            self.feed_line(line);
        }
    }

    /// Consumes every line of `text`, checking `cancel` before each one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Cancelled`] as soon as the flag is observed set.
    pub fn feed_text_cancellable(&mut self, text: &str, cancel: &AtomicBool) -> Result<()> {
        for line in text.lines() {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
            self.feed_line(line);
        }
        Ok(())
    }

    #[must_use]
    /// Ends construction and hands over the tree.
    pub fn finish(self) -> Tree {
        debug!(
            nodes = self.tree.len(),
            matched = self.cursor,
            outline = self.outline.len(),
            "section tree built"
        );
        self.tree
    }

    fn accept(&mut self, level: usize, heading: &str) {
        let parent = if level > self.tree.get(self.current).map_or(ROOT_LEVEL, |n| n.level) {
            self.current
        } else {
            self.nearest_ancestor(level)
        };

        let id = self.tree.append_child(parent, level, heading.to_string());
        self.frontier.insert(level, id);
        self.current = id;
        debug!(heading, level, parent, "heading accepted");
    }

    /// Most recent live node at the greatest level strictly below `level`.
    ///
    /// Entries deeper than a newer, shallower node are stale: the frontier is never pruned, so
    /// an entry only counts if no entry at a smaller level was created after it. Ids grow in
    /// creation order, which makes that a running maximum over the ascending levels.
    fn nearest_ancestor(&self, level: usize) -> NodeId {
        self.frontier
            .range(..level)
            .fold(Tree::ROOT, |parent, (_, &id)| parent.max(id))
    }
}

#[must_use]
/// Builds a tree from a whole text stream in one call.
pub fn build_tree(
    text: &str,
    outline: &[OutlineEntry],
    strategy: MatchStrategy,
    marker: HeadingMarker,
) -> Tree {
    let mut builder = TreeBuilder::new(outline, strategy, marker);
    builder.feed_text(text);
    builder.finish()
}

#[cfg(test)]
#[path = "tests/builder.rs"]
mod tests;
