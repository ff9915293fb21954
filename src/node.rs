//! Node representation for reconstructed section trees.
//!
//! A node represents a hierarchical division of a document, corresponding to an accepted
//! heading in the flat text. Nodes live in an arena owned by [`Tree`]: every node is referenced
//! by exactly one parent's `children_indices`, and the `parent_index` back-reference is only
//! ever used for lookups.

/// Index of a node inside its [`Tree`] arena.
///
/// Ids are handed out in creation order, so a larger id always means a node created later.
pub type NodeId = usize;

/// Level of the sentinel root node.
pub const ROOT_LEVEL: usize = 0;

/// Heading text of the sentinel root node.
pub const ROOT_HEADING: &str = "root";

#[derive(Clone, Debug, PartialEq, Eq)]
/// Hierarchical document division with the body text that followed its heading.
pub struct Node {
    /// Nesting depth indicator; strictly greater than every ancestor's level.
    pub level: usize,
    /// Heading text without markup symbols.
    pub heading: String,
    /// Body lines in document order, without line terminators.
    pub content: Vec<String>,
    /// Index of the containing node, `None` only for the root.
    pub parent_index: Option<NodeId>,
    /// Indices of directly nested nodes in document order.
    pub children_indices: Vec<NodeId>,
}

impl Node {
    fn new(level: usize, heading: String, parent_index: Option<NodeId>) -> Self {
        Self {
            level,
            heading,
            content: Vec::new(),
            parent_index,
            children_indices: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Arena of nodes rooted at a `level = 0` sentinel.
pub struct Tree {
    nodes: Vec<Node>,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Id of the sentinel root.
    pub const ROOT: NodeId = 0;

    #[must_use]
    /// Creates a tree holding only the root sentinel.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(ROOT_LEVEL, ROOT_HEADING.to_string(), None)],
        }
    }

    #[must_use]
    /// The sentinel root node.
    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    #[must_use]
    /// Looks up a node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    #[must_use]
    /// Number of nodes including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Creates a node and attaches it as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not an id issued by this tree.
    pub fn append_child(&mut self, parent: NodeId, level: usize, heading: String) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(level, heading, Some(parent)));
        self.nodes[parent].children_indices.push(id);
        id
    }

    /// Appends a body line to a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not an id issued by this tree.
    pub fn push_content(&mut self, id: NodeId, line: impl Into<String>) {
        self.nodes[id].content.push(line.into());
    }

    #[must_use]
    /// Iterates the direct children of a node in document order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|node| node.children_indices.iter())
            .map(|&child| &self.nodes[child])
    }

    #[must_use]
    /// Chain of ancestor ids from the parent of `id` up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = self.nodes.get(id).and_then(|node| node.parent_index);
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.nodes[parent].parent_index;
        }
        chain
    }

    #[must_use]
    /// Number of edges between the root and `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    #[must_use]
    /// Walks the tree in pre-order (document order), yielding ids.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![Self::ROOT],
        }
    }

    #[must_use]
    /// Checks the level invariant: every node's level exceeds its parent's.
    pub fn levels_are_consistent(&self) -> bool {
        self.nodes.iter().all(|node| {
            node.parent_index
                .is_none_or(|parent| self.nodes[parent].level < node.level)
        })
    }
}

/// Pre-order traversal over a [`Tree`], produced by [`Tree::preorder`].
pub struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let node = &self.tree.nodes[id];
        self.stack.extend(node.children_indices.iter().rev());
        Some(id)
    }
}

#[cfg(test)]
#[path = "tests/node.rs"]
mod tests;
