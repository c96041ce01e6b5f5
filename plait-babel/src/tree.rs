//! The hierarchical value every format reads into and writes from.
//!
//! A [`Node`] is either a leaf holding a scalar or an interior node holding an
//! insertion-ordered mapping from child name to the sequence of children with
//! that name. A sequence longer than one is an array. Ownership is strictly
//! hierarchical; the root of a tree is always an interior node.
//!
//! An empty leaf and an interior node without children compare equal. Text
//! formats write both as an empty value, and an empty leaf turns into an
//! interior node as soon as a child is added to it.

use crate::error::FormatError;
use crate::path::{Path, Segment};
use indexmap::IndexMap;

/// Children of an interior node, keyed by name in first-insertion order.
pub type Children = IndexMap<String, Vec<Node>>;

#[derive(Debug, Clone)]
pub enum Node {
    Leaf(String),
    Interior(Children),
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Node::Leaf(a), Node::Leaf(b)) => a == b,
            (Node::Interior(a), Node::Interior(b)) => a == b,
            _ => self.is_empty() && other.is_empty(),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Node::Interior(Children::new())
    }
}

impl Node {
    /// An empty interior node, suitable as a tree root.
    pub fn new() -> Self {
        Node::default()
    }

    pub fn leaf(value: impl Into<String>) -> Self {
        Node::Leaf(value.into())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Node::Leaf(value) => Some(value),
            Node::Interior(_) => None,
        }
    }

    pub fn children(&self) -> Option<&Children> {
        match self {
            Node::Leaf(_) => None,
            Node::Interior(children) => Some(children),
        }
    }

    /// True for an interior node without children or an empty leaf.
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Leaf(value) => value.is_empty(),
            Node::Interior(children) => children.is_empty(),
        }
    }

    /// Appends `child` to the sequence named `name`.
    ///
    /// An empty leaf is promoted to an interior node first; a non-empty leaf
    /// cannot hold children.
    pub fn push_child(&mut self, name: impl Into<String>, child: Node) -> Result<(), FormatError> {
        let name = name.into();
        let children = self.children_mut(&name)?;
        children.entry(name).or_default().push(child);
        Ok(())
    }

    /// Fluent form of [`Node::push_child`] for building trees in code.
    ///
    /// Panics if `self` is a non-empty leaf.
    #[must_use]
    pub fn with_child(mut self, name: impl Into<String>, child: Node) -> Self {
        if let Err(err) = self.push_child(name, child) {
            panic!("{err}");
        }
        self
    }

    /// First child called `name`
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children()?.get(name)?.first()
    }

    /// Resolves `path` against this node. A name without an index selects
    /// the first child of that name.
    pub fn get(&self, path: &Path) -> Option<&Node> {
        let mut current = self;
        let segments = path.segments();
        let mut i = 0;
        while i < segments.len() {
            let Segment::Name(name) = &segments[i] else {
                return None;
            };
            let index = match segments.get(i + 1) {
                Some(Segment::Index(index)) => {
                    i += 1;
                    *index
                }
                _ => 0,
            };
            current = current.children()?.get(name.as_str())?.get(index)?;
            i += 1;
        }
        Some(current)
    }

    pub(crate) fn children_mut(&mut self, context: &str) -> Result<&mut Children, FormatError> {
        if matches!(self, Node::Leaf(value) if value.is_empty()) {
            *self = Node::new();
        }
        match self {
            Node::Interior(children) => Ok(children),
            Node::Leaf(value) => Err(FormatError::BadPath(format!(
                "cannot add child '{context}' to value \"{value}\""
            ))),
        }
    }
}
