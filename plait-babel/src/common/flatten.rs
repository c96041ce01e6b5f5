//! Converts a tree into a flat list of path=value pairs.
//!
//! # The Algorithm
//!
//! 1. Walk the tree in pre-order, keeping the path of the current node
//! 2. For every child sequence, push the child name; when the sequence holds
//!    more than one node, also push the position of each node
//! 3. Every leaf emits one pair; interior nodes only recurse, except an empty
//!    one below the root, which emits an empty value so that it survives the
//!    trip back (see [`Node`]'s equality)
//!
//! Index segments are always recorded in the pairs. Whether they show up in
//! the rendered text is decided by [`crate::IndexMode`] when rendering, so the
//! `Disabled` mode is knowingly lossy for arrays.

use super::scan::{quote, quote_name};
use crate::options::ConvertOptions;
use crate::path::Path;
use crate::tree::Node;

/// One flattened entry
#[derive(Debug, Clone, PartialEq)]
pub struct PathValue {
    pub path: Path,
    pub value: String,
}

impl PathValue {
    pub fn new(path: Path, value: impl Into<String>) -> Self {
        PathValue {
            path,
            value: value.into(),
        }
    }

    /// `path=value` with the value quoted when needed
    pub fn render(&self, options: &ConvertOptions) -> String {
        format!(
            "{}{}{}",
            render_path(&self.path, options),
            options.equal_sign,
            quote(&self.value, options)
        )
    }
}

/// Renders `path` with every name segment quoted where the path syntax or the
/// separators in `options` would otherwise split it.
pub fn render_path(path: &Path, options: &ConvertOptions) -> String {
    path.render_names(options.index_mode, |name, follows_name, out| {
        out.push_str(&quote_name(name, follows_name, options));
    })
}

/// Flattens `root` into pairs in pre-order.
pub fn flatten(root: &Node) -> Vec<PathValue> {
    let mut out = Vec::new();
    let mut path = Path::new();
    walk(root, &mut path, &mut out);
    out
}

fn walk(node: &Node, path: &mut Path, out: &mut Vec<PathValue>) {
    match node {
        Node::Leaf(value) => out.push(PathValue::new(path.clone(), value.clone())),
        Node::Interior(children) if children.is_empty() => {
            if !path.is_empty() {
                out.push(PathValue::new(path.clone(), ""));
            }
        }
        Node::Interior(children) => {
            for (name, sequence) in children {
                path.push_name(name.clone());
                if sequence.len() == 1 {
                    walk(&sequence[0], path, out);
                } else {
                    for (index, child) in sequence.iter().enumerate() {
                        path.push_index(index);
                        walk(child, path, out);
                        path.pop();
                    }
                }
                path.pop();
            }
        }
    }
}

/// Renders pairs joined by the configured delimiter.
pub fn render_path_values(pairs: &[PathValue], options: &ConvertOptions) -> String {
    let delimiter = options.delimiter.to_string();
    pairs
        .iter()
        .map(|pair| pair.render(options))
        .collect::<Vec<_>>()
        .join(&delimiter)
}

/// Tree to path=value text in one step.
pub fn to_path_value_string(root: &Node, options: &ConvertOptions) -> String {
    render_path_values(&flatten(root), options)
}
