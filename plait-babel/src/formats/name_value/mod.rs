//! name=value format
//!
//! Nested values are written inside braces: `x={a=1,b=2},y=3`. A repeated
//! name is an array: `x=1,x=2`.
//!
//! Whole-stream output is indented, one entry per line:
//!
//! ```text
//! x={
//!     a=1,
//!     b=2
//! },
//! y=3
//! ```
//!
//! Linewise output keeps every record on one line.

use crate::common::scan::{brace_group, split_assignment, split_tokens, unquote};
use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::tree::Node;

pub mod serializer;

pub use serializer::to_name_value_string;

/// Reads name=value text into a tree. Repeated names append.
pub fn from_name_value_str(source: &str, options: &ConvertOptions) -> Result<Node, FormatError> {
    let mut root = Node::new();
    fill(&mut root, source, options)?;
    Ok(root)
}

fn fill(node: &mut Node, text: &str, options: &ConvertOptions) -> Result<(), FormatError> {
    for token in split_tokens(text, options.delimiter)? {
        let (name, value) = split_assignment(token, options.equal_sign)?;
        let name = unquote(name)?;
        if name.is_empty() {
            return Err(FormatError::ParseError(format!(
                "expected a name in \"{token}\""
            )));
        }
        let child = match value {
            None => Node::leaf(""),
            Some(value) => match brace_group(value)? {
                Some(inner) => {
                    let mut child = Node::new();
                    fill(&mut child, inner, options)?;
                    child
                }
                None => Node::leaf(unquote(value)?),
            },
        };
        node.push_child(name.into_owned(), child)?;
    }
    Ok(())
}

/// Format implementation for name=value text
pub struct NameValueFormat;

impl Format for NameValueFormat {
    fn name(&self) -> &str {
        "name-value"
    }

    fn description(&self) -> &str {
        "name=value pairs with nested braces, e.g. x={a=1,b=2},y=3"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, options: &ConvertOptions) -> Result<Node, FormatError> {
        from_name_value_str(source, options)
    }

    fn serialize(&self, tree: &Node, options: &ConvertOptions) -> Result<String, FormatError> {
        Ok(to_name_value_string(tree, !options.linewise, options))
    }
}
