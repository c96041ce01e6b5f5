//! INFO format
//!
//! The whitespace-separated `key value` syntax with `{ ... }` blocks:
//!
//! ```text
//! server
//! {
//!     host "local host"
//!     port 80
//! }
//! ```

use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::tree::{Children, Node};
use std::borrow::Cow;

pub mod parser;

pub use parser::from_info_str;

const INDENT: &str = "    ";

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s.chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '{' | '}' | ';' | '"' | '\\'))
}

fn quote_info(s: &str) -> Cow<'_, str> {
    if !needs_quotes(s) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('"');
    Cow::Owned(out)
}

/// Writes a tree as INFO text with four-space indentation.
pub fn to_info_string(tree: &Node) -> Result<String, FormatError> {
    let Some(children) = tree.children() else {
        return Err(FormatError::BadData(
            "info output needs named values".to_string(),
        ));
    };
    let mut out = String::new();
    write_entries(&mut out, children, 0);
    Ok(out)
}

fn write_entries(out: &mut String, children: &Children, depth: usize) {
    let indent = INDENT.repeat(depth);
    for (name, sequence) in children {
        for node in sequence {
            out.push_str(&indent);
            out.push_str(&quote_info(name));
            match node {
                Node::Leaf(value) => {
                    out.push(' ');
                    out.push_str(&quote_info(value));
                    out.push('\n');
                }
                Node::Interior(grandchildren) => {
                    out.push('\n');
                    out.push_str(&indent);
                    out.push_str("{\n");
                    write_entries(out, grandchildren, depth + 1);
                    out.push_str(&indent);
                    out.push_str("}\n");
                }
            }
        }
    }
}

/// Format implementation for INFO files
pub struct InfoFormat;

impl Format for InfoFormat {
    fn name(&self) -> &str {
        "info"
    }

    fn description(&self) -> &str {
        "INFO key value pairs with { } blocks"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _options: &ConvertOptions) -> Result<Node, FormatError> {
        from_info_str(source)
    }

    fn serialize(&self, tree: &Node, _options: &ConvertOptions) -> Result<String, FormatError> {
        to_info_string(tree)
    }
}
