//! Writer for the XML format

use super::{ATTRIBUTES, TEXT};
use crate::error::FormatError;
use crate::tree::{Children, Node};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Writes a tree as compact XML.
///
/// Each top-level child becomes an element; a document with several top-level
/// elements is written as is and is left to the reader to reject. With
/// `single_line` the declaration is followed by a space instead of a newline,
/// there is no trailing newline, and line breaks inside text are written as
/// character references so the document stays on one line.
pub fn to_xml_string(tree: &Node, single_line: bool) -> Result<String, FormatError> {
    let mut writer = XmlWriter {
        out: String::from(DECLARATION),
        single_line,
    };
    writer.out.push(if single_line { ' ' } else { '\n' });
    match tree {
        Node::Leaf(value) => writer.text(value),
        Node::Interior(children) => writer.elements(children)?,
    }
    if !single_line {
        writer.out.push('\n');
    }
    Ok(writer.out)
}

struct XmlWriter {
    out: String,
    single_line: bool,
}

impl XmlWriter {
    fn elements(&mut self, children: &Children) -> Result<(), FormatError> {
        for (name, sequence) in children {
            if name == ATTRIBUTES {
                continue;
            }
            if name == TEXT {
                for node in sequence {
                    self.text(node.value().unwrap_or_default());
                }
                continue;
            }
            check_name(name)?;
            for node in sequence {
                self.element(name, node)?;
            }
        }
        Ok(())
    }

    fn element(&mut self, name: &str, node: &Node) -> Result<(), FormatError> {
        self.out.push('<');
        self.out.push_str(name);
        match node {
            Node::Leaf(value) if value.is_empty() => self.out.push_str("/>"),
            Node::Leaf(value) => {
                self.out.push('>');
                self.text(value);
                self.close(name);
            }
            Node::Interior(children) => {
                if let Some(attributes) = children.get(ATTRIBUTES).and_then(|s| s.first()) {
                    self.attributes(attributes)?;
                }
                let has_content = children.keys().any(|k| k != ATTRIBUTES);
                if has_content {
                    self.out.push('>');
                    self.elements(children)?;
                    self.close(name);
                } else {
                    self.out.push_str("/>");
                }
            }
        }
        Ok(())
    }

    fn attributes(&mut self, attributes: &Node) -> Result<(), FormatError> {
        let Some(children) = attributes.children() else {
            return Err(FormatError::BadData(format!(
                "{ATTRIBUTES} must hold named values"
            )));
        };
        for (name, sequence) in children {
            check_name(name)?;
            for node in sequence {
                let Some(value) = node.value() else {
                    return Err(FormatError::BadData(format!(
                        "attribute '{name}' cannot have children"
                    )));
                };
                self.out.push(' ');
                self.out.push_str(name);
                self.out.push_str("=\"");
                // A literal line break in an attribute reads back as a space.
                escape_into(&mut self.out, value, true);
                self.out.push('"');
            }
        }
        Ok(())
    }

    fn text(&mut self, value: &str) {
        escape_into(&mut self.out, value, self.single_line);
    }

    fn close(&mut self, name: &str) {
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }
}

/// Rejects names that would not produce well-formed XML.
fn check_name(name: &str) -> Result<(), FormatError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'));
    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(FormatError::BadData(format!(
            "'{name}' is not a valid XML name"
        )))
    }
}

/// Appends `s` with markup characters escaped. `\r` is always written as a
/// character reference; `\n` and `\t` only with `line_breaks`.
fn escape_into(out: &mut String, s: &str, line_breaks: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\r' => out.push_str("&#13;"),
            '\n' if line_breaks => out.push_str("&#10;"),
            '\t' if line_breaks => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
}
