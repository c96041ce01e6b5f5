//! XML format
//!
//! Elements become interior nodes named after their tag. An element holding
//! only text becomes a leaf. Attributes are collected under a `<xmlattr>`
//! child, and the text of an element that also has attributes or child
//! elements is kept under `<xmltext>`. Comments and processing instructions
//! are skipped.
//!
//! Output is compact: a declaration line followed by the elements with no
//! added whitespace.

use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::tree::{Children, Node};

pub mod serializer;

pub use serializer::to_xml_string;

/// Child holding an element's attributes
pub const ATTRIBUTES: &str = "<xmlattr>";
/// Child holding the text of an element that has attributes or children
pub const TEXT: &str = "<xmltext>";

/// Reads XML text into a tree whose single child is the document element.
pub fn from_xml_str(source: &str) -> Result<Node, FormatError> {
    let doc = roxmltree::Document::parse(source)
        .map_err(|e| FormatError::ParseError(format!("XML parsing error: {e}")))?;
    let root = doc.root_element();
    let mut tree = Node::new();
    tree.push_child(root.tag_name().name(), element_to_node(root)?)?;
    Ok(tree)
}

fn element_to_node(element: roxmltree::Node) -> Result<Node, FormatError> {
    let mut children = Children::new();

    let mut attributes = Node::new();
    for attribute in element.attributes() {
        attributes.push_child(attribute.name(), Node::leaf(attribute.value()))?;
    }
    if !attributes.is_empty() {
        children.insert(ATTRIBUTES.to_string(), vec![attributes]);
    }

    let mut text = String::new();
    for child in element.children() {
        if child.is_element() {
            children
                .entry(child.tag_name().name().to_string())
                .or_default()
                .push(element_to_node(child)?);
        } else if child.is_text() {
            text.push_str(child.text().unwrap_or_default());
        }
    }

    if children.is_empty() {
        return Ok(Node::Leaf(text));
    }
    let text = text.trim();
    if !text.is_empty() {
        children.insert(TEXT.to_string(), vec![Node::leaf(text)]);
    }
    Ok(Node::Interior(children))
}

/// Format implementation for XML
pub struct XmlFormat;

impl Format for XmlFormat {
    fn name(&self) -> &str {
        "xml"
    }

    fn description(&self) -> &str {
        "XML elements; attributes under <xmlattr>, mixed text under <xmltext>"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _options: &ConvertOptions) -> Result<Node, FormatError> {
        from_xml_str(source)
    }

    fn serialize(&self, tree: &Node, options: &ConvertOptions) -> Result<String, FormatError> {
        to_xml_string(tree, options.linewise)
    }
}
