//! JSON format
//!
//! Objects map to interior nodes and scalars to leaves. An array becomes a
//! sequence of same-named children, so `{"a":[1,2]}` and the name-value text
//! `a=1,a=2` are the same tree. Nested arrays and top-level arrays have no
//! tree form and are rejected.
//!
//! On output every leaf is written as a JSON string and every sequence longer
//! than one as an array.

use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::tree::{Children, Node};
use serde_json::{Map, Value};

/// Reads JSON text into a tree.
pub fn from_json_str(source: &str) -> Result<Node, FormatError> {
    let value: Value = serde_json::from_str(source)
        .map_err(|e| FormatError::ParseError(format!("JSON parsing error: {e}")))?;
    match value {
        Value::Object(map) => object_to_node(map),
        Value::Array(_) => Err(FormatError::BadData(
            "top-level JSON array cannot be represented".to_string(),
        )),
        other => Err(FormatError::BadData(format!(
            "top-level JSON value must be an object, found {other}"
        ))),
    }
}

fn object_to_node(map: Map<String, Value>) -> Result<Node, FormatError> {
    let mut children = Children::new();
    for (name, value) in map {
        let sequence = match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| value_to_node(&name, item))
                .collect::<Result<Vec<_>, _>>()?,
            value => vec![value_to_node(&name, value)?],
        };
        // an empty array leaves an empty interior node behind
        let sequence = if sequence.is_empty() {
            vec![Node::new()]
        } else {
            sequence
        };
        children.entry(name).or_default().extend(sequence);
    }
    Ok(Node::Interior(children))
}

/// Converts one array element or member value. Arrays are unpacked by
/// `object_to_node`, so an array here is nested.
fn value_to_node(name: &str, value: Value) -> Result<Node, FormatError> {
    Ok(match value {
        Value::Object(map) => object_to_node(map)?,
        Value::String(s) => Node::Leaf(s),
        Value::Null => Node::leaf("null"),
        Value::Bool(b) => Node::Leaf(b.to_string()),
        Value::Number(n) => Node::Leaf(n.to_string()),
        Value::Array(_) => {
            return Err(FormatError::BadData(format!(
                "nested JSON array under '{name}' cannot be represented"
            )))
        }
    })
}

fn node_to_value(node: &Node) -> Value {
    match node {
        Node::Leaf(value) => Value::String(value.clone()),
        Node::Interior(children) => {
            let mut map = Map::with_capacity(children.len());
            for (name, sequence) in children {
                let value = match sequence.as_slice() {
                    [single] => node_to_value(single),
                    many => Value::Array(many.iter().map(node_to_value).collect()),
                };
                map.insert(name.clone(), value);
            }
            Value::Object(map)
        }
    }
}

/// Writes a tree as pretty-printed JSON with a trailing newline.
pub fn to_json_string(tree: &Node) -> Result<String, FormatError> {
    let mut out = serde_json::to_string_pretty(&node_to_value(tree))
        .map_err(|e| FormatError::SerializationError(e.to_string()))?;
    out.push('\n');
    Ok(out)
}

/// Format implementation for JSON
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "JSON objects, arrays as repeated children"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _options: &ConvertOptions) -> Result<Node, FormatError> {
        from_json_str(source)
    }

    fn serialize(&self, tree: &Node, options: &ConvertOptions) -> Result<String, FormatError> {
        if options.linewise {
            serde_json::to_string(&node_to_value(tree))
                .map_err(|e| FormatError::SerializationError(e.to_string()))
        } else {
            to_json_string(tree)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrays_become_repeated_children() {
        let tree = from_json_str(r#"{"a":[1,{"b":true}],"c":null}"#).unwrap();
        let a = &tree.children().unwrap()["a"];
        assert_eq!(a[0], Node::leaf("1"));
        assert_eq!(a[1].child("b"), Some(&Node::leaf("true")));
        assert_eq!(tree.child("c"), Some(&Node::leaf("null")));
    }

    #[test]
    fn key_order_is_preserved() {
        let tree = from_json_str(r#"{"z":"1","a":"2","m":"3"}"#).unwrap();
        let names: Vec<_> = tree.children().unwrap().keys().cloned().collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn nested_arrays_are_bad_data() {
        let err = from_json_str(r#"{"a":[[1]]}"#).unwrap_err();
        assert!(matches!(err, FormatError::BadData(_)));
    }

    #[test]
    fn top_level_array_is_bad_data() {
        assert!(matches!(from_json_str("[1]"), Err(FormatError::BadData(_))));
        assert!(matches!(from_json_str("42"), Err(FormatError::BadData(_))));
    }

    #[test]
    fn syntax_errors_are_parse_errors() {
        assert!(matches!(from_json_str("{"), Err(FormatError::ParseError(_))));
    }

    #[test]
    fn empty_array_is_an_empty_object() {
        let tree = from_json_str(r#"{"a":[]}"#).unwrap();
        assert_eq!(tree.child("a"), Some(&Node::new()));
    }

    #[test]
    fn writes_leaves_as_strings() {
        let tree = Node::new()
            .with_child("a", Node::leaf("1"))
            .with_child("a", Node::leaf("2"))
            .with_child("b", Node::new().with_child("c", Node::leaf("x")));
        let options = ConvertOptions::default().with_linewise(true);
        let out = JsonFormat.serialize(&tree, &options).unwrap();
        assert_eq!(out, r#"{"a":["1","2"],"b":{"c":"x"}}"#);
    }

    #[test]
    fn pretty_output_ends_with_newline() {
        let tree = Node::new().with_child("a", Node::leaf("1"));
        let out = to_json_string(&tree).unwrap();
        assert_eq!(out, "{\n  \"a\": \"1\"\n}\n");
    }
}
