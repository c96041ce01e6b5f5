//! INI format
//!
//! `[section]` headers open a section, `key=value` lines fill it. Lines
//! starting with `;` or `#` are comments. Keys before the first header live
//! at the top level. A tree deeper than two levels, or one with a repeated
//! name, has no INI form.

use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::tree::Node;

/// Reads INI text into a tree.
pub fn from_ini_str(source: &str) -> Result<Node, FormatError> {
    let mut tree = Node::new();
    let mut section: Option<String> = None;

    for (number, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }
        let number = number + 1;
        if let Some(rest) = line.strip_prefix('[') {
            let Some(name) = rest.strip_suffix(']') else {
                return Err(FormatError::ParseError(format!(
                    "line {number}: unmatched '['"
                )));
            };
            let name = name.trim();
            if tree.child(name).is_some() {
                return Err(FormatError::BadData(format!(
                    "line {number}: duplicate section name '{name}'"
                )));
            }
            tree.push_child(name, Node::new())?;
            section = Some(name.to_string());
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(FormatError::ParseError(format!(
                "line {number}: '=' character not found"
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(FormatError::ParseError(format!(
                "line {number}: key expected"
            )));
        }
        let target = match &section {
            Some(name) => section_mut(&mut tree, name)?,
            None => &mut tree,
        };
        if target.child(key).is_some() {
            return Err(FormatError::BadData(format!(
                "line {number}: duplicate key name '{key}'"
            )));
        }
        target.push_child(key, Node::leaf(value.trim()))?;
    }
    Ok(tree)
}

fn section_mut<'a>(tree: &'a mut Node, name: &str) -> Result<&'a mut Node, FormatError> {
    tree.children_mut(name)?
        .get_mut(name)
        .and_then(|sequence| sequence.last_mut())
        .ok_or_else(|| FormatError::BadData(format!("section '{name}' vanished")))
}

/// Writes a tree as INI text. Top-level values come first, then one block per
/// section.
pub fn to_ini_string(tree: &Node) -> Result<String, FormatError> {
    let Some(children) = tree.children() else {
        return Err(FormatError::BadData(
            "ini output needs named values".to_string(),
        ));
    };
    let mut values = String::new();
    let mut sections = String::new();

    for (name, sequence) in children {
        let [node] = sequence.as_slice() else {
            return Err(FormatError::BadData(format!("duplicate key '{name}'")));
        };
        match node {
            Node::Leaf(value) => {
                values.push_str(&format!("{name}={value}\n"));
            }
            Node::Interior(entries) => {
                sections.push_str(&format!("[{name}]\n"));
                for (key, sequence) in entries {
                    let [entry] = sequence.as_slice() else {
                        return Err(FormatError::BadData(format!(
                            "duplicate key '{name}/{key}'"
                        )));
                    };
                    let Some(value) = entry.value() else {
                        return Err(FormatError::BadData(format!(
                            "'{name}/{key}' is nested deeper than ini allows"
                        )));
                    };
                    sections.push_str(&format!("{key}={value}\n"));
                }
            }
        }
    }
    values.push_str(&sections);
    Ok(values)
}

/// Format implementation for INI files
pub struct IniFormat;

impl Format for IniFormat {
    fn name(&self) -> &str {
        "ini"
    }

    fn description(&self) -> &str {
        "INI sections with key=value entries"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, _options: &ConvertOptions) -> Result<Node, FormatError> {
        from_ini_str(source)
    }

    fn serialize(&self, tree: &Node, _options: &ConvertOptions) -> Result<String, FormatError> {
        to_ini_string(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "; settings\nname = demo\n\n[server]\nhost=localhost\nport = 8080\n# done\n";

    #[test]
    fn reads_sections_and_top_level_keys() {
        let tree = from_ini_str(SAMPLE).unwrap();
        assert_eq!(tree.child("name"), Some(&Node::leaf("demo")));
        let server = tree.child("server").unwrap();
        assert_eq!(server.child("port"), Some(&Node::leaf("8080")));
    }

    #[test]
    fn duplicate_keys_are_bad_data() {
        let err = from_ini_str("[a]\nx=1\nx=2\n").unwrap_err();
        assert!(matches!(err, FormatError::BadData(_)));
    }

    #[test]
    fn line_without_equal_sign_is_a_parse_error() {
        let err = from_ini_str("[a]\nnothing\n").unwrap_err();
        assert!(matches!(err, FormatError::ParseError(_)));
    }

    #[test]
    fn writes_values_before_sections() {
        let tree = from_ini_str(SAMPLE).unwrap();
        assert_eq!(
            to_ini_string(&tree).unwrap(),
            "name=demo\n[server]\nhost=localhost\nport=8080\n"
        );
    }

    #[test]
    fn deep_trees_are_bad_data() {
        let tree = Node::new().with_child(
            "a",
            Node::new().with_child("b", Node::new().with_child("c", Node::leaf("1"))),
        );
        assert!(matches!(to_ini_string(&tree), Err(FormatError::BadData(_))));
    }
}
