//! Selecting parts of a tree by path
//!
//! A selector is either an x-path such as `a/b[1]/c` or a regular expression
//! matched against the whole rendered path of every node. Patterns containing
//! any of `.{}()\*+?|^$` are regular expressions; with `force_regex` square
//! brackets count as well, so `a[12]` stops being an index.

use crate::common::{flatten, render_path, render_path_values};
use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::path::Path;
use crate::registry::FormatRegistry;
use crate::tree::Node;
use regex::Regex;

const REGEX_CHARACTERS: &str = ".{}()\\*+?|^$";

#[derive(Debug, Clone)]
pub enum Selector {
    Path { pattern: String, path: Path },
    Regex { pattern: String, regex: Regex },
}

impl Selector {
    pub fn parse(pattern: &str, force_regex: bool) -> Result<Self, FormatError> {
        let is_regex = pattern
            .chars()
            .any(|c| REGEX_CHARACTERS.contains(c) || (force_regex && matches!(c, '[' | ']')));
        if !is_regex {
            return Ok(Selector::Path {
                pattern: pattern.to_string(),
                path: Path::from(pattern),
            });
        }
        let regex = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|e| FormatError::ParseError(format!("invalid regex '{pattern}': {e}")))?;
        Ok(Selector::Regex {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Selector::Regex { .. })
    }

    fn matches(&self, rendered: &str) -> bool {
        match self {
            Selector::Path { pattern, .. } => pattern == rendered,
            Selector::Regex { regex, .. } => regex.is_match(rendered),
        }
    }
}

/// A selected node and the path it was found at
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub path: Path,
    pub node: &'a Node,
}

/// Finds the nodes selected by `selectors`.
///
/// With x-paths only, matches come in selector order and missing paths are
/// skipped. As soon as one selector is a regex, the tree is walked in
/// pre-order and every node is tested against every selector.
pub fn select<'a>(tree: &'a Node, selectors: &[Selector]) -> Vec<Match<'a>> {
    if selectors.iter().any(Selector::is_regex) {
        let mut out = Vec::new();
        walk(tree, &mut Path::new(), selectors, &mut out);
        return out;
    }
    selectors
        .iter()
        .filter_map(|selector| match selector {
            Selector::Path { path, .. } => tree.get(path).map(|node| Match {
                path: path.clone(),
                node,
            }),
            Selector::Regex { .. } => None,
        })
        .collect()
}

fn walk<'a>(node: &'a Node, path: &mut Path, selectors: &[Selector], out: &mut Vec<Match<'a>>) {
    let Some(children) = node.children() else {
        return;
    };
    for (name, sequence) in children {
        path.push_name(name.clone());
        for (i, child) in sequence.iter().enumerate() {
            if sequence.len() > 1 {
                path.push_index(i);
            }
            let rendered = path.to_string();
            for selector in selectors {
                if selector.matches(&rendered) {
                    out.push(Match {
                        path: path.clone(),
                        node: child,
                    });
                }
            }
            walk(child, path, selectors, out);
            if sequence.len() > 1 {
                path.pop();
            }
        }
        path.pop();
    }
}

/// Renders matches for output.
///
/// A non-empty leaf is written as `value` (or `path=value` with
/// `output_path`) on its own line. Anything else is serialized with `format`;
/// path-value output is prefixed with the match path when `output_path` is
/// set.
pub fn render_matches(
    matches: &[Match<'_>],
    format: &dyn Format,
    options: &ConvertOptions,
    output_path: bool,
) -> Result<String, FormatError> {
    let mut out = String::new();
    for m in matches {
        let rendered_path = render_path(&m.path, options);
        match m.node {
            Node::Leaf(value) if !value.is_empty() => {
                if output_path {
                    out.push_str(&rendered_path);
                    out.push(options.equal_sign);
                }
                out.push_str(value);
                out.push('\n');
            }
            node if format.name() == "path-value" => {
                let mut pairs = flatten(node);
                if output_path {
                    for pair in &mut pairs {
                        pair.path = m.path.join(&pair.path);
                    }
                }
                let text = render_path_values(&pairs, options);
                if !text.is_empty() {
                    out.push_str(&text);
                    out.push('\n');
                }
            }
            node => out.push_str(&format.serialize(node, options)?),
        }
    }
    Ok(out)
}

/// Selectors bound to an input and an output format
pub struct Query<'r> {
    from: &'r dyn Format,
    to: &'r dyn Format,
    selectors: Vec<Selector>,
    options: ConvertOptions,
    output_path: bool,
}

impl<'r> Query<'r> {
    /// Looks up both formats; unknown names fail before any input is read.
    pub fn new(
        registry: &'r FormatRegistry,
        from: &str,
        to: &str,
        selectors: Vec<Selector>,
        options: ConvertOptions,
    ) -> Result<Self, FormatError> {
        Ok(Query {
            from: registry.get(from)?,
            to: registry.get(to)?,
            selectors,
            options,
            output_path: false,
        })
    }

    /// Prefix every output value with the path it was found at.
    #[must_use]
    pub fn with_output_path(mut self, output_path: bool) -> Self {
        self.output_path = output_path;
        self
    }

    /// Parses one record and renders everything the selectors pick out of it.
    pub fn apply(&self, source: &str) -> Result<String, FormatError> {
        let tree = self.from.parse(source, &self.options)?;
        let matches = select(&tree, &self.selectors);
        render_matches(&matches, self.to, &self.options, self.output_path)
    }
}
