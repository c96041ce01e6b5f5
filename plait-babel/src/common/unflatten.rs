//! Rebuilds a tree from path=value text.
//!
//! # The Algorithm
//!
//! 1. **Tokenizing:** split the text at top-level delimiters, then each token
//!    at its first top-level equal sign (see [`super::scan`])
//! 2. **Nested values:** a value that is a single `{...}` group is decoded
//!    recursively and its pairs are prefixed with the token's path
//! 3. **Duplicates:** the list is checked or filtered according to
//!    [`DuplicatePathPolicy`] before anything is built
//! 4. **Insertion:** each pair walks down from the root creating interior
//!    nodes as needed. A name selects the first child with that name; a name
//!    followed by an index selects that position, appending when the index
//!    equals the current length
//!
//! Under `Allow` a repeated path overwrites the earlier value in place, so the
//! result only depends on the order of the list. `TakeLast` ends up the same
//! way: each path keeps the position of its first occurrence and the value of
//! its last one.
//!
//! Path names are split on `/` before they are unquoted, so a quoted segment
//! may hold `/`, `[` or digits without turning into several segments or an
//! index.

use super::flatten::PathValue;
use super::scan::{brace_group, split_assignment, split_tokens, unquote, Class, Scanner};
use crate::error::FormatError;
use crate::options::{ConvertOptions, DuplicatePathPolicy};
use crate::path::{is_digits, Path, Segment};
use crate::tree::Node;
use std::collections::{HashMap, HashSet};

/// Decodes path=value text into pairs, in the order they appear.
pub fn parse_path_values(text: &str, options: &ConvertOptions) -> Result<Vec<PathValue>, FormatError> {
    let mut pairs = Vec::new();
    collect_pairs(text, &Path::new(), options, &mut pairs)?;
    Ok(pairs)
}

fn collect_pairs(
    text: &str,
    prefix: &Path,
    options: &ConvertOptions,
    pairs: &mut Vec<PathValue>,
) -> Result<(), FormatError> {
    for token in split_tokens(text, options.delimiter)? {
        let (name, value) = split_assignment(token, options.equal_sign)?;
        let path = parse_path(name)?;
        if path.is_empty() {
            return Err(FormatError::ParseError(format!(
                "expected a path in \"{token}\""
            )));
        }
        let path = prefix.join(&path);
        match value {
            None => pairs.push(PathValue::new(path, "")),
            Some(value) => match brace_group(value)? {
                Some(inner) => collect_pairs(inner, &path, options, pairs)?,
                None => pairs.push(PathValue::new(path, unquote(value)?)),
            },
        }
    }
    Ok(())
}

/// Builds a tree from pairs, resolving repeated paths with `policy`.
pub fn build_tree(pairs: Vec<PathValue>, policy: DuplicatePathPolicy) -> Result<Node, FormatError> {
    let pairs = match policy {
        DuplicatePathPolicy::Allow => pairs,
        DuplicatePathPolicy::Reject => {
            if let Some(path) = first_repeated_path(&pairs) {
                return Err(FormatError::DuplicatePath(path.clone()));
            }
            pairs
        }
        DuplicatePathPolicy::TakeLast => keep_last_values(pairs),
    };
    let mut root = Node::new();
    for pair in pairs {
        insert(&mut root, &pair.path, pair.value)?;
    }
    Ok(root)
}

/// Decodes and builds in one step.
pub fn from_path_value_string(text: &str, options: &ConvertOptions) -> Result<Node, FormatError> {
    build_tree(parse_path_values(text, options)?, options.duplicates)
}

fn first_repeated_path(pairs: &[PathValue]) -> Option<&Path> {
    let mut seen = HashSet::with_capacity(pairs.len());
    pairs
        .iter()
        .map(|pair| &pair.path)
        .find(|path| !seen.insert(*path))
}

fn keep_last_values(pairs: Vec<PathValue>) -> Vec<PathValue> {
    let mut slots: HashMap<Path, usize> = HashMap::with_capacity(pairs.len());
    let mut kept: Vec<PathValue> = Vec::with_capacity(pairs.len());
    for pair in pairs {
        match slots.get(&pair.path) {
            Some(&slot) => kept[slot].value = pair.value,
            None => {
                slots.insert(pair.path.clone(), kept.len());
                kept.push(pair);
            }
        }
    }
    kept
}

/// Parses the name part of a token into a path.
///
/// Segments are split at `/` outside quotes and escapes, then unquoted. A
/// trailing unquoted `[N]` is an index, as is an unquoted all-digit segment
/// right after a name. Empty segments are skipped.
pub fn parse_path(text: &str) -> Result<Path, FormatError> {
    let mut path = Path::new();
    let mut scanner = Scanner::flat();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if matches!(scanner.feed(c)?, Class::Plain { .. }) && c == '/' {
            push_segment(&mut path, text[start..i].trim())?;
            start = i + 1;
        }
    }
    scanner.finish()?;
    push_segment(&mut path, text[start..].trim())?;
    Ok(path)
}

fn push_segment(path: &mut Path, raw: &str) -> Result<(), FormatError> {
    if raw.is_empty() {
        return Ok(());
    }
    if let Some((name, index)) = split_index(raw)? {
        path.push_name(unquote(name)?);
        path.push_index(index);
        return Ok(());
    }
    let follows_name = matches!(path.segments().last(), Some(Segment::Name(_)));
    match raw.parse::<usize>() {
        Ok(index) if follows_name && is_digits(raw) => path.push_index(index),
        _ => path.push_name(unquote(raw)?),
    }
    Ok(())
}

/// Splits `name[N]` where the bracket is outside quotes and escapes.
fn split_index(raw: &str) -> Result<Option<(&str, usize)>, FormatError> {
    let Some(inner) = raw.strip_suffix(']') else {
        return Ok(None);
    };
    let mut scanner = Scanner::flat();
    let mut open = None;
    for (i, c) in inner.char_indices() {
        if matches!(scanner.feed(c)?, Class::Plain { .. }) && c == '[' {
            open = Some(i);
        }
    }
    let Some(open) = open else {
        return Ok(None);
    };
    let digits = &inner[open + 1..];
    if open == 0 || !is_digits(digits) {
        return Ok(None);
    }
    Ok(digits.parse().ok().map(|index| (&inner[..open], index)))
}

/// Writes `value` at `path`, creating intermediate nodes.
pub fn insert(root: &mut Node, path: &Path, value: String) -> Result<(), FormatError> {
    if path.is_empty() {
        return Err(FormatError::BadPath("empty path".to_string()));
    }
    let segments = path.segments();
    let mut current = root;
    let mut i = 0;
    while i < segments.len() {
        let Segment::Name(name) = &segments[i] else {
            return Err(FormatError::BadPath(format!(
                "index without a name in path '{path}'"
            )));
        };
        let index = match segments.get(i + 1) {
            Some(Segment::Index(index)) => {
                i += 1;
                *index
            }
            _ => 0,
        };
        let sequence = current.children_mut(name)?.entry(name.clone()).or_default();
        if index == sequence.len() {
            sequence.push(Node::leaf(""));
        } else if index > sequence.len() {
            return Err(FormatError::BadPath(format!(
                "index {index} out of range in path '{path}': '{name}' has {} element(s)",
                sequence.len()
            )));
        }
        current = &mut sequence[index];
        i += 1;
    }
    if let Node::Interior(children) = current {
        if !children.is_empty() {
            return Err(FormatError::BadPath(format!(
                "cannot assign a value to '{path}' which has children"
            )));
        }
    }
    *current = Node::Leaf(value);
    Ok(())
}
