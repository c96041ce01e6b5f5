//! Paths locating a value inside a tree
//!
//! A path is a sequence of name and index segments. Its textual form separates
//! segments with `/`; an index is written either in brackets after the name it
//! applies to (`y[0]/x`) or as a segment of its own (`y/0/x`).

use crate::options::IndexMode;
use std::fmt;
use std::str::FromStr;

/// A single path step
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Name(String),
    /// Position within the sequence selected by the preceding name
    Index(usize),
}

/// Ordered sequence of segments locating a value in a [`crate::Node`] tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn push_name(&mut self, name: impl Into<String>) {
        self.segments.push(Segment::Name(name.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.segments.push(Segment::Index(index));
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    /// Returns a new path made of `self` followed by `other`.
    pub fn join(&self, other: &Path) -> Path {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Path { segments }
    }

    /// Render the path using `/` separators and the given index style.
    pub fn render(&self, mode: IndexMode) -> String {
        self.render_names(mode, |name, _, out| out.push_str(name))
    }

    /// Like [`Path::render`], but each name segment is written by
    /// `write_name`. Its second argument is true when the segment directly
    /// follows a rendered name, where a number would read back as an index.
    pub fn render_names<F>(&self, mode: IndexMode, mut write_name: F) -> String
    where
        F: FnMut(&str, bool, &mut String),
    {
        let mut out = String::new();
        let mut follows_name = false;
        for segment in &self.segments {
            match segment {
                Segment::Name(name) => {
                    if !out.is_empty() {
                        out.push('/');
                    }
                    write_name(name, follows_name, &mut out);
                    follows_name = true;
                }
                Segment::Index(index) => match mode {
                    IndexMode::Disabled => {}
                    IndexMode::WithBrackets => {
                        out.push('[');
                        out.push_str(&index.to_string());
                        out.push(']');
                        follows_name = false;
                    }
                    IndexMode::WithoutBrackets => {
                        if !out.is_empty() {
                            out.push('/');
                        }
                        out.push_str(&index.to_string());
                        follows_name = false;
                    }
                },
            }
        }
        out
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Path {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(IndexMode::WithBrackets))
    }
}

impl FromStr for Path {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::from(s))
    }
}

impl From<&str> for Path {
    /// Parses `a/b[1]/c` and `a/b/1/c` alike. A numeric segment is an index
    /// only when it directly follows a name.
    fn from(s: &str) -> Self {
        let mut path = Path::new();
        for raw in s.split('/') {
            if raw.is_empty() {
                continue;
            }
            if let Some((name, index)) = split_bracketed(raw) {
                path.push_name(name);
                path.push_index(index);
                continue;
            }
            let follows_name = matches!(path.segments.last(), Some(Segment::Name(_)));
            match raw.parse::<usize>() {
                Ok(index) if follows_name && is_digits(raw) => path.push_index(index),
                _ => path.push_name(raw),
            }
        }
        path
    }
}

pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn split_bracketed(segment: &str) -> Option<(&str, usize)> {
    let inner = segment.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let digits = &inner[open + 1..];
    if open == 0 || !is_digits(digits) {
        return None;
    }
    Some((&inner[..open], digits.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Path {
        s.parse().unwrap()
    }

    #[test]
    fn bracketed_and_plain_indices_are_equivalent() {
        assert_eq!(parse("y[0]/x/z[1]"), parse("y/0/x/z/1"));
        assert_eq!(
            parse("y[2]").segments(),
            &[Segment::Name("y".into()), Segment::Index(2)]
        );
    }

    #[test]
    fn leading_number_is_a_name() {
        assert_eq!(parse("0/a").segments()[0], Segment::Name("0".into()));
        assert_eq!(parse("a/0/1").segments()[2], Segment::Name("1".into()));
    }

    #[test]
    fn empty_segments_are_ignored() {
        assert_eq!(parse("/a//b/"), parse("a/b"));
        assert!(parse("").is_empty());
    }

    #[test]
    fn renders_every_index_mode() {
        let path = parse("y[0]/x/z[1]");
        assert_eq!(path.render(IndexMode::Disabled), "y/x/z");
        assert_eq!(path.render(IndexMode::WithBrackets), "y[0]/x/z[1]");
        assert_eq!(path.render(IndexMode::WithoutBrackets), "y/0/x/z/1");
        assert_eq!(path.to_string(), "y[0]/x/z[1]");
    }

    #[test]
    fn malformed_brackets_stay_in_the_name() {
        assert_eq!(parse("a[x]").segments(), &[Segment::Name("a[x]".into())]);
        assert_eq!(parse("[3]").segments(), &[Segment::Name("[3]".into())]);
    }
}
