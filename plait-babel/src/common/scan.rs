//! Character scanning for quoted and escaped name=value text.
//!
//! All tokenizing goes through one small state machine:
//!
//! ```text
//!            '"'                     '\'
//!   Normal ───────► Quoted   Normal ─────► Escaped(Normal)  ── any ──► Normal
//!          ◄───────          Quoted ─────► Escaped(Quoted)  ── any ──► Quoted
//!            '"'                     '\'
//! ```
//!
//! In `Normal` state braces open and close nested groups; the delimiter and the
//! equal sign only separate tokens in `Normal` state at brace depth zero.
//! Inside quotes, and right after a backslash, every character is literal.
//!
//! Input that ends inside quotes or right after a backslash is rejected with a
//! parse error rather than guessed at.

use crate::error::FormatError;
use crate::options::ConvertOptions;
use crate::path::is_digits;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Quoted,
    Escaped { quoted: bool },
}

/// What a character meant to the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Class {
    /// Unquoted, unescaped character; `top_level` is false inside braces
    Plain { top_level: bool },
    /// Quote, escaping backslash or brace consumed by the scanner
    Syntax,
    /// Character inside quotes or after a backslash
    Literal,
}

#[derive(Debug, Clone)]
pub(crate) struct Scanner {
    state: State,
    depth: usize,
    braces: bool,
}

impl Scanner {
    /// Scanner that tracks brace nesting
    pub(crate) fn new() -> Self {
        Scanner {
            state: State::Normal,
            depth: 0,
            braces: true,
        }
    }

    /// Scanner that treats braces as plain characters
    pub(crate) fn flat() -> Self {
        Scanner {
            braces: false,
            ..Scanner::new()
        }
    }

    pub(crate) fn feed(&mut self, c: char) -> Result<Class, FormatError> {
        let class = match self.state {
            State::Escaped { quoted } => {
                self.state = if quoted { State::Quoted } else { State::Normal };
                Class::Literal
            }
            State::Quoted => match c {
                '\\' => {
                    self.state = State::Escaped { quoted: true };
                    Class::Syntax
                }
                '"' => {
                    self.state = State::Normal;
                    Class::Syntax
                }
                _ => Class::Literal,
            },
            State::Normal => match c {
                '\\' => {
                    self.state = State::Escaped { quoted: false };
                    Class::Syntax
                }
                '"' => {
                    self.state = State::Quoted;
                    Class::Syntax
                }
                '{' if self.braces => {
                    self.depth += 1;
                    Class::Syntax
                }
                '}' if self.braces => {
                    if self.depth == 0 {
                        return Err(FormatError::ParseError("unbalanced '}'".to_string()));
                    }
                    self.depth -= 1;
                    Class::Syntax
                }
                _ => Class::Plain {
                    top_level: self.depth == 0,
                },
            },
        };
        Ok(class)
    }

    /// True outside quotes and not right after a backslash.
    pub(crate) fn is_normal(&self) -> bool {
        self.state == State::Normal
    }

    pub(crate) fn depth(&self) -> usize {
        self.depth
    }

    /// Checks that the input did not stop in the middle of a construct.
    pub(crate) fn finish(&self) -> Result<(), FormatError> {
        match self.state {
            State::Quoted => Err(FormatError::ParseError("unterminated quote".to_string())),
            State::Escaped { .. } => Err(FormatError::ParseError(
                "input ends with a dangling escape".to_string(),
            )),
            State::Normal if self.depth > 0 => {
                Err(FormatError::ParseError("unbalanced '{'".to_string()))
            }
            State::Normal => Ok(()),
        }
    }
}

/// Splits `text` at top-level occurrences of `delimiter`. Tokens are trimmed
/// and empty tokens dropped.
pub fn split_tokens(text: &str, delimiter: char) -> Result<Vec<&str>, FormatError> {
    let mut scanner = Scanner::new();
    let mut tokens = Vec::new();
    let mut start = 0;
    for (i, c) in text.char_indices() {
        if scanner.feed(c)? == (Class::Plain { top_level: true }) && c == delimiter {
            push_token(&mut tokens, &text[start..i]);
            start = i + c.len_utf8();
        }
    }
    scanner.finish()?;
    push_token(&mut tokens, &text[start..]);
    Ok(tokens)
}

fn push_token<'a>(tokens: &mut Vec<&'a str>, token: &'a str) {
    let token = token.trim();
    if !token.is_empty() {
        tokens.push(token);
    }
}

/// Splits a token at its first top-level equal sign into a trimmed name and
/// value. A token without an equal sign is a name with no value.
pub fn split_assignment(token: &str, equal_sign: char) -> Result<(&str, Option<&str>), FormatError> {
    let mut scanner = Scanner::new();
    for (i, c) in token.char_indices() {
        if scanner.feed(c)? == (Class::Plain { top_level: true }) && c == equal_sign {
            let value = token[i + c.len_utf8()..].trim();
            return Ok((token[..i].trim(), Some(value)));
        }
    }
    Ok((token.trim(), None))
}

/// Returns the inside of `value` when the whole value is one `{...}` group.
pub fn brace_group(value: &str) -> Result<Option<&str>, FormatError> {
    if !value.starts_with('{') || !value.ends_with('}') {
        return Ok(None);
    }
    let mut scanner = Scanner::new();
    let last = value.len() - 1;
    for (i, c) in value.char_indices() {
        scanner.feed(c)?;
        if scanner.depth() == 0 && i != last {
            return Ok(None);
        }
    }
    scanner.finish()?;
    Ok(Some(&value[1..last]))
}

/// Removes quotes and escaping backslashes.
pub fn unquote(value: &str) -> Result<Cow<'_, str>, FormatError> {
    if !value.contains(['"', '\\']) {
        return Ok(Cow::Borrowed(value));
    }
    let mut scanner = Scanner::flat();
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match scanner.feed(c)? {
            Class::Syntax => {}
            Class::Plain { .. } | Class::Literal => out.push(c),
        }
    }
    scanner.finish()?;
    Ok(Cow::Owned(out))
}

fn needs_quoting(value: &str, options: &ConvertOptions) -> bool {
    value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.chars().any(|c| {
            c == options.delimiter
                || c == options.equal_sign
                || matches!(c, '\n' | '\r' | '"' | '\\' | '{' | '}')
        })
}

/// Quotes `value` when it could not be read back verbatim. Inverse of
/// [`unquote`].
pub fn quote<'a>(value: &'a str, options: &ConvertOptions) -> Cow<'a, str> {
    if needs_quoting(value, options) {
        Cow::Owned(quoted(value))
    } else {
        Cow::Borrowed(value)
    }
}

/// Quotes one name segment of a path. On top of what [`quote`] guards
/// against, a segment is quoted when it holds `/` or `[`, is empty, or is all
/// digits while `follows_name` says it would read back as an index.
pub fn quote_name<'a>(name: &'a str, follows_name: bool, options: &ConvertOptions) -> Cow<'a, str> {
    if name.is_empty() || name.contains(['/', '[']) || (follows_name && is_digits(name)) {
        Cow::Owned(quoted(name))
    } else {
        quote(name, options)
    }
}

fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Folds converted output onto one physical line: trailing line terminators
/// are dropped and unquoted `\n` / `\r` become a space. Quoted occurrences are
/// left untouched.
pub fn sanitize_line(text: &str) -> String {
    let text = text.trim_end_matches(['\n', '\r']);
    let mut scanner = Scanner::flat();
    text.chars()
        .map(|c| match scanner.feed(c) {
            Ok(Class::Plain { .. }) if matches!(c, '\n' | '\r') => ' ',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_outside_quotes_and_braces() {
        let tokens = split_tokens(r#"a=1,b="x,y",c={d=2,e=3}, ,f"#, ',').unwrap();
        assert_eq!(tokens, vec!["a=1", r#"b="x,y""#, "c={d=2,e=3}", "f"]);
    }

    #[test]
    fn escaped_delimiter_does_not_split() {
        let tokens = split_tokens(r"a=x\,y,b=2", ',').unwrap();
        assert_eq!(tokens, vec![r"a=x\,y", "b=2"]);
    }

    #[test]
    fn escaped_quote_inside_quotes_stays_quoted() {
        let tokens = split_tokens(r#"a="say \"hi\", then go",b=1"#, ',').unwrap();
        assert_eq!(tokens, vec![r#"a="say \"hi\", then go""#, "b=1"]);
        assert_eq!(unquote(r#""say \"hi\", then go""#).unwrap(), r#"say "hi", then go"#);
    }

    #[test]
    fn escaped_backslash_before_closing_quote() {
        assert_eq!(unquote(r#""a\\""#).unwrap(), r"a\");
        let tokens = split_tokens(r#"a="x\\",b=2"#, ',').unwrap();
        assert_eq!(tokens, vec![r#"a="x\\""#, "b=2"]);
    }

    #[test]
    fn unterminated_quote_is_an_error() {
        let err = split_tokens(r#"a="open,b=2"#, ',').unwrap_err();
        assert_eq!(err, FormatError::ParseError("unterminated quote".to_string()));
        assert!(unquote(r#""abc"#).is_err());
        assert!(unquote("abc\\").is_err());
    }

    #[test]
    fn unbalanced_braces_are_errors() {
        assert!(split_tokens("a={b=1", ',').is_err());
        assert!(split_tokens("a=b}", ',').is_err());
    }

    #[test]
    fn assignment_splits_on_first_top_level_equal_sign() {
        assert_eq!(split_assignment("a = b=c", '=').unwrap(), ("a", Some("b=c")));
        assert_eq!(split_assignment(r#""x=y"=1"#, '=').unwrap(), (r#""x=y""#, Some("1")));
        assert_eq!(split_assignment("flag", '=').unwrap(), ("flag", None));
        assert_eq!(split_assignment("a:1", ':').unwrap(), ("a", Some("1")));
    }

    #[test]
    fn brace_group_requires_one_enclosing_pair() {
        assert_eq!(brace_group("{a=1,b=2}").unwrap(), Some("a=1,b=2"));
        assert_eq!(brace_group("{a}x{b}").unwrap(), None);
        assert_eq!(brace_group("{}").unwrap(), Some(""));
        assert_eq!(brace_group(r#""{a}""#).unwrap(), None);
    }

    #[test]
    fn quote_only_when_needed() {
        let options = ConvertOptions::default();
        assert_eq!(quote("plain", &options), "plain");
        assert_eq!(quote("a,b", &options), r#""a,b""#);
        assert_eq!(quote("a=b", &options), r#""a=b""#);
        assert_eq!(quote("line\nbreak", &options), "\"line\nbreak\"");
        assert_eq!(quote(r#"say "x""#, &options), r#""say \"x\"""#);
        assert_eq!(quote(" padded", &options), r#"" padded""#);
        assert_eq!(quote("", &options), "");
    }

    #[test]
    fn quote_then_unquote_is_identity() {
        let options = ConvertOptions::default().with_delimiter(';');
        for s in ["a;b", "x=y", "multi\nline", r"back\slash", r#"q"uote"#, "{brace}", "  "] {
            assert_eq!(unquote(&quote(s, &options)).unwrap(), s);
        }
    }

    #[test]
    fn names_are_quoted_where_paths_would_split_them() {
        let options = ConvertOptions::default();
        assert_eq!(quote_name("plain", true, &options), "plain");
        assert_eq!(quote_name("a/b", false, &options), r#""a/b""#);
        assert_eq!(quote_name("x[1]", false, &options), r#""x[1]""#);
        assert_eq!(quote_name("a,b", false, &options), r#""a,b""#);
        assert_eq!(quote_name("", false, &options), r#""""#);
        assert_eq!(quote_name("7", false, &options), "7");
        assert_eq!(quote_name("7", true, &options), r#""7""#);
    }

    #[test]
    fn sanitize_replaces_only_unquoted_line_breaks() {
        assert_eq!(sanitize_line("a=1,\nb=2\r\n"), "a=1, b=2");
        assert_eq!(sanitize_line("a=\"x\ny\",\nb=2"), "a=\"x\ny\", b=2");
        assert_eq!(sanitize_line("a=\\\"\nb"), "a=\\\" b");
        assert_eq!(sanitize_line("{\n    a=1\n}\n"), "{     a=1 }");
    }
}
