//! Reader for the INFO format
//!
//! # The Algorithm
//!
//! 1. The lexer turns the source into words, braces and line ends. Quoted
//!    strings may hold any character; `;` starts a comment running to the end
//!    of the line.
//! 2. An entry is a key optionally followed by a value on the same line.
//! 3. A `{` after the key (on the same line or on a following one) opens the
//!    entry's children, closed by the matching `}`.
//! 4. An entry with both a value and children is rejected.

use crate::error::FormatError;
use crate::tree::Node;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word(String),
    Open,
    Close,
    LineEnd,
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Lexer {
            chars: source.char_indices().peekable(),
            line: 1,
        }
    }

    fn next_token(&mut self) -> Result<Option<(Token, usize)>, FormatError> {
        while let Some(&(_, c)) = self.chars.peek() {
            match c {
                '\n' => {
                    self.chars.next();
                    let line = self.line;
                    self.line += 1;
                    return Ok(Some((Token::LineEnd, line)));
                }
                ';' => {
                    while self.chars.next_if(|&(_, c)| c != '\n').is_some() {}
                }
                c if c.is_whitespace() => {
                    self.chars.next();
                }
                '{' => {
                    self.chars.next();
                    return Ok(Some((Token::Open, self.line)));
                }
                '}' => {
                    self.chars.next();
                    return Ok(Some((Token::Close, self.line)));
                }
                '"' => {
                    self.chars.next();
                    return self.quoted().map(|w| Some((Token::Word(w), self.line)));
                }
                _ => {
                    let mut word = String::new();
                    while let Some((_, c)) = self
                        .chars
                        .next_if(|&(_, c)| !c.is_whitespace() && !matches!(c, '{' | '}' | ';' | '"'))
                    {
                        word.push(c);
                    }
                    return Ok(Some((Token::Word(word), self.line)));
                }
            }
        }
        Ok(None)
    }

    fn quoted(&mut self) -> Result<String, FormatError> {
        let mut text = String::new();
        loop {
            let Some((_, c)) = self.chars.next() else {
                return Err(self.error("unterminated string"));
            };
            match c {
                '"' => return Ok(text),
                '\n' => return Err(self.error("unterminated string")),
                '\\' => {
                    let Some((_, escaped)) = self.chars.next() else {
                        return Err(self.error("unterminated string"));
                    };
                    text.push(match escaped {
                        '0' => '\0',
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '"' => '"',
                        '\\' => '\\',
                        other => {
                            return Err(self.error(&format!("unknown escape sequence '\\{other}'")))
                        }
                    });
                }
                c => text.push(c),
            }
        }
    }

    fn error(&self, message: &str) -> FormatError {
        FormatError::ParseError(format!("line {}: {message}", self.line))
    }
}

struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<(Token, usize)>,
}

impl<'a> Parser<'a> {
    fn next(&mut self) -> Result<Option<(Token, usize)>, FormatError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.lexer.next_token(),
        }
    }

    fn peek(&mut self) -> Result<Option<&Token>, FormatError> {
        if self.peeked.is_none() {
            self.peeked = self.lexer.next_token()?;
        }
        Ok(self.peeked.as_ref().map(|(token, _)| token))
    }

    /// Reads entries into `node` until a `}` (when `nested`) or end of input.
    fn entries(&mut self, node: &mut Node, nested: bool) -> Result<(), FormatError> {
        loop {
            let Some((token, line)) = self.next()? else {
                if nested {
                    return Err(FormatError::ParseError("unmatched '{'".to_string()));
                }
                return Ok(());
            };
            match token {
                Token::LineEnd => {}
                Token::Close if nested => return Ok(()),
                Token::Close => {
                    return Err(FormatError::ParseError(format!("line {line}: unmatched '}}'")))
                }
                Token::Open => {
                    return Err(FormatError::ParseError(format!("line {line}: key expected before '{{'")))
                }
                Token::Word(key) => {
                    let child = self.entry(&key, line)?;
                    node.push_child(key, child)?;
                }
            }
        }
    }

    fn entry(&mut self, key: &str, line: usize) -> Result<Node, FormatError> {
        let value = if matches!(self.peek()?, Some(Token::Word(_))) {
            match self.next()? {
                Some((Token::Word(value), _)) => Some(value),
                _ => None,
            }
        } else {
            None
        };
        while self.peek()? == Some(&Token::LineEnd) {
            self.next()?;
        }
        if self.peek()? != Some(&Token::Open) {
            return Ok(Node::Leaf(value.unwrap_or_default()));
        }
        self.next()?;
        if value.as_deref().is_some_and(|v| !v.is_empty()) {
            return Err(FormatError::BadData(format!(
                "line {line}: '{key}' has both a value and children"
            )));
        }
        let mut node = Node::new();
        self.entries(&mut node, true)?;
        Ok(node)
    }
}

/// Reads INFO text into a tree.
pub fn from_info_str(source: &str) -> Result<Node, FormatError> {
    let mut parser = Parser {
        lexer: Lexer::new(source),
        peeked: None,
    };
    let mut root = Node::new();
    parser.entries(&mut root, false)?;
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_values_and_blocks() {
        let source = "; comment\nname demo\nserver\n{\n    host \"local host\" ; trailing\n    port 80\n}\nflag\n";
        let tree = from_info_str(source).unwrap();
        assert_eq!(tree.child("name"), Some(&Node::leaf("demo")));
        let server = tree.child("server").unwrap();
        assert_eq!(server.child("host"), Some(&Node::leaf("local host")));
        assert_eq!(server.child("port"), Some(&Node::leaf("80")));
        assert_eq!(tree.child("flag"), Some(&Node::leaf("")));
    }

    #[test]
    fn brace_on_the_same_line() {
        let tree = from_info_str("a { b 1 }\n").unwrap();
        assert_eq!(tree.child("a").unwrap().child("b"), Some(&Node::leaf("1")));
    }

    #[test]
    fn escapes_are_decoded() {
        let tree = from_info_str(r#"k "a\"b\\c\td""#).unwrap();
        assert_eq!(tree.child("k"), Some(&Node::leaf("a\"b\\c\td")));
    }

    #[test]
    fn value_with_children_is_bad_data() {
        let err = from_info_str("a 1 { b 2 }").unwrap_err();
        assert!(matches!(err, FormatError::BadData(_)));
    }

    #[test]
    fn unbalanced_braces_are_parse_errors() {
        assert!(matches!(from_info_str("a {"), Err(FormatError::ParseError(_))));
        assert!(matches!(from_info_str("}"), Err(FormatError::ParseError(_))));
        assert!(matches!(from_info_str("a \"open"), Err(FormatError::ParseError(_))));
    }
}
