//! Error types for format operations

use crate::path::Path;
use thiserror::Error;

/// Errors that can occur while reading, flattening or writing trees
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// Format not found in registry
    #[error("Format '{0}' not found")]
    FormatNotFound(String),
    /// Input is well formed but cannot be represented as a tree (or vice versa)
    #[error("{0}")]
    BadData(String),
    /// A path cannot be resolved against the tree
    #[error("{0}")]
    BadPath(String),
    /// The same path occurred twice while duplicates are rejected
    #[error("duplicate path '{0}'")]
    DuplicatePath(Path),
    /// Syntax error in the source text
    #[error("{0}")]
    ParseError(String),
    /// Error during serialization
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Format does not support the requested direction
    #[error("Operation not supported: {0}")]
    NotSupported(String),
    /// Reading the input or writing the output failed
    #[error("I/O error: {0}")]
    Io(String),
}

/// Coarse error buckets used to pick the message prefix shown to users.
///
/// The category never changes control flow: every error terminates the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BadData,
    BadPath,
    Parse,
    Generic,
}

impl ErrorCategory {
    /// Prefix printed before the message, empty for generic errors.
    pub fn prefix(self) -> &'static str {
        match self {
            ErrorCategory::BadData => "bad data: ",
            ErrorCategory::BadPath => "bad path: ",
            ErrorCategory::Parse => "parsing error: ",
            ErrorCategory::Generic => "",
        }
    }
}

impl FormatError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FormatError::BadData(_) => ErrorCategory::BadData,
            FormatError::BadPath(_) => ErrorCategory::BadPath,
            FormatError::ParseError(_) => ErrorCategory::Parse,
            _ => ErrorCategory::Generic,
        }
    }
}

impl From<std::io::Error> for FormatError {
    fn from(err: std::io::Error) -> Self {
        FormatError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_select_prefixes() {
        let err = FormatError::BadData("nested arrays".to_string());
        assert_eq!(err.category().prefix(), "bad data: ");
        let err = FormatError::BadPath("index 3 out of range".to_string());
        assert_eq!(err.category().prefix(), "bad path: ");
        let err = FormatError::ParseError("line 2: expected '}'".to_string());
        assert_eq!(err.category().prefix(), "parsing error: ");
        let err = FormatError::FormatNotFound("yaml".to_string());
        assert_eq!(err.category(), ErrorCategory::Generic);
        assert_eq!(err.to_string(), "Format 'yaml' not found");
    }

    #[test]
    fn duplicate_path_names_the_path() {
        let path: Path = "a/b[1]".parse().unwrap();
        let err = FormatError::DuplicatePath(path);
        assert_eq!(err.to_string(), "duplicate path 'a/b[1]'");
    }
}
