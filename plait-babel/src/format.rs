//! Format trait definition
//!
//! This module defines the core Format trait that all format implementations must implement.
//! The trait provides a uniform interface for reading text into a [`Node`] tree and writing
//! a tree back out.

use crate::error::FormatError;
use crate::options::ConvertOptions;
use crate::tree::Node;

/// Trait for tree formats
///
/// Implementors provide bidirectional conversion between text and a [`Node`] tree.
/// Formats can support parsing, serialization, or both.
///
/// # Examples
///
/// ```ignore
/// struct MyFormat;
///
/// impl Format for MyFormat {
///     fn name(&self) -> &str {
///         "my-format"
///     }
///
///     fn supports_parsing(&self) -> bool {
///         true
///     }
///
///     fn parse(&self, source: &str, options: &ConvertOptions) -> Result<Node, FormatError> {
///         todo!()
///     }
/// }
/// ```
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "json", "path-value")
    fn name(&self) -> &str;

    /// Optional description of this format
    fn description(&self) -> &str {
        ""
    }

    /// Whether this format supports parsing (text → tree)
    fn supports_parsing(&self) -> bool {
        false
    }

    /// Whether this format supports serialization (tree → text)
    fn supports_serialization(&self) -> bool {
        false
    }

    /// Parse source text into a tree
    ///
    /// Default implementation returns NotSupported error.
    fn parse(&self, _source: &str, _options: &ConvertOptions) -> Result<Node, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    /// Serialize a tree into text
    ///
    /// Default implementation returns NotSupported error.
    fn serialize(&self, _tree: &Node, _options: &ConvertOptions) -> Result<String, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support serialization",
            self.name()
        )))
    }
}
