//! Conversion settings shared by every format.
//!
//! - [`ConvertOptions`]: the immutable settings value threaded through parsing,
//!   flattening and serialization
//! - [`IndexMode`]: how array positions are rendered inside flattened paths
//! - [`DuplicatePathPolicy`]: how repeated paths are resolved when rebuilding a tree
//!
//! ## Examples
//!
//! ```ignore
//! use plait_babel::{ConvertOptions, DuplicatePathPolicy, IndexMode};
//!
//! let options = ConvertOptions::new()
//!     .with_delimiter('\n')
//!     .with_index_mode(IndexMode::WithBrackets)
//!     .with_duplicates(DuplicatePathPolicy::Reject);
//! ```

use serde::Deserialize;

/// Rendering of array indices in flattened paths.
///
/// `Disabled` drops the markers entirely, which is only unambiguous when no
/// name repeats under the same parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IndexMode {
    #[default]
    Disabled,
    /// `y[0]/x`
    WithBrackets,
    /// `y/0/x`
    WithoutBrackets,
}

/// Resolution of repeated paths in a path=value list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePathPolicy {
    /// Later occurrences overwrite earlier ones in encounter order.
    #[default]
    Allow,
    /// Only the last occurrence of a repeated path is kept.
    TakeLast,
    /// Any repeated path is an error; no tree is built.
    Reject,
}

/// Settings fixed at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub equal_sign: char,
    pub delimiter: char,
    pub index_mode: IndexMode,
    pub duplicates: DuplicatePathPolicy,
    /// Each input line is an independent record
    pub linewise: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            equal_sign: '=',
            delimiter: ',',
            index_mode: IndexMode::Disabled,
            duplicates: DuplicatePathPolicy::Allow,
            linewise: false,
        }
    }
}

impl ConvertOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_equal_sign(mut self, equal_sign: char) -> Self {
        self.equal_sign = equal_sign;
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_index_mode(mut self, index_mode: IndexMode) -> Self {
        self.index_mode = index_mode;
        self
    }

    #[must_use]
    pub fn with_duplicates(mut self, duplicates: DuplicatePathPolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    #[must_use]
    pub fn with_linewise(mut self, linewise: bool) -> Self {
        self.linewise = linewise;
        self
    }

    /// Delimiter used when none is configured: a newline when either side is
    /// path-value and the whole stream is one record, a comma otherwise.
    pub fn default_delimiter(from: &str, to: &str, linewise: bool) -> char {
        if (from == "path-value" || to == "path-value") && !linewise {
            '\n'
        } else {
            ','
        }
    }
}
