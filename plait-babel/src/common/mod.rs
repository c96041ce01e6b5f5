//! Format-agnostic flattening engine
//!
//! `flatten` turns a tree into path=value pairs and `unflatten` rebuilds the
//! tree. Both sit on the quote/escape scanner in `scan`, which the name-value
//! format and the linewise driver reuse.

pub mod flatten;
pub mod scan;
pub mod unflatten;

pub use flatten::{flatten, render_path, render_path_values, to_path_value_string, PathValue};
pub use scan::{quote, quote_name, sanitize_line, unquote};
pub use unflatten::{build_tree, from_path_value_string, insert, parse_path, parse_path_values};
