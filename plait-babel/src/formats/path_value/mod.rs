//! path=value format
//!
//! One `path=value` entry per leaf, e.g. `x/a=1,x/b=2,y=3`. Paths use `/`
//! separators; arrays are rendered according to the configured index mode.
//!
//! When the whole stream is one record, every non-blank line that does not
//! start with `#` contributes one or more entries. A quoted value may span
//! lines; its line breaks, blank lines included, are kept as they are. In
//! linewise mode the single line is the record.

use crate::common::scan::Scanner;
use crate::common::{from_path_value_string, to_path_value_string};
use crate::error::FormatError;
use crate::format::Format;
use crate::options::ConvertOptions;
use crate::tree::Node;

/// Joins the meaningful lines of a whole-stream input with the delimiter.
/// Lines that end inside quotes or after a backslash keep their newline.
fn join_lines(source: &str, delimiter: char) -> Result<String, FormatError> {
    let mut scanner = Scanner::new();
    let mut joined = String::with_capacity(source.len());
    for chunk in source.split_inclusive('\n') {
        let line = chunk.strip_suffix('\n').unwrap_or(chunk);
        if scanner.is_normal() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
        }
        for c in line.chars() {
            scanner.feed(c)?;
        }
        if scanner.is_normal() {
            joined.push_str(line.strip_suffix('\r').unwrap_or(line));
            joined.push(delimiter);
        } else {
            if chunk.len() > line.len() {
                scanner.feed('\n')?;
            }
            joined.push_str(chunk);
        }
    }
    Ok(joined)
}

/// Format implementation for path=value text
pub struct PathValueFormat;

impl Format for PathValueFormat {
    fn name(&self) -> &str {
        "path-value"
    }

    fn description(&self) -> &str {
        "path=value pairs, e.g. x/a=1,x/b=2,y=3"
    }

    fn supports_parsing(&self) -> bool {
        true
    }

    fn supports_serialization(&self) -> bool {
        true
    }

    fn parse(&self, source: &str, options: &ConvertOptions) -> Result<Node, FormatError> {
        if options.linewise {
            from_path_value_string(source.trim_end_matches(['\n', '\r']), options)
        } else {
            from_path_value_string(&join_lines(source, options.delimiter)?, options)
        }
    }

    fn serialize(&self, tree: &Node, options: &ConvertOptions) -> Result<String, FormatError> {
        let mut out = to_path_value_string(tree, options);
        if options.delimiter == '\n' && !out.is_empty() {
            out.push('\n');
        }
        Ok(out)
    }
}
