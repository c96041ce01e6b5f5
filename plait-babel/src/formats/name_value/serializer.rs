//! Writer for the name=value format

use crate::common::scan::quote;
use crate::options::ConvertOptions;
use crate::tree::{Children, Node};

const INDENT: &str = "    ";

/// Writes `tree` as name=value text.
///
/// With `indented` every entry gets its own line, nested groups are indented
/// by four spaces per level and the output ends with a newline. Without it the
/// whole tree is one line.
pub fn to_name_value_string(tree: &Node, indented: bool, options: &ConvertOptions) -> String {
    let mut out = String::new();
    match tree {
        Node::Leaf(value) => out.push_str(&quote(value, options)),
        Node::Interior(children) => write_children(&mut out, children, 0, indented, options),
    }
    if indented && !out.is_empty() {
        out.push('\n');
    }
    out
}

fn write_children(
    out: &mut String,
    children: &Children,
    depth: usize,
    indented: bool,
    options: &ConvertOptions,
) {
    let mut first = true;
    for (name, sequence) in children {
        for node in sequence {
            if !first {
                out.push(options.delimiter);
                if indented && options.delimiter != '\n' {
                    out.push('\n');
                }
            }
            first = false;
            if indented {
                push_indent(out, depth);
            }
            out.push_str(&quote(name, options));
            out.push(options.equal_sign);
            match node {
                Node::Leaf(value) => out.push_str(&quote(value, options)),
                Node::Interior(grandchildren) => {
                    out.push('{');
                    if indented && !grandchildren.is_empty() {
                        out.push('\n');
                        write_children(out, grandchildren, depth + 1, indented, options);
                        out.push('\n');
                        push_indent(out, depth);
                    } else {
                        write_children(out, grandchildren, depth + 1, indented, options);
                    }
                    out.push('}');
                }
            }
        }
    }
}

fn push_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}
