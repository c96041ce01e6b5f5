//! Tree format conversion
//!
//!     This crate reads hierarchical data in one text format into a [`Node`] tree and writes it
//!     out in another: ini, info, json, xml, name-value and path-value.
//!
//!     It is a pure lib that powers the plait cli, and is shell agnostic: nothing here prints,
//!     reads env vars or installs signal handlers. The driver takes its shutdown flag from the
//!     caller.
//!
//! Architecture
//!
//!     Every format goes through the same tree (./tree.rs). Format specific code only maps its
//!     syntax onto nodes; the flattening engine (./common) turns trees into path=value pairs and
//!     back, and is shared by the two bespoke formats, the driver and the query module.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry for discovery and selection
//!     ├── options.rs              # ConvertOptions, IndexMode, DuplicatePathPolicy
//!     ├── tree.rs                 # Node
//!     ├── path.rs                 # Path and Segment
//!     ├── driver.rs               # whole-stream and linewise conversion
//!     ├── query.rs                # path and regex selection
//!     ├── formats
//!     │   ├── <format>
//!     │   │   ├── parser.rs       # Parser implementation
//!     │   │   ├── serializer.rs   # Serializer implementation
//!     │   │   └── mod.rs
//!     ├── common                  # scanner, flatten, unflatten
//!     └── lib.rs
//!
//! Core Algorithms
//!
//!     Flattening (./common/flatten.rs) walks the tree in pre-order and emits one pair per leaf.
//!     Unflattening (./common/unflatten.rs) parses pairs with the quote aware scanner
//!     (./common/scan.rs), resolves repeated paths according to the DuplicatePathPolicy and
//!     inserts every pair into a fresh tree.
//!
//!     Arrays are sequences of same-named children. Index markers only appear in flattened
//!     paths when a sequence holds more than one node, so `Disabled` index mode is lossy for
//!     arrays.
//!
//! Library Choices
//!
//!     json goes through serde_json (with key order preserved) and xml through roxmltree. ini,
//!     info and the two path formats are small enough to be parsed here.

pub mod common;
pub mod driver;
pub mod error;
pub mod format;
pub mod formats;
pub mod options;
pub mod path;
pub mod query;
pub mod registry;
pub mod tree;

pub use driver::{for_each_line, Converter, DriverStats, StopReason};
pub use error::{ErrorCategory, FormatError};
pub use format::Format;
pub use options::{ConvertOptions, DuplicatePathPolicy, IndexMode};
pub use path::{Path, Segment};
pub use query::{render_matches, select, Match, Query, Selector};
pub use registry::FormatRegistry;
pub use tree::{Children, Node};
