//! Format implementations
//!
//! Each format converts between its text representation and the [`Node`]
//! tree. The two bespoke formats (name-value and path-value) sit on the
//! scanner and flattening engine in `common`; the others delegate to their
//! format libraries where one exists.
//!
//! [`Node`]: crate::tree::Node

pub mod info;
pub mod ini;
pub mod json;
pub mod name_value;
pub mod path_value;
pub mod xml;

pub use info::InfoFormat;
pub use ini::IniFormat;
pub use json::JsonFormat;
pub use name_value::NameValueFormat;
pub use path_value::PathValueFormat;
pub use xml::XmlFormat;
