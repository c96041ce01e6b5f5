//! Format tests
//!
//! Conversions between the registered formats, driven through the registry
//! the same way the cli does.

mod conversions;
mod writers;
