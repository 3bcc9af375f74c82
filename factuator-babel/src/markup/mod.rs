//! Wiki markup front end.
//!
//! Turns page source into the flat [`Node`](crate::ir::nodes::Node) sequence
//! consumed by the translator.

pub mod parser;

pub use parser::{parse, parse_inline};
