//! Format-agnostic conversion machinery: state, text cleanup, links, table
//! layout and the backward assembly of operations.

pub mod assemble;
pub mod links;
pub mod state;
pub mod table;
pub mod text;
