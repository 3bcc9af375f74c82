//! Intermediate representations shared by the conversion pipeline.
//!
//! Three layers, in pipeline order: markup [`nodes`] coming out of the
//! scanner, logical [`operations`] emitted by the translator, and primitive
//! [`requests`] submitted to the destination. [`document`] models what the
//! destination sends back when a document is fetched.

pub mod document;
pub mod nodes;
pub mod operations;
pub mod requests;
