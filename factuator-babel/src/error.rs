//! Error types for conversion and destination operations

use std::fmt;

/// Errors that can occur while converting pages or talking to collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertError {
    /// The destination document service rejected or failed a call
    Service(String),
    /// An asset could not be fetched or published
    Asset(String),
    /// The mapping table could not be read or written
    Mapping(String),
    /// Filesystem error outside of the mapping table
    Io(String),
    /// JSON (de)serialization failed
    Serialization(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::Service(msg) => write!(f, "Document service error: {msg}"),
            ConvertError::Asset(msg) => write!(f, "Asset error: {msg}"),
            ConvertError::Mapping(msg) => write!(f, "Mapping table error: {msg}"),
            ConvertError::Io(msg) => write!(f, "I/O error: {msg}"),
            ConvertError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ConvertError {}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::Serialization(err.to_string())
    }
}
