//! Error types for quickaitrans-core.

use thiserror::Error;

/// All errors that can arise from parsing or converting a translation
/// document.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The document contains an array, which has no place in a
    /// translation tree.
    #[error("array encountered{}", at_key(.key))]
    ArrayValue { key: Option<String> },

    /// A leaf was something other than a string (number, boolean, null).
    #[error("non-string leaf encountered{}", at_key(.key))]
    NonStringLeaf { key: Option<String> },

    /// The document is not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

fn at_key(key: &Option<String>) -> String {
    match key {
        Some(key) => format!(" at key '{key}'"),
        None => String::new(),
    }
}
