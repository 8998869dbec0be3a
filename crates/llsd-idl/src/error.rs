//! # Error Types — Schema Parsing and Suite Lookup
//!
//! Parsing is fail-fast: once a production commits to its leading token, any
//! later grammar violation is an [`IdlError::Parse`] naming what was expected
//! and where. Comparing values never fails; mismatches are scores, not
//! errors.

use thiserror::Error;

/// Result alias for `llsd-idl` operations.
pub type Result<T> = std::result::Result<T, IdlError>;

/// Errors raised while parsing schema text or querying a suite.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdlError {
    /// Schema text violates the grammar.
    #[error("{message} at offset {offset}")]
    Parse {
        /// What the parser expected to find.
        message: String,
        /// Byte offset into the schema text.
        offset: usize,
    },

    /// The suite has no resource definition with this name.
    #[error("no matching resource definition found: {0}")]
    UnknownResource(String),
}

impl IdlError {
    /// The parse message without its offset, if this is a parse error.
    pub fn parse_message(&self) -> Option<&str> {
        match self {
            Self::Parse { message, .. } => Some(message),
            Self::UnknownResource(_) => None,
        }
    }
}
