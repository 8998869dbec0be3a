//! # Error Types — Fail-Fast Codec and Constructor Errors
//!
//! Every fallible operation in `llsd-core` returns [`LlsdError`]. Failures are
//! fatal to the call that raised them: a malformed byte stream or literal never
//! yields a partial value.
//!
//! ## Design
//!
//! - Decode errors carry the byte offset at which the stream went wrong.
//! - Name lookups (encodings, content types) carry the offending name.
//! - Conversions (`as_*`) never produce errors; they live outside this module's
//!   concern entirely.

use thiserror::Error;

/// Result alias for `llsd-core` operations.
pub type Result<T> = std::result::Result<T, LlsdError>;

/// Top-level error type for LLSD construction and serialization.
#[derive(Error, Debug)]
pub enum LlsdError {
    /// The binary stream is structurally malformed.
    #[error("malformed binary LLSD at offset {offset}: {reason}")]
    Decode {
        /// Byte offset where decoding failed.
        offset: usize,
        /// What was expected or found.
        reason: String,
    },

    /// A read ran past the end of the input.
    #[error("unexpected end of data at offset {offset}: wanted {wanted} more byte(s)")]
    Truncated {
        /// Byte offset of the read.
        offset: usize,
        /// Number of bytes the read required.
        wanted: usize,
    },

    /// Bytes remain after a complete top-level value.
    #[error("unexpected continuation of binary data at offset {offset}")]
    TrailingData {
        /// Offset of the first unconsumed byte.
        offset: usize,
    },

    /// UUID text or octets are malformed.
    #[error("invalid UUID: {0}")]
    InvalidUuid(String),

    /// URI text does not satisfy the URI grammar.
    #[error("invalid URI: {0:?}")]
    InvalidUri(String),

    /// Date text is not an ISO 8601 UTC timestamp, or the instant is out of range.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// No binary-as-text encoding with this name exists.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Text could not be converted through the named encoding.
    #[error("invalid {encoding} sequence: {reason}")]
    InvalidEncoding {
        /// The encoding in use.
        encoding: &'static str,
        /// Why the conversion failed.
        reason: String,
    },

    /// The content type is not one of the supported LLSD serializations.
    #[error("unsupported content-type: {0}")]
    UnsupportedContentType(String),

    /// A string, binary, array, or map is too long for a 32-bit length prefix.
    #[error("length {0} exceeds the 32-bit length prefix")]
    LengthOverflow(usize),

    /// Container nesting exceeded the configured limit.
    #[error("nesting depth exceeds configured limit of {0}")]
    DepthExceeded(usize),

    /// The JSON text could not be parsed or produced.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlsdError {
    pub(crate) fn decode(offset: usize, reason: impl Into<String>) -> Self {
        Self::Decode {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn encoding(encoding: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            encoding,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let e = LlsdError::UnknownEncoding("ROT13".to_string());
        assert_eq!(e.to_string(), "unknown encoding: ROT13");

        let e = LlsdError::UnsupportedContentType("text/plain".to_string());
        assert!(e.to_string().contains("text/plain"));
    }

    #[test]
    fn test_decode_message_has_offset() {
        let e = LlsdError::decode(7, "expected array close tag");
        assert_eq!(
            e.to_string(),
            "malformed binary LLSD at offset 7: expected array close tag"
        );
    }
}
