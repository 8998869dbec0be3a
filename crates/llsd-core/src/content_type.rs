//! # Content-Type Dispatch
//!
//! Selects a serialization by MIME type. Unknown MIME types, including the
//! XML serialization this crate does not provide, fail with
//! [`LlsdError::UnsupportedContentType`] naming the requested type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::codec::{from_binary, to_binary, BINARY_MIME_TYPE};
use crate::error::{LlsdError, Result};
use crate::json::{from_json, to_json_string, JSON_MIME_TYPE};
use crate::value::Value;

/// A supported LLSD serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    /// `application/llsd+binary`
    Binary,
    /// `application/llsd+json`
    Json,
}

impl ContentType {
    /// All supported content types.
    pub fn all() -> &'static [ContentType] {
        &[Self::Binary, Self::Json]
    }

    /// The MIME type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => BINARY_MIME_TYPE,
            Self::Json => JSON_MIME_TYPE,
        }
    }

    /// Deserialize `bytes` in this format.
    ///
    /// # Errors
    ///
    /// Propagates the format's decode error.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value> {
        match self {
            Self::Binary => from_binary(bytes),
            Self::Json => {
                let json: serde_json::Value = serde_json::from_slice(bytes)?;
                from_json(&json)
            }
        }
    }

    /// Serialize `value` in this format.
    ///
    /// # Errors
    ///
    /// Propagates the format's encode error.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        match self {
            Self::Binary => to_binary(value),
            Self::Json => Ok(to_json_string(value)?.into_bytes()),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = LlsdError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            BINARY_MIME_TYPE => Ok(Self::Binary),
            JSON_MIME_TYPE => Ok(Self::Json),
            _ => Err(LlsdError::UnsupportedContentType(s.to_string())),
        }
    }
}

/// Deserialize `bytes` according to the MIME type `content_type`.
///
/// # Errors
///
/// Returns [`LlsdError::UnsupportedContentType`] for an unknown MIME type, or
/// the format's decode error.
pub fn parse(content_type: &str, bytes: &[u8]) -> Result<Value> {
    content_type.parse::<ContentType>()?.decode(bytes)
}

/// Serialize `value` according to the MIME type `content_type`.
///
/// # Errors
///
/// Returns [`LlsdError::UnsupportedContentType`] for an unknown MIME type, or
/// the format's encode error.
pub fn format(content_type: &str, value: &Value) -> Result<Vec<u8>> {
    content_type.parse::<ContentType>()?.encode(value)
}
