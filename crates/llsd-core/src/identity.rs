//! # UUID Construction
//!
//! LLSD UUIDs always render as 36 lowercase characters hyphenated at
//! positions 8, 13, 18 and 23. Text input must already be in that shape (any
//! letter case); the braced, URN, and unhyphenated forms other parsers accept
//! are rejected. Octet input must be exactly 16 bytes, in the order of the
//! hyphenated groups.

use uuid::Uuid;

use crate::error::{LlsdError, Result};

/// Parse a hyphenated UUID, case-insensitively.
///
/// # Errors
///
/// Returns [`LlsdError::InvalidUuid`] if the text is not in the 8-4-4-4-12
/// hyphenated form.
pub fn parse_uuid(text: &str) -> Result<Uuid> {
    let b = text.as_bytes();
    let shaped = b.len() == 36
        && b.iter().enumerate().all(|(i, c)| match i {
            8 | 13 | 18 | 23 => *c == b'-',
            _ => c.is_ascii_hexdigit(),
        });
    if !shaped {
        return Err(LlsdError::InvalidUuid(format!("invalid UUID string format: {text:?}")));
    }
    Uuid::try_parse(text).map_err(|e| LlsdError::InvalidUuid(format!("{text:?}: {e}")))
}

/// Build a UUID from its 16 octets.
///
/// # Errors
///
/// Returns [`LlsdError::InvalidUuid`] if `octets` is not exactly 16 bytes long.
pub fn uuid_from_octets(octets: &[u8]) -> Result<Uuid> {
    Uuid::from_slice(octets).map_err(|_| {
        LlsdError::InvalidUuid(format!("invalid UUID array length: {}", octets.len()))
    })
}

/// The canonical text form: lowercase, hyphenated, 36 characters.
pub fn format_uuid(uuid: &Uuid) -> String {
    uuid.as_hyphenated().to_string()
}
