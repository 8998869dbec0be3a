//! # URI Newtype
//!
//! An LLSD URI is either empty or `scheme ":" 1*( uri-char / pct-encoded )`,
//! where `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )` and `uri-char`
//! is any RFC 3986 unreserved or reserved character. The text is kept
//! verbatim; no normalization is applied.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LlsdError, Result};

/// A validated URI. The default value is the empty URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uri(String);

impl Uri {
    /// Validate and wrap URI text.
    ///
    /// # Errors
    ///
    /// Returns [`LlsdError::InvalidUri`] if the text is non-empty and does not
    /// satisfy the URI grammar.
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if is_valid_uri(&text) {
            Ok(Self(text))
        } else {
            Err(LlsdError::InvalidUri(text))
        }
    }

    /// The URI text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty URI.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn is_valid_uri(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    let Some((scheme, rest)) = text.split_once(':') else {
        return false;
    };

    let mut scheme_chars = scheme.bytes();
    let scheme_ok = scheme_chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && scheme_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, b'+' | b'-' | b'.'));
    if !scheme_ok || rest.is_empty() {
        return false;
    }

    let rest = rest.as_bytes();
    let mut i = 0;
    while i < rest.len() {
        match rest[i] {
            b'%' => {
                let hex = rest.get(i + 1..i + 3);
                if !hex.is_some_and(|h| h.iter().all(u8::is_ascii_hexdigit)) {
                    return false;
                }
                i += 3;
            }
            c if is_uri_char(c) => i += 1,
            _ => return false,
        }
    }
    true
}

fn is_uri_char(c: u8) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            b'-' | b'.'
                | b'_'
                | b'~'
                | b':'
                | b'/'
                | b'?'
                | b'#'
                | b'['
                | b']'
                | b'@'
                | b'!'
                | b'$'
                | b'&'
                | b'\''
                | b'('
                | b')'
                | b'*'
                | b'+'
                | b','
                | b';'
                | b'='
        )
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Uri {
    type Error = LlsdError;

    fn try_from(text: String) -> Result<Self> {
        Self::parse(text)
    }
}

impl From<Uri> for String {
    fn from(uri: Uri) -> Self {
        uri.0
    }
}

impl std::str::FromStr for Uri {
    type Err = LlsdError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_uris() {
        for text in [
            "",
            "http://www.example.com",
            "https://example.com/a/b?c=d&e=f#frag",
            "mailto:someone@example.com",
            "urn:uuid:12345678-1234-1234-1234-123456789abc",
            "x-custom+v1.2:payload",
            "http://example.com/%7Euser",
        ] {
            let uri = Uri::parse(text).unwrap_or_else(|e| panic!("{text:?}: {e}"));
            assert_eq!(uri.as_str(), text);
        }
    }

    #[test]
    fn test_rejects_malformed() {
        for text in [
            "example.com",
            "http:",
            ":nothing",
            "1http://x",
            "http://exa mple.com",
            "http://example.com/%7",
            "http://example.com/%zz",
            "http://example.com/\u{e9}",
            "http://example.com/<tag>",
        ] {
            assert!(Uri::parse(text).is_err(), "{text:?} should be rejected");
        }
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Uri::default().is_empty());
        assert_eq!(Uri::default().to_string(), "");
    }

    #[test]
    fn test_serde_validates() {
        let uri: Uri = serde_json::from_str(r#""http://example.com""#).unwrap();
        assert_eq!(uri.as_str(), "http://example.com");
        assert!(serde_json::from_str::<Uri>(r#""not a uri""#).is_err());
    }
}
