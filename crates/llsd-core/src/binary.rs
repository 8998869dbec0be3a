//! # Binary Values and Binary-as-Text Encodings
//!
//! `Binary` is an owned octet sequence. Text surfaces carry binaries through
//! one of four named encodings, selected case-insensitively by name:
//!
//! | Name | Text → octets | Octets → text |
//! |------|---------------|---------------|
//! | `UTF-8` | UTF-8 bytes of the text | strict UTF-8 decode |
//! | `BASE64` | whitespace stripped, padding optional | padded standard alphabet |
//! | `BASE16` | whitespace stripped, pairs of hex digits | uppercase hex |
//! | `BINARY` | one octet per char, each ≤ U+00FF | one char per octet |

use std::fmt;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{LlsdError, Result};

/// Standard alphabet; decoding tolerates missing padding and stray trailing bits.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// A named binary-as-text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    /// UTF-8 text.
    Utf8,
    /// RFC 4648 base64, standard alphabet.
    Base64,
    /// Hexadecimal.
    Base16,
    /// Raw octets, one Latin-1 character each.
    Octets,
}

impl Encoding {
    /// All encodings.
    pub fn all() -> &'static [Encoding] {
        &[Self::Utf8, Self::Base64, Self::Base16, Self::Octets]
    }

    /// The canonical encoding name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Base64 => "BASE64",
            Self::Base16 => "BASE16",
            Self::Octets => "BINARY",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = LlsdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "UTF-8" => Ok(Self::Utf8),
            "BASE64" => Ok(Self::Base64),
            "BASE16" => Ok(Self::Base16),
            "BINARY" => Ok(Self::Octets),
            _ => Err(LlsdError::UnknownEncoding(s.to_string())),
        }
    }
}

/// An ordered byte sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binary(Vec<u8>);

impl Binary {
    /// Wrap raw octets.
    pub fn new(octets: impl Into<Vec<u8>>) -> Self {
        Self(octets.into())
    }

    /// Decode text through `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [`LlsdError::InvalidEncoding`] if the text is not valid for the
    /// encoding.
    pub fn from_encoded(text: &str, encoding: Encoding) -> Result<Self> {
        let octets = match encoding {
            Encoding::Utf8 => text.as_bytes().to_vec(),
            Encoding::Base64 => BASE64
                .decode(strip_whitespace(text))
                .map_err(|e| LlsdError::encoding("BASE64", e.to_string()))?,
            Encoding::Base16 => decode_base16(&strip_whitespace(text))?,
            Encoding::Octets => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c))
                        .map_err(|_| LlsdError::encoding("BINARY", format!("invalid byte value {c:?}")))
                })
                .collect::<Result<Vec<u8>>>()?,
        };
        Ok(Self(octets))
    }

    /// Decode text through the encoding called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`LlsdError::UnknownEncoding`] for an unrecognized name, or
    /// [`LlsdError::InvalidEncoding`] as for [`Binary::from_encoded`].
    pub fn from_encoded_named(text: &str, name: &str) -> Result<Self> {
        Self::from_encoded(text, name.parse()?)
    }

    /// Render the octets through `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [`LlsdError::InvalidEncoding`] when the encoding is `UTF-8` and
    /// the octets are not well-formed UTF-8. The other encodings always succeed.
    pub fn to_encoded(&self, encoding: Encoding) -> Result<String> {
        match encoding {
            Encoding::Utf8 => decode_utf8(&self.0).map(str::to_string),
            Encoding::Base64 => Ok(BASE64.encode(&self.0)),
            Encoding::Base16 => Ok(self.0.iter().map(|b| format!("{b:02X}")).collect()),
            Encoding::Octets => Ok(self.0.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Base64 text, the form binaries take in every text encoding of LLSD.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.0)
    }

    /// Borrow the octets.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the octets.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Number of octets.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no octets.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Binary {}]", self.0.len())
    }
}

impl From<Vec<u8>> for Binary {
    fn from(octets: Vec<u8>) -> Self {
        Self(octets)
    }
}

impl From<&[u8]> for Binary {
    fn from(octets: &[u8]) -> Self {
        Self(octets.to_vec())
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Strict UTF-8 decode, distinguishing truncated sequences from invalid ones.
pub(crate) fn decode_utf8(octets: &[u8]) -> Result<&str> {
    std::str::from_utf8(octets).map_err(|e| {
        let at = e.valid_up_to();
        match e.error_len() {
            None => LlsdError::encoding("UTF-8", format!("truncated UTF-8 sequence at byte {at}")),
            Some(_) => LlsdError::encoding("UTF-8", format!("invalid UTF-8 byte at {at}")),
        }
    })
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

fn decode_base16(text: &str) -> Result<Vec<u8>> {
    let digits = text.as_bytes();
    if digits.len() % 2 != 0 {
        return Err(LlsdError::encoding("BASE16", "odd number of hex digits"));
    }
    digits
        .chunks(2)
        .map(|pair| {
            let hi = hex_value(pair[0]);
            let lo = hex_value(pair[1]);
            match (hi, lo) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(LlsdError::encoding(
                    "BASE16",
                    format!("invalid hex digits {:?}", String::from_utf8_lossy(pair)),
                )),
            }
        })
        .collect()
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
