//! # Binary Codec — `application/llsd+binary`
//!
//! Bit-exact serialization between [`Value`] and bytes. Every value is one
//! ASCII tag byte followed by a tag-specific body:
//!
//! | Tag | Kind | Body |
//! |-----|------|------|
//! | `!` | Undefined | none |
//! | `1` / `0` | Boolean | none |
//! | `i` | Integer | 4 bytes, big-endian two's complement |
//! | `r` | Real | 8 bytes, big-endian IEEE-754 |
//! | `d` | Date | 8 bytes, big-endian IEEE-754 seconds since epoch |
//! | `u` | UUID | 16 raw octets |
//! | `s` / `l` | String / URI | u32 byte count, UTF-8 bytes |
//! | `b` | Binary | u32 byte count, raw bytes |
//! | `[` | Array | u32 element count, elements, `]` |
//! | `{` | Map | u32 entry count, entries of `k` + u32 key length + key + value, `}` |
//!
//! ## Design
//!
//! Decoding is a single forward pass over a borrowed buffer with an explicit
//! cursor. Every read is bounds-checked and reports the offset at which it
//! failed. Close tags are verified, and bytes left after the top-level value
//! are an error. Reals travel as raw bit patterns, so NaN payloads, the
//! infinities, and negative zero all survive a round trip.

use tracing::debug;

use crate::binary::{decode_utf8, Binary};
use crate::config::CodecConfig;
use crate::date::{from_epoch_seconds, to_epoch_seconds};
use crate::error::{LlsdError, Result};
use crate::identity::uuid_from_octets;
use crate::uri::Uri;
use crate::value::{Map, Value};

/// MIME type of the binary serialization.
pub const BINARY_MIME_TYPE: &str = "application/llsd+binary";

const TAG_UNDEFINED: u8 = b'!';
const TAG_TRUE: u8 = b'1';
const TAG_FALSE: u8 = b'0';
const TAG_INTEGER: u8 = b'i';
const TAG_REAL: u8 = b'r';
const TAG_STRING: u8 = b's';
const TAG_UUID: u8 = b'u';
const TAG_DATE: u8 = b'd';
const TAG_URI: u8 = b'l';
const TAG_BINARY: u8 = b'b';
const TAG_ARRAY_OPEN: u8 = b'[';
const TAG_ARRAY_CLOSE: u8 = b']';
const TAG_MAP_OPEN: u8 = b'{';
const TAG_MAP_CLOSE: u8 = b'}';
const TAG_MAP_KEY: u8 = b'k';

/// Upper bound on elements reserved from an untrusted count before any are read.
const MAX_PREALLOCATION: usize = 1024;

/// Serialize a value to binary LLSD.
///
/// # Errors
///
/// Returns [`LlsdError::LengthOverflow`] if a string, binary, array, or map
/// is too long for its 32-bit length prefix.
pub fn to_binary(value: &Value) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_value(value, &mut out)?;
    Ok(out)
}

/// Deserialize binary LLSD with the default [`CodecConfig`].
///
/// # Errors
///
/// Fails on truncated input, unknown tags, missing close tags, malformed
/// UTF-8, trailing bytes, or nesting beyond the configured depth.
pub fn from_binary(bytes: &[u8]) -> Result<Value> {
    from_binary_with(bytes, &CodecConfig::default())
}

/// Deserialize binary LLSD under explicit limits.
///
/// # Errors
///
/// As for [`from_binary`].
pub fn from_binary_with(bytes: &[u8], config: &CodecConfig) -> Result<Value> {
    let mut decoder = Decoder::new(bytes, config);
    let value = decoder.value(0)?;
    if decoder.pos != bytes.len() {
        return Err(LlsdError::TrailingData {
            offset: decoder.pos,
        });
    }
    debug!(bytes = bytes.len(), kind = %value.kind(), "decoded binary LLSD");
    Ok(value)
}

fn encode_value(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Undefined => out.push(TAG_UNDEFINED),
        Value::Boolean(true) => out.push(TAG_TRUE),
        Value::Boolean(false) => out.push(TAG_FALSE),
        Value::Integer(n) => {
            out.push(TAG_INTEGER);
            out.extend_from_slice(&n.to_be_bytes());
        }
        Value::Real(f) => {
            out.push(TAG_REAL);
            out.extend_from_slice(&f.to_be_bytes());
        }
        Value::String(s) => {
            out.push(TAG_STRING);
            encode_counted(s.as_bytes(), out)?;
        }
        Value::Uuid(u) => {
            out.push(TAG_UUID);
            out.extend_from_slice(u.as_bytes());
        }
        Value::Date(d) => {
            out.push(TAG_DATE);
            out.extend_from_slice(&to_epoch_seconds(d).to_be_bytes());
        }
        Value::Uri(u) => {
            out.push(TAG_URI);
            encode_counted(u.as_str().as_bytes(), out)?;
        }
        Value::Binary(b) => {
            out.push(TAG_BINARY);
            encode_counted(b.as_bytes(), out)?;
        }
        Value::Array(items) => {
            out.push(TAG_ARRAY_OPEN);
            encode_length(items.len(), out)?;
            for item in items {
                encode_value(item, out)?;
            }
            out.push(TAG_ARRAY_CLOSE);
        }
        Value::Map(map) => {
            out.push(TAG_MAP_OPEN);
            encode_length(map.len(), out)?;
            for (key, member) in map.iter() {
                out.push(TAG_MAP_KEY);
                encode_counted(key.as_bytes(), out)?;
                encode_value(member, out)?;
            }
            out.push(TAG_MAP_CLOSE);
        }
    }
    Ok(())
}

fn encode_length(len: usize, out: &mut Vec<u8>) -> Result<()> {
    let len = u32::try_from(len).map_err(|_| LlsdError::LengthOverflow(len))?;
    out.extend_from_slice(&len.to_be_bytes());
    Ok(())
}

fn encode_counted(bytes: &[u8], out: &mut Vec<u8>) -> Result<()> {
    encode_length(bytes.len(), out)?;
    out.extend_from_slice(bytes);
    Ok(())
}

struct Decoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    max_depth: usize,
}

impl<'a> Decoder<'a> {
    fn new(bytes: &'a [u8], config: &CodecConfig) -> Self {
        Self {
            bytes,
            pos: 0,
            max_depth: config.max_depth,
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.bytes.len())
            .ok_or(LlsdError::Truncated {
                offset: self.pos,
                wanted: n,
            })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.take(N)?);
        Ok(buf)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn length(&mut self) -> Result<usize> {
        let len = u32::from_be_bytes(self.array()?);
        usize::try_from(len).map_err(|_| LlsdError::decode(self.pos - 4, "length prefix too large"))
    }

    fn counted(&mut self) -> Result<&'a [u8]> {
        let len = self.length()?;
        self.take(len)
    }

    fn text(&mut self) -> Result<&'a str> {
        let start = self.pos + 4;
        let bytes = self.counted()?;
        decode_utf8(bytes).map_err(|e| LlsdError::decode(start, e.to_string()))
    }

    fn expect(&mut self, tag: u8, what: &str) -> Result<()> {
        let at = self.pos;
        match self.byte() {
            Ok(found) if found == tag => Ok(()),
            Ok(found) => Err(LlsdError::decode(
                at,
                format!("expected {what} '{}', found 0x{found:02x}", char::from(tag)),
            )),
            Err(_) => Err(LlsdError::decode(at, format!("missing {what}"))),
        }
    }

    fn enter(&self, depth: usize, at: usize) -> Result<()> {
        if depth >= self.max_depth {
            debug!(offset = at, limit = self.max_depth, "binary LLSD nesting too deep");
            return Err(LlsdError::DepthExceeded(self.max_depth));
        }
        Ok(())
    }

    fn value(&mut self, depth: usize) -> Result<Value> {
        let at = self.pos;
        let tag = self.byte()?;
        let value = match tag {
            TAG_UNDEFINED => Value::Undefined,
            TAG_TRUE => Value::Boolean(true),
            TAG_FALSE => Value::Boolean(false),
            TAG_INTEGER => Value::Integer(i32::from_be_bytes(self.array()?)),
            TAG_REAL => Value::Real(f64::from_be_bytes(self.array()?)),
            TAG_STRING => Value::String(self.text()?.to_string()),
            TAG_UUID => Value::Uuid(uuid_from_octets(self.take(16)?)?),
            TAG_DATE => {
                let seconds = f64::from_be_bytes(self.array()?);
                Value::Date(from_epoch_seconds(seconds)?)
            }
            TAG_URI => Value::Uri(Uri::parse(self.text()?)?),
            TAG_BINARY => Value::Binary(Binary::from(self.counted()?)),
            TAG_ARRAY_OPEN => {
                self.enter(depth, at)?;
                let count = self.length()?;
                let remaining = self.bytes.len() - self.pos;
                let mut items = Vec::with_capacity(count.min(remaining).min(MAX_PREALLOCATION));
                for _ in 0..count {
                    items.push(self.value(depth + 1)?);
                }
                self.expect(TAG_ARRAY_CLOSE, "array close tag")?;
                Value::Array(items)
            }
            TAG_MAP_OPEN => {
                self.enter(depth, at)?;
                let count = self.length()?;
                let mut map = Map::new();
                for _ in 0..count {
                    self.expect(TAG_MAP_KEY, "map key tag")?;
                    let key = self.text()?;
                    let member = self.value(depth + 1)?;
                    map.insert(key, member);
                }
                self.expect(TAG_MAP_CLOSE, "map close tag")?;
                Value::Map(map)
            }
            other => {
                return Err(LlsdError::decode(
                    at,
                    format!("unknown tag byte 0x{other:02x}"),
                ))
            }
        };
        Ok(value)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::DateTime;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn arb_leaf() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Undefined),
            any::<bool>().prop_map(Value::Boolean),
            any::<i32>().prop_map(Value::Integer),
            any::<u64>().prop_map(|bits| Value::Real(f64::from_bits(bits))),
            ".{0,16}".prop_map(Value::String),
            any::<[u8; 16]>().prop_map(|b| Value::Uuid(Uuid::from_bytes(b))),
            (-10_000_000_000_000i64..10_000_000_000_000i64).prop_filter_map(
                "representable",
                |ms| DateTime::from_timestamp_millis(ms).map(Value::Date)
            ),
            "[a-z][a-z0-9+.-]{0,6}:[a-zA-Z0-9/?#@!$&'()*+,;=._~-]{1,16}"
                .prop_map(|s| Value::Uri(Uri::parse(s).unwrap())),
            prop::collection::vec(any::<u8>(), 0..24).prop_map(|b| Value::Binary(Binary::new(b))),
        ]
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        arb_leaf().prop_recursive(4, 48, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
                prop::collection::vec(("[a-z]{0,4}", inner), 0..6)
                    .prop_map(|entries| Value::Map(entries.into_iter().collect())),
            ]
        })
    }

    /// Structural equality with reals compared by bit pattern.
    fn same(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Real(x), Value::Real(y)) => x.to_bits() == y.to_bits(),
            (Value::Array(xs), Value::Array(ys)) => {
                xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same(x, y))
            }
            (Value::Map(xs), Value::Map(ys)) => {
                xs.len() == ys.len()
                    && xs.iter().all(|(k, x)| ys.get(k).is_some_and(|y| same(x, y)))
            }
            _ => a == b,
        }
    }

    proptest! {
        #[test]
        fn binary_round_trip(value in arb_value()) {
            let bytes = to_binary(&value).unwrap();
            let decoded = from_binary(&bytes).unwrap();
            prop_assert!(same(&value, &decoded), "{value:?} != {decoded:?}");
        }

        /// Decoding arbitrary bytes never panics.
        #[test]
        fn decode_is_total(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = from_binary(&bytes);
        }
    }
}
