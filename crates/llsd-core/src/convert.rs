//! # As-Conversions — Total Coercion to Primitive Kinds
//!
//! [`Coerce`] converts any [`Value`] to any primitive kind. Every method is
//! total: a value that has no sensible reading as the target kind yields that
//! kind's default instead of an error.
//!
//! | Target | Default |
//! |--------|---------|
//! | boolean | `false` |
//! | integer | `0` |
//! | real | `0.0` |
//! | string | `""` |
//! | uuid | nil UUID |
//! | date | Unix epoch |
//! | uri | empty URI |
//! | binary | empty |
//!
//! These rules are distinct from the fail-fast codecs: a decoder rejects
//! malformed input, a conversion never does.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::binary::{Binary, Encoding};
use crate::date::{epoch, format_iso_date, parse_iso_date};
use crate::identity::{format_uuid, parse_uuid};
use crate::real::{format_real, parse_real};
use crate::uri::Uri;
use crate::value::{Value, MAX_INTEGER, MIN_INTEGER};

/// Total conversion of an LLSD value to each primitive kind.
pub trait Coerce {
    /// Always [`Value::Undefined`].
    fn as_undefined(&self) -> Value {
        Value::Undefined
    }

    /// Truthiness: nonzero numbers (not NaN) and non-empty strings are true.
    fn as_boolean(&self) -> bool;

    /// Integer reading, rounded half toward +∞ and clamped to the 32-bit range.
    fn as_integer(&self) -> i32;

    /// Real reading; strings go through the real-literal grammar.
    fn as_real(&self) -> f64;

    /// Canonical text rendering.
    fn as_string(&self) -> String;

    /// UUID reading of a UUID or hyphenated UUID text.
    fn as_uuid(&self) -> Uuid;

    /// Date reading of a date or ISO 8601 text.
    fn as_date(&self) -> DateTime<Utc>;

    /// URI reading of a URI or valid URI text.
    fn as_uri(&self) -> Uri;

    /// Binary reading of a binary or base64 text.
    fn as_binary(&self) -> Binary;
}

impl Coerce for Value {
    fn as_boolean(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Real(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Undefined
            | Value::Uuid(_)
            | Value::Date(_)
            | Value::Uri(_)
            | Value::Binary(_)
            | Value::Array(_)
            | Value::Map(_) => false,
        }
    }

    fn as_integer(&self) -> i32 {
        match self {
            Value::Boolean(b) => i32::from(*b),
            Value::Integer(n) => *n,
            Value::Real(f) => real_to_integer(*f),
            Value::String(s) => parse_real(s).map_or(0, real_to_integer),
            Value::Undefined
            | Value::Uuid(_)
            | Value::Date(_)
            | Value::Uri(_)
            | Value::Binary(_)
            | Value::Array(_)
            | Value::Map(_) => 0,
        }
    }

    fn as_real(&self) -> f64 {
        match self {
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Integer(n) => f64::from(*n),
            Value::Real(f) => *f,
            Value::String(s) => parse_real(s).unwrap_or(0.0),
            Value::Undefined
            | Value::Uuid(_)
            | Value::Date(_)
            | Value::Uri(_)
            | Value::Binary(_)
            | Value::Array(_)
            | Value::Map(_) => 0.0,
        }
    }

    fn as_string(&self) -> String {
        match self {
            Value::Undefined | Value::Array(_) | Value::Map(_) => String::new(),
            Value::Boolean(b) => {
                if *b {
                    "true".to_string()
                } else {
                    String::new()
                }
            }
            Value::Integer(n) => n.to_string(),
            Value::Real(f) => format_real(*f),
            Value::String(s) => s.clone(),
            Value::Uuid(u) => format_uuid(u),
            Value::Date(d) => format_iso_date(d),
            Value::Uri(u) => u.to_string(),
            Value::Binary(b) => b.to_base64(),
        }
    }

    fn as_uuid(&self) -> Uuid {
        match self {
            Value::Uuid(u) => *u,
            Value::String(s) => parse_uuid(s).unwrap_or_default(),
            _ => Uuid::nil(),
        }
    }

    fn as_date(&self) -> DateTime<Utc> {
        match self {
            Value::Date(d) => *d,
            Value::String(s) => parse_iso_date(s).unwrap_or_else(|_| epoch()),
            _ => epoch(),
        }
    }

    fn as_uri(&self) -> Uri {
        match self {
            Value::Uri(u) => u.clone(),
            Value::String(s) => Uri::parse(s.as_str()).unwrap_or_default(),
            _ => Uri::default(),
        }
    }

    fn as_binary(&self) -> Binary {
        match self {
            Value::Binary(b) => b.clone(),
            Value::String(s) => Binary::from_encoded(s, Encoding::Base64).unwrap_or_default(),
            _ => Binary::default(),
        }
    }
}

/// Round half toward +∞, clamp to the LLSD integer range, NaN to zero.
pub fn real_to_integer(f: f64) -> i32 {
    if f.is_nan() {
        return 0;
    }
    let floor = f.floor();
    let rounded = if f - floor >= 0.5 { floor + 1.0 } else { floor };
    if rounded >= f64::from(MAX_INTEGER) {
        MAX_INTEGER
    } else if rounded <= f64::from(MIN_INTEGER) {
        MIN_INTEGER
    } else {
        rounded as i32
    }
}
