#![deny(missing_docs)]

//! # llsd-core — The LLSD Value Model and Its Serializations
//!
//! LLSD is a self-describing structured-data model: eleven value kinds, a
//! bit-exact binary wire format, and a set of total conversions between
//! kinds. This crate is the leaf of the workspace; the schema language in
//! `llsd-idl` builds on it.
//!
//! ## Key Design Principles
//!
//! 1. **One closed sum type.** [`Value`] is an exhaustive enum. Every codec and
//!    conversion matches on it, so a new kind cannot be half-supported.
//!
//! 2. **Two error philosophies.** Codecs and constructors are fail-fast and
//!    return [`LlsdError`]. The `as_*` conversions on [`Coerce`] are total and
//!    fall back to a per-kind default instead.
//!
//! 3. **Bit-exact binary.** Reals travel as raw IEEE-754 bit patterns; NaN,
//!    the infinities, and negative zero survive a round trip unchanged.
//!
//! 4. **Validated newtypes.** [`Uri`] and [`Binary`] are only built through
//!    checked constructors; UUIDs accept only the hyphenated text form.
//!
//! ## Crate Policy
//!
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Logging goes through `tracing`; no subscriber is installed here.

pub mod binary;
pub mod codec;
pub mod config;
pub mod content_type;
pub mod convert;
pub mod date;
pub mod error;
pub mod identity;
pub mod json;
pub mod real;
pub mod uri;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use binary::{Binary, Encoding};
pub use codec::{from_binary, from_binary_with, to_binary, BINARY_MIME_TYPE};
pub use config::CodecConfig;
pub use content_type::ContentType;
pub use convert::Coerce;
pub use date::{epoch, format_iso_date, parse_iso_date};
pub use error::{LlsdError, Result};
pub use identity::{format_uuid, parse_uuid, uuid_from_octets};
pub use json::{from_json, from_json_str, from_json_with, to_json, to_json_string, JSON_MIME_TYPE};
pub use real::{format_real, is_negative_zero, parse_real};
pub use uri::Uri;
pub use value::{Map, Value, ValueKind, MAX_INTEGER, MIN_INTEGER};

pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
