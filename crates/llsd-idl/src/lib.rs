#![deny(missing_docs)]

//! # llsd-idl — LLIDL Schemas and Graded Structural Matching
//!
//! LLIDL describes the shape of LLSD data: primitive types, fixed and
//! repeating arrays, maps with named or wildcard members, literal selectors,
//! and named variants. Comparing a value against a shape does not pass or
//! fail. It yields a [`Score`] that tells protocol code whether the value
//! matched exactly, needed lossless conversion, was missing optional data,
//! carried unexpected additions, or cannot be read at all.
//!
//! ## Key Design Principles
//!
//! 1. **Two signaling channels in the parser.** A production that does not
//!    start here returns `Ok(None)`; one that started and then broke returns
//!    [`IdlError::Parse`].
//!
//! 2. **Matching never errors.** Every mismatch is a score, down to
//!    [`Score::Incompatible`]. Only unknown resource names fail.
//!
//! 3. **Late-bound variants.** `&name` references resolve against the suite
//!    at comparison time. Duplicate declarations are all tried and the best
//!    score wins.
//!
//! 4. **Immutable after parse.** Matchers and suites are plain owned trees,
//!    `Send + Sync`, with no interior mutability.
//!
//! ## Crate Policy
//!
//! - Depends only on `llsd-core` internally.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod definition;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod score;
pub mod suite;

// Re-export primary types for ergonomic imports.
pub use definition::{ResourceDef, Transaction, VariantDef};
pub use error::{IdlError, Result};
pub use matcher::{Literal, MapShape, Matcher, TypeKind};
pub use parser::{parse_suite, parse_value, parse_variant_def};
pub use score::Score;
pub use suite::Suite;
