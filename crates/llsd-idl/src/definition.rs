//! # Definitions — Named Variants and Resources
//!
//! A schema suite is a sequence of two kinds of top-level definition:
//!
//! - `&name = value` declares one alternative of the variant `name`. The
//!   same name may be declared any number of times.
//! - `%% name transaction` declares the request/response shape of a
//!   resource.
//!
//! | Marker | Transaction | Request | Response |
//! |--------|-------------|---------|----------|
//! | `<<` | Get | none | value |
//! | `<>` | GetPut | value | value |
//! | `<x>` | GetPutDel | value | value |
//! | `-> a <- b` | Post | `a` | `b` |

use std::fmt;

use llsd_core::Value;

use crate::matcher::Matcher;
use crate::score::Score;

/// One declaration of a named variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDef {
    /// The variant name, without the `&`.
    pub name: String,
    /// The shape this declaration contributes.
    pub matcher: Matcher,
}

impl VariantDef {
    /// Declare one alternative of the variant `name`.
    pub fn new(name: impl Into<String>, matcher: Matcher) -> Self {
        Self {
            name: name.into(),
            matcher,
        }
    }
}

impl fmt::Display for VariantDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "&{} = {}", self.name, self.matcher)
    }
}

/// The request/response shape of a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    /// Read-only: a response body, no request body.
    Get(Matcher),
    /// Read and replace with the same body shape.
    GetPut(Matcher),
    /// Read, replace, and delete with the same body shape.
    GetPutDel(Matcher),
    /// Independent request and response bodies.
    Post {
        /// Request body shape.
        request: Matcher,
        /// Response body shape.
        response: Matcher,
    },
}

impl Transaction {
    /// The short name of the transaction kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get(_) => "get",
            Self::GetPut(_) => "getput",
            Self::GetPutDel(_) => "getputdel",
            Self::Post { .. } => "post",
        }
    }

    /// The request body shape. `Get` accepts no request body.
    pub fn request(&self) -> Option<&Matcher> {
        match self {
            Self::Get(_) => None,
            Self::GetPut(body) | Self::GetPutDel(body) => Some(body),
            Self::Post { request, .. } => Some(request),
        }
    }

    /// The response body shape.
    pub fn response(&self) -> &Matcher {
        match self {
            Self::Get(body) | Self::GetPut(body) | Self::GetPutDel(body) => body,
            Self::Post { response, .. } => response,
        }
    }

    /// Grade a request body. Every request against `Get` is incompatible.
    pub fn compare_request(&self, request: &Value, variants: &[VariantDef]) -> Score {
        self.request()
            .map_or(Score::Incompatible, |m| m.compare(request, variants))
    }

    /// Grade a response body.
    pub fn compare_response(&self, response: &Value, variants: &[VariantDef]) -> Score {
        self.response().compare(response, variants)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get(body) => write!(f, "<< {body}"),
            Self::GetPut(body) => write!(f, "<> {body}"),
            Self::GetPutDel(body) => write!(f, "<x> {body}"),
            Self::Post { request, response } => write!(f, "-> {request} <- {response}"),
        }
    }
}

/// A named resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDef {
    /// The resource name.
    pub name: String,
    /// Its request/response shape.
    pub transaction: Transaction,
}

impl ResourceDef {
    /// Define the resource `name`.
    pub fn new(name: impl Into<String>, transaction: Transaction) -> Self {
        Self {
            name: name.into(),
            transaction,
        }
    }

    /// Grade a request body. See [`Transaction::compare_request`].
    pub fn compare_request(&self, request: &Value, variants: &[VariantDef]) -> Score {
        self.transaction.compare_request(request, variants)
    }

    /// Grade a response body.
    pub fn compare_response(&self, response: &Value, variants: &[VariantDef]) -> Score {
        self.transaction.compare_response(response, variants)
    }
}

impl fmt::Display for ResourceDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "%% {} {}", self.name, self.transaction)
    }
}
