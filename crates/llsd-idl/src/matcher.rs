//! # Structural Matcher — Graded Comparison of Values Against Schema Nodes
//!
//! A [`Matcher`] is one node of a parsed schema. Comparing it with a [`Value`]
//! never fails; it produces a [`Score`].
//!
//! ## Rules
//!
//! - **Type**: Undefined defaults cleanly against every type; `undef` matches
//!   everything. Exact kinds match, lossless coercions convert, and anything
//!   else is incompatible.
//! - **Array**: Undefined reads as empty. Each position is compared with
//!   `pattern[i % len]`; positions past the end of the value compare as
//!   missing. A fixed pattern caps at `Additional` once the value outruns it.
//!   A repeating pattern is walked to the end of its last started cycle.
//! - **Map**: Undefined reads as empty. Named members absent from the value
//!   default; keys the schema does not name are additional. The wildcard form
//!   compares every member value.
//! - **Selector**: the value must equal the literal, exactly or after a
//!   lossless coercion.
//! - **Variant**: every definition with the name is tried and the best score
//!   wins. An unknown name is incompatible.
//!
//! Arrays and maps take the minimum over their parts.
//!
//! ## Recursion
//!
//! Variant names bind late, so `&tree = [ int, &tree ... ]` is legal and a
//! definition may refer to itself without consuming input (`&a = &a`). Each
//! comparison keeps a private stack of the variants it is resolving. Reaching
//! the same name against the same value again yields `Defaulted` when that
//! value is Undefined and `Incompatible` otherwise.

use std::fmt;
use std::str::FromStr;

use llsd_core::convert::real_to_integer;
use llsd_core::{parse_iso_date, parse_real, parse_uuid, Binary, Encoding, Map, Uri, Value};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::definition::VariantDef;
use crate::error::IdlError;
use crate::score::Score;

/// Stand-in for array elements past the end of the value.
static MISSING: Value = Value::Undefined;

/// A primitive type keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// `undef`: matches any value.
    Undef,
    /// `string`
    String,
    /// `bool`
    Bool,
    /// `int`
    Int,
    /// `real`
    Real,
    /// `date`
    Date,
    /// `uri`
    Uri,
    /// `uuid`
    Uuid,
    /// `binary`
    Binary,
}

impl TypeKind {
    /// All type keywords, in the order the parser tries them.
    pub fn all() -> &'static [TypeKind] {
        &[
            Self::Undef,
            Self::String,
            Self::Bool,
            Self::Int,
            Self::Real,
            Self::Date,
            Self::Uri,
            Self::Uuid,
            Self::Binary,
        ]
    }

    /// The schema keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undef => "undef",
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Real => "real",
            Self::Date => "date",
            Self::Uri => "uri",
            Self::Uuid => "uuid",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeKind {
    type Err = IdlError;

    fn from_str(s: &str) -> Result<Self, IdlError> {
        Self::all()
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| IdlError::Parse {
                message: format!("unknown type {s:?}"),
                offset: 0,
            })
    }
}

/// A selector constant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// `true` or `false`.
    Boolean(bool),
    /// A non-negative decimal integer.
    Integer(i32),
    /// A quoted name.
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "\"{s}\""),
        }
    }
}

/// The member declaration of a map matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapShape {
    /// Named members in declaration order. Names are unique.
    Members(Vec<(String, Matcher)>),
    /// One matcher applied to every member value (`{ $ : value }`).
    Wildcard(Box<Matcher>),
}

/// A parsed schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// A primitive type keyword.
    Type(TypeKind),
    /// An element pattern, cycled when `repeats` is set.
    Array {
        /// Element matchers, one per position.
        pattern: Vec<Matcher>,
        /// The pattern cycles over the whole array (`...`).
        repeats: bool,
    },
    /// A map shape.
    Map(MapShape),
    /// A constant the value must equal.
    Selector(Literal),
    /// A reference to named variant definitions, resolved at comparison time.
    Variant(String),
}

impl Matcher {
    /// Grade `value` against this node, resolving variant references in
    /// `variants`.
    pub fn compare(&self, value: &Value, variants: &[VariantDef]) -> Score {
        Comparison::new(variants).compare(self, value)
    }

    /// `compare(..) > Incompatible`.
    pub fn valid(&self, value: &Value, variants: &[VariantDef]) -> bool {
        self.compare(value, variants).is_valid()
    }

    /// `compare(..) > Additional`.
    pub fn matches(&self, value: &Value, variants: &[VariantDef]) -> bool {
        self.compare(value, variants).is_match()
    }

    /// `Mixed <= compare(..) <= Additional`.
    pub fn has_additional(&self, value: &Value, variants: &[VariantDef]) -> bool {
        self.compare(value, variants).has_additional()
    }

    /// `compare(..) == Incompatible`.
    pub fn incompatible(&self, value: &Value, variants: &[VariantDef]) -> bool {
        self.compare(value, variants).is_incompatible()
    }
}

/// Renders canonical schema text.
///
/// Every matcher the parser produces renders to text that parses back to an
/// equal matcher. Hand-built matchers outside the grammar (an empty array
/// pattern or member list, an empty or non-name string literal, a negative
/// integer literal) still render, but the text does not parse.
impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(kind) => write!(f, "{kind}"),
            Self::Array { pattern, repeats } => {
                f.write_str("[")?;
                for (i, m) in pattern.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{m}")?;
                }
                if *repeats {
                    f.write_str("...")?;
                }
                f.write_str("]")
            }
            Self::Map(MapShape::Members(members)) => {
                f.write_str("{")?;
                for (i, (name, m)) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {m}")?;
                }
                f.write_str("}")
            }
            Self::Map(MapShape::Wildcard(m)) => write!(f, "{{$: {m}}}"),
            Self::Selector(literal) => write!(f, "{literal}"),
            Self::Variant(name) => write!(f, "&{name}"),
        }
    }
}

/// Working state of one top-level comparison.
struct Comparison<'a> {
    variants: &'a [VariantDef],
    resolving: Vec<(&'a str, &'a Value)>,
}

impl<'a> Comparison<'a> {
    fn new(variants: &'a [VariantDef]) -> Self {
        Self {
            variants,
            resolving: Vec::new(),
        }
    }

    fn compare(&mut self, matcher: &'a Matcher, value: &'a Value) -> Score {
        match matcher {
            Matcher::Type(kind) => compare_type(*kind, value),
            Matcher::Array { pattern, repeats } => self.compare_array(pattern, *repeats, value),
            Matcher::Map(shape) => self.compare_map(shape, value),
            Matcher::Selector(literal) => compare_selector(literal, value),
            Matcher::Variant(name) => self.resolve(name, value),
        }
    }

    fn compare_array(&mut self, pattern: &'a [Matcher], repeats: bool, value: &'a Value) -> Score {
        let items: &'a [Value] = match value {
            Value::Undefined => &[],
            Value::Array(items) => items,
            _ => return Score::Incompatible,
        };
        if pattern.is_empty() {
            return if items.is_empty() {
                Score::Matched
            } else {
                Score::Additional
            };
        }

        let end = if repeats {
            items.len().div_ceil(pattern.len()).max(1) * pattern.len()
        } else {
            items.len().max(pattern.len())
        };

        let mut result = Score::Matched;
        for i in 0..end {
            if !repeats && i >= pattern.len() {
                result = result.min(Score::Additional);
                break;
            }
            let item = items.get(i).unwrap_or(&MISSING);
            result = result.min(self.compare(&pattern[i % pattern.len()], item));
            if result.is_incompatible() {
                break;
            }
        }
        result
    }

    fn compare_map(&mut self, shape: &'a MapShape, value: &'a Value) -> Score {
        let map: Option<&'a Map> = match value {
            Value::Undefined => None,
            Value::Map(map) => Some(map),
            _ => return Score::Incompatible,
        };

        let mut result = Score::Matched;
        match shape {
            MapShape::Wildcard(matcher) => {
                for member in map.into_iter().flat_map(|m| m.values()) {
                    result = result.min(self.compare(matcher, member));
                    if result.is_incompatible() {
                        break;
                    }
                }
            }
            MapShape::Members(members) => {
                for (name, matcher) in members {
                    let score = match map.and_then(|m| m.get(name)) {
                        Some(member) => self.compare(matcher, member),
                        None => Score::Defaulted,
                    };
                    result = result.min(score);
                    if result.is_incompatible() {
                        return result;
                    }
                }
                let undeclared = map
                    .into_iter()
                    .flat_map(|m| m.keys())
                    .any(|key| !members.iter().any(|(name, _)| name == key));
                if undeclared {
                    result = result.min(Score::Additional);
                }
            }
        }
        result
    }

    fn resolve(&mut self, name: &'a str, value: &'a Value) -> Score {
        let reentered = self
            .resolving
            .iter()
            .any(|&(n, v)| n == name && std::ptr::eq(v, value));
        if reentered {
            trace!(variant = name, "variant re-entered without consuming input");
            return if value.is_undefined() {
                Score::Defaulted
            } else {
                Score::Incompatible
            };
        }

        self.resolving.push((name, value));
        let variants = self.variants;
        let mut best = Score::Incompatible;
        for def in variants.iter().filter(|d| d.name == name) {
            best = best.max(self.compare(&def.matcher, value));
            if best == Score::Matched {
                break;
            }
        }
        self.resolving.pop();

        trace!(variant = name, score = %best, "resolved variant");
        best
    }
}

fn when(condition: bool, score: Score) -> Score {
    if condition {
        score
    } else {
        Score::Incompatible
    }
}

/// True if `f` survives a round trip through integer rounding.
fn is_integral(f: f64) -> bool {
    f64::from(real_to_integer(f)) == f
}

/// Empty text defaults; otherwise the text must parse as the target kind.
fn text_conversion(text: &str, parses: bool) -> Score {
    if text.is_empty() {
        Score::Defaulted
    } else {
        when(parses, Score::Converted)
    }
}

fn compare_type(kind: TypeKind, value: &Value) -> Score {
    use Score::{Converted, Defaulted, Incompatible, Matched};

    if kind == TypeKind::Undef {
        return Matched;
    }
    if value.is_undefined() {
        return Defaulted;
    }

    match (kind, value) {
        (TypeKind::String, Value::String(_)) => Matched,
        (TypeKind::String, Value::Array(_) | Value::Map(_)) => Incompatible,
        (TypeKind::String, _) => Converted,

        (TypeKind::Bool, Value::Boolean(_)) => Matched,
        (TypeKind::Bool, Value::Integer(n)) => when(*n == 0 || *n == 1, Converted),
        (TypeKind::Bool, Value::Real(f)) => when(*f == 0.0 || *f == 1.0, Converted),
        (TypeKind::Bool, Value::String(s)) => when(s.is_empty() || s == "true", Converted),

        (TypeKind::Int, Value::Integer(_)) => Matched,
        (TypeKind::Int, Value::Boolean(_)) => Converted,
        (TypeKind::Int, Value::Real(f)) => when(is_integral(*f), Converted),
        (TypeKind::Int, Value::String(s)) => {
            text_conversion(s, parse_real(s).is_some_and(is_integral))
        }

        (TypeKind::Real, Value::Real(_)) => Matched,
        (TypeKind::Real, Value::Boolean(_) | Value::Integer(_)) => Converted,
        (TypeKind::Real, Value::String(s)) => text_conversion(s, parse_real(s).is_some()),

        (TypeKind::Date, Value::Date(_)) => Matched,
        (TypeKind::Date, Value::String(s)) => text_conversion(s, parse_iso_date(s).is_ok()),

        (TypeKind::Uri, Value::Uri(_)) => Matched,
        (TypeKind::Uri, Value::String(s)) => text_conversion(s, Uri::parse(s.as_str()).is_ok()),

        (TypeKind::Uuid, Value::Uuid(_)) => Matched,
        (TypeKind::Uuid, Value::String(s)) => text_conversion(s, parse_uuid(s).is_ok()),

        // Empty text is valid base64, so it converts rather than defaults.
        (TypeKind::Binary, Value::Binary(_)) => Matched,
        (TypeKind::Binary, Value::String(s)) => {
            when(Binary::from_encoded(s, Encoding::Base64).is_ok(), Converted)
        }

        _ => Incompatible,
    }
}

fn compare_selector(literal: &Literal, value: &Value) -> Score {
    use Score::{Converted, Defaulted, Incompatible, Matched};

    match (literal, value) {
        (Literal::String(s), Value::Undefined) => when(s.is_empty(), Defaulted),
        (Literal::String(s), Value::String(v)) => when(s == v, Matched),

        (Literal::Boolean(b), Value::Undefined) => when(!b, Defaulted),
        (Literal::Boolean(b), Value::Boolean(v)) => when(b == v, Matched),
        (Literal::Boolean(b), Value::Integer(n)) => when(i32::from(*b) == *n, Converted),
        (Literal::Boolean(b), Value::Real(f)) => {
            when(if *b { *f == 1.0 } else { *f == 0.0 }, Converted)
        }
        (Literal::Boolean(b), Value::String(s)) => {
            let expected = if *b { "true" } else { "" };
            when(s == expected, Converted)
        }

        (Literal::Integer(n), Value::Undefined) => when(*n == 0, Defaulted),
        (Literal::Integer(n), Value::Boolean(b)) => when(*n == i32::from(*b), Converted),
        (Literal::Integer(n), Value::Integer(v)) => when(n == v, Matched),
        (Literal::Integer(n), Value::Real(f)) => when(*n == real_to_integer(*f), Converted),
        (Literal::Integer(n), Value::String(s)) if s.is_empty() => when(*n == 0, Defaulted),
        (Literal::Integer(n), Value::String(s)) => when(
            parse_real(s).is_some_and(|f| real_to_integer(f) == *n),
            Converted,
        ),

        _ => Incompatible,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llsd_core::{epoch, Uuid};

    fn ty(kind: TypeKind) -> Matcher {
        Matcher::Type(kind)
    }

    fn score(m: &Matcher, v: Value) -> Score {
        m.compare(&v, &[])
    }

    #[test]
    fn test_undefined_defaults_for_every_type() {
        for kind in TypeKind::all() {
            let expected = if *kind == TypeKind::Undef {
                Score::Matched
            } else {
                Score::Defaulted
            };
            assert_eq!(score(&ty(*kind), Value::Undefined), expected, "{kind}");
        }
    }

    #[test]
    fn test_undef_matches_anything() {
        assert_eq!(score(&ty(TypeKind::Undef), Value::from(5)), Score::Matched);
        assert_eq!(score(&ty(TypeKind::Undef), Value::Array(vec![])), Score::Matched);
    }

    #[test]
    fn test_string_type() {
        let m = ty(TypeKind::String);
        assert_eq!(score(&m, Value::from("x")), Score::Matched);
        assert_eq!(score(&m, Value::from(1)), Score::Converted);
        assert_eq!(score(&m, Value::from(Uuid::nil())), Score::Converted);
        assert_eq!(score(&m, Value::from(epoch())), Score::Converted);
        assert_eq!(score(&m, Value::Array(vec![])), Score::Incompatible);
        assert_eq!(score(&m, Value::Map(Map::new())), Score::Incompatible);
    }

    #[test]
    fn test_bool_type() {
        let m = ty(TypeKind::Bool);
        assert_eq!(score(&m, Value::from(false)), Score::Matched);
        assert_eq!(score(&m, Value::from(1)), Score::Converted);
        assert_eq!(score(&m, Value::from(2)), Score::Incompatible);
        assert_eq!(score(&m, Value::from(0.0)), Score::Converted);
        assert_eq!(score(&m, Value::from(0.5)), Score::Incompatible);
        assert_eq!(score(&m, Value::from("true")), Score::Converted);
        assert_eq!(score(&m, Value::from("")), Score::Converted);
        assert_eq!(score(&m, Value::from("yes")), Score::Incompatible);
        assert_eq!(score(&m, Value::from(Uuid::nil())), Score::Incompatible);
    }

    #[test]
    fn test_int_type() {
        let m = ty(TypeKind::Int);
        assert_eq!(score(&m, Value::from(3)), Score::Matched);
        assert_eq!(score(&m, Value::from(true)), Score::Converted);
        assert_eq!(score(&m, Value::from(3.0)), Score::Converted);
        assert_eq!(score(&m, Value::from(3.5)), Score::Incompatible);
        assert_eq!(score(&m, Value::from(1e12)), Score::Incompatible);
        assert_eq!(score(&m, Value::from(f64::NAN)), Score::Incompatible);
        assert_eq!(score(&m, Value::from("")), Score::Defaulted);
        assert_eq!(score(&m, Value::from("42")), Score::Converted);
        assert_eq!(score(&m, Value::from("4.2")), Score::Incompatible);
        assert_eq!(score(&m, Value::from("x")), Score::Incompatible);
    }

    #[test]
    fn test_real_type() {
        let m = ty(TypeKind::Real);
        assert_eq!(score(&m, Value::from(1.5)), Score::Matched);
        assert_eq!(score(&m, Value::from(1)), Score::Converted);
        assert_eq!(score(&m, Value::from("")), Score::Defaulted);
        assert_eq!(score(&m, Value::from("NaNS")), Score::Converted);
        assert_eq!(score(&m, Value::from("1e5")), Score::Converted);
        assert_eq!(score(&m, Value::from("one")), Score::Incompatible);
    }

    #[test]
    fn test_text_parsed_types() {
        let date = ty(TypeKind::Date);
        assert_eq!(score(&date, Value::from(epoch())), Score::Matched);
        assert_eq!(score(&date, Value::from("2008-01-01T00:00:00Z")), Score::Converted);
        assert_eq!(score(&date, Value::from("")), Score::Defaulted);
        assert_eq!(score(&date, Value::from("yesterday")), Score::Incompatible);
        assert_eq!(score(&date, Value::from(0)), Score::Incompatible);

        let uri = ty(TypeKind::Uri);
        assert_eq!(score(&uri, Value::from("http://x.io/")), Score::Converted);
        assert_eq!(score(&uri, Value::from("not a uri")), Score::Incompatible);

        let uuid = ty(TypeKind::Uuid);
        assert_eq!(score(&uuid, Value::from(Uuid::nil())), Score::Matched);
        assert_eq!(
            score(&uuid, Value::from("6bad258e-06f0-4c88-9d06-42c7e7e6d1a4")),
            Score::Converted
        );
        assert_eq!(score(&uuid, Value::from("6bad258e")), Score::Incompatible);

        let binary = ty(TypeKind::Binary);
        assert_eq!(score(&binary, Value::from("AQID")), Score::Converted);
        assert_eq!(score(&binary, Value::from("")), Score::Converted);
        assert_eq!(score(&binary, Value::from("!!")), Score::Incompatible);
        assert_eq!(score(&binary, Value::from(Binary::default())), Score::Matched);
    }

    #[test]
    fn test_fixed_array() {
        let m = Matcher::Array {
            pattern: vec![ty(TypeKind::Int), ty(TypeKind::String)],
            repeats: false,
        };
        let v = |items: Vec<Value>| Value::Array(items);
        assert_eq!(score(&m, v(vec![1.into(), "a".into()])), Score::Matched);
        assert_eq!(score(&m, v(vec![1.into()])), Score::Defaulted);
        assert_eq!(score(&m, Value::Undefined), Score::Defaulted);
        assert_eq!(
            score(&m, v(vec![1.into(), "a".into(), true.into()])),
            Score::Additional
        );
        assert_eq!(score(&m, v(vec![true.into(), 1.into()])), Score::Converted);
        assert_eq!(score(&m, v(vec![Map::new().into()])), Score::Incompatible);
        assert_eq!(score(&m, Value::from(1)), Score::Incompatible);
    }

    #[test]
    fn test_repeating_array_completes_cycle() {
        let m = Matcher::Array {
            pattern: vec![ty(TypeKind::Int), ty(TypeKind::String)],
            repeats: true,
        };
        let full = Value::Array(vec![1.into(), "a".into(), 2.into(), "b".into()]);
        assert_eq!(score(&m, full), Score::Matched);

        let partial = Value::Array(vec![1.into(), "a".into(), 2.into()]);
        assert_eq!(score(&m, partial), Score::Defaulted);

        assert_eq!(score(&m, Value::Array(vec![])), Score::Defaulted);
    }

    #[test]
    fn test_named_map() {
        let m = Matcher::Map(MapShape::Members(vec![
            ("a".to_string(), ty(TypeKind::Int)),
            ("b".to_string(), ty(TypeKind::String)),
        ]));
        let map = |pairs: Vec<(&str, Value)>| Value::Map(pairs.into_iter().collect());

        assert_eq!(score(&m, map(vec![("a", 1.into()), ("b", "x".into())])), Score::Matched);
        assert_eq!(score(&m, map(vec![("a", 1.into())])), Score::Defaulted);
        assert_eq!(
            score(
                &m,
                map(vec![("a", 1.into()), ("b", "x".into()), ("c", true.into())])
            ),
            Score::Additional
        );
        assert_eq!(score(&m, map(vec![("a", "x".into())])), Score::Incompatible);
        assert_eq!(score(&m, Value::Undefined), Score::Defaulted);
        assert_eq!(score(&m, Value::from("x")), Score::Incompatible);
    }

    #[test]
    fn test_wildcard_map() {
        let m = Matcher::Map(MapShape::Wildcard(Box::new(ty(TypeKind::Int))));
        let ok: Map = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(score(&m, ok.into()), Score::Matched);

        let mut bad = Map::new();
        bad.insert("a", 1);
        bad.insert("b", "x");
        assert_eq!(score(&m, bad.into()), Score::Incompatible);

        assert_eq!(score(&m, Map::new().into()), Score::Matched);
        assert_eq!(score(&m, Value::Undefined), Score::Matched);
    }

    #[test]
    fn test_string_selector() {
        let m = Matcher::Selector(Literal::String("move".to_string()));
        assert_eq!(score(&m, Value::from("move")), Score::Matched);
        assert_eq!(score(&m, Value::from("stop")), Score::Incompatible);
        assert_eq!(score(&m, Value::Undefined), Score::Incompatible);
        assert_eq!(score(&m, Value::from(1)), Score::Incompatible);
    }

    #[test]
    fn test_boolean_selector() {
        let t = Matcher::Selector(Literal::Boolean(true));
        assert_eq!(score(&t, Value::from(true)), Score::Matched);
        assert_eq!(score(&t, Value::from(1)), Score::Converted);
        assert_eq!(score(&t, Value::from(1.0)), Score::Converted);
        assert_eq!(score(&t, Value::from("true")), Score::Converted);
        assert_eq!(score(&t, Value::Undefined), Score::Incompatible);
        assert_eq!(score(&t, Value::from(false)), Score::Incompatible);

        let f = Matcher::Selector(Literal::Boolean(false));
        assert_eq!(score(&f, Value::Undefined), Score::Defaulted);
        assert_eq!(score(&f, Value::from("")), Score::Converted);
        assert_eq!(score(&f, Value::from(0)), Score::Converted);
    }

    #[test]
    fn test_integer_selector() {
        let two = Matcher::Selector(Literal::Integer(2));
        assert_eq!(score(&two, Value::from(2)), Score::Matched);
        assert_eq!(score(&two, Value::from(2.4)), Score::Converted);
        assert_eq!(score(&two, Value::from("2")), Score::Converted);
        assert_eq!(score(&two, Value::from("3")), Score::Incompatible);
        assert_eq!(score(&two, Value::from("")), Score::Incompatible);
        assert_eq!(score(&two, Value::Undefined), Score::Incompatible);

        let zero = Matcher::Selector(Literal::Integer(0));
        assert_eq!(score(&zero, Value::Undefined), Score::Defaulted);
        assert_eq!(score(&zero, Value::from("")), Score::Defaulted);
        assert_eq!(score(&zero, Value::from(false)), Score::Converted);
        assert_eq!(score(&zero, Value::from("junk")), Score::Incompatible);
    }

    #[test]
    fn test_variant_takes_best_alternative() {
        let variants = vec![
            VariantDef::new("shape", ty(TypeKind::Int)),
            VariantDef::new("shape", ty(TypeKind::String)),
        ];
        let m = Matcher::Variant("shape".to_string());
        assert_eq!(m.compare(&Value::from(1), &variants), Score::Matched);
        assert_eq!(m.compare(&Value::from("x"), &variants), Score::Matched);
        assert_eq!(m.compare(&Value::from(1.0), &variants), Score::Converted);
        assert_eq!(m.compare(&Value::Array(vec![]), &variants), Score::Incompatible);
    }

    #[test]
    fn test_unknown_variant_is_incompatible() {
        let m = Matcher::Variant("nothing".to_string());
        assert_eq!(m.compare(&Value::from(1), &[]), Score::Incompatible);
        assert_eq!(m.compare(&Value::Undefined, &[]), Score::Incompatible);
    }

    #[test]
    fn test_self_reference_terminates() {
        let variants = vec![VariantDef::new("a", Matcher::Variant("a".to_string()))];
        let m = Matcher::Variant("a".to_string());
        assert_eq!(m.compare(&Value::from(1), &variants), Score::Incompatible);
        assert_eq!(m.compare(&Value::Undefined, &variants), Score::Defaulted);
    }

    #[test]
    fn test_recursive_tree() {
        let tree = Matcher::Array {
            pattern: vec![ty(TypeKind::Int), Matcher::Variant("tree".to_string())],
            repeats: true,
        };
        let variants = vec![VariantDef::new("tree", tree)];
        let m = Matcher::Variant("tree".to_string());

        let leaf = Value::Array(vec![1.into(), Value::Array(vec![])]);
        let value = Value::Array(vec![7.into(), leaf]);
        assert_eq!(m.compare(&value, &variants), Score::Defaulted);

        let bad = Value::Array(vec![7.into(), Value::Array(vec!["x".into()])]);
        assert_eq!(m.compare(&bad, &variants), Score::Incompatible);
    }

    #[test]
    fn test_predicates() {
        let m = ty(TypeKind::Int);
        assert!(m.valid(&Value::from("1"), &[]));
        assert!(m.matches(&Value::from("1"), &[]));
        assert!(!m.has_additional(&Value::from("1"), &[]));
        assert!(m.incompatible(&Value::from("one"), &[]));
    }

    #[test]
    fn test_display() {
        let m = Matcher::Map(MapShape::Members(vec![
            (
                "list".to_string(),
                Matcher::Array {
                    pattern: vec![ty(TypeKind::Int), ty(TypeKind::String)],
                    repeats: true,
                },
            ),
            ("kind".to_string(), Matcher::Selector(Literal::String("a".to_string()))),
            ("on".to_string(), Matcher::Selector(Literal::Boolean(true))),
            ("n".to_string(), Matcher::Selector(Literal::Integer(3))),
            (
                "any".to_string(),
                Matcher::Map(MapShape::Wildcard(Box::new(Matcher::Variant("v".to_string())))),
            ),
        ]));
        assert_eq!(
            m.to_string(),
            r#"{list: [int, string...], kind: "a", on: true, n: 3, any: {$: &v}}"#
        );
    }
}
