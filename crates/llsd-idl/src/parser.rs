//! # Schema Parser — Recursive Descent over LLIDL Text
//!
//! Grammar:
//!
//! ```text
//! definitions   = *( s / variant-def / resource-def )
//! s             = *( tab / newline / sp / comment )
//! newline       = cr lf / cr / lf
//! comment       = ";" *char newline
//! name          = ( ALPHA / "_" ) *( ALPHA / DIGIT / "_" / "/" )
//!
//! value         = type / array / map / selector / variant
//! type          = "undef" / "string" / "bool" / "int" / "real"
//!               / "date" / "uri" / "uuid" / "binary"
//! array         = "[" s value-list s [ "..." s ] "]"
//! value-list    = value [ s "," [ s value-list ] ]
//! map           = "{" s member-list s "}" / "{" s "$" s ":" s value s "}"
//! member-list   = member [ s "," [ s member-list ] ]
//! member        = name s ":" s value
//! selector      = DQUOTE name DQUOTE / "true" / "false" / 1*DIGIT
//! variant       = "&" name
//!
//! variant-def   = "&" name s "=" s value
//! resource-def  = "%%" s name s transaction
//! transaction   = "<<" s value / "<>" s value / "<x>" s value
//!               / "->" s value s "<-" s value
//! ```
//!
//! ## Design
//!
//! Each `parse_*` method tries its leading token. If the token is absent it
//! returns `Ok(None)` without consuming input, so the caller can try the next
//! alternative. Once the leading token is consumed the production is
//! committed, and any later violation is a fatal [`IdlError::Parse`] carrying
//! the byte offset of the failure.
//!
//! Keywords match by prefix in the order listed, with no lookahead: `integer`
//! reads as `int` followed by unparsed `eger`. The parser checks syntax only;
//! variant names are resolved when values are compared.

use tracing::debug;

use crate::definition::{ResourceDef, Transaction, VariantDef};
use crate::error::{IdlError, Result};
use crate::matcher::{Literal, MapShape, Matcher, TypeKind};
use crate::suite::Suite;

/// Maximum bracket nesting accepted in schema text.
const MAX_NESTING: usize = 256;

/// Parse a whole suite of variant and resource definitions.
///
/// # Errors
///
/// Returns [`IdlError::Parse`] for malformed text, including anything left
/// over that is not a definition.
pub fn parse_suite(text: &str) -> Result<Suite> {
    let mut parser = Parser::new(text);
    let suite = parser.parse_definitions()?;
    parser.expect_eof()?;
    debug!(
        variants = suite.variants().len(),
        resources = suite.resources().len(),
        "parsed schema suite"
    );
    Ok(suite)
}

/// Parse a single value matcher. Leading and trailing whitespace are not
/// skipped.
///
/// # Errors
///
/// Returns [`IdlError::Parse`] with `expected value` if the text does not
/// start with a value, or `expected end of input` if text follows it.
pub fn parse_value(text: &str) -> Result<Matcher> {
    let mut parser = Parser::new(text);
    let value = parser
        .parse_value()?
        .ok_or_else(|| parser.error("expected value"))?;
    parser.expect_eof()?;
    Ok(value)
}

/// Parse a single `&name = value` variant definition.
///
/// # Errors
///
/// Returns [`IdlError::Parse`] for malformed text or trailing input.
pub fn parse_variant_def(text: &str) -> Result<VariantDef> {
    let mut parser = Parser::new(text);
    let def = parser
        .parse_variant_def()?
        .ok_or_else(|| parser.error("expected variant definition"))?;
    parser.expect_eof()?;
    Ok(def)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn eof(&self) -> bool {
        self.pos == self.input.len()
    }

    fn error(&self, message: &str) -> IdlError {
        IdlError::Parse {
            message: message.to_string(),
            offset: self.pos,
        }
    }

    fn expect_eof(&self) -> Result<()> {
        if self.eof() {
            Ok(())
        } else {
            Err(self.error("expected end of input"))
        }
    }

    /// Consume `token` if the input starts with it.
    fn eat(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consume the first of `tokens` the input starts with.
    fn eat_any<T: Copy>(&mut self, tokens: &[(&str, T)]) -> Option<T> {
        let &(token, found) = tokens.iter().find(|(t, _)| self.rest().starts_with(t))?;
        self.pos += token.len();
        Some(found)
    }

    /// Consume a committed token, or fail with `message`.
    fn require(&mut self, token: &str, message: &str) -> Result<()> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    /// Consume a run of bytes satisfying `first` then `rest`.
    fn eat_while(&mut self, first: fn(u8) -> bool, rest: fn(u8) -> bool) -> Option<&'a str> {
        let bytes = self.rest().as_bytes();
        if !bytes.first().is_some_and(|&b| first(b)) {
            return None;
        }
        let len = 1 + bytes[1..].iter().take_while(|&&b| rest(b)).count();
        let start = self.pos;
        self.pos += len;
        Some(&self.input[start..self.pos])
    }

    fn nest(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING {
            return Err(self.error("schema nesting too deep"));
        }
        self.depth += 1;
        Ok(())
    }

    // ---- terminals ----

    fn parse_newline(&mut self) -> bool {
        self.eat("\r\n") || self.eat("\r") || self.eat("\n")
    }

    fn parse_comment(&mut self) -> Result<bool> {
        if !self.eat(";") {
            return Ok(false);
        }
        let len: usize = self
            .rest()
            .chars()
            .take_while(|&c| is_comment_char(c))
            .map(char::len_utf8)
            .sum();
        self.pos += len;
        if !self.parse_newline() {
            return Err(self.error("expected newline"));
        }
        Ok(true)
    }

    /// Skip whitespace and comments. Returns true if anything was consumed.
    fn parse_s(&mut self) -> Result<bool> {
        let start = self.pos;
        loop {
            if self.eat("\t") || self.parse_newline() || self.eat(" ") || self.parse_comment()? {
                continue;
            }
            break;
        }
        Ok(self.pos > start)
    }

    fn parse_name(&mut self) -> Option<&'a str> {
        self.eat_while(
            |b| b.is_ascii_alphabetic() || b == b'_',
            |b| b.is_ascii_alphanumeric() || b == b'_' || b == b'/',
        )
    }

    // ---- values ----

    fn parse_value(&mut self) -> Result<Option<Matcher>> {
        if let Some(kind) = self.parse_type() {
            return Ok(Some(Matcher::Type(kind)));
        }
        if let Some(array) = self.parse_array()? {
            return Ok(Some(array));
        }
        if let Some(map) = self.parse_map()? {
            return Ok(Some(map));
        }
        if let Some(literal) = self.parse_selector()? {
            return Ok(Some(Matcher::Selector(literal)));
        }
        Ok(self.parse_variant()?.map(Matcher::Variant))
    }

    fn parse_type(&mut self) -> Option<TypeKind> {
        let kind = *TypeKind::all()
            .iter()
            .find(|k| self.rest().starts_with(k.as_str()))?;
        self.pos += kind.as_str().len();
        Some(kind)
    }

    fn parse_array(&mut self) -> Result<Option<Matcher>> {
        if !self.eat("[") {
            return Ok(None);
        }
        self.nest()?;
        self.parse_s()?;

        let mut pattern = Vec::new();
        let mut next = self.parse_value()?;
        if next.is_none() {
            return Err(self.error("empty array"));
        }
        while let Some(value) = next.take() {
            pattern.push(value);
            self.parse_s()?;
            if !self.eat(",") {
                break;
            }
            self.parse_s()?;
            next = self.parse_value()?;
        }

        self.parse_s()?;
        let repeats = self.eat("...");
        self.parse_s()?;
        self.require("]", "expected close bracket")?;
        self.depth -= 1;
        Ok(Some(Matcher::Array { pattern, repeats }))
    }

    fn parse_map(&mut self) -> Result<Option<Matcher>> {
        if !self.eat("{") {
            return Ok(None);
        }
        self.nest()?;
        self.parse_s()?;

        let shape = if self.eat("$") {
            self.parse_s()?;
            self.require(":", "expected colon")?;
            self.parse_s()?;
            let value = self
                .parse_value()?
                .ok_or_else(|| self.error("expected value"))?;
            MapShape::Wildcard(Box::new(value))
        } else {
            let mut members: Vec<(String, Matcher)> = Vec::new();
            let mut next = self.parse_name();
            if next.is_none() {
                return Err(self.error("empty map"));
            }
            while let Some(name) = next.take() {
                self.parse_s()?;
                self.require(":", "expected colon")?;
                self.parse_s()?;
                let value = self
                    .parse_value()?
                    .ok_or_else(|| self.error("expected value"))?;
                match members.iter_mut().find(|(n, _)| n == name) {
                    Some((_, slot)) => *slot = value,
                    None => members.push((name.to_string(), value)),
                }

                self.parse_s()?;
                if !self.eat(",") {
                    break;
                }
                self.parse_s()?;
                next = self.parse_name();
            }
            MapShape::Members(members)
        };

        self.parse_s()?;
        self.require("}", "expected close bracket")?;
        self.depth -= 1;
        Ok(Some(Matcher::Map(shape)))
    }

    fn parse_selector(&mut self) -> Result<Option<Literal>> {
        if self.eat("\"") {
            let name = self
                .parse_name()
                .ok_or_else(|| self.error("expected name in quotes"))?;
            self.require("\"", "expected close quote")?;
            return Ok(Some(Literal::String(name.to_string())));
        }
        if let Some(b) = self.eat_any(&[("true", true), ("false", false)]) {
            return Ok(Some(Literal::Boolean(b)));
        }
        let start = self.pos;
        match self.eat_while(|b| b.is_ascii_digit(), |b| b.is_ascii_digit()) {
            Some(digits) => digits.parse().map(|n| Some(Literal::Integer(n))).map_err(|_| {
                IdlError::Parse {
                    message: "integer selector out of range".to_string(),
                    offset: start,
                }
            }),
            None => Ok(None),
        }
    }

    fn parse_variant(&mut self) -> Result<Option<String>> {
        if !self.eat("&") {
            return Ok(None);
        }
        let name = self
            .parse_name()
            .ok_or_else(|| self.error("expected variant name"))?;
        Ok(Some(name.to_string()))
    }

    // ---- definitions ----

    fn parse_variant_def(&mut self) -> Result<Option<VariantDef>> {
        let Some(name) = self.parse_variant()? else {
            return Ok(None);
        };
        self.parse_s()?;
        self.require("=", "expected equals sign")?;
        self.parse_s()?;
        let value = self
            .parse_value()?
            .ok_or_else(|| self.error("expected variant value"))?;
        Ok(Some(VariantDef::new(name, value)))
    }

    fn parse_resource_def(&mut self) -> Result<Option<ResourceDef>> {
        if !self.eat("%%") {
            return Ok(None);
        }
        self.parse_s()?;
        let name = self
            .parse_name()
            .ok_or_else(|| self.error("expected resource name"))?;
        self.parse_s()?;
        let transaction = self
            .parse_transaction()?
            .ok_or_else(|| self.error("expected transaction"))?;
        Ok(Some(ResourceDef::new(name, transaction)))
    }

    fn parse_transaction(&mut self) -> Result<Option<Transaction>> {
        const BODY: [(&str, fn(Matcher) -> Transaction); 3] = [
            ("<<", Transaction::Get),
            ("<>", Transaction::GetPut),
            ("<x>", Transaction::GetPutDel),
        ];
        if let Some(build) = self.eat_any(&BODY) {
            self.parse_s()?;
            let body = self.require_value()?;
            return Ok(Some(build(body)));
        }

        if !self.eat("->") {
            return Ok(None);
        }
        self.parse_s()?;
        let request = self.require_value()?;
        self.parse_s()?;
        self.require("<-", "expected res-response")?;
        self.parse_s()?;
        let response = self.require_value()?;
        Ok(Some(Transaction::Post { request, response }))
    }

    fn require_value(&mut self) -> Result<Matcher> {
        self.parse_value()?
            .ok_or_else(|| self.error("expected value"))
    }

    fn parse_definitions(&mut self) -> Result<Suite> {
        let mut suite = Suite::default();
        while !self.eof() {
            if self.parse_s()? {
                continue;
            }
            if let Some(def) = self.parse_variant_def()? {
                suite.push_variant(def);
                continue;
            }
            if let Some(def) = self.parse_resource_def()? {
                suite.insert_resource(def);
                continue;
            }
            break;
        }
        Ok(suite)
    }
}

/// Characters allowed inside a comment: tab and every non-control scalar
/// value except U+FFFE and U+FFFF.
fn is_comment_char(c: char) -> bool {
    matches!(c, '\t' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(result: Result<impl std::fmt::Debug>) -> (String, usize) {
        match result.unwrap_err() {
            IdlError::Parse { message, offset } => (message, offset),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_types() {
        for kind in TypeKind::all() {
            assert_eq!(parse_value(kind.as_str()).unwrap(), Matcher::Type(*kind));
        }
    }

    #[test]
    fn test_keyword_prefix_without_lookahead() {
        assert_eq!(err(parse_value("integer")), ("expected end of input".to_string(), 3));
    }

    #[test]
    fn test_array() {
        assert_eq!(
            parse_value("[ int , string ... ]").unwrap(),
            Matcher::Array {
                pattern: vec![Matcher::Type(TypeKind::Int), Matcher::Type(TypeKind::String)],
                repeats: true,
            }
        );
        assert_eq!(
            parse_value("[int,]").unwrap(),
            Matcher::Array {
                pattern: vec![Matcher::Type(TypeKind::Int)],
                repeats: false,
            }
        );
        assert_eq!(err(parse_value("[]")).0, "empty array");
        assert_eq!(err(parse_value("[int")).0, "expected close bracket");
        assert_eq!(err(parse_value("[int string]")).0, "expected close bracket");
    }

    #[test]
    fn test_map() {
        assert_eq!(
            parse_value("{ a : int, b: &v, }").unwrap(),
            Matcher::Map(MapShape::Members(vec![
                ("a".to_string(), Matcher::Type(TypeKind::Int)),
                ("b".to_string(), Matcher::Variant("v".to_string())),
            ]))
        );
        assert_eq!(
            parse_value("{ $ : bool }").unwrap(),
            Matcher::Map(MapShape::Wildcard(Box::new(Matcher::Type(TypeKind::Bool))))
        );
        assert_eq!(err(parse_value("{}")).0, "empty map");
        assert_eq!(err(parse_value("{a int}")).0, "expected colon");
        assert_eq!(err(parse_value("{$: }")).0, "expected value");
        assert_eq!(err(parse_value("{a: int")).0, "expected close bracket");
    }

    #[test]
    fn test_duplicate_member_replaces_in_place() {
        assert_eq!(
            parse_value("{a: int, b: bool, a: string}").unwrap(),
            Matcher::Map(MapShape::Members(vec![
                ("a".to_string(), Matcher::Type(TypeKind::String)),
                ("b".to_string(), Matcher::Type(TypeKind::Bool)),
            ]))
        );
    }

    #[test]
    fn test_selectors() {
        assert_eq!(
            parse_value("\"agent/id\"").unwrap(),
            Matcher::Selector(Literal::String("agent/id".to_string()))
        );
        assert_eq!(parse_value("true").unwrap(), Matcher::Selector(Literal::Boolean(true)));
        assert_eq!(parse_value("false").unwrap(), Matcher::Selector(Literal::Boolean(false)));
        assert_eq!(parse_value("007").unwrap(), Matcher::Selector(Literal::Integer(7)));
        assert_eq!(err(parse_value("\"\"")).0, "expected name in quotes");
        assert_eq!(err(parse_value("\"abc")).0, "expected close quote");
        assert_eq!(
            err(parse_value("99999999999")),
            ("integer selector out of range".to_string(), 0)
        );
    }

    #[test]
    fn test_variant_reference() {
        assert_eq!(parse_value("&a_b/c").unwrap(), Matcher::Variant("a_b/c".to_string()));
        assert_eq!(err(parse_value("&1")), ("expected variant name".to_string(), 1));
    }

    #[test]
    fn test_no_surrounding_whitespace() {
        assert_eq!(err(parse_value(" int")).0, "expected value");
        assert_eq!(err(parse_value("int ")).0, "expected end of input");
        assert_eq!(err(parse_value("")).0, "expected value");
    }

    #[test]
    fn test_comments() {
        let m = parse_value("[ ; a comment \u{1F600}\r\n int ]").unwrap();
        assert_eq!(
            m,
            Matcher::Array {
                pattern: vec![Matcher::Type(TypeKind::Int)],
                repeats: false,
            }
        );
        assert_eq!(err(parse_suite("; no newline")).0, "expected newline");
        assert_eq!(err(parse_suite("; bad \u{1} char\n")).0, "expected newline");
    }

    #[test]
    fn test_variant_def() {
        let def = parse_variant_def("&pos = [real, real, real]").unwrap();
        assert_eq!(def.name, "pos");
        assert_eq!(def.to_string(), "&pos = [real, real, real]");
        assert_eq!(err(parse_variant_def("&pos [real]")).0, "expected equals sign");
        assert_eq!(err(parse_variant_def("&pos = ")).0, "expected variant value");
        assert_eq!(err(parse_variant_def("int")).0, "expected variant definition");
    }

    #[test]
    fn test_resource_defs() {
        let suite = parse_suite(
            "%% get_it << int\n\
             %% put_it <> string\n\
             %% del_it <x> bool\n\
             %% post_it -> uri <- uuid\n",
        )
        .unwrap();
        let kinds: Vec<_> = ["get_it", "put_it", "del_it", "post_it"]
            .iter()
            .map(|n| suite.resource(n).unwrap().transaction.as_str())
            .collect();
        assert_eq!(kinds, ["get", "getput", "getputdel", "post"]);

        assert_eq!(err(parse_suite("%% 1")).0, "expected resource name");
        assert_eq!(err(parse_suite("%% r = int")).0, "expected transaction");
        assert_eq!(err(parse_suite("%% r -> int")).0, "expected res-response");
        assert_eq!(err(parse_suite("%% r << ")).0, "expected value");
    }

    #[test]
    fn test_suite_trailing_garbage() {
        let (message, offset) = err(parse_suite("&a = int\n!"));
        assert_eq!(message, "expected end of input");
        assert_eq!(offset, 9);
    }

    #[test]
    fn test_rendering_outside_grammar_does_not_parse() {
        let outside = [
            Matcher::Selector(Literal::String(String::new())),
            Matcher::Selector(Literal::String("two words".to_string())),
            Matcher::Selector(Literal::Integer(-1)),
            Matcher::Array {
                pattern: vec![],
                repeats: false,
            },
            Matcher::Map(MapShape::Members(vec![])),
        ];
        for m in outside {
            let text = m.to_string();
            assert!(parse_value(&text).is_err(), "{text:?} should not parse");
        }

        let parsed = parse_value("{a: [int, \"x\"...], b: {$: 0}}").unwrap();
        assert_eq!(parse_value(&parsed.to_string()).unwrap(), parsed);
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}int{}", "[".repeat(300), "]".repeat(300));
        assert_eq!(err(parse_value(&deep)).0, "schema nesting too deep");
        let ok = format!("{}int{}", "[".repeat(100), "]".repeat(100));
        assert!(parse_value(&ok).is_ok());
    }
}
