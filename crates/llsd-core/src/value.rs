//! # Value Model — The LLSD Tagged Union
//!
//! [`Value`] is the single representation of LLSD data. Every serializer,
//! conversion, and schema comparison dispatches on it with an exhaustive
//! `match`, so adding a kind forces every consumer to handle it at compile
//! time.
//!
//! Values are immutable once built. Conversions (see [`crate::convert`])
//! return new values and never mutate.
//!
//! ## Maps
//!
//! [`Map`] keeps insertion order for serialization. Keys are unique:
//! inserting an existing key replaces its value in place. Equality ignores
//! order.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::binary::Binary;
use crate::uri::Uri;

/// Smallest LLSD integer.
pub const MIN_INTEGER: i32 = i32::MIN;

/// Largest LLSD integer.
pub const MAX_INTEGER: i32 = i32::MAX;

/// One LLSD datum.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent data.
    #[default]
    Undefined,
    /// `true` or `false`.
    Boolean(bool),
    /// 32-bit signed integer.
    Integer(i32),
    /// IEEE-754 double, including NaN, infinities and negative zero.
    Real(f64),
    /// Unicode text.
    String(String),
    /// 128-bit identifier.
    Uuid(Uuid),
    /// UTC instant at millisecond resolution.
    Date(DateTime<Utc>),
    /// Validated URI text.
    Uri(Uri),
    /// Octet sequence.
    Binary(Binary),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// String-keyed values.
    Map(Map),
}

/// The kind of a [`Value`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// [`Value::Undefined`].
    Undefined,
    /// [`Value::Boolean`].
    Boolean,
    /// [`Value::Integer`].
    Integer,
    /// [`Value::Real`].
    Real,
    /// [`Value::String`].
    String,
    /// [`Value::Uuid`].
    Uuid,
    /// [`Value::Date`].
    Date,
    /// [`Value::Uri`].
    Uri,
    /// [`Value::Binary`].
    Binary,
    /// [`Value::Array`].
    Array,
    /// [`Value::Map`].
    Map,
}

impl ValueKind {
    /// All value kinds, in tag order.
    pub fn all() -> &'static [ValueKind] {
        &[
            Self::Undefined,
            Self::Boolean,
            Self::Integer,
            Self::Real,
            Self::String,
            Self::Uuid,
            Self::Date,
            Self::Uri,
            Self::Binary,
            Self::Array,
            Self::Map,
        ]
    }

    /// Lowercase kind name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::String => "string",
            Self::Uuid => "uuid",
            Self::Date => "date",
            Self::Uri => "uri",
            Self::Binary => "binary",
            Self::Array => "array",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    /// The kind discriminator.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Undefined => ValueKind::Undefined,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Integer(_) => ValueKind::Integer,
            Self::Real(_) => ValueKind::Real,
            Self::String(_) => ValueKind::String,
            Self::Uuid(_) => ValueKind::Uuid,
            Self::Date(_) => ValueKind::Date,
            Self::Uri(_) => ValueKind::Uri,
            Self::Binary(_) => ValueKind::Binary,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
        }
    }

    /// Returns true for [`Value::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Borrow the elements if this is an array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the map if this is a map.
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the text if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a map member. `None` for missing keys and non-maps.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Real(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl From<Uri> for Value {
    fn from(u: Uri) -> Self {
        Self::Uri(u)
    }
}

impl From<Binary> for Value {
    fn from(b: Binary) -> Self {
        Self::Binary(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Map(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Undefined, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}

/// An insertion-ordered map with unique string keys.
///
/// Members live in a `Vec` in insertion order; a key-to-position index keeps
/// lookups and inserts constant-time, so decoding an n-member map is linear.
#[derive(Debug, Clone, Default)]
pub struct Map {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl Map {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a member. An existing key keeps its position and has its value
    /// replaced; the previous value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key).copied() {
            Some(pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Look up a member.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let &pos = self.index.get(key)?;
        Some(&self.entries[pos].1)
    }

    /// Look up a member for modification.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        let &pos = self.index.get(key)?;
        Some(&mut self.entries[pos].1)
    }

    /// Returns true if `key` is present, even when its value is Undefined.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Remove a member, preserving the order of the rest.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.index.remove(key)?;
        let (_, value) = self.entries.remove(pos);
        for (k, _) in &self.entries[pos..] {
            if let Some(slot) = self.index.get_mut(k) {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no members.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for Map {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, v)| other.get(k).is_some_and(|ov| ov == v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
