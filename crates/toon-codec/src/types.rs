//! TOON value model.
//!
//! A TOON document is one level deep: every top-level key holds a scalar, a
//! list of scalars, or a table (a list of flat records). The types below make
//! deeper nesting unrepresentable instead of rejecting it at encode time.

use std::fmt;

/// A single TOON scalar. TOON has no null and no floats.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Bool(bool),
    Integer(i64),
    Str(String),
}

impl Scalar {
    /// Borrow the string payload, if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Scalar::Integer(n) => Some(*n),
            _ => None,
        }
    }
}

/// Human-readable rendering, without TOON quoting. Booleans render as
/// `true`/`false` here; the encoder uses its own single-character tokens.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Integer(n) => write!(f, "{n}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Integer(n)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

/// The value held by a top-level document key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToonValue {
    Scalar(Scalar),
    /// Encoded as `key[N]: a|b|c`.
    List(Vec<Scalar>),
    /// Encoded as `key[N]{f1,f2}:` followed by one row per record.
    Table(Vec<Row>),
}

impl ToonValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            ToonValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            ToonValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&[Row]> {
        match self {
            ToonValue::Table(rows) => Some(rows),
            _ => None,
        }
    }
}

impl From<Scalar> for ToonValue {
    fn from(value: Scalar) -> Self {
        ToonValue::Scalar(value)
    }
}

impl From<bool> for ToonValue {
    fn from(b: bool) -> Self {
        ToonValue::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for ToonValue {
    fn from(n: i64) -> Self {
        ToonValue::Scalar(Scalar::Integer(n))
    }
}

impl From<&str> for ToonValue {
    fn from(s: &str) -> Self {
        ToonValue::Scalar(Scalar::from(s))
    }
}

impl From<String> for ToonValue {
    fn from(s: String) -> Self {
        ToonValue::Scalar(Scalar::Str(s))
    }
}

impl From<Vec<Scalar>> for ToonValue {
    fn from(items: Vec<Scalar>) -> Self {
        ToonValue::List(items)
    }
}

impl From<Vec<Row>> for ToonValue {
    fn from(rows: Vec<Row>) -> Self {
        ToonValue::Table(rows)
    }
}

/// Insertion-ordered map with last-write-wins inserts.
///
/// Keys are few (tens at most), so lookups scan linearly. Re-inserting an
/// existing key replaces its value in place and keeps the original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fields<V> {
    entries: Vec<(String, V)>,
}

/// A top-level TOON document.
pub type Document = Fields<ToonValue>;

/// One record inside a table.
pub type Row = Fields<Scalar>;

impl<V> Fields<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert or replace. Returns the previous value when the key existed.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for Fields<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for Fields<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl<V> IntoIterator for Fields<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
