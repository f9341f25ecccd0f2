//! # PDF Object IR
//!
//! The closed vocabulary the binary encoder understands. The assembler turns
//! a [`crate::model::Document`] into a flat list of [`Object`]s built from
//! these values; nothing downstream of the assembler sees the builder types.

/// Identifier of an indirect object. Dense and 1-based within a file.
pub type ObjectId = u32;

/// A direct PDF value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<id> 0 R`
    Reference(ObjectId),
    /// `/Name`, written without escaping; callers supply valid names.
    Name(String),
    /// `(literal)`, written without escaping.
    String(String),
    Float(f64),
    Int(i64),
    Bool(bool),
    Null,
    Array(Vec<Value>),
    Dictionary(Dictionary),
}

impl Value {
    pub fn name(name: impl Into<String>) -> Self {
        Value::Name(name.into())
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

impl From<Dictionary> for Value {
    fn from(v: Dictionary) -> Self {
        Value::Dictionary(v)
    }
}

/// An insertion-ordered dictionary.
///
/// Order is kept so output is deterministic. Keys are unique: setting an
/// existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Vec<(String, Value)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy with `key` set to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(key.into(), value.into());
        self
    }

    fn set(&mut self, key: String, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Return a copy with `key` moved to the front and set to `value`.
    pub fn with_front(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push((key.clone(), value.into()));
        entries.extend(self.entries.into_iter().filter(|(k, _)| *k != key));
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Dictionary::new(), |dict, (k, v)| dict.with(k, v))
    }
}

/// An indirect object: a numbered dictionary with an optional stream.
///
/// Stream objects never carry their own `/Length`; the writer derives it
/// from the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    pub id: ObjectId,
    pub dict: Dictionary,
    pub stream: Option<Vec<u8>>,
}

impl Object {
    pub fn new(id: ObjectId, dict: Dictionary) -> Self {
        Self {
            id,
            dict,
            stream: None,
        }
    }

    pub fn with_stream(id: ObjectId, dict: Dictionary, stream: Vec<u8>) -> Self {
        Self {
            id,
            dict,
            stream: Some(stream),
        }
    }
}

/// Render a number the short way: integers without a decimal point,
/// everything else in full decimal form (never exponent notation).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() || value == 0.0 {
        // PDF has no NaN/infinity; also folds -0 into 0
        return "0".to_string();
    }
    value.to_string()
}
