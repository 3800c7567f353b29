//! Key/value pairs produced when iterating a map.

use crate::value::Value;
use std::fmt;

/// One entry of a map, yielded by the map adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyValue {
    pub key: Value,
    pub value: Value,
}

impl KeyValue {
    /// Creates a new pair.
    pub fn new(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Splits the pair into its key and value.
    pub fn into_parts(self) -> (Value, Value) {
        (self.key, self.value)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

impl<K: Into<Value>, V: Into<Value>> From<(K, V)> for KeyValue {
    fn from((key, value): (K, V)) -> Self {
        Self::new(key, value)
    }
}
