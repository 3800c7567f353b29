//! Value type tags.

use std::fmt;

/// The variant of a [`Value`](crate::Value), without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Null,
    Bool,
    Byte,
    Char,
    Int,
    Uint,
    Float,
    String,
    Array,
    Map,
    KeyValue,
    Iterable,
}

impl ValueType {
    /// Returns the type name used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Null => "Null",
            ValueType::Bool => "Bool",
            ValueType::Byte => "Byte",
            ValueType::Char => "Char",
            ValueType::Int => "Int",
            ValueType::Uint => "Uint",
            ValueType::Float => "Float",
            ValueType::String => "String",
            ValueType::Array => "Array",
            ValueType::Map => "Map",
            ValueType::KeyValue => "KeyValue",
            ValueType::Iterable => "Iterable",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
