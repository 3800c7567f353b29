//! Value implementation.
//!
//! This module provides the dynamic value type handed out by every iterator.

use crate::error::{IterError, IterResult};
use crate::iter::Iter;
use crate::iterable::{Generator, Iterable};
use crate::value::convert::FromValue;
use crate::value::key_value::KeyValue;
use crate::value::value_type::ValueType;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Represents one element produced by an iterator.
#[derive(Clone, Default)]
pub enum Value {
    /// Represents an absent value.
    #[default]
    Null,

    /// Represents a boolean value.
    Bool(bool),

    /// Represents a single byte, as produced by the byte reader adapter.
    Byte(u8),

    /// Represents a unicode scalar value, as produced by the rune reader adapter.
    Char(char),

    /// Represents a signed integer.
    Int(i64),

    /// Represents an unsigned integer.
    Uint(u64),

    /// Represents a floating point number.
    Float(f64),

    /// Represents a string.
    String(String),

    /// Represents an ordered sequence of values.
    Array(Vec<Value>),

    /// Represents a mapping of keys to values.
    Map(IndexMap<Value, Value>),

    /// Represents one entry of a map.
    KeyValue(Box<KeyValue>),

    /// Represents a source that can produce an iterator.
    Iterable(Rc<dyn Iterable>),
}

impl Value {
    /// Returns the type of the value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Null => ValueType::Null,
            Value::Bool(_) => ValueType::Bool,
            Value::Byte(_) => ValueType::Byte,
            Value::Char(_) => ValueType::Char,
            Value::Int(_) => ValueType::Int,
            Value::Uint(_) => ValueType::Uint,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Array(_) => ValueType::Array,
            Value::Map(_) => ValueType::Map,
            Value::KeyValue(_) => ValueType::KeyValue,
            Value::Iterable(_) => ValueType::Iterable,
        }
    }

    /// Returns true if the value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if the value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// Gets the elements of an array value.
    pub fn as_array(&self) -> IterResult<&[Value]> {
        match self {
            Value::Array(items) => Ok(items),
            other => Err(IterError::conversion(other.value_type(), "Array")),
        }
    }

    /// Gets the entries of a map value.
    pub fn as_map(&self) -> IterResult<&IndexMap<Value, Value>> {
        match self {
            Value::Map(map) => Ok(map),
            other => Err(IterError::conversion(other.value_type(), "Map")),
        }
    }

    /// Gets the pair held by a key/value value.
    pub fn as_key_value(&self) -> IterResult<&KeyValue> {
        match self {
            Value::KeyValue(kv) => Ok(kv),
            other => Err(IterError::conversion(other.value_type(), "KeyValue")),
        }
    }

    /// Gets the contents of a string value.
    pub fn as_str(&self) -> IterResult<&str> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(IterError::conversion(other.value_type(), "String")),
        }
    }

    /// Converts the value into a value of the given type.
    ///
    /// A value already of the target type is returned unchanged. Scalars are
    /// coerced following the rules of [`FromValue`]; compound types only
    /// convert to themselves.
    pub fn convert_to(&self, target: ValueType) -> IterResult<Value> {
        if target == ValueType::Null {
            return Err(IterError::NullTargetType);
        }

        if self.value_type() == target {
            return Ok(self.clone());
        }

        let value = self.clone();
        match target {
            ValueType::Bool => bool::from_value(value).map(Value::Bool),
            ValueType::Byte => u8::from_value(value).map(Value::Byte),
            ValueType::Char => char::from_value(value).map(Value::Char),
            ValueType::Int => i64::from_value(value).map(Value::Int),
            ValueType::Uint => u64::from_value(value).map(Value::Uint),
            ValueType::Float => f64::from_value(value).map(Value::Float),
            ValueType::String => String::from_value(value).map(Value::String),
            _ => Err(IterError::conversion(self.value_type(), target.name())),
        }
    }

    /// Converts the value into a Rust type.
    pub fn into_typed<T: FromValue>(self) -> IterResult<T> {
        T::from_value(self)
    }

    fn iterable_addr(iterable: &Rc<dyn Iterable>) -> *const () {
        Rc::as_ptr(iterable) as *const ()
    }
}

// Floats compare by bit pattern so that equality agrees with hashing.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::KeyValue(a), Value::KeyValue(b)) => a == b,
            (Value::Iterable(a), Value::Iterable(b)) => {
                Self::iterable_addr(a) == Self::iterable_addr(b)
            }
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Byte(b) => b.hash(state),
            Value::Char(c) => c.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Uint(u) => u.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Array(items) => items.hash(state),
            // Map equality ignores order, so only the size takes part.
            Value::Map(map) => map.len().hash(state),
            Value::KeyValue(kv) => kv.hash(state),
            Value::Iterable(iterable) => Self::iterable_addr(iterable).hash(state),
        }
    }
}

// Iterables print as an address; an iterator may hold a handle to itself.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Byte(b) => f.debug_tuple("Byte").field(b).finish(),
            Value::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Array(items) => f.debug_tuple("Array").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::KeyValue(kv) => f.debug_tuple("KeyValue").field(kv).finish(),
            Value::Iterable(iterable) => f
                .debug_tuple("Iterable")
                .field(&Self::iterable_addr(iterable))
                .finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Byte(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Uint(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::KeyValue(kv) => write!(f, "{kv}"),
            Value::Iterable(_) => f.write_str("<iterable>"),
        }
    }
}

macro_rules! impl_from_for_value {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )+
    };
}

impl_from_for_value!(Int as i64: i8, i16, i32, i64, isize);
impl_from_for_value!(Uint as u64: u16, u32, u64, usize);
impl_from_for_value!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Byte(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(items: [T; N]) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Clone + Into<Value>> From<&[T]> for Value {
    fn from(items: &[T]) -> Self {
        Value::Array(items.iter().cloned().map(Into::into).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<IndexMap<K, V>> for Value {
    fn from(map: IndexMap<K, V>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<HashMap<K, V>> for Value {
    fn from(map: HashMap<K, V>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<Value>, V: Into<Value>> From<BTreeMap<K, V>> for Value {
    fn from(map: BTreeMap<K, V>) -> Self {
        Value::Map(map.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<KeyValue> for Value {
    fn from(kv: KeyValue) -> Self {
        Value::KeyValue(Box::new(kv))
    }
}

impl From<Rc<dyn Iterable>> for Value {
    fn from(iterable: Rc<dyn Iterable>) -> Self {
        Value::Iterable(iterable)
    }
}

impl From<Iter> for Value {
    fn from(iter: Iter) -> Self {
        Value::Iterable(Rc::new(iter))
    }
}

impl From<Generator> for Value {
    fn from(generator: Generator) -> Self {
        Value::Iterable(Rc::new(generator))
    }
}
