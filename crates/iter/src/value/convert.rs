//! Conversions from [`Value`] into Rust types.
//!
//! Numeric targets accept any numeric source and cast it the way `as` does:
//! narrowing wraps, float to integer truncates and saturates. Other targets
//! are strict.

use crate::error::{IterError, IterResult};
use crate::value::key_value::KeyValue;
use crate::value::value::Value;
use num_traits::AsPrimitive;

/// A type that can be produced from a [`Value`] by a typed read.
pub trait FromValue: Sized {
    /// Converts the value, failing with [`IterError::Conversion`] when the
    /// value has no representation in `Self`.
    fn from_value(value: Value) -> IterResult<Self>;
}

macro_rules! impl_from_value_for_number {
    ($($ty:ty),+) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> IterResult<Self> {
                    match value {
                        Value::Byte(b) => Ok(AsPrimitive::<$ty>::as_(b)),
                        Value::Char(c) => Ok(AsPrimitive::<$ty>::as_(c as u32)),
                        Value::Int(i) => Ok(AsPrimitive::<$ty>::as_(i)),
                        Value::Uint(u) => Ok(AsPrimitive::<$ty>::as_(u)),
                        Value::Float(f) => Ok(AsPrimitive::<$ty>::as_(f)),
                        other => Err(IterError::conversion(other.value_type(), stringify!($ty))),
                    }
                }
            }
        )+
    };
}

impl_from_value_for_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl FromValue for bool {
    fn from_value(value: Value) -> IterResult<Self> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(IterError::conversion(other.value_type(), "bool")),
        }
    }
}

impl FromValue for char {
    fn from_value(value: Value) -> IterResult<Self> {
        let value_type = value.value_type();
        let c = match value {
            Value::Char(c) => Some(c),
            Value::Byte(b) => Some(char::from(b)),
            Value::Int(i) => u32::try_from(i).ok().and_then(char::from_u32),
            Value::Uint(u) => u32::try_from(u).ok().and_then(char::from_u32),
            _ => None,
        };

        c.ok_or_else(|| IterError::conversion(value_type, "char"))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> IterResult<Self> {
        let value_type = value.value_type();
        match value {
            Value::String(s) => Ok(s),
            Value::Char(c) => Ok(c.to_string()),
            Value::Array(items) => string_from_items(items)
                .ok_or_else(|| IterError::conversion(value_type, "String")),
            _ => Err(IterError::conversion(value_type, "String")),
        }
    }
}

// An array converts to a string when it is all bytes forming valid UTF-8, or all chars.
fn string_from_items(items: Vec<Value>) -> Option<String> {
    match items.first() {
        None => Some(String::new()),
        Some(Value::Byte(_)) => {
            let bytes = items
                .into_iter()
                .map(|item| match item {
                    Value::Byte(b) => Some(b),
                    _ => None,
                })
                .collect::<Option<Vec<u8>>>()?;
            String::from_utf8(bytes).ok()
        }
        Some(Value::Char(_)) => items
            .into_iter()
            .map(|item| match item {
                Value::Char(c) => Some(c),
                _ => None,
            })
            .collect(),
        Some(_) => None,
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> IterResult<Self> {
        Ok(value)
    }
}

impl FromValue for KeyValue {
    fn from_value(value: Value) -> IterResult<Self> {
        match value {
            Value::KeyValue(kv) => Ok(*kv),
            other => Err(IterError::conversion(other.value_type(), "KeyValue")),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> IterResult<Self> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(IterError::conversion(other.value_type(), "Vec")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> IterResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
