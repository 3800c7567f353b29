//! Flattening of nested arrays.

use crate::error::{IterError, IterResult};
use crate::value::{FromValue, Value};

/// Flattens an array of any depth into one dimension.
///
/// Elements are visited depth first, left to right. Anything that is not an
/// array is a leaf, so arrays may mix scalars and sub-arrays at any level:
/// `[1, [2, 3], [[4, 5], [6, 7, 8]]]` becomes `[1, 2, 3, 4, 5, 6, 7, 8]`.
pub fn flatten(value: Value) -> IterResult<Vec<Value>> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            log::debug!("flatten given a {} value", other.value_type());
            return Err(IterError::NotFlattenable);
        }
    };

    let mut result = Vec::with_capacity(items.len());
    flatten_into(items, &mut result);
    Ok(result)
}

/// Flattens an array like [`flatten`], converting each leaf to `T`.
pub fn flatten_as<T: FromValue>(value: Value) -> IterResult<Vec<T>> {
    flatten(value)?.into_iter().map(T::from_value).collect()
}

fn flatten_into(items: Vec<Value>, result: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(nested) => flatten_into(nested, result),
            leaf => result.push(leaf),
        }
    }
}
