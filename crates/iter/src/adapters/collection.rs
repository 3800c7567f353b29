//! Adapters over in-memory values: arrays, maps, single values and nothing.

use crate::adapters::nested::iter_iter_fn;
use crate::adapters::IterFn;
use crate::error::{IterError, IterResult};
use crate::value::{KeyValue, Value};
use indexmap::IndexMap;

/// Iterates the elements of a vector in index order.
pub fn vec_iter_fn(items: Vec<Value>) -> IterFn {
    let mut items = items.into_iter();
    Box::new(move || Ok(items.next()))
}

/// Iterates the outermost dimension of an array value.
///
/// A nested array is yielded as one element, not unpacked.
pub fn array_iter_fn(value: Value) -> IterResult<IterFn> {
    match value {
        Value::Array(items) => Ok(vec_iter_fn(items)),
        other => {
            log::debug!("array adapter given a {} value", other.value_type());
            Err(IterError::NotAnArray)
        }
    }
}

/// Iterates the entries of a map value, one [`KeyValue`] per call.
///
/// Entry order is not part of the contract.
pub fn map_iter_fn(value: Value) -> IterResult<IterFn> {
    match value {
        Value::Map(map) => Ok(map_entries_iter_fn(map)),
        other => {
            log::debug!("map adapter given a {} value", other.value_type());
            Err(IterError::NotAMap)
        }
    }
}

fn map_entries_iter_fn(map: IndexMap<Value, Value>) -> IterFn {
    let mut entries = map.into_iter();
    Box::new(move || Ok(entries.next().map(|(key, value)| KeyValue { key, value }.into())))
}

/// Returns an iterating function that never yields.
pub fn no_value_iter_fn() -> IterFn {
    Box::new(|| Ok(None))
}

/// Yields the given value once. Collections are not unpacked.
pub fn single_value_iter_fn(value: Value) -> IterFn {
    let mut value = Some(value);
    Box::new(move || Ok(value.take()))
}

/// Iterates the elements of an arbitrary value.
///
/// The shape is resolved once, here, not on every pull:
/// - `Array`: each element, see [`array_iter_fn`]
/// - `Map`: each entry, see [`map_iter_fn`]
/// - `Null`: nothing
/// - `Iterable`: the values of the iterator it produces
/// - anything else: the value itself, once
pub fn elements_iter_fn(value: Value) -> IterFn {
    match value {
        Value::Array(items) => vec_iter_fn(items),
        Value::Map(map) => map_entries_iter_fn(map),
        Value::Null => no_value_iter_fn(),
        Value::Iterable(source) => iter_iter_fn(source.iter()),
        other => single_value_iter_fn(other),
    }
}
