//! Iterating functions and the adapters that build them.
//!
//! An iterating function is the pull primitive every [`Iter`](crate::Iter)
//! wraps: each call returns `Ok(Some(value))` while values remain and
//! `Ok(None)` once they are gone, on that call and every call after it.
//! The adapters below turn collections, maps, single values, nested
//! iterables and byte readers into that shape.

pub mod collection;
pub mod nested;
pub mod reader;

use crate::error::IterResult;
use crate::value::Value;

/// The pull primitive wrapped by an iterator.
pub type IterFn = Box<dyn FnMut() -> IterResult<Option<Value>>>;

pub use collection::{
    array_iter_fn, elements_iter_fn, map_iter_fn, no_value_iter_fn, single_value_iter_fn,
    vec_iter_fn,
};
pub use nested::{iter_iter_fn, iterables_iter_fn};
pub use reader::{reader_iter_fn, reader_lines_iter_fn, reader_runes_iter_fn, UTF8_MAX_WIDTH};
