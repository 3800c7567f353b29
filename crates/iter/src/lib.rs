//! # Pull Iterators
//!
//! A pull-based iterator over dynamically typed values.
//!
//! Everything is built around one primitive, the iterating function: a
//! closure that returns the next value until it returns nothing. [`Iter`]
//! wraps such a function with exhaustion tracking, an unread buffer and
//! typed accessors. Adapters turn collections, maps, single values, byte
//! readers and nested iterables into iterating functions.
//!
//! ## Features
//!
//! - **Uniform protocol**: `next` advances, `value` reads once, `unread` pushes back
//! - **Adapters**: arrays, maps, single values, nested iterables, bytes, UTF-8 characters and lines
//! - **Typed reads**: conversion of each value to a primitive with `as` cast semantics
//! - **Chunking**: splitting a stream into rows of fixed width or a fixed number of rows
//! - **Flattening**: arrays of any depth read as one dimension
//! - **Re-iterable sources**: [`Generator`] builds a fresh iterator per call
//!
//! ## Architecture
//!
//! - **Value**: the tagged union every iterator yields
//! - **adapters**: the iterating functions for each input shape
//! - **Iter**: the state machine on top of an iterating function
//! - **Iterable**: the capability of producing an iterator
//!
//! Misuse of an iterator, such as reading a value twice or advancing past
//! the end, returns an [`IterError`]; it never panics.
//!
//! ## Example
//!
//! ```rust
//! use pull_iter::{values, Iter, IterResult};
//!
//! # fn example() -> IterResult<()> {
//! let mut iter = Iter::of_flatten(values![1, [2, 3], [4]])?;
//! let mut sum = 0;
//! while iter.next()? {
//!     sum += iter.i64_value()?;
//! }
//! assert_eq!(sum, 10);
//!
//! let rows = Iter::of(1..=5).split_into_rows_of::<i32>(2)?;
//! assert_eq!(rows, vec![vec![1, 2], vec![3, 4], vec![5]]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod adapters;
pub mod error;
pub mod flatten;
pub mod iter;
pub mod iterable;
pub mod rune_position;
pub mod value;

pub use adapters::{
    array_iter_fn, elements_iter_fn, iter_iter_fn, iterables_iter_fn, map_iter_fn,
    no_value_iter_fn, reader_iter_fn, reader_lines_iter_fn, reader_runes_iter_fn,
    single_value_iter_fn, vec_iter_fn, IterFn, UTF8_MAX_WIDTH,
};
pub use error::{IterError, IterResult};
pub use flatten::{flatten, flatten_as};
pub use iter::{Iter, Values};
pub use iterable::{Generator, Iterable};
pub use rune_position::RunePositionIter;
pub use value::{FromValue, KeyValue, Value, ValueType};
