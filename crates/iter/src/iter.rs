//! The iterator state machine.
//!
//! An [`Iter`] wraps one iterating function and moves through four states:
//!
//! - **Fresh**: constructed, `next` not yet called, no value available
//! - **Positioned**: the last `next` returned true, the value is unread
//! - **Consumed**: the value was read, `next` must be called again
//! - **Exhausted**: `next` returned false; every further call fails
//!
//! Values pushed back with [`Iter::unread`] are delivered last in, first
//! out, ahead of anything the iterating function still has to give.

use crate::adapters::{
    array_iter_fn, elements_iter_fn, map_iter_fn, no_value_iter_fn, reader_iter_fn,
    reader_lines_iter_fn, reader_runes_iter_fn, vec_iter_fn, IterFn,
};
use crate::error::{IterError, IterResult};
use crate::flatten::flatten;
use crate::iterable::Iterable;
use crate::value::{FromValue, Value, ValueType};
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::io::Read;
use std::rc::Rc;

/// An iterator of values of arbitrary type.
///
/// Technically the values may all have different types, though streams
/// usually hold one. An `Iter` is a single-use handle: it is drained once and
/// cannot be reset. Asking an `Iter` for its [`Iterable::iter`] returns a
/// handle to the same iterator, not a copy.
pub struct Iter {
    state: Rc<RefCell<IterState>>,
}

struct IterState {
    /// `None` once the iterator is exhausted.
    iter_fn: Option<IterFn>,
    /// The value produced by the last `next`, until it is read.
    current: Option<Value>,
    /// Unread values, top of the stack last.
    buffer: Vec<Value>,
}

macro_rules! typed_accessors {
    ($($name:ident => $ty:ident),+ $(,)?) => {
        paste::paste! {
            $(
                #[doc = "Reads the value and converts it to `" $ty "`."]
                pub fn [<$name _value>](&mut self) -> IterResult<$ty> {
                    self.value_as::<$ty>()
                }

                #[doc = "Advances and reads the next value as `" $ty "`, for when another value is known to exist."]
                pub fn [<next_ $name _value>](&mut self) -> IterResult<$ty> {
                    self.next_value_as::<$ty>()
                }
            )+
        }
    };
}

impl Iter {
    /// Creates an iterator from an iterating function.
    ///
    /// The function must return `Ok(Some(item))` for every item available,
    /// then `Ok(None)`. Once it has returned `Ok(None)` it is never called
    /// again.
    pub fn new(iter_fn: IterFn) -> Self {
        Self {
            state: Rc::new(RefCell::new(IterState {
                iter_fn: Some(iter_fn),
                current: None,
                buffer: Vec::new(),
            })),
        }
    }

    /// Creates an iterator from a closure following the iterating function contract.
    pub fn from_fn<F>(iter_fn: F) -> Self
    where
        F: FnMut() -> IterResult<Option<Value>> + 'static,
    {
        Self::new(Box::new(iter_fn))
    }

    /// Creates an iterator that has no values.
    pub fn empty() -> Self {
        Self::new(no_value_iter_fn())
    }

    /// Creates an iterator over the items given.
    ///
    /// Each item is one value: an array, map or iterable item is yielded
    /// whole, not unpacked.
    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
        I::IntoIter: 'static,
    {
        let mut items = items.into_iter().fuse();
        Self::from_fn(move || Ok(items.next().map(Into::into)))
    }

    /// Creates an iterator over the outermost dimension of an array value.
    pub fn of_array(value: impl Into<Value>) -> IterResult<Self> {
        array_iter_fn(value.into()).map(Self::new)
    }

    /// Creates an iterator over the entries of a map value.
    pub fn of_map(value: impl Into<Value>) -> IterResult<Self> {
        map_iter_fn(value.into()).map(Self::new)
    }

    /// Creates an iterator over an array of any depth flattened into one dimension.
    ///
    /// A null value gives an empty iterator. See [`flatten`].
    pub fn of_flatten(value: impl Into<Value>) -> IterResult<Self> {
        match value.into() {
            Value::Null => Ok(Self::empty()),
            value => Ok(Self::new(vec_iter_fn(flatten(value)?))),
        }
    }

    /// Creates an iterator over the elements of a value.
    ///
    /// See [`elements_iter_fn`] for how each shape is handled.
    pub fn of_elements(value: impl Into<Value>) -> Self {
        Self::new(elements_iter_fn(value.into()))
    }

    /// Creates an iterator over the bytes of a reader.
    pub fn of_reader<R: Read + 'static>(src: R) -> Self {
        Self::new(reader_iter_fn(src))
    }

    /// Creates an iterator over the UTF-8 characters of a reader.
    pub fn of_reader_runes<R: Read + 'static>(src: R) -> Self {
        Self::new(reader_runes_iter_fn(src))
    }

    /// Creates an iterator over the lines of a reader.
    pub fn of_reader_lines<R: Read + 'static>(src: R) -> Self {
        Self::new(reader_lines_iter_fn(src))
    }

    fn state(&self) -> IterResult<RefMut<'_, IterState>> {
        self.state.try_borrow_mut().map_err(|_| {
            log::debug!("iterator used while it is being advanced");
            IterError::Reentrant
        })
    }

    /// Returns true once `next` has returned false.
    pub fn is_exhausted(&self) -> bool {
        self.state
            .try_borrow()
            .map_or(false, |state| state.iter_fn.is_none())
    }

    /// Returns true if both handles refer to the same iterator.
    pub fn ptr_eq(&self, other: &Iter) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    /// Advances to the next value, returning true if there is one to read.
    ///
    /// Unread values come first. Once this returns false the iterator is
    /// exhausted, and calling it again is an error.
    pub fn next(&mut self) -> IterResult<bool> {
        let mut guard = self.state()?;
        let state = &mut *guard;

        let Some(iter_fn) = state.iter_fn.as_mut() else {
            log::debug!("{}", IterError::NextOnExhausted);
            return Err(IterError::NextOnExhausted);
        };

        if let Some(value) = state.buffer.pop() {
            state.current = Some(value);
            return Ok(true);
        }

        match iter_fn()? {
            Some(value) => {
                state.current = Some(value);
                Ok(true)
            }
            None => {
                log::trace!("iterator exhausted");
                state.iter_fn = None;
                state.current = None;
                Ok(false)
            }
        }
    }

    /// Reads the value produced by the last call to `next`.
    ///
    /// Fails if the iterator is exhausted, or if `next` has not been called
    /// since the last read.
    pub fn value(&mut self) -> IterResult<Value> {
        let mut state = self.state()?;

        if state.iter_fn.is_none() {
            log::debug!("{}", IterError::ValueOnExhausted);
            return Err(IterError::ValueOnExhausted);
        }

        state.current.take().ok_or_else(|| {
            log::debug!("{}", IterError::ValueBeforeNext);
            IterError::ValueBeforeNext
        })
    }

    /// Pushes a value back so the next call to `next` delivers it.
    ///
    /// It is up to the caller to unread sensibly. Given a source of 1, 2, 3:
    /// after reading 1 and 2, unreading 2 makes `next`/`value` give 2 again
    /// without consulting the source, and the call after that reads 3.
    /// Unreading 3, 2, 1 then gives 1, 2, 3. Nothing stops a caller from
    /// reading 1, 2, 3 and unreading them in that order to get 3, 2, 1.
    /// A value may be unread before anything has been read.
    pub fn unread(&mut self, value: impl Into<Value>) -> IterResult<()> {
        let mut state = self.state()?;

        if state.iter_fn.is_none() {
            log::debug!("{}", IterError::UnreadOnExhausted);
            return Err(IterError::UnreadOnExhausted);
        }

        state.buffer.push(value.into());
        Ok(())
    }

    /// Reads the value and converts it to `T`.
    pub fn value_as<T: FromValue>(&mut self) -> IterResult<T> {
        self.value()?.into_typed()
    }

    /// Reads the value and converts it to a value of the given type.
    ///
    /// A `ValueType::Null` target is rejected before the value is read.
    pub fn value_of_type(&mut self, target: ValueType) -> IterResult<Value> {
        if target == ValueType::Null {
            return Err(IterError::NullTargetType);
        }

        self.value()?.convert_to(target)
    }

    /// Advances and reads the next value, for when another value is known to exist.
    pub fn next_value(&mut self) -> IterResult<Value> {
        self.next()?;
        self.value()
    }

    /// Advances and reads the next value as `T`.
    pub fn next_value_as<T: FromValue>(&mut self) -> IterResult<T> {
        self.next()?;
        self.value_as()
    }

    /// Advances and reads the next value converted to the given type.
    pub fn next_value_of_type(&mut self, target: ValueType) -> IterResult<Value> {
        if target == ValueType::Null {
            return Err(IterError::NullTargetType);
        }

        self.next()?;
        self.value_of_type(target)
    }

    typed_accessors! {
        bool => bool,
        byte => u8,
        char => char,
        int => isize,
        i8 => i8,
        i16 => i16,
        i32 => i32,
        i64 => i64,
        uint => usize,
        u8 => u8,
        u16 => u16,
        u32 => u32,
        u64 => u64,
        f32 => f32,
        f64 => f64,
        string => String,
    }

    /// Collects the remaining values into a vector, exhausting the iterator.
    pub fn to_vec(&mut self) -> IterResult<Vec<Value>> {
        self.to_vec_of()
    }

    /// Collects the remaining values into a vector of `T`, exhausting the iterator.
    pub fn to_vec_of<T: FromValue>(&mut self) -> IterResult<Vec<T>> {
        let mut values = Vec::new();
        while self.next()? {
            values.push(self.value_as()?);
        }

        Ok(values)
    }

    /// Splits the values into rows of at most `cols` values.
    ///
    /// The number of values is not known up front, so the first row is filled
    /// left to right, then the second, and so on; only the last row can be
    /// short. No values gives no rows. Exhausts the iterator.
    pub fn split_into_rows(&mut self, cols: usize) -> IterResult<Vec<Vec<Value>>> {
        self.split_into_rows_of(cols)
    }

    /// Splits the values into rows like [`Iter::split_into_rows`], converting each to `T`.
    pub fn split_into_rows_of<T: FromValue>(&mut self, cols: usize) -> IterResult<Vec<Vec<T>>> {
        if cols == 0 {
            return Err(IterError::ZeroCols);
        }

        let mut split = Vec::new();
        let mut row = Vec::new();
        while self.next()? {
            row.push(self.value_as()?);

            if row.len() == cols {
                split.push(std::mem::take(&mut row));
            }
        }

        // Empty unless the count is not a multiple of cols
        if !row.is_empty() {
            split.push(row);
        }

        Ok(split)
    }

    /// Splits the values into at most `rows` rows of near equal length.
    ///
    /// All values are collected first. Each row gets `count / rows` values
    /// and the remainder is spread one each across the leading rows: 23
    /// values in 5 rows gives rows of 5, 5, 5, 4, 4. With fewer values than
    /// rows there is one value per row. This is the transpose of
    /// [`Iter::split_into_rows`]. Exhausts the iterator.
    pub fn split_into_columns(&mut self, rows: usize) -> IterResult<Vec<Vec<Value>>> {
        self.split_into_columns_of(rows)
    }

    /// Splits the values into rows like [`Iter::split_into_columns`], converting each to `T`.
    pub fn split_into_columns_of<T: FromValue>(
        &mut self,
        rows: usize,
    ) -> IterResult<Vec<Vec<T>>> {
        if rows == 0 {
            return Err(IterError::ZeroRows);
        }

        let values = self.to_vec_of()?;
        Ok(split_columns(values, rows))
    }

    /// Adapts the iterator into a standard [`Iterator`] of results.
    pub fn into_values(self) -> Values {
        Values {
            iter: self,
            failed: false,
        }
    }
}

fn split_columns<T>(values: Vec<T>, rows: usize) -> Vec<Vec<T>> {
    let num_rows = rows.min(values.len());
    if num_rows == 0 {
        return Vec::new();
    }

    let per_row = values.len() / num_rows;
    let mut remainder = values.len() % num_rows;
    let mut values = values.into_iter();

    (0..num_rows)
        .map(|_| {
            let mut width = per_row;
            if remainder > 0 {
                width += 1;
                remainder -= 1;
            }
            values.by_ref().take(width).collect()
        })
        .collect()
}

impl Iterable for Iter {
    fn iter(&self) -> Iter {
        Iter {
            state: Rc::clone(&self.state),
        }
    }
}

impl fmt::Debug for Iter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.try_borrow() {
            Ok(state) => f
                .debug_struct("Iter")
                .field("exhausted", &state.iter_fn.is_none())
                .field("current", &state.current)
                .field("buffered", &state.buffer.len())
                .finish(),
            Err(_) => f.debug_struct("Iter").finish_non_exhaustive(),
        }
    }
}

/// A standard [`Iterator`] over the values of an [`Iter`].
///
/// Yields `Ok(value)` per value and stops at exhaustion. An error is yielded
/// once, after which iteration stops.
#[derive(Debug)]
pub struct Values {
    iter: Iter,
    failed: bool,
}

impl Iterator for Values {
    type Item = IterResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.iter.is_exhausted() {
            return None;
        }

        let value = match self.iter.next() {
            Ok(true) => self.iter.value(),
            Ok(false) => return None,
            Err(err) => Err(err),
        };

        self.failed = value.is_err();
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values;

    #[test]
    fn test_fresh_iterator_has_no_value() {
        let mut iter = Iter::of([1]);
        assert_eq!(iter.value(), Err(IterError::ValueBeforeNext));
    }

    #[test]
    fn test_next_value_cycle() {
        let mut iter = Iter::of([1, 2]);

        assert!(iter.next().unwrap());
        assert_eq!(iter.value().unwrap(), Value::from(1));

        // Double read
        assert_eq!(iter.value(), Err(IterError::ValueBeforeNext));

        assert!(iter.next().unwrap());
        assert_eq!(iter.value().unwrap(), Value::from(2));

        assert!(!iter.next().unwrap());
        assert!(iter.is_exhausted());
        assert_eq!(iter.next(), Err(IterError::NextOnExhausted));
        assert_eq!(iter.value(), Err(IterError::ValueOnExhausted));
        assert_eq!(iter.unread(1), Err(IterError::UnreadOnExhausted));
    }

    #[test]
    fn test_empty_iterator() {
        let mut iter = Iter::empty();
        assert!(!iter.next().unwrap());
        assert_eq!(iter.next(), Err(IterError::NextOnExhausted));
    }

    #[test]
    fn test_unread() {
        let mut iter = Iter::of([1, 2, 3]);
        iter.next().unwrap();
        iter.unread(1).unwrap();

        for i in 1..=3 {
            assert_eq!(iter.next_value().unwrap(), Value::from(i));
        }

        // Unread backwards just to prove it works
        iter.unread(1).unwrap();
        iter.unread(2).unwrap();
        iter.unread(3).unwrap();

        for i in (1..=3).rev() {
            assert_eq!(iter.next_value().unwrap(), Value::from(i));
        }
        assert!(!iter.next().unwrap());

        // Unreading before even reading
        let mut iter = Iter::of([1]);
        iter.unread(2).unwrap();
        for i in (1..=2).rev() {
            assert!(iter.next().unwrap());
            assert_eq!(iter.value().unwrap(), Value::from(i));
        }
        assert!(!iter.next().unwrap());

        // Unreading doesn't affect failure on exhausted iterator
        assert_eq!(iter.next(), Err(IterError::NextOnExhausted));
    }

    #[test]
    fn test_of_does_not_unpack() {
        let mut iter = Iter::of(values![5, [6, 7]]);
        assert_eq!(iter.to_vec().unwrap(), values![5, [6, 7]]);
        assert_eq!(iter.next(), Err(IterError::NextOnExhausted));
    }

    #[test]
    fn test_of_elements_single_value() {
        let mut iter = Iter::of_elements(5);
        assert_eq!(iter.to_vec().unwrap(), values![5]);
        assert_eq!(iter.next(), Err(IterError::NextOnExhausted));
    }

    #[test]
    fn test_of_flatten() {
        let mut iter = Iter::of_flatten(values![1, [2, 3], [vec![4, 5], vec![6, 7, 8]]]).unwrap();
        assert_eq!(iter.to_vec_of::<i32>().unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);

        assert!(!Iter::of_flatten(Value::Null).unwrap().next().unwrap());
        assert_eq!(Iter::of_flatten(1).err(), Some(IterError::NotFlattenable));
    }

    #[test]
    fn test_of_array_and_map() {
        assert_eq!(Iter::of_array(1).err(), Some(IterError::NotAnArray));
        assert_eq!(Iter::of_map([1]).err(), Some(IterError::NotAMap));
        assert_eq!(
            Iter::of_array([7, 8]).unwrap().to_vec().unwrap(),
            values![7, 8]
        );
    }

    #[test]
    fn test_value_of_type() {
        let mut iter = Iter::of(["1", "2"]);

        assert!(iter.next().unwrap());
        assert_eq!(
            iter.value_of_type(ValueType::String).unwrap(),
            Value::from("1")
        );
        assert_eq!(
            iter.next_value_of_type(ValueType::String).unwrap(),
            Value::from("2")
        );

        let mut iter = Iter::of([65]);
        assert_eq!(
            iter.next_value_of_type(ValueType::Null),
            Err(IterError::NullTargetType)
        );
        // Rejected before the iterator was touched
        assert_eq!(
            iter.next_value_of_type(ValueType::Char).unwrap(),
            Value::Char('A')
        );
    }

    #[test]
    fn test_typed_accessors() {
        let mut iter = Iter::of(values![true, false]);
        assert!(iter.next().unwrap());
        assert!(iter.bool_value().unwrap());
        assert!(!iter.next_bool_value().unwrap());

        let mut iter = Iter::of([1i8, 2i8]);
        assert!(iter.next().unwrap());
        assert_eq!(iter.i8_value().unwrap(), 1);
        assert_eq!(iter.next_i8_value().unwrap(), 2);

        let mut iter = Iter::of(['1', '2']);
        assert!(iter.next().unwrap());
        assert_eq!(iter.char_value().unwrap(), '1');
        assert_eq!(iter.next_char_value().unwrap(), '2');

        let mut iter = Iter::of([1u64, 2u64]);
        assert_eq!(iter.next_uint_value().unwrap(), 1);
        assert_eq!(iter.next_u64_value().unwrap(), 2);

        let mut iter = Iter::of([1.25f32, 2.5f32]);
        assert_eq!(iter.next_f32_value().unwrap(), 1.25);
        assert_eq!(iter.next_f64_value().unwrap(), 2.5);

        let mut iter = Iter::of(["1", "2"]);
        assert_eq!(iter.next_string_value().unwrap(), "1");
        assert_eq!(iter.next_string_value().unwrap(), "2");

        let mut iter = Iter::of(["x"]);
        assert_eq!(
            iter.next_int_value(),
            Err(IterError::conversion(ValueType::String, "isize"))
        );
    }

    #[test]
    fn test_to_vec_on_exhausted_iterator_fails() {
        let mut iter = Iter::empty();
        assert!(iter.to_vec().unwrap().is_empty());
        assert_eq!(iter.to_vec(), Err(IterError::NextOnExhausted));
    }

    #[test]
    fn test_split_into_rows() {
        let split = Iter::of(1..=11).split_into_rows(5).unwrap();
        assert_eq!(
            split,
            vec![
                values![1, 2, 3, 4, 5],
                values![6, 7, 8, 9, 10],
                values![11],
            ]
        );

        assert!(Iter::empty().split_into_rows(5).unwrap().is_empty());
        assert_eq!(
            Iter::of(1..=10).split_into_rows_of::<i32>(5).unwrap(),
            vec![vec![1, 2, 3, 4, 5], vec![6, 7, 8, 9, 10]]
        );
    }

    #[test]
    fn test_split_into_rows_zero_cols() {
        let mut iter = Iter::of([1]);
        assert_eq!(iter.split_into_rows(0), Err(IterError::ZeroCols));

        // The iterator was not touched
        assert_eq!(iter.next_value().unwrap(), Value::from(1));
    }

    #[test]
    fn test_split_into_columns() {
        let cases: [(i32, Vec<Vec<i32>>); 6] = [
            (0, vec![]),
            (1, vec![vec![1]]),
            (4, vec![vec![1], vec![2], vec![3], vec![4]]),
            (5, vec![vec![1], vec![2], vec![3], vec![4], vec![5]]),
            (6, vec![vec![1, 2], vec![3], vec![4], vec![5], vec![6]]),
            (
                11,
                vec![vec![1, 2, 3], vec![4, 5], vec![6, 7], vec![8, 9], vec![10, 11]],
            ),
        ];

        for (count, expected) in cases {
            let mut iter = Iter::of(1..=count);
            assert_eq!(iter.split_into_columns_of::<i32>(5).unwrap(), expected);
            assert_eq!(iter.next(), Err(IterError::NextOnExhausted));
        }

        assert_eq!(
            Iter::of([1, 2]).split_into_columns(1).unwrap(),
            vec![values![1, 2]]
        );
        assert_eq!(
            Iter::of([1]).split_into_columns(0),
            Err(IterError::ZeroRows)
        );
    }

    #[test]
    fn test_iter_is_iterable() {
        let mut iter = Iter::of([0]);
        let mut it = iter.iter();

        assert!(it.ptr_eq(&iter));
        assert!(it.next().unwrap());
        assert_eq!(it.value().unwrap(), Value::from(0));
        assert!(!it.next().unwrap());

        assert_eq!(it.next(), Err(IterError::NextOnExhausted));
        assert_eq!(iter.next(), Err(IterError::NextOnExhausted));
    }

    #[test]
    fn test_reentrant_use_is_rejected() {
        let handle: Rc<RefCell<Option<Iter>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&handle);
        let mut iter = Iter::from_fn(move || match inner.borrow_mut().as_mut() {
            // Advances the iterator that is calling this function
            Some(iter) => iter.next().map(|_| None),
            None => Ok(None),
        });

        *handle.borrow_mut() = Some(iter.iter());
        assert_eq!(iter.next(), Err(IterError::Reentrant));
        assert!(!iter.is_exhausted());

        handle.borrow_mut().take();
    }

    #[test]
    fn test_values_adapter() {
        let values: Vec<Value> = Iter::of([1, 2, 3])
            .into_values()
            .collect::<IterResult<_>>()
            .unwrap();
        assert_eq!(values, values![1, 2, 3]);

        let mut failing = Iter::from_fn(|| Err(IterError::InvalidUtf8)).into_values();
        assert_eq!(failing.next(), Some(Err(IterError::InvalidUtf8)));
        assert_eq!(failing.next(), None);
    }
}
