//! Sources that can produce an iterator.

use crate::adapters::{elements_iter_fn, iterables_iter_fn, vec_iter_fn, IterFn};
use crate::error::IterResult;
use crate::flatten::flatten;
use crate::iter::Iter;
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

/// Anything that can produce an [`Iter`].
///
/// An [`Iter`] is iterable and returns itself, so APIs taking an iterable
/// accept a raw iterator too. A [`Generator`] returns a fresh iterator on
/// every call.
pub trait Iterable: fmt::Debug {
    /// Gets an iterator over the source.
    fn iter(&self) -> Iter;
}

/// A re-iterable source.
///
/// Each call to [`Iterable::iter`] builds a new iterator from the stored
/// generating function, so a generator can be iterated any number of times.
#[derive(Clone)]
pub struct Generator {
    generator: Rc<dyn Fn() -> IterFn>,
}

impl Generator {
    /// Creates a generator from a function that returns a fresh iterating function per call.
    pub fn new<F>(generator: F) -> Self
    where
        F: Fn() -> IterFn + 'static,
    {
        Self {
            generator: Rc::new(generator),
        }
    }

    /// Creates a generator over the items given.
    pub fn of<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let items: Vec<Value> = items.into_iter().map(Into::into).collect();
        Self::new(move || vec_iter_fn(items.clone()))
    }

    /// Creates a generator over an array flattened into one dimension.
    ///
    /// The array is flattened once, here. A null value gives a generator of
    /// empty iterators.
    pub fn of_flatten(value: impl Into<Value>) -> IterResult<Self> {
        let items = match value.into() {
            Value::Null => Vec::new(),
            value => flatten(value)?,
        };

        Ok(Self::of(items))
    }

    /// Creates a generator over the elements of a value.
    ///
    /// An iterable inside the value is shared, not copied: it is drained by
    /// the first iterator that reaches it.
    pub fn of_elements(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self::new(move || elements_iter_fn(value.clone()))
    }

    /// Creates a generator that drains each source in turn, skipping `None` sources.
    pub fn of_iterables(sources: Vec<Option<Rc<dyn Iterable>>>) -> Self {
        Self::new(move || iterables_iter_fn(sources.clone()))
    }

    /// Replaces the generating function.
    pub fn set<F>(&mut self, generator: F)
    where
        F: Fn() -> IterFn + 'static,
    {
        *self = Self::new(generator);
    }

    /// Replaces the generating function with one over the items given.
    pub fn set_of<I>(&mut self, items: I)
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        *self = Self::of(items);
    }

    /// Replaces the generating function; on error the generator is unchanged.
    pub fn set_of_flatten(&mut self, value: impl Into<Value>) -> IterResult<()> {
        *self = Self::of_flatten(value)?;
        Ok(())
    }

    /// Replaces the generating function with one over the elements of a value.
    pub fn set_of_elements(&mut self, value: impl Into<Value>) {
        *self = Self::of_elements(value);
    }

    /// Replaces the generating function with one draining each source in turn.
    pub fn set_of_iterables(&mut self, sources: Vec<Option<Rc<dyn Iterable>>>) {
        *self = Self::of_iterables(sources);
    }
}

impl Iterable for Generator {
    fn iter(&self) -> Iter {
        Iter::new((self.generator)())
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator").finish_non_exhaustive()
    }
}
