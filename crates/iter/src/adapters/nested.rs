//! Adapters that drain other iterators.

use crate::adapters::IterFn;
use crate::iter::Iter;
use crate::iterable::Iterable;
use std::rc::Rc;

/// Drains an iterator through the iterating function protocol.
///
/// An iterator that is already exhausted, for example one shared with a
/// source drained earlier, yields nothing.
pub fn iter_iter_fn(iter: Iter) -> IterFn {
    let mut current = Some(iter);

    Box::new(move || {
        if let Some(iter) = current.as_mut() {
            if !iter.is_exhausted() && iter.next()? {
                return iter.value().map(Some);
            }

            log::trace!("nested iterator exhausted");
            current = None;
        }

        Ok(None)
    })
}

/// Drains the iterator of each source in turn.
///
/// Sources are visited in the order given. `None` sources and sources whose
/// iterator is empty are skipped.
pub fn iterables_iter_fn(sources: Vec<Option<Rc<dyn Iterable>>>) -> IterFn {
    let mut sources = sources.into_iter();
    let mut current: Option<Iter> = None;

    Box::new(move || loop {
        if let Some(iter) = current.as_mut() {
            if !iter.is_exhausted() && iter.next()? {
                return iter.value().map(Some);
            }

            current = None;
        }

        match sources.next() {
            Some(Some(source)) => current = Some(source.iter()),
            Some(None) => continue,
            None => return Ok(None),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{values, Value};

    fn source(items: Vec<Value>) -> Option<Rc<dyn Iterable>> {
        Some(Rc::new(Iter::of(items)))
    }

    #[test]
    fn test_iter_iter_fn() {
        let mut iter_fn = iter_iter_fn(Iter::of([1, 2]));

        assert_eq!(iter_fn().unwrap(), Some(Value::from(1)));
        assert_eq!(iter_fn().unwrap(), Some(Value::from(2)));
        assert_eq!(iter_fn().unwrap(), None);
        assert_eq!(iter_fn().unwrap(), None);
    }

    #[test]
    fn test_iterables_iter_fn_empty() {
        let mut iter_fn = iterables_iter_fn(Vec::new());
        assert_eq!(iter_fn().unwrap(), None);
        assert_eq!(iter_fn().unwrap(), None);

        let mut iter_fn = iterables_iter_fn(vec![None]);
        assert_eq!(iter_fn().unwrap(), None);
        assert_eq!(iter_fn().unwrap(), None);

        let mut iter_fn = iterables_iter_fn(vec![source(values![])]);
        assert_eq!(iter_fn().unwrap(), None);
        assert_eq!(iter_fn().unwrap(), None);
    }

    #[test]
    fn test_iterables_iter_fn_mixed() {
        // Mix of none, empty, non-empty sources
        let mut iter_fn = iterables_iter_fn(vec![
            None,
            source(values![]),
            source(values![1]),
            None,
            source(values![2]),
            source(values![]),
            source(values![3]),
            source(values![4, 5]),
        ]);

        for expected in 1..=5 {
            assert_eq!(iter_fn().unwrap(), Some(Value::from(expected)));
        }

        assert_eq!(iter_fn().unwrap(), None);
        assert_eq!(iter_fn().unwrap(), None);
    }

    #[test]
    fn test_shared_source_is_drained_once() {
        let shared: Rc<dyn Iterable> = Rc::new(Iter::of([1, 2]));
        let mut iter_fn =
            iterables_iter_fn(vec![Some(Rc::clone(&shared)), Some(Rc::clone(&shared))]);

        assert_eq!(iter_fn().unwrap(), Some(Value::from(1)));
        assert_eq!(iter_fn().unwrap(), Some(Value::from(2)));
        assert_eq!(iter_fn().unwrap(), None);
    }
}
