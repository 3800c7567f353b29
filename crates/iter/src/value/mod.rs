//! Dynamic values carried by iterators.
//!
//! Iterators hand back a [`Value`], a closed tagged union of the kinds of
//! data the adapters understand. Typed reads go through [`FromValue`] or
//! [`Value::convert_to`].

pub mod convert;
pub mod key_value;
#[allow(clippy::module_inception)]
pub mod value; // allow module inception for clarity of type name
pub mod value_type;

pub use convert::FromValue;
pub use key_value::KeyValue;
pub use value::Value;
pub use value_type::ValueType;

/// Builds a `Vec<Value>` from a list of expressions convertible into [`Value`].
///
/// ```
/// use pull_iter::{values, Value};
///
/// let items = values![1, "two", [3, 4]];
/// assert_eq!(items[1], Value::from("two"));
/// ```
#[macro_export]
macro_rules! values {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($item:expr),+ $(,)?) => {
        ::std::vec![$($crate::Value::from($item)),+]
    };
}
