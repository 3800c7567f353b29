//! Error types for iterator construction, use and conversion.
//!
//! Every failure the library can report is one of the fixed kinds below.
//! None of them are retried or recovered internally: the operation in
//! progress stops and the error is handed straight back to the caller.

use crate::value::ValueType;
use std::io;
use thiserror::Error;

/// Iterator errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IterError {
    #[error("invalid UTF-8 encoding")]
    InvalidUtf8,

    #[error("array adapter argument must be an array")]
    NotAnArray,

    #[error("map adapter argument must be a map")]
    NotAMap,

    #[error("flatten argument must be an array")]
    NotFlattenable,

    #[error("Iter::next called on exhausted iterator")]
    NextOnExhausted,

    #[error("Iter::value called on exhausted iterator")]
    ValueOnExhausted,

    #[error("Iter::next has to be called before Iter::value")]
    ValueBeforeNext,

    #[error("Iter::unread called on exhausted iterator")]
    UnreadOnExhausted,

    #[error("cols must be > 0")]
    ZeroCols,

    #[error("rows must be > 0")]
    ZeroRows,

    #[error("target type cannot be null")]
    NullTargetType,

    #[error("cannot convert {from} value to {to}")]
    Conversion { from: ValueType, to: &'static str },

    #[error("read failed: {message}")]
    Io { kind: io::ErrorKind, message: String },

    #[error("iterator is already being advanced")]
    Reentrant,
}

impl IterError {
    /// Creates a conversion error for a value of type `from` that cannot become a `to`.
    pub fn conversion(from: ValueType, to: &'static str) -> Self {
        Self::Conversion { from, to }
    }

    /// Returns true for errors caused by calling the iterator out of order.
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::NextOnExhausted
                | Self::ValueOnExhausted
                | Self::ValueBeforeNext
                | Self::UnreadOnExhausted
                | Self::Reentrant
        )
    }
}

impl From<io::Error> for IterError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Result type for iterator operations
pub type IterResult<T> = Result<T, IterError>;
