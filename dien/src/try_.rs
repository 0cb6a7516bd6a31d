// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! [`Try<T>`], the three-valued result container that travels between a
//! [`crate::Promise`] and its [`crate::Future`].

use crate::error::Error;
use core::fmt;

/// Tagged union of `{Empty, Value(T), Error}`.
///
/// `Empty` is only ever observed as the default state of a brand-new shared
/// rendezvous cell before a result has been set; every `Try` handed to a
/// caller or a continuation is either `Value` or `Error`.
///
/// `Try<T>` is `Clone` exactly when `T` is `Clone` (derived): copying a
/// `Try` requires a copyable payload.
#[derive(Clone, Debug)]
pub enum Try<T> {
    Empty,
    Value(T),
    Error(Error),
}

impl<T> Try<T> {
    pub fn has_value(&self) -> bool {
        matches!(self, Try::Value(_))
    }

    pub fn has_error(&self) -> bool {
        matches!(self, Try::Error(_))
    }

    /// Consumes the value.
    ///
    /// # Panics
    ///
    /// Panics if this `Try` does not hold a value.
    pub fn into_value(self) -> T {
        match self {
            Try::Value(v) => v,
            Try::Error(_) => panic!("dien: Try::into_value called on an Error"),
            Try::Empty => panic!("dien: Try::into_value called on Empty"),
        }
    }

    /// Consumes the error.
    ///
    /// # Panics
    ///
    /// Panics if this `Try` does not hold an error.
    pub fn into_error(self) -> Error {
        match self {
            Try::Error(e) => e,
            Try::Value(_) => panic!("dien: Try::into_error called on a Value"),
            Try::Empty => panic!("dien: Try::into_error called on Empty"),
        }
    }

    /// If this `Try` holds an error, hands it to `f` and returns `true`.
    /// Otherwise returns `false` without calling `f`.
    pub fn with_error<F>(self, f: F) -> bool
    where
        F: FnOnce(Error),
    {
        match self {
            Try::Error(e) => {
                f(e);
                true
            }
            _ => false,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for Try<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Try::Empty => f.write_str("Empty"),
            Try::Value(v) => write!(f, "Value({v:?})"),
            Try::Error(e) => write!(f, "Error({e})"),
        }
    }
}

impl<T> From<T> for Try<T> {
    fn from(value: T) -> Self {
        Try::Value(value)
    }
}

impl<T> From<Error> for Try<T> {
    fn from(error: Error) -> Self {
        Try::Error(error)
    }
}
