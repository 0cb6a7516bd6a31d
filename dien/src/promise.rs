// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! [`Promise<T>`], the producer half of a rendezvous pair.

use std::sync::Arc;

use crate::future::Future;
use crate::shared::SharedState;
use crate::try_::Try;
use crate::Error;

/// The write-once producer half of a [`Future<T>`] pair.
///
/// A `Promise` is fulfilled at most once, via [`Promise::set_value`],
/// [`Promise::set_error`] or [`Promise::set_with`]. Fulfilling it twice is a
/// programming error and panics. Dropping an unfulfilled `Promise` resolves
/// its `Future` with a
/// [`crate::Error::broken_promise`] error rather than leaving it pending
/// forever.
pub struct Promise<T> {
    shared: Arc<SharedState<T>>,
    fulfilled: bool,
}

impl<T> Promise<T> {
    /// Creates a connected `(Promise<T>, Future<T>)` pair.
    pub fn new() -> (Self, Future<T>) {
        let shared = Arc::new(SharedState::new());
        let promise = Self {
            shared: shared.clone(),
            fulfilled: false,
        };
        let future = Future::from_shared(shared);
        (promise, future)
    }

    /// Fulfils the pair with a value.
    ///
    /// # Panics
    ///
    /// Panics if this `Promise` has already been fulfilled.
    #[tracing::instrument(skip_all)]
    pub fn set_value(mut self, value: T) {
        self.shared.set_result(Try::Value(value));
        self.fulfilled = true;
    }

    /// Fulfils the pair with an error.
    ///
    /// # Panics
    ///
    /// Panics if this `Promise` has already been fulfilled.
    #[tracing::instrument(skip(self))]
    pub fn set_error(mut self, error: Error) {
        self.shared.set_result(Try::Error(error));
        self.fulfilled = true;
    }

    /// Fulfils the pair by evaluating `f` and storing its result.
    ///
    /// There is no analogue here for a continuation that "throws": Rust has
    /// no implicit exception channel for an ordinary return, so a fallible
    /// `f` should return a `Result` and be routed through
    /// [`crate::Future::try_then`] on the consumer side instead. A panic
    /// inside `f` is not caught and unwinds normally.
    ///
    /// # Panics
    ///
    /// Panics if this `Promise` has already been fulfilled.
    pub fn set_with<F>(self, f: F)
    where
        F: FnOnce() -> T,
    {
        self.set_value(f());
    }

    /// `true` once this `Promise` has called one of the setters.
    pub fn is_fulfilled(&self) -> bool {
        self.fulfilled
    }

    pub(crate) fn set_try(mut self, result: Try<T>) {
        self.shared.set_result(result);
        self.fulfilled = true;
    }
}

impl<T> Drop for Promise<T> {
    fn drop(&mut self) {
        if !self.fulfilled {
            self.shared.producer_dropped();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_then_get() {
        let (promise, future) = Promise::new();
        promise.set_value(5);
        assert_eq!(future.get().into_value(), 5);
    }

    #[test]
    fn set_error_then_get() {
        let (promise, future) = Promise::<i32>::new();
        promise.set_error(Error::msg("bad"));
        assert!(future.get().has_error());
    }

    #[test]
    fn drop_without_fulfilling_yields_broken_promise() {
        let (promise, future) = Promise::<i32>::new();
        drop(promise);
        let result = future.get();
        assert!(result.has_error());
        assert_eq!(result.into_error().top().message(), "BrokenPromise");
    }

    #[test]
    fn set_with_evaluates_closure() {
        let (promise, future) = Promise::new();
        promise.set_with(|| 2 + 2);
        assert_eq!(future.get().into_value(), 4);
    }

    #[test]
    fn is_fulfilled_starts_false() {
        let (promise, _future) = Promise::<i32>::new();
        assert!(!promise.is_fulfilled());
    }
}
