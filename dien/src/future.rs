// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! [`Future<T>`], the consumer half of a rendezvous pair, and the
//! `then`/`on_error` continuation algebra built on top of it.
//!
//! A continuation can be value-shaped (skipped on upstream error, with the
//! error propagated downstream untouched) or try-shaped (always run,
//! receiving the full [`Try<T>`]), and either shape can return a plain value
//! or a further [`Future`] to flatten. Rather than infer which of those four
//! shapes a closure implements, each is named explicitly:
//!
//! - [`Future::then`] / [`Future::then_with`] — "value" shapes: skipped and
//!   the error is propagated when the upstream is an error.
//! - [`Future::try_then`] / [`Future::try_then_with`] — "try" shapes: always
//!   run, receiving the full [`Try<T>`].
//! - the `_with` suffix marks the future-flattening form, whose continuation
//!   itself returns a `Future<U>` rather than a plain `U`.
//!
//! [`Future::on_error`] / [`Future::on_error_with`] are the error-side
//! mirror of the same pair.

use std::sync::Arc;

use crate::error::Error;
use crate::promise::Promise;
use crate::shared::SharedState;
use crate::try_::Try;

/// The read-side handle of a [`Promise<T>`] pair.
///
/// A `Future` either already holds a ready result ([`Future::is_ready`]) or
/// is consumed by one of the combinators below, which register a
/// continuation to run when the result arrives — synchronously, on
/// whichever side (producer or consumer) completes the rendezvous. There is
/// no poll loop and no executor: see the crate-level docs.
pub struct Future<T> {
    shared: Arc<SharedState<T>>,
}

impl<T> Future<T> {
    pub(crate) fn from_shared(shared: Arc<SharedState<T>>) -> Self {
        Self { shared }
    }

    /// Builds an already-failed `Future`, without a matching `Promise`.
    pub fn failed(error: Error) -> Self {
        let shared = Arc::new(SharedState::new());
        shared.set_result(Try::Error(error));
        Self::from_shared(shared)
    }

    pub fn has_value(&self) -> bool {
        self.shared.has_value()
    }

    pub fn has_error(&self) -> bool {
        self.shared.has_error()
    }

    pub fn is_ready(&self) -> bool {
        self.shared.is_ready()
    }

    /// Takes the ready result.
    ///
    /// # Panics
    ///
    /// Panics if the result is not yet ready. This is a synchronous
    /// accessor for an already-armed `Future`; waiting for readiness is out
    /// of scope (there is no blocking wait in this crate — see `then`).
    pub fn get(self) -> Try<T> {
        assert!(self.is_ready(), "dien: Future::get called before the result was ready");
        self.shared.take_result()
    }

    /// Takes the ready value.
    ///
    /// # Panics
    ///
    /// Panics if the result is not ready, or if it is an error.
    pub fn value(self) -> T {
        self.get().into_value()
    }

    /// Drops this handle without ever registering a continuation.
    ///
    /// Forces `activate` first, so a dispatch left pending by a prior
    /// `deactivate` actually runs before this handle's share of the
    /// underlying state is released, rather than being silently dropped.
    pub fn detach(self) {
        self.shared.activate();
    }
}

impl<T> Drop for Future<T> {
    fn drop(&mut self) {
        self.shared.activate();
    }
}

impl<T: Send + 'static> Future<T> {
    /// Value-shaped, non-flattening continuation.
    ///
    /// Skipped on an upstream error, which is forwarded to the returned
    /// `Future` untouched. `f`'s return value becomes the downstream value;
    /// `f` is evaluated through [`Promise::set_with`], so there is no
    /// separate "continuation throws" channel to route around — see that
    /// method's docs.
    pub fn then<U, F>(self, f: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let (downstream, future) = Promise::new();
        self.shared.set_callback(Box::new(move |t| match t {
            Try::Value(v) => downstream.set_with(move || f(v)),
            Try::Error(e) => downstream.set_error(e),
            Try::Empty => unreachable!("dien: dispatch only occurs with a populated result"),
        }));
        future
    }

    /// Value-shaped, future-flattening continuation: `f` returns a
    /// `Future<U>` rather than a plain `U`, and the result is still a single
    /// `Future<U>` — never a `Future<Future<U>>`.
    pub fn then_with<U, F>(self, f: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Future<U> + Send + 'static,
    {
        let (downstream, future) = Promise::new();
        self.shared.set_callback(Box::new(move |t| match t {
            Try::Value(v) => forward_to(f(v), downstream),
            Try::Error(e) => downstream.set_error(e),
            Try::Empty => unreachable!("dien: dispatch only occurs with a populated result"),
        }));
        future
    }

    /// Try-shaped, non-flattening continuation: always runs, receiving the
    /// upstream `Try<T>` whether it is a value or an error.
    pub fn try_then<U, F>(self, f: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(Try<T>) -> U + Send + 'static,
    {
        let (downstream, future) = Promise::new();
        self.shared
            .set_callback(Box::new(move |t| downstream.set_with(move || f(t))));
        future
    }

    /// Try-shaped, future-flattening continuation.
    pub fn try_then_with<U, F>(self, f: F) -> Future<U>
    where
        U: Send + 'static,
        F: FnOnce(Try<T>) -> Future<U> + Send + 'static,
    {
        let (downstream, future) = Promise::new();
        self.shared
            .set_callback(Box::new(move |t| forward_to(f(t), downstream)));
        future
    }

    /// Runs `f` only when the upstream is an error, producing a `Future<T>`
    /// from its return value.
    ///
    /// On an upstream *value*, `f` is skipped and the downstream `Promise`
    /// is simply dropped unfulfilled, which resolves the returned `Future`
    /// with a [`crate::Error::broken_promise`] rather than leaving it
    /// pending forever. See `DESIGN.md` for the reasoning behind resolving
    /// it this way rather than forwarding the value through untouched.
    pub fn on_error<F>(self, f: F) -> Future<T>
    where
        F: FnOnce(Error) -> T + Send + 'static,
    {
        let (downstream, future) = Promise::new();
        self.shared.set_callback(Box::new(move |t| match t {
            Try::Error(e) => downstream.set_with(move || f(e)),
            Try::Value(_) | Try::Empty => {}
        }));
        future
    }

    /// Future-flattening form of [`Future::on_error`].
    pub fn on_error_with<F>(self, f: F) -> Future<T>
    where
        F: FnOnce(Error) -> Future<T> + Send + 'static,
    {
        let (downstream, future) = Promise::new();
        self.shared.set_callback(Box::new(move |t| match t {
            Try::Error(e) => forward_to(f(e), downstream),
            Try::Value(_) | Try::Empty => {}
        }));
        future
    }
}

/// Installs a callback on `inner` that forwards its eventual `Try<U>` into
/// `downstream`, collapsing a `Future<Future<U>>` shape down to `Future<U>`.
fn forward_to<U: Send + 'static>(inner: Future<U>, downstream: Promise<U>) {
    inner
        .shared
        .set_callback(Box::new(move |t| downstream.set_try(t)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Promise;

    #[test]
    fn then_runs_once_armed_by_immediate_value() {
        let (promise, future) = Promise::new();
        let downstream = future.then(|v: i32| v + 1);
        promise.set_value(3);
        assert_eq!(downstream.value(), 4);
    }

    #[test]
    fn then_chained_after_value_already_set_runs_immediately() {
        let (promise, future) = Promise::new();
        promise.set_value(10);
        let downstream = future.then(|v: i32| v + 1);
        assert_eq!(downstream.value(), 11);
    }

    #[test]
    fn error_skips_value_shaped_then() {
        let (promise, future) = Promise::<i32>::new();
        let captured = Arc::new(std::sync::Mutex::new(None));
        let captured2 = captured.clone();

        let downstream = future
            .then(|_v: i32| 2)
            .on_error(move |e| {
                *captured2.lock().unwrap() = Some(e.top().message().to_string());
                2
            });

        promise.set_error(Error::msg("boom"));

        assert_eq!(downstream.value(), 2);
        assert_eq!(captured.lock().unwrap().as_deref(), Some("boom"));
    }

    #[test]
    fn error_delivered_to_try_shaped_then() {
        let (promise, future) = Promise::<i32>::new();
        let captured = Arc::new(std::sync::Mutex::new(None));
        let captured2 = captured.clone();

        let downstream = future
            .try_then_with(|t: Try<i32>| {
                if t.has_error() {
                    Future::failed(t.into_error())
                } else {
                    let (p, f) = Promise::new();
                    p.set_value(1);
                    f
                }
            })
            .on_error(move |e| {
                *captured2.lock().unwrap() = Some(e.top().message().to_string());
                2
            });

        promise.set_error(Error::msg("test error"));

        assert_eq!(downstream.value(), 2);
        assert_eq!(captured.lock().unwrap().as_deref(), Some("test error"));
    }

    #[test]
    fn broken_promise_reaches_on_error() {
        let (promise, future) = Promise::<i32>::new();
        let captured = Arc::new(std::sync::Mutex::new(None));
        let captured2 = captured.clone();

        let downstream = future.on_error(move |e| {
            *captured2.lock().unwrap() = Some(e.top().message().to_string());
            0
        });

        drop(promise);

        assert_eq!(downstream.value(), 0);
        assert_eq!(captured.lock().unwrap().as_deref(), Some("BrokenPromise"));
    }

    #[test]
    fn then_with_flattens_inner_future() {
        let (promise, future) = Promise::new();
        let downstream = future.then_with(|v: i32| {
            let (p2, f2) = Promise::new();
            p2.set_value(v * 2);
            f2
        });
        promise.set_value(5);
        assert_eq!(downstream.value(), 10);
    }

    #[test]
    fn on_error_on_value_upstream_yields_broken_promise_downstream() {
        let (promise, future) = Promise::<i32>::new();
        let downstream = future.on_error(|_e| 99);
        promise.set_value(1);
        let result = downstream.get();
        assert!(result.has_error());
        assert_eq!(result.into_error().top().message(), "BrokenPromise");
    }

    #[test]
    fn try_then_always_runs() {
        let (promise, future) = Promise::<i32>::new();
        let downstream = future.try_then(|t: Try<i32>| t.has_error());
        promise.set_error(Error::msg("x"));
        assert!(downstream.value());
    }

    #[test]
    fn detach_prevents_no_registered_callback_from_running() {
        let (promise, future) = Promise::<i32>::new();
        future.detach();
        // No panic, no dangling callback: the promise can still be
        // fulfilled (or dropped) with nobody listening.
        promise.set_value(1);
    }
}
