// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! The rendezvous cell shared by exactly one [`crate::Promise`] and at most
//! one [`crate::Future`].
//!
//! Everything here is private to the crate: callers only ever see
//! [`crate::Promise`] and [`crate::Future`], which hold an `Arc<SharedState<T>>`
//! each. `Arc` gives this cell exactly the lifecycle it needs — alive while
//! either handle or an in-flight callback closure still references it, freed
//! at the last drop — with no manual attach count to maintain.

use crate::error::Error;
use crate::loom::{AtomicBool, Mutex, Ordering};
use crate::try_::Try;

/// The callback a [`crate::Future`] (or a combinator built on top of one)
/// registers to receive the eventual [`Try<T>`]. Invoked at most once, and
/// never while the lock is held.
pub(crate) type Callback<T> = Box<dyn FnOnce(Try<T>) + Send + 'static>;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Start,
    OnlyResult,
    OnlyCallback,
    Armed,
    Done,
}

struct Inner<T> {
    state: State,
    result: Option<Try<T>>,
    callback: Option<Callback<T>>,
}

impl<T> Inner<T> {
    const fn new() -> Self {
        Self {
            state: State::Start,
            result: None,
            callback: None,
        }
    }
}

pub(crate) struct SharedState<T> {
    inner: Mutex<Inner<T>>,
    /// Defaults to active. A combinator may deactivate a freshly-built
    /// downstream cell while it is being wired up and activate it once
    /// installation is complete; `activate` always re-attempts dispatch, so
    /// the bracket is safe to skip (our combinators do skip it, see
    /// `future.rs`) and safe to call redundantly.
    active: AtomicBool,
}

// Safety: all access to `Inner<T>` goes through `Mutex`, and the callback
// stored inside is itself required to be `Send`.
unsafe impl<T: Send> Send for SharedState<T> {}
// Safety: see above; no `&SharedState<T>` method exposes `T` without going
// through the lock.
unsafe impl<T: Send> Sync for SharedState<T> {}

static_assertions::assert_impl_all!(SharedState<i32>: Send, Sync);

impl<T> SharedState<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::new()),
            active: AtomicBool::new(true),
        }
    }

    /// Installs `result`, arming dispatch if a callback is already waiting.
    ///
    /// # Panics
    ///
    /// Panics if a result has already been set (double-fulfilment is a
    /// programming error, not a recoverable one).
    pub(crate) fn set_result(&self, result: Try<T>) {
        let dispatch;
        {
            let mut inner = self.inner.lock();
            match inner.state {
                State::Start => {
                    inner.state = State::OnlyResult;
                    inner.result = Some(result);
                    dispatch = false;
                }
                State::OnlyCallback => {
                    inner.state = State::Armed;
                    inner.result = Some(result);
                    dispatch = true;
                }
                State::OnlyResult | State::Armed | State::Done => {
                    drop(inner);
                    panic!("dien: set_result called twice on the same SharedState");
                }
            }
        }
        if dispatch {
            self.dispatch_if_ready();
        }
    }

    /// Installs `callback`, arming dispatch if a result is already present.
    ///
    /// # Panics
    ///
    /// Panics if a callback has already been registered.
    pub(crate) fn set_callback(&self, callback: Callback<T>) {
        let dispatch;
        {
            let mut inner = self.inner.lock();
            match inner.state {
                State::Start => {
                    inner.state = State::OnlyCallback;
                    inner.callback = Some(callback);
                    dispatch = false;
                }
                State::OnlyResult => {
                    inner.state = State::Armed;
                    inner.callback = Some(callback);
                    dispatch = true;
                }
                State::OnlyCallback | State::Armed | State::Done => {
                    drop(inner);
                    panic!("dien: set_callback called twice on the same SharedState");
                }
            }
        }
        if dispatch {
            self.dispatch_if_ready();
        }
    }

    /// Writes a `BrokenPromise` error iff no result has been set yet. Called
    /// from `Promise::drop`.
    pub(crate) fn producer_dropped(&self) {
        let dispatch;
        {
            let mut inner = self.inner.lock();
            match inner.state {
                State::Start => {
                    tracing::debug!("promise dropped without a result; synthesizing BrokenPromise");
                    inner.state = State::OnlyResult;
                    inner.result = Some(Try::Error(Error::broken_promise()));
                    dispatch = false;
                }
                State::OnlyCallback => {
                    tracing::debug!("promise dropped without a result; synthesizing BrokenPromise");
                    inner.state = State::Armed;
                    inner.result = Some(Try::Error(Error::broken_promise()));
                    dispatch = true;
                }
                State::OnlyResult | State::Armed | State::Done => {
                    // Already fulfilled; the promise kept its contract.
                    dispatch = false;
                }
            }
        }
        if dispatch {
            self.dispatch_if_ready();
        }
    }

    pub(crate) fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Re-enables dispatch and immediately retries it. Idempotent: safe to
    /// call from any state, including `Done`.
    pub(crate) fn activate(&self) {
        self.active.store(true, Ordering::Release);
        self.dispatch_if_ready();
    }

    /// Moves the callback and result out under the lock (so the lock is
    /// never held across invocation) and, if both were present and the cell
    /// is active, invokes the callback.
    fn dispatch_if_ready(&self) {
        let ready = {
            let mut inner = self.inner.lock();
            if inner.state == State::Armed && self.active.load(Ordering::Acquire) {
                inner.state = State::Done;
                let callback = inner.callback.take().expect("Armed implies a callback");
                let result = inner.result.take().expect("Armed implies a result");
                Some((callback, result))
            } else {
                None
            }
        };
        if let Some((callback, result)) = ready {
            tracing::trace!(has_error = result.has_error(), "dispatching");
            callback(result);
        }
    }

    pub(crate) fn is_ready(&self) -> bool {
        let inner = self.inner.lock();
        matches!(inner.state, State::OnlyResult | State::Armed | State::Done)
    }

    pub(crate) fn has_value(&self) -> bool {
        matches!(self.inner.lock().result, Some(Try::Value(_)))
    }

    pub(crate) fn has_error(&self) -> bool {
        matches!(self.inner.lock().result, Some(Try::Error(_)))
    }

    /// Takes the ready result.
    ///
    /// # Panics
    ///
    /// Panics if no result has been installed yet.
    pub(crate) fn take_result(&self) -> Try<T> {
        let mut inner = self.inner.lock();
        inner
            .result
            .take()
            .expect("dien: Future::get called before the result was ready")
    }
}
