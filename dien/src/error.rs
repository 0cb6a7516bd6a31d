// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A small stack of `(code, message)` frames used to describe a chain of
//! failures.
//!
//! [`Error`] is the only error currency in this crate: [`crate::Try`] carries
//! it, [`crate::Promise::set_error`] accepts it, and [`crate::Future::then`]
//! and friends route it around or into continuations. Frames are pushed with
//! [`Error::stack`] and read back newest-first with [`Error::top`] or by
//! iterating.

use core::fmt;

/// Longest message a single [`Frame`] will retain; longer input is truncated
/// at a char boundary.
pub const MESSAGE_CAP: usize = 256;

/// Default code used when an [`Error`] is built from a message alone.
pub const GENERIC_FAILURE: i32 = 0;

/// Code used for [`Error::broken_promise`], distinct from [`GENERIC_FAILURE`]
/// so callers can match on it without string comparison.
pub const BROKEN_PROMISE: i32 = 1;

/// One `(code, message)` entry in an [`Error`]'s frame stack.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    code: i32,
    message: String,
}

impl Frame {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: truncate(message.into()),
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

fn truncate(mut message: String) -> String {
    if message.len() <= MESSAGE_CAP {
        return message;
    }
    let mut boundary = MESSAGE_CAP;
    while !message.is_char_boundary(boundary) {
        boundary -= 1;
    }
    message.truncate(boundary);
    message
}

/// A LIFO stack of [`Frame`]s. The most recently [`stack`](Error::stack)ed
/// frame is always `top()`.
///
/// Every operation on `Error` is infallible: there is no failure mode for
/// constructing or combining errors, only for misusing a [`crate::Try`] or
/// [`crate::Future`] that carries one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Error {
    frames: Vec<Frame>,
}

impl Error {
    /// Builds a single-frame error with an explicit code.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            frames: vec![Frame::new(code, message)],
        }
    }

    /// Builds a single-frame error from a message alone, using
    /// [`GENERIC_FAILURE`] as the code.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(GENERIC_FAILURE, message)
    }

    /// The error synthesised when a [`crate::Promise`] is dropped without
    /// ever calling a setter.
    pub fn broken_promise() -> Self {
        Self::new(BROKEN_PROMISE, "BrokenPromise")
    }

    /// Pushes `other`'s frames beneath this error's frames, keeping this
    /// error's top frame as the overall top. `other` may be another `Error`
    /// or a single [`Frame`] (anything convertible via [`From`]).
    #[must_use]
    pub fn stack(mut self, other: impl Into<Error>) -> Self {
        self.frames.extend(other.into().frames);
        self
    }

    /// The most recently stacked frame.
    ///
    /// # Panics
    ///
    /// Panics if the frame stack is empty (only reachable after [`Error::clear`]).
    pub fn top(&self) -> &Frame {
        self.frames.first().expect("dien: Error has no frames")
    }

    /// Iterates frames newest-first.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    /// Drops every frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl From<Frame> for Error {
    fn from(frame: Frame) -> Self {
        Self { frames: vec![frame] }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut frames = self.frames.iter();
        if let Some(first) = frames.next() {
            write!(f, "{first}")?;
        }
        for frame in frames {
            write!(f, " <- {frame}")?;
        }
        Ok(())
    }
}

impl core::error::Error for Error {}

static_assertions::assert_impl_all!(Error: Send, Sync, Clone, fmt::Debug);
