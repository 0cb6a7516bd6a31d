// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! A single-producer/single-consumer [`Promise`]/[`Future`] pair with a
//! `then`/`on_error` continuation algebra.
//!
//! ```
//! use dien::Promise;
//!
//! let (promise, future) = Promise::new();
//! let downstream = future.then(|v: i32| v + 1);
//! promise.set_value(41);
//! assert_eq!(downstream.value(), 42);
//! ```
//!
//! There is no executor and no poll loop here: a continuation chained onto
//! a [`Future`] runs synchronously, on whichever side — the thread calling a
//! [`Promise`] setter, or the thread registering the continuation — happens
//! to complete the rendezvous.

mod error;
mod future;
mod loom;
mod promise;
mod shared;
mod try_;

pub use error::{Error, Frame};
pub use future::Future;
pub use promise::Promise;
pub use try_::Try;
