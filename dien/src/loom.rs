// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Swaps the spin lock and atomics the shared rendezvous cell is built on
//! for their `loom` equivalents under `cfg(loom)`, so the exact same
//! `SharedState` code is exercised both by ordinary concurrent tests and by
//! the loom model in the `shared` test module.

use cfg_if::cfg_if;

cfg_if! {
    if #[cfg(loom)] {
        pub(crate) use loom::sync::atomic::{AtomicBool, Ordering};
        pub(crate) use loom::thread;
        pub(crate) use loom::model;

        #[derive(Debug)]
        pub(crate) struct Mutex<T>(loom::sync::Mutex<T>);

        impl<T> Mutex<T> {
            pub(crate) fn new(data: T) -> Self {
                Self(loom::sync::Mutex::new(data))
            }

            #[inline(always)]
            pub(crate) fn lock(&self) -> loom::sync::MutexGuard<'_, T> {
                self.0.lock().unwrap()
            }
        }
    } else {
        pub(crate) use std::sync::atomic::{AtomicBool, Ordering};
        #[cfg(test)]
        pub(crate) use std::thread;

        #[cfg(test)]
        #[inline(always)]
        pub(crate) fn model<R>(f: impl FnOnce() -> R) -> R {
            f()
        }

        #[derive(Debug)]
        pub(crate) struct Mutex<T>(spin::Mutex<T>);

        impl<T> Mutex<T> {
            pub(crate) const fn new(data: T) -> Self {
                Self(spin::Mutex::new(data))
            }

            #[inline(always)]
            pub(crate) fn lock(&self) -> spin::MutexGuard<'_, T> {
                self.0.lock()
            }
        }
    }
}
