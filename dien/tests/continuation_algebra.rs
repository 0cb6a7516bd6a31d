//! End-to-end behavior of the continuation algebra, run against the public
//! API only.

use std::sync::{Arc, Mutex};

use dien::{Error, Future, Promise, Try};

#[test]
fn then_runs_once_armed_by_immediate_value() {
    let (promise, future) = Promise::new();
    let downstream = future.try_then(|v: Try<i32>| v.into_value() + 1);
    promise.set_value(3);
    assert_eq!(downstream.value(), 4);
}

#[test]
fn then_chained_after_value_already_set_runs_immediately() {
    let (promise, future) = Promise::new();
    promise.set_value(10);
    let downstream = future.try_then(|v: Try<i32>| v.into_value() + 1);
    assert_eq!(downstream.value(), 11);
}

#[test]
fn error_skips_value_shaped_then_and_reaches_on_error() {
    let (promise, future) = Promise::<i32>::new();
    let message = Arc::new(Mutex::new(None));
    let message2 = message.clone();

    let downstream = future
        .then(|_v: i32| 2)
        .on_error(move |e| {
            *message2.lock().unwrap() = Some(e.top().message().to_string());
            2
        });

    promise.set_error(Error::msg("boom"));

    assert_eq!(downstream.value(), 2);
    assert_eq!(message.lock().unwrap().as_deref(), Some("boom"));
}

#[test]
fn error_delivered_to_try_shaped_then_then_on_error() {
    let (promise, future) = Promise::<i32>::new();
    let message = Arc::new(Mutex::new(None));
    let message2 = message.clone();

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
            *message2.lock().unwrap() = Some(e.top().message().to_string());
            2
        });

    promise.set_error(Error::msg("test error"));

    assert_eq!(downstream.value(), 2);
    assert_eq!(message.lock().unwrap().as_deref(), Some("test error"));
}

#[test]
fn broken_promise_reaches_on_error_callback() {
    let (promise, future) = Promise::<i32>::new();
    let message = Arc::new(Mutex::new(None));
    let message2 = message.clone();

    let downstream = future.on_error(move |e| {
        *message2.lock().unwrap() = Some(e.top().message().to_string());
        0
    });

    drop(promise);

    assert_eq!(downstream.value(), 0);
    assert_eq!(message.lock().unwrap().as_deref(), Some("BrokenPromise"));
}

#[test]
fn error_stack_pops_newest_first() {
    let e1 = Error::new(1, "error 1");
    let e2 = Error::new(2, "error 2");
    let stack1 = e2.stack(e1);

    let e3 = Error::new(3, "error 3");
    let e4 = Error::new(4, "error 4");
    let stack2 = e4.stack(e3);

    let stack_all = stack2.stack(stack1);

    let codes: Vec<i32> = stack_all.frames().map(|f| f.code()).collect();
    assert_eq!(codes, vec![4, 3, 2, 1]);
}
