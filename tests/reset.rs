// vim: tw=80
//! Resetting mock state between test phases
#![deny(warnings)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use standin::*;

mockable! {
    pub struct MockCache as "Cache" {
        fn get(key: Str) -> Str;
    }
}

#[test]
fn reset_calls_clears_only_the_ledger() {
    let ctx = MockContext::new();
    let cache: MockCache = ctx.mock();
    stub_return(Value::str("v"))
        .on(&cache)
        .method("get", vec![any_str()])
        .unwrap();
    cache.get(Value::str("k")).unwrap();

    reset_calls(&cache);
    verify_never().on(&cache).method("get", vec![any_str()]).unwrap();
    // Stubs survive.
    assert_eq!(Ok(Value::str("v")), cache.get(Value::str("k")));
}

#[test]
fn reset_stubs_clears_only_the_stubs() {
    let ctx = MockContext::new();
    let cache: MockCache = ctx.mock();
    stub_return(Value::str("v"))
        .on(&cache)
        .method("get", vec![any_str()])
        .unwrap();
    cache.get(Value::str("k")).unwrap();

    reset_stubs(&cache);
    assert_eq!(Ok(Value::Null), cache.get(Value::str("k")));
    // The ledger survives, including the pre-reset call.
    verify_exactly(2)
        .on(&cache)
        .method("get", vec![any_str()])
        .unwrap();
}

#[test]
fn reset_listeners_clears_only_the_listeners() {
    let ctx = MockContext::new();
    let cache: MockCache = ctx.mock();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    listen_with(move |_call: &MethodCall| {
        counter.fetch_add(1, Ordering::Relaxed);
    })
    .on(&cache)
    .method("get", vec![any_str()])
    .unwrap();
    stub_return(Value::str("v"))
        .on(&cache)
        .method("get", vec![any_str()])
        .unwrap();

    cache.get(Value::str("k")).unwrap();
    reset_listeners(&cache);
    cache.get(Value::str("k")).unwrap();

    assert_eq!(1, count.load(Ordering::Relaxed));
    // Stubs and the ledger survive.
    assert_eq!(Ok(Value::str("v")), cache.get(Value::str("k")));
    verify_exactly(3)
        .on(&cache)
        .method("get", vec![any_str()])
        .unwrap();
}

#[test]
fn reset_clears_everything() {
    let ctx = MockContext::new();
    let cache: MockCache = ctx.mock();
    let count = Arc::new(AtomicUsize::new(0));
    let counter = count.clone();
    stub_return(Value::str("v"))
        .on(&cache)
        .method("get", vec![any_str()])
        .unwrap();
    listen_with(move |_call: &MethodCall| {
        counter.fetch_add(1, Ordering::Relaxed);
    })
    .on(&cache)
    .method("get", vec![any_str()])
    .unwrap();
    cache.get(Value::str("k")).unwrap();

    reset(&cache);
    assert_eq!(Ok(Value::Null), cache.get(Value::str("k")));
    assert_eq!(1, count.load(Ordering::Relaxed));
    verify_once().on(&cache).method("get", vec![any_str()]).unwrap();
}

#[test]
fn reset_does_not_rewind_the_call_sequence() {
    let ctx = MockContext::new();
    let cache: MockCache = ctx.mock();
    cache.get(Value::str("k")).unwrap();
    reset(&cache);
    cache.get(Value::str("k")).unwrap();

    // The sequence is owned by the context, not the mock.
    assert_eq!(2, calls_of(&cache)[0].call_number());
}

#[test]
fn reset_affects_only_the_given_mock() {
    let ctx = MockContext::new();
    let a: MockCache = ctx.mock();
    let b: MockCache = ctx.mock();
    a.get(Value::str("k")).unwrap();
    b.get(Value::str("k")).unwrap();

    reset(&a);
    verify_never().on(&a).method("get", vec![any_str()]).unwrap();
    verify_once().on(&b).method("get", vec![any_str()]).unwrap();
}
