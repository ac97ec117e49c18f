// vim: tw=80
//! The shared call sequence of a context
#![deny(warnings)]

use standin::*;

mockable! {
    pub struct MockChannel as "Channel" {
        fn send(msg: Str) -> Void;
    }
}

#[test]
fn call_numbers_are_consecutive_from_one() {
    let ctx = MockContext::new();
    let chan: MockChannel = ctx.mock();
    chan.send(Value::str("a")).unwrap();
    chan.send(Value::str("b")).unwrap();
    chan.send(Value::str("c")).unwrap();

    let numbers: Vec<u64> =
        calls_of(&chan).iter().map(|c| c.call_number()).collect();
    assert_eq!(vec![1, 2, 3], numbers);
}

#[test]
fn the_sequence_spans_all_mocks_of_a_context() {
    let ctx = MockContext::new();
    let a: MockChannel = ctx.mock();
    let b: MockChannel = ctx.mock();
    a.send(Value::str("1")).unwrap();
    b.send(Value::str("2")).unwrap();
    a.send(Value::str("3")).unwrap();

    let a_numbers: Vec<u64> =
        calls_of(&a).iter().map(|c| c.call_number()).collect();
    let b_numbers: Vec<u64> =
        calls_of(&b).iter().map(|c| c.call_number()).collect();
    assert_eq!(vec![1, 3], a_numbers);
    assert_eq!(vec![2], b_numbers);
}

#[test]
fn independent_contexts_have_independent_sequences() {
    let ctx1 = MockContext::new();
    let ctx2 = MockContext::new();
    let a: MockChannel = ctx1.mock();
    let b: MockChannel = ctx2.mock();
    a.send(Value::str("x")).unwrap();
    b.send(Value::str("y")).unwrap();

    assert_eq!(1, calls_of(&a)[0].call_number());
    assert_eq!(1, calls_of(&b)[0].call_number());
}

#[test]
fn mocks_of_a_context_are_numbered_in_creation_order() {
    let ctx = MockContext::new();
    let a: MockChannel = ctx.mock();
    let b: MockChannel = ctx.mock();
    a.send(Value::str("x")).unwrap();
    b.send(Value::str("y")).unwrap();

    assert_eq!("Channel:1", calls_of(&a)[0].mock_name());
    assert_eq!("Channel:2", calls_of(&b)[0].mock_name());
}

#[test]
fn concurrent_invocations_get_unique_numbers() {
    let ctx = MockContext::new();
    let chan: MockChannel = ctx.mock();
    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..25 {
                    chan.send(Value::str("m")).unwrap();
                }
            });
        }
    });

    let mut numbers: Vec<u64> =
        calls_of(&chan).iter().map(|c| c.call_number()).collect();
    numbers.sort_unstable();
    assert_eq!((1..=100).collect::<Vec<u64>>(), numbers);
}
