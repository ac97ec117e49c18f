// vim: tw=80
//! Selecting calls with argument matchers
#![deny(warnings)]

use predicates::prelude::*;

use standin::*;

mockable! {
    pub struct MockGreeter as "Greeter" {
        fn greet(name: Str) -> Str;
        fn repeat(text: Str, times: Int) -> Str;
    }
}

#[test]
fn contains_selects_substrings() {
    let ctx = MockContext::new();
    let greeter: MockGreeter = ctx.mock();
    greeter.greet(Value::str("Hello")).unwrap();
    greeter.greet(Value::str("Goodbye")).unwrap();

    verify_once()
        .on(&greeter)
        .method("greet", vec![contains_m("ello")])
        .unwrap();
}

#[test]
fn regexp_matches_the_whole_string() {
    let ctx = MockContext::new();
    let greeter: MockGreeter = ctx.mock();
    greeter.greet(Value::str("Hello")).unwrap();

    verify_once()
        .on(&greeter)
        .method("greet", vec![regexp_m("H.*o").unwrap()])
        .unwrap();
    // A partial match is not enough.
    verify_never()
        .on(&greeter)
        .method("greet", vec![regexp_m("ell").unwrap()])
        .unwrap();
}

#[test]
fn composed_matchers_narrow_the_selection() {
    let ctx = MockContext::new();
    let greeter: MockGreeter = ctx.mock();
    greeter.greet(Value::str("Hello")).unwrap();
    greeter.greet(Value::str("Hell")).unwrap();
    greeter.greet(Value::str("Jello")).unwrap();

    verify_once()
        .on(&greeter)
        .method(
            "greet",
            vec![and_m(vec![contains_m("Hell"), contains_m("lo")])],
        )
        .unwrap();
    verify_exactly(2)
        .on(&greeter)
        .method(
            "greet",
            vec![or_m(vec![
                eq_m(Value::str("Hell")),
                eq_m(Value::str("Jello")),
            ])],
        )
        .unwrap();
    verify_exactly(2)
        .on(&greeter)
        .method("greet", vec![not_m(eq_m(Value::str("Hello")))])
        .unwrap();
}

#[test]
fn empty_and_matches_everything_empty_or_matches_nothing() {
    let ctx = MockContext::new();
    let greeter: MockGreeter = ctx.mock();
    greeter.greet(Value::str("Hello")).unwrap();

    verify_once()
        .on(&greeter)
        .method("greet", vec![and_m(vec![])])
        .unwrap();
    verify_never()
        .on(&greeter)
        .method("greet", vec![or_m(vec![])])
        .unwrap();
}

#[test]
fn any_matches_null_but_typed_matchers_do_not() {
    let ctx = MockContext::new();
    let greeter: MockGreeter = ctx.mock();
    greeter.greet(Value::Null).unwrap();

    verify_once()
        .on(&greeter)
        .method("greet", vec![any_m()])
        .unwrap();
    verify_never()
        .on(&greeter)
        .method("greet", vec![any_str()])
        .unwrap();
    verify_once()
        .on(&greeter)
        .method("greet", vec![eq_m(Value::Null)])
        .unwrap();
}

#[test]
fn predicate_crate_predicates_work_as_matchers() {
    let ctx = MockContext::new();
    let greeter: MockGreeter = ctx.mock();
    greeter
        .repeat(Value::str("ha"), Value::Int(3))
        .unwrap();
    greeter
        .repeat(Value::str("ha"), Value::Int(9))
        .unwrap();

    let small =
        predicate::function(|v: &Value| matches!(v, Value::Int(n) if *n < 5));
    verify_once()
        .on(&greeter)
        .method("repeat", vec![any_str(), pred_m(small)])
        .unwrap();
}

#[test]
fn matcher_renderings_appear_in_failure_messages() {
    let ctx = MockContext::new();
    let greeter: MockGreeter = ctx.mock();

    let err = verify_once()
        .on(&greeter)
        .method(
            "greet",
            vec![and_m(vec![
                contains_m("lo"),
                not_m(eq_m(Value::str("solo"))),
            ])],
        )
        .unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains(
            "Greeter:1.greet((regexp(\".*lo.*\") & not(\"solo\")))"
        ),
        "{message}"
    );

    let err = verify_once()
        .on(&greeter)
        .method("repeat", vec![any_str(), any_int()])
        .unwrap_err();
    let message = err.to_string();
    assert!(
        message.contains("Greeter:1.repeat(<any:Str>, <any:Int>)"),
        "{message}"
    );
}

#[test]
fn long_matchers_render_their_widening_list() {
    assert_eq!("<any:Long,Int>", any_long().to_string());
    assert_eq!("<any:Float,Double>", any_float().to_string());
}
