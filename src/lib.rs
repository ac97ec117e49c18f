// vim: tw=80
//! A dynamic test-double library.
//!
//! Standin synthesizes substitute objects whose method invocations are
//! intercepted, recorded and matched against expectations you declare:
//! stub them to return canned values, throw, or run custom logic; verify
//! call counts and cross-mock ordering; or passively observe calls with
//! listeners.
//!
//! # Usage
//!
//! The basic idea:
//! * Describe the type to mock with the [`mockable!`] macro.  It
//!   generates a facade struct plus the method-signature table the
//!   framework validates stubs and matchers against.
//! * Create a [`MockContext`] in your test and instantiate mocks from
//!   it.  All mocks of one context share a single monotonically
//!   increasing call sequence, which is what makes cross-mock ordering
//!   assertions possible.
//! * Register stubs with [`stub_return`], [`stub_throw`] or
//!   [`stub_answer`], selecting calls with argument matchers.
//! * Drive the code under test, then assert with [`verify_exactly`] and
//!   friends, or in order via
//!   [`MockContext::new_ordering`].
//!
//! ```
//! use standin::*;
//!
//! mockable! {
//!     pub struct MockList as "List" {
//!         fn add(item: Str) -> Bool;
//!         fn size() -> Int;
//!         fn clear() -> Void;
//!     }
//! }
//!
//! let ctx = MockContext::new();
//! let list: MockList = ctx.mock();
//!
//! stub_return(Value::Bool(true))
//!     .on(&list)
//!     .method("add", vec![eq_m(Value::str("a"))])
//!     .unwrap();
//!
//! assert_eq!(Ok(Value::Bool(true)), list.add(Value::str("a")));
//! // Unstubbed calls answer with the return type's default.
//! assert_eq!(Ok(Value::Bool(false)), list.add(Value::str("b")));
//! assert_eq!(Ok(Value::Int(0)), list.size());
//!
//! verify_exactly(1)
//!     .on(&list)
//!     .method("add", vec![eq_m(Value::str("a"))])
//!     .unwrap();
//! verify_exactly(2).on(&list).method("add", vec![any_m()]).unwrap();
//! verify_never().on(&list).method("clear", vec![]).unwrap();
//! ```
//!
//! # Matching arguments
//!
//! A [`Matcher`] is a named predicate over a [`Value`]; matchers compose
//! with [`and_m`]/[`or_m`]/[`not_m`] and render themselves inside error
//! messages.  [`Captor`] extracts actual call arguments into the test:
//!
//! ```
//! # use standin::*;
//! # mockable! {
//! #     pub struct MockList as "List" {
//! #         fn add(item: Str) -> Bool;
//! #     }
//! # }
//! # let ctx = MockContext::new();
//! # let list: MockList = ctx.mock();
//! let captor = Captor::new();
//! listen_with(|_call| {})
//!     .on(&list)
//!     .method("add", vec![captor.matcher()])
//!     .unwrap();
//! list.add(Value::str("hello")).unwrap();
//! assert_eq!(Some(Value::str("hello")), captor.take());
//! // The slot is single-use.
//! assert_eq!(None, captor.take());
//! ```
//!
//! # Ordering
//!
//! ```
//! # use standin::*;
//! # mockable! {
//! #     pub struct MockList as "List" {
//! #         fn add(item: Str) -> Bool;
//! #     }
//! # }
//! let ctx = MockContext::new();
//! let a: MockList = ctx.mock();
//! let b: MockList = ctx.mock();
//! a.add(Value::str("first")).unwrap();
//! b.add(Value::str("second")).unwrap();
//!
//! let order = ctx.new_ordering();
//! order.verify().on(&a).method("add", vec![any_m()]).unwrap();
//! order.verify().on(&b).method("add", vec![any_m()]).unwrap();
//! ```
//!
//! # Errors
//!
//! Misusing the API (stubbing a void method with a value, a
//! type-mismatched stub, wrong matcher arity) is a [`UsageError`],
//! raised when the stub or verification is registered — never deferred
//! to call time.  An unmet expectation is a [`VerificationError`],
//! raised when the assertion is evaluated.  A stubbed throw surfaces as
//! the `Err` arm of the facade method's return value.
//!
//! # Concurrency
//!
//! Intended use is a single test thread.  The call sequence is atomic
//! and the registries are lock-protected, so invoking mocks from worker
//! threads keeps call numbers strictly increasing and globally unique;
//! nothing blocks or suspends.

mod call;
mod context;
mod data;
mod descriptor;
mod error;
mod matcher;
mod order;
mod stub;
mod value;
mod verify;

pub use call::{CallSite, MethodCall};
pub use context::MockContext;
pub use data::{
    calls_of, listen_with, reset, reset_calls, reset_listeners,
    reset_stubs, CallHandler, ListenerAdder, ListenerTarget, Mock,
    MockData, MockHandle, Mockable,
};
pub use descriptor::{MethodDescriptor, TypeDescriptor};
pub use error::{Error, Thrown, UsageError, VerificationError};
pub use matcher::{
    and_m, any_bool, any_byte, any_double, any_float, any_int, any_long,
    any_m, any_short, any_str, contains_m, eq_m, not_m, or_m, pred_m,
    regexp_m, type_m, ArgMatcher, Captor, Matcher, MethodMatcher,
};
pub use order::{
    InOrderVerifier, InOrderVerify, MockPoint, OrderingContext,
};
pub use stub::{
    stub_answer, stub_answer_st, stub_return, stub_throw, StubTarget,
    Stubber,
};
pub use value::{Value, ValueType};
pub use verify::{
    after, before, between, verify_at_least, verify_at_most,
    verify_exactly, verify_never, verify_once, verify_range, CallWindow,
    Verifier, VerifyRange,
};

/// Generate a mock facade struct.
///
/// This is the proxy-synthesis boundary of the framework: given a type
/// description, produce a struct of that shape whose method calls route
/// to the dispatch router.  The parameter and return kinds name
/// [`ValueType`] variants; the string after `as` is the mocked type's
/// display name, used in mock names and error messages.
///
/// ```
/// use standin::*;
///
/// mockable! {
///     pub struct MockGreeter as "Greeter" {
///         fn greet(name: Str) -> Str;
///         fn reset() -> Void;
///     }
/// }
///
/// let ctx = MockContext::new();
/// let greeter: MockGreeter = ctx.mock();
/// greeter.greet(Value::str("world")).unwrap();
/// ```
#[macro_export]
macro_rules! mockable {
    ($vis:vis struct $name:ident as $tyname:literal {
        $( fn $method:ident ( $( $arg:ident : $argty:ident ),* )
            -> $ret:ident; )*
    }) => {
        $vis struct $name {
            handle: $crate::MockHandle,
        }

        impl $crate::Mockable for $name {
            fn type_descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::new($tyname)
                $(
                    .method(
                        stringify!($method),
                        &[ $( $crate::ValueType::$argty ),* ],
                        $crate::ValueType::$ret,
                    )
                )*
            }

            fn from_handle(handle: $crate::MockHandle) -> Self {
                Self { handle }
            }
        }

        impl $crate::Mock for $name {
            fn mock_handle(&self) -> &$crate::MockHandle {
                &self.handle
            }
        }

        impl $name {
            $(
                #[track_caller]
                $vis fn $method(
                    &self,
                    $( $arg: $crate::Value ),*
                ) -> ::std::result::Result<$crate::Value, $crate::Thrown>
                {
                    self.handle.invoke(
                        stringify!($method),
                        ::std::vec![ $( $arg ),* ],
                    )
                }
            )*
        }
    };
}
