// vim: tw=80
//! Stub registration and the return-type guard.
//!
//! The interception layer loses static type information, so a stubbed
//! return value is validated against the method's declared return kind
//! before the stub is installed.  This check is the framework's sole
//! static-safety net and runs at registration time, never at call time.

use std::sync::Mutex;

use fragile::Fragile;
use tracing::debug;

use crate::call::MethodCall;
use crate::data::{CallHandler, Mock, MockHandle};
use crate::descriptor::MethodDescriptor;
use crate::error::{Error, Thrown, UsageError};
use crate::matcher::{ArgMatcher, MethodMatcher};
use crate::value::{Value, ValueType};

/// The action taken when a stub's matcher matches a dispatched call.
pub(crate) enum StubAction {
    Return(Value),
    Throw(Thrown),
    Answer(Mutex<Box<dyn CallHandler>>),
}

impl StubAction {
    pub(crate) fn invoke(
        &self,
        call: &MethodCall,
    ) -> Result<Value, Thrown> {
        match self {
            StubAction::Return(v) => Ok(v.clone()),
            StubAction::Throw(t) => Err(t.clone()),
            StubAction::Answer(h) => h.lock().unwrap().handle(call),
        }
    }
}

/// A registered stub: an action paired with the matcher that selects the
/// calls it answers.
pub(crate) struct MethodStub {
    matcher: MethodMatcher,
    action: StubAction,
}

impl MethodStub {
    pub(crate) fn matcher(&self) -> &MethodMatcher {
        &self.matcher
    }

    pub(crate) fn action(&self) -> &StubAction {
        &self.action
    }
}

enum Seed {
    Return(Value),
    Throw(Thrown),
    Answer(Box<dyn CallHandler>),
}

/// Stub a method call to return a specific value.
///
/// The value's kind must match the method's declared return kind; the
/// mismatch is a [`UsageError`] raised when the stub is registered.
///
/// ```
/// # use standin::*;
/// # mockable! {
/// #     pub struct MockList as "List" {
/// #         fn add(item: Str) -> Bool;
/// #     }
/// # }
/// # let ctx = MockContext::new();
/// # let mock: MockList = ctx.mock();
/// stub_return(Value::Bool(true))
///     .on(&mock)
///     .method("add", vec![any_str()])
///     .unwrap();
/// assert_eq!(Ok(Value::Bool(true)), mock.add(Value::str("a")));
/// ```
pub fn stub_return(value: Value) -> Stubber {
    Stubber {
        seed: Seed::Return(value),
    }
}

/// Stub a method call to fail with a [`Thrown`] payload.
pub fn stub_throw(thrown: Thrown) -> Stubber {
    Stubber {
        seed: Seed::Throw(thrown),
    }
}

/// Stub a method call with a custom answer strategy.  Every matching
/// call invokes the handler with the recorded [`MethodCall`].
pub fn stub_answer<H>(handler: H) -> Stubber
where
    H: CallHandler + 'static,
{
    Stubber {
        seed: Seed::Answer(Box::new(handler)),
    }
}

/// Single-threaded version of [`stub_answer`].  Can be used when the
/// answer closure isn't `Send`.
///
/// It is a runtime error to invoke the mocked method from a different
/// thread than the one that registered this stub.
pub fn stub_answer_st<F>(handler: F) -> Stubber
where
    F: FnMut(&MethodCall) -> Result<Value, Thrown> + 'static,
{
    let mut fragile = Fragile::new(handler);
    let fmut =
        move |call: &MethodCall| (fragile.get_mut())(call);
    Stubber {
        seed: Seed::Answer(Box::new(fmut)),
    }
}

/// A stub waiting to be applied to a mock.
pub struct Stubber {
    seed: Seed,
}

impl Stubber {
    pub fn on<M: Mock>(self, mock: &M) -> StubTarget<'_> {
        StubTarget {
            handle: mock.mock_handle(),
            seed: self.seed,
        }
    }
}

pub struct StubTarget<'m> {
    handle: &'m MockHandle,
    seed: Seed,
}

impl StubTarget<'_> {
    /// Bind the stub to a method and argument matchers and install it.
    /// Later registrations take precedence over earlier ones on each
    /// dispatch.
    pub fn method(
        self,
        name: &str,
        matchers: Vec<ArgMatcher>,
    ) -> Result<(), Error> {
        let data = self.handle.data();
        let method = data.find_method(name)?;
        let matcher = MethodMatcher::new(method.clone(), matchers)?;
        let action = match self.seed {
            Seed::Return(value) => {
                check_return_value(&method, &value)?;
                StubAction::Return(value)
            }
            Seed::Throw(thrown) => StubAction::Throw(thrown),
            Seed::Answer(handler) => {
                StubAction::Answer(Mutex::new(handler))
            }
        };
        debug!(mock = %data.name(), matcher = %matcher,
            "registered stub");
        data.add_stub(MethodStub { matcher, action });
        Ok(())
    }
}

/// The return-type guard.
fn check_return_value(
    method: &MethodDescriptor,
    value: &Value,
) -> Result<(), UsageError> {
    let ret = method.return_type();
    if ret == ValueType::Void {
        if !value.is_null() {
            return Err(UsageError::new("Void methods must return null"));
        }
        return Ok(());
    }
    match value.kind() {
        None => {
            if ret.is_primitive() {
                Err(UsageError::new(format!(
                    "Expected a return value of type {ret} but was null"
                )))
            } else {
                Ok(())
            }
        }
        Some(kind) if kind == ret => Ok(()),
        Some(kind) => Err(UsageError::new(format!(
            "Expected a return value of type {ret} but was {kind}"
        ))),
    }
}

#[cfg(test)]
mod t {
    use super::*;

    fn method(ret: ValueType) -> MethodDescriptor {
        MethodDescriptor::new("m", &[], ret)
    }

    #[test]
    fn void_requires_null() {
        assert!(check_return_value(
            &method(ValueType::Void),
            &Value::Null
        )
        .is_ok());
        let err = check_return_value(
            &method(ValueType::Void),
            &Value::Int(1),
        )
        .unwrap_err();
        assert_eq!("Void methods must return null", err.to_string());
    }

    #[test]
    fn primitive_rejects_null() {
        let err =
            check_return_value(&method(ValueType::Int), &Value::Null)
                .unwrap_err();
        assert_eq!(
            "Expected a return value of type Int but was null",
            err.to_string()
        );
    }

    #[test]
    fn object_accepts_null() {
        assert!(check_return_value(
            &method(ValueType::Str),
            &Value::Null
        )
        .is_ok());
    }

    #[test]
    fn mismatch_names_both_types() {
        let err = check_return_value(
            &method(ValueType::Bool),
            &Value::str("yes"),
        )
        .unwrap_err();
        assert_eq!(
            "Expected a return value of type Bool but was Str",
            err.to_string()
        );
    }
}
