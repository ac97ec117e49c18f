// vim: tw=80
//! Immutable records of intercepted invocations.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::descriptor::MethodDescriptor;
use crate::value::Value;

/// The source position a mocked method was invoked from.
///
/// This is the diagnostic-capture collaborator: rather than filtering a
/// full stack trace, the dispatch path is `#[track_caller]` so the one
/// frame the test author cares about is captured directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallSite {
    file: &'static str,
    line: u32,
}

impl CallSite {
    #[track_caller]
    pub(crate) fn here() -> Self {
        let loc = Location::caller();
        CallSite {
            file: loc.file(),
            line: loc.line(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at {}:{}", self.file, self.line)
    }
}

/// One intercepted invocation.  Immutable once created; destroyed only by
/// an explicit reset of the owning mock's ledger.
#[derive(Clone, Debug)]
pub struct MethodCall {
    mock_name: Arc<str>,
    method: Arc<MethodDescriptor>,
    args: Vec<Value>,
    call_number: u64,
    site: CallSite,
}

impl MethodCall {
    pub(crate) fn new(
        mock_name: Arc<str>,
        method: Arc<MethodDescriptor>,
        args: Vec<Value>,
        call_number: u64,
        site: CallSite,
    ) -> Self {
        MethodCall {
            mock_name,
            method,
            args,
            call_number,
            site,
        }
    }

    pub fn mock_name(&self) -> &str {
        &self.mock_name
    }

    pub fn method(&self) -> &Arc<MethodDescriptor> {
        &self.method
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// The globally unique, monotonically increasing position of this
    /// call within its context.
    pub fn call_number(&self) -> u64 {
        self.call_number
    }

    pub fn site(&self) -> CallSite {
        self.site
    }
}

impl fmt::Display for MethodCall {
    /// Renders as `method(arg, ...)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args = self
            .args
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({})", self.method.name(), args)
    }
}
