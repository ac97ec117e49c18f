// vim: tw=80
//! Per-mock storage and the dispatch router.
//!
//! Every mock owns a [`MockData`]: an append-only ledger of intercepted
//! calls, a per-method stub registry, and a per-method listener registry.
//! The three registries are independent and independently resettable.
//! All calls on a mock's facade route through [`MockHandle::invoke`],
//! which is the dispatch router of the framework.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::call::{CallSite, MethodCall};
use crate::context::ContextInner;
use crate::descriptor::{MethodDescriptor, TypeDescriptor};
use crate::error::{Error, Thrown, UsageError};
use crate::matcher::{ArgMatcher, MethodMatcher};
use crate::stub::MethodStub;
use crate::value::Value;

/// Custom logic run in place of a canned return value: a spy delegate, a
/// custom fallback handler, or a `stub_answer` action.
pub trait CallHandler: Send {
    fn handle(&mut self, call: &MethodCall) -> Result<Value, Thrown>;
}

impl<F> CallHandler for F
where
    F: FnMut(&MethodCall) -> Result<Value, Thrown> + Send,
{
    fn handle(&mut self, call: &MethodCall) -> Result<Value, Thrown> {
        self(call)
    }
}

type Listener = Box<dyn FnMut(&MethodCall) + Send>;

struct ListenerEntry {
    matcher: MethodMatcher,
    handler: Mutex<Listener>,
}

/// The three per-mock registries.
///
/// Stubs and listeners are stored behind `Arc` so the dispatch router can
/// snapshot them and release the registry guards before any user code
/// runs; a handler may re-enter the mock it is registered on.
pub struct MockData {
    name: Arc<str>,
    descriptor: TypeDescriptor,
    calls: Mutex<Vec<MethodCall>>,
    stubs: Mutex<HashMap<String, Vec<Arc<MethodStub>>>>,
    listeners: Mutex<HashMap<String, Vec<Arc<ListenerEntry>>>>,
    delegate: Option<Mutex<Box<dyn CallHandler>>>,
}

impl MockData {
    pub(crate) fn new(
        name: Arc<str>,
        descriptor: TypeDescriptor,
        delegate: Option<Box<dyn CallHandler>>,
    ) -> Self {
        MockData {
            name,
            descriptor,
            calls: Mutex::new(Vec::new()),
            stubs: Mutex::new(HashMap::new()),
            listeners: Mutex::new(HashMap::new()),
            delegate: delegate.map(Mutex::new),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn find_method(
        &self,
        name: &str,
    ) -> Result<Arc<MethodDescriptor>, UsageError> {
        self.descriptor.find(name).cloned().ok_or_else(|| {
            UsageError::new(format!(
                "{} has no method named {}",
                self.name, name
            ))
        })
    }

    pub(crate) fn calls_snapshot(&self) -> Vec<MethodCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn add_stub(&self, stub: MethodStub) {
        self.stubs
            .lock()
            .unwrap()
            .entry(stub.matcher().method().name().to_owned())
            .or_default()
            .push(Arc::new(stub));
    }

    pub(crate) fn add_listener(
        &self,
        matcher: MethodMatcher,
        handler: Listener,
    ) {
        self.listeners
            .lock()
            .unwrap()
            .entry(matcher.method().name().to_owned())
            .or_default()
            .push(Arc::new(ListenerEntry {
                matcher,
                handler: Mutex::new(handler),
            }));
    }

    pub(crate) fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub(crate) fn clear_stubs(&self) {
        self.stubs.lock().unwrap().clear();
    }

    pub(crate) fn clear_listeners(&self) {
        self.listeners.lock().unwrap().clear();
    }
}

/// The dispatch handle held by every generated facade.
#[derive(Clone)]
pub struct MockHandle {
    data: Arc<MockData>,
    context: Arc<ContextInner>,
}

impl MockHandle {
    pub(crate) fn new(
        data: Arc<MockData>,
        context: Arc<ContextInner>,
    ) -> Self {
        MockHandle { data, context }
    }

    pub(crate) fn data(&self) -> &Arc<MockData> {
        &self.data
    }

    /// The dispatch router.  On every intercepted call: allocate the next
    /// call number, record the call in the ledger, notify matching
    /// listeners in registration order, then resolve the answer from the
    /// most recently registered matching stub.  When no stub matches, the
    /// spy delegate answers if one is installed, otherwise the return
    /// type's default value.
    ///
    /// # Panics
    ///
    /// Panics on an unknown method name or a wrong argument count.  Both
    /// indicate a broken facade, not test-author misuse: the `mockable!`
    /// macro cannot generate either.
    #[track_caller]
    pub fn invoke(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, Thrown> {
        let site = CallSite::here();
        let desc = match self.data.find_method(method) {
            Ok(desc) => desc,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(
            desc.arity(),
            args.len(),
            "{}.{} takes {} arguments but the facade passed {}",
            self.data.name,
            method,
            desc.arity(),
            args.len()
        );

        let number = self.context.next_call_number();
        let call = MethodCall::new(
            self.data.name.clone(),
            desc.clone(),
            args,
            number,
            site,
        );
        self.data.calls.lock().unwrap().push(call.clone());
        trace!(mock = %self.data.name, call = %call, number, "dispatch");

        // No registry guard may be held while user code runs: listener
        // handlers, answer closures and matchers may re-enter this mock.
        let listeners: Vec<Arc<ListenerEntry>> = self
            .data
            .listeners
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or_default();
        for entry in listeners {
            if entry.matcher.matches(&call) {
                let mut handler = entry.handler.lock().unwrap();
                (*handler)(&call);
            }
        }

        let stubs: Vec<Arc<MethodStub>> = self
            .data
            .stubs
            .lock()
            .unwrap()
            .get(method)
            .cloned()
            .unwrap_or_default();
        // Most recently registered stub wins.
        if let Some(stub) =
            stubs.iter().rev().find(|s| s.matcher().matches(&call))
        {
            return stub.action().invoke(&call);
        }

        if let Some(delegate) = &self.data.delegate {
            return delegate.lock().unwrap().handle(&call);
        }
        Ok(desc.return_type().default_value())
    }
}

/// Implemented by every mock facade; gives the framework access to the
/// dispatch handle.
pub trait Mock {
    fn mock_handle(&self) -> &MockHandle;
}

/// A type whose mock facade can be synthesized by a
/// [`MockContext`](crate::MockContext).  Implemented by the
/// [`mockable!`](crate::mockable) macro.
pub trait Mockable: Mock + Sized {
    /// The method-signature table of the mocked type.
    fn type_descriptor() -> TypeDescriptor;

    fn from_handle(handle: MockHandle) -> Self;
}

/// The recorded ledger of a mock, for debugging.
pub fn calls_of<M: Mock>(mock: &M) -> Vec<MethodCall> {
    mock.mock_handle().data().calls_snapshot()
}

/// Clear a mock's calls, stubs and listeners.
pub fn reset<M: Mock>(mock: &M) {
    reset_calls(mock);
    reset_stubs(mock);
    reset_listeners(mock);
}

/// Clear a mock's call ledger.
pub fn reset_calls<M: Mock>(mock: &M) {
    mock.mock_handle().data().clear_calls();
}

/// Clear a mock's registered stubs.
pub fn reset_stubs<M: Mock>(mock: &M) {
    mock.mock_handle().data().clear_stubs();
}

/// Clear a mock's registered listeners.
pub fn reset_listeners<M: Mock>(mock: &M) {
    mock.mock_handle().data().clear_listeners();
}

/// Start registering a listener: a side-effecting observer notified with
/// every matching call after it is recorded.  Listeners never alter the
/// dispatched return value.
pub fn listen_with<F>(listener: F) -> ListenerAdder
where
    F: FnMut(&MethodCall) + Send + 'static,
{
    ListenerAdder {
        listener: Box::new(listener),
    }
}

pub struct ListenerAdder {
    listener: Listener,
}

impl ListenerAdder {
    pub fn on<M: Mock>(self, mock: &M) -> ListenerTarget<'_> {
        ListenerTarget {
            handle: mock.mock_handle(),
            listener: self.listener,
        }
    }
}

pub struct ListenerTarget<'m> {
    handle: &'m MockHandle,
    listener: Listener,
}

impl ListenerTarget<'_> {
    /// Bind the listener to a method and argument matchers.
    pub fn method(
        self,
        name: &str,
        matchers: Vec<ArgMatcher>,
    ) -> Result<(), Error> {
        let data = self.handle.data();
        let method = data.find_method(name)?;
        let matcher = MethodMatcher::new(method, matchers)?;
        tracing::debug!(mock = %data.name(), matcher = %matcher,
            "registered listener");
        data.add_listener(matcher, self.listener);
        Ok(())
    }
}
