// vim: tw=80
//! The explicit mock context.
//!
//! A [`MockContext`] owns the monotonically increasing call-number
//! sequence shared by every mock it creates, which is what makes
//! cross-mock temporal assertions possible.  Contexts are ordinary
//! values: create one per test, or several fully independent ones.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::data::{CallHandler, MockData, MockHandle, Mockable};
use crate::order::{MockPoint, OrderingContext};

pub(crate) struct ContextInner {
    sequence: AtomicU64,
    next_mock_id: AtomicU64,
}

impl ContextInner {
    /// Allocate the next global call number.  Numbers are exactly
    /// `{1..N}` in invocation order across all of this context's mocks.
    pub(crate) fn next_call_number(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn last_call_number(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

/// The entry point of all your mocking needs.
pub struct MockContext {
    inner: Arc<ContextInner>,
}

impl Default for MockContext {
    fn default() -> Self {
        MockContext {
            inner: Arc::new(ContextInner {
                sequence: AtomicU64::new(0),
                next_mock_id: AtomicU64::new(0),
            }),
        }
    }
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new mock.  Unstubbed calls answer with the return type's
    /// default value.
    pub fn mock<T: Mockable>(&self) -> T {
        self.build(None)
    }

    /// Create a new mock with a custom fallback handler, called for
    /// every invocation no stub answers.
    pub fn mock_with_handler<T, H>(&self, handler: H) -> T
    where
        T: Mockable,
        H: CallHandler + 'static,
    {
        self.build(Some(Box::new(handler)))
    }

    /// Create a mock that spies on a real implementation: unless
    /// overridden by stubbing, `delegate` answers all invocations.
    pub fn spy<T, H>(&self, delegate: H) -> T
    where
        T: Mockable,
        H: CallHandler + 'static,
    {
        self.build(Some(Box::new(delegate)))
    }

    fn build<T: Mockable>(
        &self,
        delegate: Option<Box<dyn CallHandler>>,
    ) -> T {
        let descriptor = T::type_descriptor();
        let id = self.inner.next_mock_id.fetch_add(1, Ordering::Relaxed)
            + 1;
        let name: Arc<str> =
            format!("{}:{}", descriptor.type_name(), id).into();
        debug!(mock = %name, "created mock");
        let data = Arc::new(MockData::new(name, descriptor, delegate));
        T::from_handle(MockHandle::new(data, self.inner.clone()))
    }

    /// A snapshot of the current position in the call sequence: a
    /// boundary behind every call made so far and ahead of every later
    /// one, usable with [`before`](crate::before)/
    /// [`after`](crate::after)/[`between`](crate::between).
    pub fn current_point(&self) -> MockPoint {
        MockPoint::new(self.inner.last_call_number())
    }

    /// Create a new ordering context for verifying calls in order.
    /// Ordering contexts are completely independent of each other.
    pub fn new_ordering(&self) -> OrderingContext {
        OrderingContext::new()
    }
}
