// vim: tw=80
//! The ordering engine.
//!
//! An [`OrderingContext`] holds a cursor over the global call sequence:
//! the last call it matched, initially "start of time" (call number 0).
//! Each successful in-order verification advances the cursor; it never
//! moves backwards.  Distinct ordering contexts are fully independent,
//! even over the same mocks.

use std::sync::Mutex;

use crate::call::MethodCall;
use crate::data::{Mock, MockHandle};
use crate::error::{Error, VerificationError};
use crate::matcher::{ArgMatcher, MethodMatcher};
use crate::value::calls;

/// A position between two calls of the global sequence, used as a
/// boundary for `before`/`after`/`between` verification windows.
///
/// A point taken after call `n` sits behind calls `1..=n` and ahead of
/// every later call; no call is ever "at" a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockPoint {
    call_number: u64,
}

impl MockPoint {
    pub(crate) fn new(call_number: u64) -> Self {
        MockPoint { call_number }
    }

    /// The number of the last call before this point.
    pub fn call_number(&self) -> u64 {
        self.call_number
    }
}

/// An independent in-order verification cursor.
///
/// Created by [`MockContext::new_ordering`](crate::MockContext::new_ordering).
pub struct OrderingContext {
    cursor: Mutex<Option<MethodCall>>,
}

impl OrderingContext {
    pub(crate) fn new() -> Self {
        OrderingContext {
            cursor: Mutex::new(None),
        }
    }

    /// Verify that a matching call occurs after the cursor.  Shortcut
    /// for [`verify_at_least(1)`](Self::verify_at_least).
    pub fn verify(&self) -> InOrderVerify<'_> {
        self.verify_at_least(1)
    }

    /// Verify that at least `min` matching calls occur after the cursor,
    /// advancing the cursor to the `min`-th one on success.
    pub fn verify_at_least(&self, min: usize) -> InOrderVerify<'_> {
        InOrderVerify { order: self, min }
    }

    /// The cursor's position as a [`MockPoint`]: the boundary just after
    /// the last matched call, or the start of time when nothing has
    /// matched yet.
    pub fn current_point(&self) -> MockPoint {
        let number = self
            .cursor
            .lock()
            .unwrap()
            .as_ref()
            .map_or(0, |call| call.call_number());
        MockPoint::new(number)
    }
}

pub struct InOrderVerify<'o> {
    order: &'o OrderingContext,
    min: usize,
}

impl<'o> InOrderVerify<'o> {
    pub fn on<'m, M: Mock>(
        self,
        mock: &'m M,
    ) -> InOrderVerifier<'o, 'm> {
        InOrderVerifier {
            order: self.order,
            handle: mock.mock_handle(),
            min: self.min,
        }
    }
}

pub struct InOrderVerifier<'o, 'm> {
    order: &'o OrderingContext,
    handle: &'m MockHandle,
    min: usize,
}

impl InOrderVerifier<'_, '_> {
    /// Scan the ledger strictly after the cursor in call-number order;
    /// succeed and advance the cursor on the `min`-th match, fail with
    /// the cursor unmoved otherwise.
    pub fn method(
        &self,
        name: &str,
        matchers: Vec<ArgMatcher>,
    ) -> Result<(), Error> {
        let data = self.handle.data();
        let method = data.find_method(name)?;
        let matcher = MethodMatcher::new(method, matchers)?;

        if self.min == 0 {
            return Ok(());
        }

        let last = self.order.cursor.lock().unwrap().clone();
        let last_number =
            last.as_ref().map_or(0, |call| call.call_number());

        let mut count = 0;
        for call in data.calls_snapshot() {
            // Skip already visited calls.
            if call.call_number() <= last_number {
                continue;
            }
            if matcher.matches(&call) {
                count += 1;
                if count >= self.min {
                    *self.order.cursor.lock().unwrap() = Some(call);
                    return Ok(());
                }
            }
        }

        let mut message = format!(
            "Expected {} to {}.{} but only got {}",
            calls(self.min),
            data.name(),
            matcher,
            calls(count)
        );
        if let Some(last) = last {
            message.push_str(&format!(
                " after {}.{} {}",
                last.mock_name(),
                last,
                last.site()
            ));
        }
        Err(VerificationError::new(message).into())
    }
}
