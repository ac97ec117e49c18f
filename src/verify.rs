// vim: tw=80
//! Call-count verification.
//!
//! A verification is a range predicate `(min, max)` over the number of
//! ledger entries matching a [`MethodMatcher`], optionally restricted to
//! a window of the global call sequence.  Unbounded max means "no upper
//! limit".

use crate::data::{Mock, MockHandle};
use crate::error::{Error, VerificationError};
use crate::matcher::{ArgMatcher, MethodMatcher};
use crate::order::MockPoint;
use crate::value::calls;

/// A window of the global call sequence delimited by [`MockPoint`]
/// boundaries.  Points sit between calls, so every call is strictly on
/// one side of a point: the window holds the calls made after its start
/// point and before its end point.
#[derive(Clone, Copy, Debug)]
pub struct CallWindow {
    start: u64,
    end: Option<u64>,
}

impl CallWindow {
    fn contains(&self, number: u64) -> bool {
        number > self.start
            && self.end.map_or(true, |end| number <= end)
    }

    /// Scope a verification to this window.
    pub fn verify_exactly(self, count: usize) -> VerifyRange {
        verify_exactly(count).in_window(self)
    }

    pub fn verify_at_least(self, min: usize) -> VerifyRange {
        verify_at_least(min).in_window(self)
    }

    pub fn verify_at_most(self, max: usize) -> VerifyRange {
        verify_at_most(max).in_window(self)
    }

    pub fn verify_range(self, min: usize, max: usize) -> VerifyRange {
        verify_range(min, max).in_window(self)
    }

    pub fn verify_never(self) -> VerifyRange {
        verify_never().in_window(self)
    }

    pub fn verify_once(self) -> VerifyRange {
        verify_once().in_window(self)
    }
}

/// Verifications over the calls made between two points.
pub fn between(start: MockPoint, end: MockPoint) -> CallWindow {
    CallWindow {
        start: start.call_number(),
        end: Some(end.call_number()),
    }
}

/// Verifications over the calls made after a point.
pub fn after(start: MockPoint) -> CallWindow {
    CallWindow {
        start: start.call_number(),
        end: None,
    }
}

/// Verifications over the calls made before a point.
pub fn before(end: MockPoint) -> CallWindow {
    CallWindow {
        start: 0,
        end: Some(end.call_number()),
    }
}

/// A count predicate waiting to be applied to a mock.
#[derive(Clone, Copy, Debug)]
pub struct VerifyRange {
    min: usize,
    max: Option<usize>,
    window: Option<CallWindow>,
}

impl VerifyRange {
    /// Restrict the verification to a window of the call sequence.
    pub fn in_window(mut self, window: CallWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn on<'m, M: Mock>(&self, mock: &'m M) -> Verifier<'m> {
        Verifier {
            handle: mock.mock_handle(),
            min: self.min,
            max: self.max,
            window: self.window,
        }
    }
}

/// Verify that a method is called an exact number of times.
pub fn verify_exactly(count: usize) -> VerifyRange {
    VerifyRange {
        min: count,
        max: Some(count),
        window: None,
    }
}

/// Verify that a method is called at least `min` times.
pub fn verify_at_least(min: usize) -> VerifyRange {
    VerifyRange {
        min,
        max: None,
        window: None,
    }
}

/// Verify that a method is called at most `max` times.
pub fn verify_at_most(max: usize) -> VerifyRange {
    VerifyRange {
        min: 0,
        max: Some(max),
        window: None,
    }
}

/// Verify that a method is called between `min` and `max` times,
/// inclusive.
pub fn verify_range(min: usize, max: usize) -> VerifyRange {
    VerifyRange {
        min,
        max: Some(max),
        window: None,
    }
}

/// Verify that a method is never called.  Equivalent to
/// `verify_exactly(0)`.
pub fn verify_never() -> VerifyRange {
    verify_exactly(0)
}

/// Verify that a method is called exactly once.  Equivalent to
/// `verify_exactly(1)`.
pub fn verify_once() -> VerifyRange {
    verify_exactly(1)
}

pub struct Verifier<'m> {
    handle: &'m MockHandle,
    min: usize,
    max: Option<usize>,
    window: Option<CallWindow>,
}

impl Verifier<'_> {
    /// Walk the ledger counting calls matching the method and argument
    /// matchers; fail if the count falls outside `[min, max]`.
    pub fn method(
        &self,
        name: &str,
        matchers: Vec<ArgMatcher>,
    ) -> Result<(), Error> {
        let data = self.handle.data();
        let method = data.find_method(name)?;
        let matcher = MethodMatcher::new(method, matchers)?;

        let matching: Vec<_> = data
            .calls_snapshot()
            .into_iter()
            .filter(|call| {
                self.window
                    .map_or(true, |w| w.contains(call.call_number()))
                    && matcher.matches(call)
            })
            .collect();
        let count = matching.len();

        let ok = count >= self.min
            && self.max.map_or(true, |max| count <= max);
        if ok {
            return Ok(());
        }

        let mut message = format!(
            "Expected {} to {}.{} but got {}",
            expected_text(self.min, self.max),
            data.name(),
            matcher,
            calls(count)
        );
        for call in &matching {
            message.push_str(&format!("\n\t{} {}", call, call.site()));
        }
        Err(VerificationError::new(message).into())
    }
}

fn expected_text(min: usize, max: Option<usize>) -> String {
    match max {
        Some(max) if min == max => calls(min),
        Some(max) if min == 0 => format!("at most {}", calls(max)),
        Some(max) => format!("between {min} and {max} calls"),
        None => format!("at least {}", calls(min)),
    }
}
