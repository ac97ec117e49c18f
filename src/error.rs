// vim: tw=80
//! Error types.
//!
//! Programmer misuse is reported at registration time as a
//! [`UsageError`]; an unmet expectation is reported when the assertion is
//! evaluated as a [`VerificationError`].  Neither is retried or recovered
//! internally.  A stubbed throw surfaces as a [`Thrown`] payload in the
//! `Err` arm of the mocked method's return value.

use thiserror::Error;

/// Programmer misuse, raised immediately at registration time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct UsageError {
    message: String,
}

impl UsageError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        UsageError {
            message: message.into(),
        }
    }
}

/// An expectation that was not met, raised when a verify or in-order
/// assertion is evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct VerificationError {
    message: String,
}

impl VerificationError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        VerificationError {
            message: message.into(),
        }
    }
}

/// The payload of a `stub_throw` action, returned as the `Err` arm of the
/// mocked method when the stub fires.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Thrown {
    message: String,
}

impl Thrown {
    pub fn new(message: impl Into<String>) -> Self {
        Thrown {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Every failure a registration or verification call can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl Error {
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::Usage(_))
    }

    pub fn is_verification(&self) -> bool {
        matches!(self, Error::Verification(_))
    }
}
