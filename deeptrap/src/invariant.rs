//! Precondition checks that fail with a uniform message.
//!
//! ```
//! use deeptrap::invariant::{invariant, invariant_with};
//!
//! let stub = "stub";
//! assert!(invariant(stub.starts_with('s'), "first char is not \"s\"").is_ok());
//!
//! let err = invariant_with(stub.starts_with('x'), || "first char is not \"x\"".into())
//!     .unwrap_err();
//! assert_eq!(err.to_string(), "Invariant failed: first char is not \"x\"");
//! ```

use core::fmt;

const PREFIX: &str = "Invariant failed";

/// A failed invariant, with its optional message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    message: Option<String>,
}

impl InvariantViolation {
    /// A violation with no message.
    pub const fn new() -> Self {
        Self { message: None }
    }

    /// A violation carrying `message`.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The message, if one was given.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl Default for InvariantViolation {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{PREFIX}: {message}"),
            None => f.write_str(PREFIX),
        }
    }
}

impl core::error::Error for InvariantViolation {}

/// Fail with `message` unless `condition` holds.
pub fn invariant(condition: bool, message: impl Into<String>) -> Result<(), InvariantViolation> {
    if condition {
        Ok(())
    } else {
        Err(InvariantViolation::with_message(message))
    }
}

/// Like [`invariant`], but only builds the message when the check fails.
pub fn invariant_with<F>(condition: bool, message: F) -> Result<(), InvariantViolation>
where
    F: FnOnce() -> String,
{
    if condition {
        Ok(())
    } else {
        Err(InvariantViolation::with_message(message()))
    }
}

/// Return early with an [`InvariantViolation`] unless the condition holds.
///
/// The error converts with `.into()`, so the enclosing function may return any
/// error type with a `From<InvariantViolation>` impl.
///
/// ```
/// use deeptrap::invariant::InvariantViolation;
///
/// fn check(n: usize) -> Result<(), InvariantViolation> {
///     deeptrap::invariant!(n > 0);
///     deeptrap::invariant!(n < 10, "{n} is too large");
///     Ok(())
/// }
///
/// assert!(check(3).is_ok());
/// assert_eq!(check(0).unwrap_err().to_string(), "Invariant failed");
/// assert_eq!(check(12).unwrap_err().to_string(), "Invariant failed: 12 is too large");
/// ```
#[macro_export]
macro_rules! invariant {
    ($cond:expr $(,)?) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::invariant::InvariantViolation::new().into(),
            );
        }
    };
    ($cond:expr, $($fmt:tt)+) => {
        if !$cond {
            return ::core::result::Result::Err(
                $crate::invariant::InvariantViolation::with_message(::std::format!($($fmt)+))
                    .into(),
            );
        }
    };
}
