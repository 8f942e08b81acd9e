use std::fmt;
use std::panic::Location;

use category::CategoryId;

use crate::dispatcher::Dispatcher;

/// Which check failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssertionKind {
    /// A condition expected to hold was false.
    IsTrue,
    /// A condition expected to be false held.
    IsFalse,
    /// A value expected to be present was `None`.
    IsSome,
    /// The value at `index` of a batch was `None`.
    AllSome {
        /// Position of the first missing value.
        index: usize,
    },
    /// Two values differed.
    IsEqual {
        /// Debug rendering of the expected value.
        expected: String,
        /// Debug rendering of the actual value.
        actual: String,
    },
    /// A value was not of the expected type.
    IsType {
        /// Name of the expected type.
        expected: &'static str,
    },
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsTrue => f.write_str("expected true"),
            Self::IsFalse => f.write_str("expected false"),
            Self::IsSome => f.write_str("expected a value"),
            Self::AllSome { index } => write!(f, "expected a value at index {index}"),
            Self::IsEqual { expected, actual } => {
                write!(f, "expected {expected}, got {actual}")
            }
            Self::IsType { expected } => write!(f, "expected type {expected}"),
        }
    }
}

/// A failed check, as passed to an [`AssertionHandler`].
#[derive(Clone, Debug)]
pub struct AssertionFailure<'a> {
    /// Category the check belongs to.
    pub category: CategoryId,
    /// Name of that category.
    pub category_name: &'a str,
    /// What failed.
    pub kind: AssertionKind,
    /// Caller-supplied failure message.
    pub message: &'a str,
    /// Call site of the check.
    pub location: &'static Location<'static>,
}

impl fmt::Display for AssertionFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Assertion failed: {} ({}) at {}",
            self.message, self.kind, self.location
        )
    }
}

/// Receives failed checks from every [`CategoryAssert`](crate::CategoryAssert).
pub trait AssertionHandler: Send + Sync {
    /// Called once per failed check, only while the category's asserts are on.
    fn on_failure(&self, failure: &AssertionFailure<'_>, dispatcher: &Dispatcher);
}

/// Reports failures as category errors (always shown on the console).
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAssertionFailures;

impl AssertionHandler for LogAssertionFailures {
    fn on_failure(&self, failure: &AssertionFailure<'_>, dispatcher: &Dispatcher) {
        dispatcher.log_error(failure.category, failure);
    }
}

/// Logs the failure like [`LogAssertionFailures`], then panics.
#[derive(Clone, Copy, Debug, Default)]
pub struct PanicOnFailure;

impl AssertionHandler for PanicOnFailure {
    fn on_failure(&self, failure: &AssertionFailure<'_>, dispatcher: &Dispatcher) {
        dispatcher.log_error(failure.category, failure);
        dispatcher.flush();
        panic!("[{}] {failure}", failure.category_name);
    }
}
