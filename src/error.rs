//! Error types for the cachemock library.
//!
//! ## Key Components
//! - [`Mismatch`]: a required expectation's kind matched the incoming call
//!   but its arguments did not; names expected vs. actual values.
//! - [`MockError`]: everything an invocation or verification method can
//!   return — the configured forced error, an argument mismatch, an
//!   ordering/gate failure, exhaustion, or an unmet expectation.
//!
//! All errors are returned to the immediate caller. Nothing is retried or
//! recovered internally; the test decides what constitutes a failure.

use std::sync::Arc;

use thiserror::Error;

use crate::expectation::Method;

/// A caller-supplied error stored on an expectation via
/// `will_return_error`, handed back verbatim on every matching call.
pub type ClientError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Argument mismatch raised by a matcher predicate when a required
/// expectation's kind matches the call but its arguments do not.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Mismatch {
    /// The actual key differs from the expected key.
    #[error("expected key {expected}, but got key {actual}")]
    Key {
        /// Key the expectation was configured with.
        expected: String,
        /// Key the call supplied.
        actual: String,
    },
    /// The actual key sequence differs from the expected one in length,
    /// content, or order. Order matters; no set-equality is attempted.
    #[error("expected keys {expected:?}, but got keys {actual:?}")]
    Keys {
        /// Key sequence the expectation was configured with.
        expected: Vec<String>,
        /// Key sequence the call supplied.
        actual: Vec<String>,
    },
    /// The expectation was configured without an item but the call
    /// supplied one.
    #[error("did not expect an item, but got item with key {key}")]
    UnexpectedItem {
        /// Key of the item the call supplied.
        key: String,
    },
    /// The expectation was configured with an item but the call supplied
    /// none.
    #[error("expected item with key {key}, but got no item")]
    MissingItem {
        /// Key of the item the expectation was configured with.
        key: String,
    },
    /// A single item field differs between the expected and actual item.
    #[error("expected item with {field} {expected}, but got item with {field} {actual}")]
    ItemField {
        /// Which of the five compared fields differed.
        field: &'static str,
        /// Rendered expected value.
        expected: String,
        /// Rendered actual value.
        actual: String,
    },
    /// The actual increment/decrement delta differs from the expected one.
    #[error("expected call with delta {expected}, but got delta {actual}")]
    Delta {
        /// Delta the expectation was configured with.
        expected: u64,
        /// Delta the call supplied.
        actual: u64,
    },
    /// The actual touch duration differs from the expected one.
    #[error("expected call with seconds {expected}, but got seconds {actual}")]
    Seconds {
        /// Seconds the expectation was configured with.
        expected: i32,
        /// Seconds the call supplied.
        actual: i32,
    },
}

/// Error returned by the mock's invocation and verification methods.
#[derive(Debug, Clone, Error)]
pub enum MockError {
    /// The forced error configured on the matched expectation, returned
    /// verbatim. Argument matching happens first and takes priority.
    #[error("{0}")]
    Client(ClientError),

    /// A required expectation of the right kind rejected the call's
    /// arguments.
    #[error(transparent)]
    Mismatch(#[from] Mismatch),

    /// A required expectation of a different kind gates the queue; nothing
    /// past it may match until it is consumed.
    #[error("call to {method} was not expected, next expectation is: {next}")]
    Blocked {
        /// The invoked operation.
        method: Method,
        /// Rendering of the blocking expectation.
        next: String,
    },

    /// No pending expectation matches this call.
    #[error("call to {method} was not expected")]
    Unexpected {
        /// The invoked operation.
        method: Method,
    },

    /// Every registered expectation was already consumed.
    #[error("all expectations were already fulfilled, call to {method} was not expected")]
    AllFulfilled {
        /// The invoked operation.
        method: Method,
    },

    /// Verification found a required expectation that was never fulfilled.
    #[error("there is a remaining expectation which was not matched: {expectation}")]
    Unmet {
        /// Rendering of the first unmet expectation.
        expectation: String,
    },
}

impl MockError {
    /// Returns the underlying caller-supplied error when this is a forced
    /// [`MockError::Client`] outcome.
    pub fn as_client(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Client(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}
