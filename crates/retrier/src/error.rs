//! Error types for the retry executor.
//!
//! A wrapped operation's own error is opaque to the executor. When the
//! executor gives up it returns a [`RetryError`] carrying that error as its
//! cause, tagged with the reason it gave up.

use std::time::Duration;
use thiserror::Error;

/// Terminal failure of a wrapped operation.
///
/// Both variants keep the last operation error as their `source`, and both
/// render its message in their `Display` output.
///
/// # Examples
///
/// ```rust
/// use retrier::RetryError;
/// use std::io;
///
/// let err = RetryError::Exhausted {
///     max_retries: 3,
///     source: io::Error::other("connection reset"),
/// };
///
/// assert!(err.is_exhausted());
/// assert_eq!(
///     err.to_string(),
///     "retrier exceeded max retry count of 3. Cause: connection reset"
/// );
/// ```
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The `should_retry` predicate rejected the error.
    #[error("retrier aborted due to user supplied should_retry predicate. Cause: {source}")]
    Aborted {
        /// The error the predicate rejected
        source: E,
    },

    /// The retry limit was reached.
    #[error("retrier exceeded max retry count of {max_retries}. Cause: {source}")]
    Exhausted {
        /// The configured retry limit
        max_retries: u32,
        /// The error returned by the final attempt
        source: E,
    },
}

impl<E> RetryError<E> {
    /// The operation error that ended the retry loop.
    pub fn cause(&self) -> &E {
        match self {
            RetryError::Aborted { source } | RetryError::Exhausted { source, .. } => source,
        }
    }

    /// Consume the wrapper and return the operation error.
    pub fn into_cause(self) -> E {
        match self {
            RetryError::Aborted { source } | RetryError::Exhausted { source, .. } => source,
        }
    }

    /// Whether the retry predicate vetoed further attempts.
    pub fn is_aborted(&self) -> bool {
        matches!(self, RetryError::Aborted { .. })
    }

    /// Whether the retry limit was exhausted.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, RetryError::Exhausted { .. })
    }
}

/// Invalid retry settings.
///
/// Returned when loading [`RetrySettings`](crate::settings::RetrySettings)
/// from a document or the environment. Configurations assembled from
/// overrides are not validated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A negative retry count other than the unlimited sentinel.
    #[error("invalid max_retries {0}: expected a non-negative count or -1 for unlimited")]
    InvalidMaxRetries(i64),

    /// The base delay is larger than the max delay.
    #[error("base delay {base:?} exceeds max delay {max:?}")]
    DelayOrder {
        /// Configured base delay
        base: Duration,
        /// Configured max delay
        max: Duration,
    },

    /// An environment variable could not be parsed.
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name
        var: String,
        /// Raw value
        value: String,
    },
}
