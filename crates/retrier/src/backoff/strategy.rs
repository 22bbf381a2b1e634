//! The backoff function abstraction.

use std::time::Duration;

/// A policy computing how long to wait before the next attempt.
///
/// Implementations must return a delay within `[0, max]` for every input,
/// including attempt numbers large enough to overflow naive arithmetic.
///
/// Any closure of shape `Fn(u32, Duration, Duration) -> Duration` is a
/// `Backoff`, so one-off policies need no dedicated type:
///
/// ```rust
/// use retrier::backoff::Backoff;
/// use std::time::Duration;
///
/// let half_max = |_attempt: u32, _base: Duration, max: Duration| max / 2;
/// assert_eq!(
///     half_max.calculate_delay(7, Duration::ZERO, Duration::from_secs(2)),
///     Duration::from_secs(1)
/// );
/// ```
pub trait Backoff: Send + Sync {
    /// Calculate the delay before the next attempt.
    ///
    /// # Parameters
    /// - `attempt`: Number of retries already performed (0 before the first retry)
    /// - `base`: The configured base delay
    /// - `max`: The configured upper bound
    fn calculate_delay(&self, attempt: u32, base: Duration, max: Duration) -> Duration;
}

impl<F> Backoff for F
where
    F: Fn(u32, Duration, Duration) -> Duration + Send + Sync,
{
    fn calculate_delay(&self, attempt: u32, base: Duration, max: Duration) -> Duration {
        self(attempt, base, max)
    }
}
