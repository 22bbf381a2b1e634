//! Named configuration overrides.
//!
//! Each constructor produces one [`Override`]. Overrides compose freely and are
//! applied in the order given, so later ones win on conflicting fields.

use super::config::{MaxRetries, RetryConfig};
use crate::backoff::Backoff;
use crate::log::LogSink;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A single mutation of a [`RetryConfig`].
///
/// ```rust
/// use retrier::{Override, RetryConfig};
/// use std::time::Duration;
///
/// // A custom override touching two fields at once.
/// let tight: Override<std::io::Error> = Override::new(|config| {
///     config.base_delay = Duration::from_millis(5);
///     config.max_delay = Duration::from_millis(50);
/// });
///
/// let config = RetryConfig::with_overrides([tight]);
/// assert_eq!(config.max_delay, Duration::from_millis(50));
/// ```
pub struct Override<E>(Box<dyn FnOnce(&mut RetryConfig<E>) + Send>);

impl<E> Override<E> {
    /// Wrap an arbitrary mutation.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce(&mut RetryConfig<E>) + Send + 'static,
    {
        Self(Box::new(f))
    }

    /// Apply the mutation.
    pub fn apply(self, config: &mut RetryConfig<E>) {
        (self.0)(config)
    }
}

impl<E> fmt::Debug for Override<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Override")
    }
}

/// Set the retry limit. Accepts a count or [`INFINITY`](crate::INFINITY).
pub fn max_retries<E: 'static>(limit: impl Into<MaxRetries>) -> Override<E> {
    let limit = limit.into();
    Override::new(move |config| config.max_retries = limit)
}

/// Set the base delay.
pub fn base_delay<E: 'static>(delay: Duration) -> Override<E> {
    Override::new(move |config| config.base_delay = delay)
}

/// Set the max delay.
pub fn max_delay<E: 'static>(delay: Duration) -> Override<E> {
    Override::new(move |config| config.max_delay = delay)
}

/// Set the retry predicate. Returning `false` aborts without further attempts.
///
/// ```rust
/// use retrier::{retry, should_retry};
/// use std::io;
///
/// let op = retry(
///     || Err::<(), _>(io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
///     [should_retry(|err: &io::Error| err.kind() != io::ErrorKind::PermissionDenied)],
/// );
///
/// assert!(op.call().unwrap_err().is_aborted());
/// ```
pub fn should_retry<E, P>(predicate: P) -> Override<E>
where
    E: 'static,
    P: Fn(&E) -> bool + Send + Sync + 'static,
{
    let predicate: Arc<dyn Fn(&E) -> bool + Send + Sync> = Arc::new(predicate);
    Override::new(move |config| config.should_retry = predicate)
}

/// Set the backoff function.
pub fn calculate_delay<E, B>(backoff: B) -> Override<E>
where
    E: 'static,
    B: Backoff + 'static,
{
    let backoff: Arc<dyn Backoff> = Arc::new(backoff);
    Override::new(move |config| config.calculate_delay = backoff)
}

/// Set the log sink.
pub fn log<E: 'static>(sink: LogSink) -> Override<E> {
    Override::new(move |config| config.log = sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backoff::Fixed;
    use crate::INFINITY;
    use std::io;

    #[test]
    fn test_each_override_sets_its_field() {
        let config = RetryConfig::<io::Error>::with_overrides([
            max_retries(2),
            base_delay(Duration::from_millis(7)),
            max_delay(Duration::from_millis(70)),
            should_retry(|err: &io::Error| err.kind() == io::ErrorKind::TimedOut),
            calculate_delay(Fixed),
            log(LogSink::new(|_| {})),
        ]);

        assert_eq!(config.max_retries, MaxRetries::Limited(2));
        assert_eq!(config.base_delay, Duration::from_millis(7));
        assert_eq!(config.max_delay, Duration::from_millis(70));
        assert!((config.should_retry)(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!(config.should_retry)(&io::Error::other("nope")));
        assert_eq!(
            config.calculate_delay.calculate_delay(9, config.base_delay, config.max_delay),
            Duration::from_millis(7)
        );
        assert!(!config.log.is_noop());
    }

    #[test]
    fn test_later_override_wins() {
        let config = RetryConfig::<io::Error>::with_overrides([
            max_retries(INFINITY),
            base_delay(Duration::from_secs(1)),
            max_retries(4),
            base_delay(Duration::from_millis(3)),
        ]);

        assert_eq!(config.max_retries, MaxRetries::Limited(4));
        assert_eq!(config.base_delay, Duration::from_millis(3));
    }

    #[test]
    fn test_untouched_fields_keep_defaults() {
        let config = RetryConfig::<io::Error>::with_overrides([max_delay(Duration::from_secs(5))]);

        assert_eq!(config.max_retries, crate::DEFAULT_MAX_RETRIES);
        assert_eq!(config.base_delay, crate::DEFAULT_BASE_DELAY);
    }

    #[test]
    fn test_apply_on_existing_config() {
        let mut config = RetryConfig::<io::Error>::default();
        config.apply(vec![max_retries(0)]);
        assert_eq!(config.max_retries, MaxRetries::Limited(0));
    }
}
