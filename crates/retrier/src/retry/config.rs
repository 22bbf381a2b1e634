//! Retry configuration and the per-error decision rule.

use crate::backoff::{Backoff, Binary};
use crate::error::{ConfigError, RetryError};
use crate::log::LogSink;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default retry limit.
pub const DEFAULT_MAX_RETRIES: MaxRetries = MaxRetries::Limited(10);

/// Default base delay.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1);

/// Default max delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Retry limit meaning "never give up".
pub const INFINITY: MaxRetries = MaxRetries::Unlimited;

/// How many retries (attempts beyond the first) are permitted.
///
/// `Limited(n)` permits up to `n + 1` invocations of the operation.
///
/// In documents and environment variables the limit is written as an integer,
/// where `-1` ([`MaxRetries::INFINITY_SENTINEL`]) means unlimited.
///
/// ```rust
/// use retrier::MaxRetries;
///
/// assert_eq!(MaxRetries::try_from(-1_i64), Ok(MaxRetries::Unlimited));
/// assert_eq!(MaxRetries::try_from(3_i64), Ok(MaxRetries::Limited(3)));
/// assert!(MaxRetries::try_from(-2_i64).is_err());
/// assert_eq!(i64::from(MaxRetries::Unlimited), -1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum MaxRetries {
    /// At most this many retries.
    Limited(u32),
    /// Retry until success or a predicate veto.
    Unlimited,
}

impl MaxRetries {
    /// Integer encoding of [`MaxRetries::Unlimited`].
    pub const INFINITY_SENTINEL: i64 = -1;

    /// Whether no retry is left once `attempt` retries have been performed.
    pub fn is_reached(self, attempt: u32) -> bool {
        match self {
            MaxRetries::Limited(limit) => attempt >= limit,
            MaxRetries::Unlimited => false,
        }
    }
}

impl From<u32> for MaxRetries {
    fn from(limit: u32) -> Self {
        MaxRetries::Limited(limit)
    }
}

impl TryFrom<i64> for MaxRetries {
    type Error = ConfigError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == Self::INFINITY_SENTINEL {
            return Ok(MaxRetries::Unlimited);
        }
        u32::try_from(value)
            .map(MaxRetries::Limited)
            .map_err(|_| ConfigError::InvalidMaxRetries(value))
    }
}

impl From<MaxRetries> for i64 {
    fn from(value: MaxRetries) -> Self {
        match value {
            MaxRetries::Limited(limit) => i64::from(limit),
            MaxRetries::Unlimited => MaxRetries::INFINITY_SENTINEL,
        }
    }
}

impl fmt::Display for MaxRetries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxRetries::Limited(limit) => write!(f, "{limit}"),
            MaxRetries::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Retry predicate over the operation's error.
pub type ShouldRetry<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Configuration of a wrapped operation.
///
/// Built from [`RetryConfig::default`] plus an ordered list of
/// [`Override`](super::Override)s, and read-only once the wrapped operation
/// exists. Nothing is validated here: a base delay above the max delay makes
/// the built-in backoffs return the max delay.
///
/// # Examples
///
/// ```rust
/// use retrier::{RetryConfig, base_delay, max_retries};
/// use std::time::Duration;
///
/// let config = RetryConfig::<std::io::Error>::with_overrides([
///     max_retries(3),
///     base_delay(Duration::from_millis(10)),
///     max_retries(5), // later overrides win
/// ]);
///
/// assert_eq!(config.max_retries, 5.into());
/// assert_eq!(config.base_delay, Duration::from_millis(10));
/// ```
pub struct RetryConfig<E> {
    /// Retries permitted after the first attempt
    pub max_retries: MaxRetries,
    /// Initial delay handed to the backoff function
    pub base_delay: Duration,
    /// Upper bound handed to the backoff function
    pub max_delay: Duration,
    /// Returning `false` aborts immediately
    pub should_retry: ShouldRetry<E>,
    /// Backoff function
    pub calculate_delay: Arc<dyn Backoff>,
    /// Progress message sink
    pub log: LogSink,
}

/// What the executor does after a failed attempt.
pub(crate) enum Step<E> {
    /// Sleep this long, then try again.
    Wait(Duration),
    /// Give up with this error.
    Stop(RetryError<E>),
}

impl<E: 'static> RetryConfig<E> {
    /// The defaults with `overrides` applied in order.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = super::Override<E>>,
    {
        let mut config = Self::default();
        config.apply(overrides);
        config
    }
}

impl<E> RetryConfig<E> {
    /// Apply `overrides` in order.
    pub fn apply<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = super::Override<E>>,
    {
        for o in overrides {
            o.apply(self);
        }
    }

    /// Log the retry banner. The first attempt is silent.
    pub(crate) fn before_attempt(&self, attempt: u32) {
        if attempt > 0 {
            self.log.log(format_args!("Retrying attempt {attempt}"));
        }
    }

    /// Decide what follows the failure of attempt number `attempt`.
    pub(crate) fn next_step(&self, attempt: u32, error: E) -> Step<E> {
        if !(self.should_retry)(&error) {
            #[cfg(feature = "tracing")]
            tracing::warn!(attempt, "retry aborted by should_retry predicate");
            return Step::Stop(RetryError::Aborted { source: error });
        }

        if let MaxRetries::Limited(max_retries) = self.max_retries
            && self.max_retries.is_reached(attempt)
        {
            #[cfg(feature = "tracing")]
            tracing::warn!(attempt, max_retries, "retry limit exhausted");
            return Step::Stop(RetryError::Exhausted {
                max_retries,
                source: error,
            });
        }

        let delay = self
            .calculate_delay
            .calculate_delay(attempt, self.base_delay, self.max_delay);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt,
            ?delay,
            "operation failed, scheduling retry"
        );

        self.log.log(format_args!("Will retry in {delay:?}"));
        Step::Wait(delay)
    }
}

impl<E: 'static> Default for RetryConfig<E> {
    /// Defaults:
    /// - `max_retries`: 10
    /// - `base_delay`: 1ms
    /// - `max_delay`: 60s
    /// - `should_retry`: always `true`
    /// - `calculate_delay`: [`Binary`]
    /// - `log`: no-op
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            should_retry: Arc::new(|_: &E| true),
            calculate_delay: Arc::new(Binary),
            log: LogSink::noop(),
        }
    }
}

impl<E> Clone for RetryConfig<E> {
    fn clone(&self) -> Self {
        Self {
            max_retries: self.max_retries,
            base_delay: self.base_delay,
            max_delay: self.max_delay,
            should_retry: Arc::clone(&self.should_retry),
            calculate_delay: Arc::clone(&self.calculate_delay),
            log: self.log.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryConfig<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryConfig")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_defaults() {
        let config = RetryConfig::<io::Error>::default();

        assert_eq!(config.max_retries, MaxRetries::Limited(10));
        assert_eq!(config.base_delay, Duration::from_millis(1));
        assert_eq!(config.max_delay, Duration::from_secs(60));
        assert!((config.should_retry)(&io::Error::other("anything")));
        assert!(config.log.is_noop());
        assert_eq!(
            config.calculate_delay.calculate_delay(3, config.base_delay, config.max_delay),
            Duration::from_millis(8)
        );
    }

    #[test]
    fn test_max_retries_integer_encoding() {
        assert_eq!(MaxRetries::try_from(0_i64), Ok(MaxRetries::Limited(0)));
        assert_eq!(MaxRetries::try_from(-1_i64), Ok(INFINITY));
        assert_eq!(
            MaxRetries::try_from(-7_i64),
            Err(ConfigError::InvalidMaxRetries(-7))
        );
        assert_eq!(
            MaxRetries::try_from(i64::from(u32::MAX) + 1),
            Err(ConfigError::InvalidMaxRetries(i64::from(u32::MAX) + 1))
        );
        assert_eq!(i64::from(MaxRetries::Limited(4)), 4);
        assert_eq!(i64::from(INFINITY), -1);
    }

    #[test]
    fn test_max_retries_display() {
        assert_eq!(MaxRetries::Limited(3).to_string(), "3");
        assert_eq!(MaxRetries::Unlimited.to_string(), "unlimited");
    }

    #[test]
    fn test_is_reached() {
        assert!(MaxRetries::Limited(0).is_reached(0));
        assert!(!MaxRetries::Limited(2).is_reached(1));
        assert!(MaxRetries::Limited(2).is_reached(2));
        assert!(!MaxRetries::Unlimited.is_reached(u32::MAX));
    }

    #[test]
    fn test_next_step_waits_with_backoff_delay() {
        let config = RetryConfig::<io::Error> {
            base_delay: Duration::from_millis(10),
            ..Default::default()
        };

        match config.next_step(2, io::Error::other("flaky")) {
            Step::Wait(delay) => assert_eq!(delay, Duration::from_millis(40)),
            Step::Stop(err) => panic!("expected a retry, got {err}"),
        }
    }

    #[test]
    fn test_next_step_predicate_wins_over_limit() {
        let config = RetryConfig::<io::Error> {
            max_retries: MaxRetries::Limited(0),
            should_retry: Arc::new(|_: &io::Error| false),
            ..Default::default()
        };

        match config.next_step(0, io::Error::other("fatal")) {
            Step::Stop(err) => assert!(err.is_aborted()),
            Step::Wait(_) => panic!("expected abort"),
        }
    }

    #[test]
    fn test_next_step_exhausts_at_limit() {
        let config = RetryConfig::<io::Error> {
            max_retries: MaxRetries::Limited(2),
            ..Default::default()
        };

        match config.next_step(2, io::Error::other("still down")) {
            Step::Stop(RetryError::Exhausted { max_retries, source }) => {
                assert_eq!(max_retries, 2);
                assert_eq!(source.to_string(), "still down");
            }
            _ => panic!("expected exhaustion"),
        }
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_retry_event_keeps_full_delay() {
        use std::io::Write;
        use std::sync::Mutex;

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let config = RetryConfig::<io::Error> {
            base_delay: Duration::MAX,
            max_delay: Duration::MAX,
            ..Default::default()
        };

        tracing::subscriber::with_default(subscriber, || {
            match config.next_step(0, io::Error::other("slow")) {
                Step::Wait(delay) => assert_eq!(delay, Duration::MAX),
                Step::Stop(_) => panic!("expected a retry"),
            }
        });

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(
            output.contains(&format!("delay={:?}", Duration::MAX)),
            "unexpected event: {output}"
        );
    }

    #[test]
    fn test_debug_omits_callbacks() {
        let rendered = format!("{:?}", RetryConfig::<io::Error>::default());
        assert!(rendered.contains("max_retries: Limited(10)"));
        assert!(rendered.contains(".."));
    }
}
