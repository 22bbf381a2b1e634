//! Blocking retry executor.

use super::config::{RetryConfig, Step};
use super::overrides::Override;
use crate::error::RetryError;
use std::fmt;

/// Wrap `operation` in a retry loop configured by `overrides`.
///
/// The returned [`Retrier`] has the same shape as the operation: calling it
/// takes no arguments and yields the operation's value, or a [`RetryError`]
/// wrapping the operation's last error.
///
/// # Examples
///
/// ```rust
/// use retrier::{base_delay, max_retries, retry};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// let calls = AtomicU32::new(0);
/// let fetch = retry(
///     || match calls.fetch_add(1, Ordering::SeqCst) {
///         0 | 1 => Err(std::io::Error::other("connection reset")),
///         _ => Ok("payload"),
///     },
///     [max_retries(3), base_delay(Duration::from_millis(1))],
/// );
///
/// assert_eq!(fetch.call().unwrap(), "payload");
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// ```
pub fn retry<F, T, E, I>(operation: F, overrides: I) -> Retrier<F, E>
where
    F: Fn() -> Result<T, E>,
    E: 'static,
    I: IntoIterator<Item = Override<E>>,
{
    Retrier::with_config(operation, RetryConfig::with_overrides(overrides))
}

/// A wrapped operation retried under a [`RetryConfig`].
///
/// The configuration is shared read-only by every call, and every call keeps
/// its own attempt counter, so one `Retrier` may be called from several
/// threads at once.
///
/// Suspension between attempts blocks the calling thread. Use
/// [`AsyncRetrier`](super::AsyncRetrier) inside an async runtime.
pub struct Retrier<F, E> {
    operation: F,
    config: RetryConfig<E>,
}

impl<F, E> Retrier<F, E> {
    /// Wrap `operation` with a prepared configuration.
    pub fn with_config(operation: F, config: RetryConfig<E>) -> Self {
        Self { operation, config }
    }

    /// The configuration used by every call.
    pub fn config(&self) -> &RetryConfig<E> {
        &self.config
    }

    /// Run the operation until it succeeds, the predicate vetoes, or the
    /// retry limit is reached.
    ///
    /// # Returns
    /// - `Ok(T)`: The first successful result
    /// - `Err(RetryError::Aborted)`: `should_retry` returned `false`
    /// - `Err(RetryError::Exhausted)`: `max_retries` retries all failed
    pub fn call<T>(&self) -> Result<T, RetryError<E>>
    where
        F: Fn() -> Result<T, E>,
    {
        let mut attempt: u32 = 0;
        loop {
            self.config.before_attempt(attempt);

            let err = match (self.operation)() {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            match self.config.next_step(attempt, err) {
                Step::Wait(delay) => std::thread::sleep(delay),
                Step::Stop(err) => return Err(err),
            }
            attempt = attempt.saturating_add(1);
        }
    }

    /// Turn the retrier into a plain closure with the operation's shape.
    pub fn into_fn<T>(self) -> impl Fn() -> Result<T, RetryError<E>>
    where
        F: Fn() -> Result<T, E>,
    {
        move || self.call()
    }
}

impl<F, E> fmt::Debug for Retrier<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
