//! Async retry executor.
//!
//! Same configuration, decision rule and errors as the blocking executor, but
//! suspension goes through `tokio::time::sleep` so the runtime thread stays free.

use super::config::{RetryConfig, Step};
use super::overrides::Override;
use crate::error::RetryError;
use std::fmt;
use std::future::Future;

/// Wrap an async `operation` in a retry loop configured by `overrides`.
///
/// # Examples
///
/// ```rust
/// use retrier::{base_delay, max_retries, retry_async};
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let calls = AtomicU32::new(0);
/// let calls = &calls;
/// let fetch = retry_async(
///     move || async move {
///         if calls.fetch_add(1, Ordering::SeqCst) < 2 {
///             Err(std::io::Error::other("connection reset"))
///         } else {
///             Ok(42)
///         }
///     },
///     [max_retries(3), base_delay(Duration::from_millis(1))],
/// );
///
/// assert_eq!(fetch.call().await?, 42);
/// # Ok(())
/// # }
/// ```
pub fn retry_async<F, Fut, T, E, I>(operation: F, overrides: I) -> AsyncRetrier<F, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: 'static,
    I: IntoIterator<Item = Override<E>>,
{
    AsyncRetrier::with_config(operation, RetryConfig::with_overrides(overrides))
}

/// An async operation retried under a [`RetryConfig`].
///
/// Attempts still run one after another; nothing is raced or spawned.
pub struct AsyncRetrier<F, E> {
    operation: F,
    config: RetryConfig<E>,
}

impl<F, E> AsyncRetrier<F, E> {
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
    pub async fn call<T, Fut>(&self) -> Result<T, RetryError<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt: u32 = 0;
        loop {
            self.config.before_attempt(attempt);

            let err = match (self.operation)().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            match self.config.next_step(attempt, err) {
                Step::Wait(delay) => tokio::time::sleep(delay).await,
                Step::Stop(err) => return Err(err),
            }
            attempt = attempt.saturating_add(1);
        }
    }
}

impl<F, E> fmt::Debug for AsyncRetrier<F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncRetrier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
