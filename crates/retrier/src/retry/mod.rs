//! The retry executor.
//!
//! This module turns a fallible operation into a wrapped operation of the
//! same shape that re-invokes it under a [`RetryConfig`].
//!
//! # Key Types
//!
//! - [`RetryConfig`] - Retry limit, delay bounds, predicate, backoff and log sink
//! - [`Override`] - One configuration mutation, applied in order
//! - [`Retrier`] - Blocking wrapped operation
//! - [`AsyncRetrier`] - Async wrapped operation
//!
//! # Decision Rule
//!
//! After a failed attempt the executor, in order:
//!
//! 1. aborts if `should_retry` rejects the error,
//! 2. gives up if `max_retries` retries were already performed,
//! 3. otherwise asks the backoff function for a delay, sleeps, and tries again.
//!
//! # Examples
//!
//! ```rust
//! use retrier::{base_delay, max_retries, retry};
//! use std::time::Duration;
//!
//! let op = retry(
//!     || Err::<(), _>(std::io::Error::other("connection refused")),
//!     [max_retries(3), base_delay(Duration::from_millis(1))],
//! );
//!
//! let err = op.call().unwrap_err();
//! assert!(err.is_exhausted());
//! assert!(err.to_string().contains("connection refused"));
//! ```

mod async_executor;
mod config;
mod executor;
mod overrides;

pub use async_executor::{AsyncRetrier, retry_async};
pub use config::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES, INFINITY, MaxRetries, RetryConfig,
    ShouldRetry,
};
pub use executor::{Retrier, retry};
pub use overrides::{
    Override, base_delay, calculate_delay, log, max_delay, max_retries, should_retry,
};
