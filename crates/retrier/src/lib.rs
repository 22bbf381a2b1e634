#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Generic retry executor.
//!
//! This crate wraps a fallible operation in a retry loop so callers never
//! re-implement backoff or retry bookkeeping:
//!
//! - **Functional-options configuration** via [`RetryConfig`] and [`Override`]
//!   - Retry limit, with [`INFINITY`] for no limit
//!   - Base and max delay
//!   - Custom retry predicates
//!   - Pluggable backoff functions
//!   - Log sinks for progress messages
//! - **Pluggable backoff** via the [`Backoff`](backoff::Backoff) trait
//!   - Binary (doubling) backoff capped at the max delay, the default
//!   - Fixed, linear and jittered alternatives
//! - **Structured errors** via [`RetryError`], separating predicate vetoes from
//!   exhausted retry limits while keeping the root cause
//! - **Blocking and async executors** sharing one decision rule
//! - **Loadable settings** via [`RetrySettings`] (TOML/JSON documents, environment)
//!
//! # Examples
//!
//! ```rust
//! use retrier::prelude::*;
//! use std::time::Duration;
//!
//! let flaky = std::sync::atomic::AtomicU32::new(0);
//! let op = retry(
//!     || {
//!         if flaky.fetch_add(1, std::sync::atomic::Ordering::SeqCst) < 2 {
//!             Err(std::io::Error::other("transient"))
//!         } else {
//!             Ok(42)
//!         }
//!     },
//!     [
//!         max_retries(3),
//!         base_delay(Duration::from_millis(1)),
//!         max_delay(Duration::from_millis(10)),
//!         calculate_delay(Binary),
//!     ],
//! );
//!
//! assert_eq!(op.call().unwrap(), 42);
//! ```

pub mod backoff;
pub mod error;
pub mod log;
pub mod retry;
pub mod settings;

pub use error::{ConfigError, RetryError};
pub use log::LogSink;
pub use retry::{
    AsyncRetrier, DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES, INFINITY, MaxRetries,
    Override, Retrier, RetryConfig, base_delay, calculate_delay, log, max_delay, max_retries,
    retry, retry_async, should_retry,
};
pub use settings::RetrySettings;

/// Convenient re-exports of commonly used items.
///
/// Import everything needed to wrap an operation with:
///
/// ```rust
/// use retrier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backoff::{Backoff, Binary, Fixed, Jittered, Linear};
    pub use crate::error::RetryError;
    pub use crate::log::LogSink;
    pub use crate::retry::{
        AsyncRetrier, INFINITY, MaxRetries, Override, Retrier, RetryConfig, base_delay,
        calculate_delay, log, max_delay, max_retries, retry, retry_async, should_retry,
    };
}
