//! Backoff functions.
//!
//! A backoff function maps `(attempt, base delay, max delay)` to the time the
//! executor waits before the next attempt. The executor is agnostic to which
//! policy is installed.
//!
//! # Key Types
//!
//! - [`Backoff`] - Core trait for delay policies
//! - [`Binary`] - Doubling backoff capped at the max delay (the default)
//! - [`Fixed`], [`Linear`] - Alternative deterministic policies
//! - [`Jittered`] - Randomizes the delay of another policy
//!
//! # Examples
//!
//! ```rust
//! use retrier::backoff::{Backoff, Binary};
//! use std::time::Duration;
//!
//! let base = Duration::from_millis(10);
//! let max = Duration::from_secs(1);
//!
//! assert_eq!(Binary.calculate_delay(0, base, max), Duration::from_millis(10));
//! assert_eq!(Binary.calculate_delay(2, base, max), Duration::from_millis(40));
//! assert_eq!(Binary.calculate_delay(30, base, max), max);
//! ```

mod binary;
mod policies;
mod strategy;

pub use binary::Binary;
pub use policies::{Fixed, Jittered, Linear};
pub use strategy::Backoff;
