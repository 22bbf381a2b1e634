//! Alternative backoff policies.

use super::strategy::Backoff;
use std::time::Duration;

/// Waits the base delay between every attempt.
///
/// ```rust
/// use retrier::backoff::{Backoff, Fixed};
/// use std::time::Duration;
///
/// let base = Duration::from_millis(250);
/// assert_eq!(Fixed.calculate_delay(9, base, Duration::from_secs(1)), base);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fixed;

impl Backoff for Fixed {
    fn calculate_delay(&self, _attempt: u32, base: Duration, max: Duration) -> Duration {
        base.min(max)
    }
}

/// Grows the delay by one base delay per attempt: `min(base * (n + 1), max)`.
///
/// Overflow returns `max`; a zero base delay stays zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Linear;

impl Backoff for Linear {
    fn calculate_delay(&self, attempt: u32, base: Duration, max: Duration) -> Duration {
        if base.is_zero() {
            return Duration::ZERO;
        }
        attempt
            .checked_add(1)
            .and_then(|factor| base.checked_mul(factor))
            .map_or(max, |delay| delay.min(max))
    }
}

/// Randomizes the delay of another policy to spread out concurrent retriers.
///
/// # Mathematical Formula
///
/// ```text
/// inner = policy(n, base, max)
/// final = clamp(inner + inner * factor * random(-1.0, +1.0), 0, max)
/// ```
///
/// # Examples
///
/// ```rust
/// use retrier::backoff::{Backoff, Binary, Jittered};
/// use std::time::Duration;
///
/// let jittered = Jittered::new(Binary, 0.5);
/// let delay = jittered.calculate_delay(0, Duration::from_secs(1), Duration::from_secs(60));
/// assert!(delay >= Duration::from_millis(500) && delay <= Duration::from_millis(1500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jittered<B> {
    inner: B,
    factor: f64,
}

impl<B> Jittered<B> {
    /// Wrap `inner`, varying its delays by up to `factor` in either direction.
    ///
    /// The factor is clamped to `[0.0, 1.0]`.
    pub fn new(inner: B, factor: f64) -> Self {
        Self {
            inner,
            factor: factor.clamp(0.0, 1.0),
        }
    }

    /// The effective jitter factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl<B: Backoff> Backoff for Jittered<B> {
    fn calculate_delay(&self, attempt: u32, base: Duration, max: Duration) -> Duration {
        let delay = self.inner.calculate_delay(attempt, base, max).min(max);
        if self.factor == 0.0 {
            return delay;
        }

        let secs = delay.as_secs_f64();
        let offset = secs * self.factor * (rand::random::<f64>() - 0.5) * 2.0;

        Duration::try_from_secs_f64((secs + offset).max(0.0))
            .map_or(max, |jittered| jittered.min(max))
    }
}
