//! Binary (doubling) backoff.

use super::strategy::Backoff;
use std::time::Duration;

/// Doubling backoff capped at the max delay.
///
/// # Mathematical Formula
///
/// For attempt `n` (0 before the first retry):
/// ```text
/// delay = min(base * 2^n, max)
/// ```
///
/// If `2^n` or the multiplication overflows, `max` is returned directly. A zero
/// base delay never grows.
///
/// # Examples
///
/// ```rust
/// use retrier::backoff::{Backoff, Binary};
/// use std::time::Duration;
///
/// let base = Duration::from_millis(100);
/// let max = Duration::from_secs(1);
///
/// assert_eq!(Binary.calculate_delay(0, base, max), Duration::from_millis(100));
/// assert_eq!(Binary.calculate_delay(3, base, max), Duration::from_millis(800));
/// assert_eq!(Binary.calculate_delay(4, base, max), max);
/// assert_eq!(Binary.calculate_delay(u32::MAX, base, max), max);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Binary;

impl Backoff for Binary {
    fn calculate_delay(&self, attempt: u32, base: Duration, max: Duration) -> Duration {
        if base.is_zero() {
            return Duration::ZERO;
        }
        2u32.checked_pow(attempt)
            .and_then(|factor| base.checked_mul(factor))
            .map_or(max, |delay| delay.min(max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_binary_delay_calculation() {
        let base = Duration::from_millis(10);
        let max = Duration::from_secs(1);

        // Attempt 0: 10ms * 2^0 = 10ms
        assert_eq!(Binary.calculate_delay(0, base, max), Duration::from_millis(10));

        // Attempt 1: 10ms * 2^1 = 20ms
        assert_eq!(Binary.calculate_delay(1, base, max), Duration::from_millis(20));

        // Attempt 2: 10ms * 2^2 = 40ms
        assert_eq!(Binary.calculate_delay(2, base, max), Duration::from_millis(40));

        // Attempt 6: 640ms, attempt 7 would be 1280ms and is capped
        assert_eq!(Binary.calculate_delay(6, base, max), Duration::from_millis(640));
        assert_eq!(Binary.calculate_delay(7, base, max), max);
    }

    #[test]
    fn test_overflow_substitutes_max() {
        let max = Duration::from_secs(60);

        // 2^32 does not fit in u32
        assert_eq!(Binary.calculate_delay(32, Duration::from_millis(1), max), max);

        // 2^31 fits, but the product does not fit in a Duration
        assert_eq!(Binary.calculate_delay(31, Duration::MAX / 2, max), max);
        assert_eq!(Binary.calculate_delay(u32::MAX, Duration::MAX, max), max);
    }

    #[test]
    fn test_base_above_max_is_capped() {
        let delay = Binary.calculate_delay(0, Duration::from_secs(5), Duration::from_secs(1));
        assert_eq!(delay, Duration::from_secs(1));
    }

    #[test]
    fn test_zero_base_stays_zero() {
        for attempt in [0, 1, 10, 31, 32, 33, u32::MAX] {
            assert_eq!(
                Binary.calculate_delay(attempt, Duration::ZERO, Duration::from_secs(60)),
                Duration::ZERO,
                "attempt {attempt}"
            );
        }
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_max(
            attempt in any::<u32>(),
            base_ms in 0u64..=10_000,
            extra_ms in 0u64..=100_000,
        ) {
            let base = Duration::from_millis(base_ms);
            let max = base + Duration::from_millis(extra_ms);
            prop_assert!(Binary.calculate_delay(attempt, base, max) <= max);
        }

        #[test]
        fn prop_non_decreasing_in_attempt(
            attempt in 0u32..200,
            base_ms in 0u64..=10_000,
            extra_ms in 0u64..=100_000,
        ) {
            let base = Duration::from_millis(base_ms);
            let max = base + Duration::from_millis(extra_ms);
            let current = Binary.calculate_delay(attempt, base, max);
            let next = Binary.calculate_delay(attempt + 1, base, max);
            prop_assert!(current <= next);
        }

        #[test]
        fn prop_first_attempt_within_bounds(
            base_ms in 0u64..=10_000,
            extra_ms in 0u64..=100_000,
        ) {
            let base = Duration::from_millis(base_ms);
            let max = base + Duration::from_millis(extra_ms);
            let delay = Binary.calculate_delay(0, base, max);
            prop_assert!(delay >= base && delay <= max);
        }
    }
}
