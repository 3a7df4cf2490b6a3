//! Retry configuration and the backoff delay calculator.

use std::time::Duration;

use crate::rnd::Rnd;

/// Maximum number of retries used when none is configured.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Minimum retry delay used when the configured one is zero.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(30);

/// Maximum retry delay used when the configured one is zero.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(300);

// Shifting a signed 64-bit nanosecond count past this many bits overflows.
const EXPONENT_LIMIT: u32 = 63;

/// Configuration for an exponential-backoff retry sequence.
///
/// A config is plain data: it describes the retry budget and the delay range
/// but performs no I/O. Unset fields fall back to documented defaults when
/// read, so `RetryConfig::default()` is always usable:
///
/// | field         | unset value | default                  |
/// |---------------|-------------|--------------------------|
/// | `max_retries` | not called  | [`DEFAULT_MAX_RETRIES`]  |
/// | `min_delay`   | zero        | [`DEFAULT_MIN_DELAY`]    |
/// | `max_delay`   | zero        | [`DEFAULT_MAX_DELAY`]    |
///
/// An explicit `with_max_retries(0)` is honored: the operation runs once and
/// is never retried.
///
/// # Examples
///
/// ```rust
/// use retryer::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///     .with_max_retries(5)
///     .with_min_delay(Duration::from_millis(300));
///
/// assert_eq!(config.max_retries(), 5);
/// assert_eq!(config.min_delay(), Duration::from_millis(300));
/// assert_eq!(config.max_delay(), Duration::from_secs(300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryConfig {
    max_retries: Option<u32>,
    min_delay: Duration,
    max_delay: Duration,
}

impl RetryConfig {
    /// Create a config with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of retries.
    ///
    /// This does not include the initial attempt: `with_max_retries(3)` allows
    /// up to 4 invocations of the operation.
    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = Some(n);
        self
    }

    /// Set the floor of the randomized delay range.
    pub fn with_min_delay(mut self, d: Duration) -> Self {
        self.min_delay = d;
        self
    }

    /// Set the ceiling of the randomized delay range.
    pub fn with_max_delay(mut self, d: Duration) -> Self {
        self.max_delay = d;
        self
    }

    /// Return a copy with every unset field replaced by its default.
    ///
    /// ```rust
    /// use retryer::{RetryConfig, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES, DEFAULT_MIN_DELAY};
    ///
    /// let resolved = RetryConfig::default().with_defaults();
    /// assert_eq!(
    ///     resolved,
    ///     RetryConfig::new()
    ///         .with_max_retries(DEFAULT_MAX_RETRIES)
    ///         .with_min_delay(DEFAULT_MIN_DELAY)
    ///         .with_max_delay(DEFAULT_MAX_DELAY)
    /// );
    /// ```
    pub fn with_defaults(self) -> Self {
        Self {
            max_retries: Some(self.max_retries()),
            min_delay: self.min_delay(),
            max_delay: self.max_delay(),
        }
    }

    /// Maximum number of retries after the initial attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    /// Floor of the randomized delay range.
    pub fn min_delay(&self) -> Duration {
        non_zero_or(self.min_delay, DEFAULT_MIN_DELAY)
    }

    /// Ceiling of the randomized delay range.
    pub fn max_delay(&self) -> Duration {
        non_zero_or(self.max_delay, DEFAULT_MAX_DELAY)
    }

    /// Compute the delay to wait after failed attempt `attempt` (0-indexed).
    ///
    /// Returns `None` once `attempt` reaches [`max_retries`](Self::max_retries),
    /// meaning the retry budget is exhausted.
    ///
    /// Otherwise the delay is `2^attempt * jitter(min_delay)`, where
    /// `jitter(d)` is uniform in `[d, 2d)`. When that would exceed
    /// `max_delay`, or the exponent is large enough to overflow, the delay is
    /// `jitter(max_delay / 2)` instead, which lies in `[max_delay / 2, max_delay)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use retryer::RetryConfig;
    /// use std::time::Duration;
    ///
    /// let config = RetryConfig::new()
    ///     .with_max_retries(3)
    ///     .with_min_delay(Duration::from_millis(100))
    ///     .with_max_delay(Duration::from_secs(10));
    ///
    /// let delay = config.next_delay(2).unwrap();
    /// assert!(delay >= Duration::from_millis(400));
    /// assert!(delay < Duration::from_millis(800));
    ///
    /// assert_eq!(config.next_delay(3), None);
    /// ```
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        self.next_delay_with(attempt, &Rnd::default())
    }

    pub(crate) fn next_delay_with(&self, attempt: u32, rnd: &Rnd) -> Option<Duration> {
        if attempt >= self.max_retries() {
            return None;
        }

        let min_nanos = duration_nanos(self.min_delay());
        let max = self.max_delay();
        let ceiling = || jitter(max / 2, rnd).min(max);

        let bits = u64::BITS - min_nanos.leading_zeros();
        if attempt.saturating_add(bits) >= EXPONENT_LIMIT {
            return Some(ceiling());
        }

        let candidate = jitter_nanos(min_nanos, rnd)
            .checked_mul(1u64 << attempt)
            .map(Duration::from_nanos);

        match candidate {
            Some(delay) if delay <= max => Some(delay),
            _ => Some(ceiling()),
        }
    }
}

/// Compute the delay to wait after failed attempt `attempt` under `config`.
///
/// Equivalent to [`RetryConfig::next_delay`].
pub fn next_delay(config: &RetryConfig, attempt: u32) -> Option<Duration> {
    config.next_delay(attempt)
}

fn non_zero_or(d: Duration, default: Duration) -> Duration {
    if d.is_zero() {
        default
    } else {
        d
    }
}

fn duration_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

/// A value in `[n, 2n)`, or `0` when `n` is `0`.
fn jitter_nanos(n: u64, rnd: &Rnd) -> u64 {
    n.saturating_add(rnd.below(n))
}

fn jitter(d: Duration, rnd: &Rnd) -> Duration {
    Duration::from_nanos(jitter_nanos(duration_nanos(d), rnd))
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    fn config(max_retries: u32, min: Duration, max: Duration) -> RetryConfig {
        RetryConfig::new()
            .with_max_retries(max_retries)
            .with_min_delay(min)
            .with_max_delay(max)
    }

    #[test]
    fn test_defaults_apply_to_unset_fields() {
        let config = RetryConfig::default();

        assert_eq!(config.max_retries(), DEFAULT_MAX_RETRIES);
        assert_eq!(config.min_delay(), DEFAULT_MIN_DELAY);
        assert_eq!(config.max_delay(), DEFAULT_MAX_DELAY);
    }

    #[test]
    fn test_with_defaults_keeps_explicit_values() {
        let config = RetryConfig::new()
            .with_max_retries(0)
            .with_max_delay(Duration::from_secs(1))
            .with_defaults();

        assert_eq!(config.max_retries(), 0);
        assert_eq!(config.min_delay(), DEFAULT_MIN_DELAY);
        assert_eq!(config.max_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_zero_max_retries_is_exhausted_immediately() {
        let config = RetryConfig::new().with_max_retries(0);
        assert_eq!(config.next_delay(0), None);
    }

    #[test]
    fn test_unset_max_retries_uses_default_budget() {
        let config = RetryConfig::new();
        assert!(config.next_delay(DEFAULT_MAX_RETRIES - 1).is_some());
        assert_eq!(config.next_delay(DEFAULT_MAX_RETRIES), None);
    }

    #[test]
    fn test_exponential_bounds_at_range_edges() {
        let config = config(5, Duration::from_millis(100), Duration::from_secs(60));

        let low = Rnd::new_min();
        assert_eq!(config.next_delay_with(0, &low), Some(Duration::from_millis(100)));
        assert_eq!(config.next_delay_with(1, &low), Some(Duration::from_millis(200)));
        assert_eq!(config.next_delay_with(3, &low), Some(Duration::from_millis(800)));

        let high = Rnd::new_max();
        let top = Duration::from_millis(200) - Duration::from_nanos(1);
        assert_eq!(config.next_delay_with(0, &high), Some(top));
        assert_eq!(config.next_delay_with(2, &high), Some(top * 4));
    }

    #[test]
    fn test_ceiling_applies_when_candidate_exceeds_max() {
        let config = config(10, Duration::from_secs(1), Duration::from_secs(10));

        // 2^4 * 1s = 16s > 10s
        let low = Rnd::new_min();
        assert_eq!(config.next_delay_with(4, &low), Some(Duration::from_secs(5)));

        let high = Rnd::new_max();
        let delay = config.next_delay_with(4, &high).unwrap();
        assert!(delay < Duration::from_secs(10));
    }

    #[test]
    fn test_candidate_equal_to_max_is_not_clamped() {
        let config = config(10, Duration::from_secs(1), Duration::from_secs(4));
        assert_eq!(
            config.next_delay_with(2, &Rnd::new_min()),
            Some(Duration::from_secs(4))
        );
    }

    #[test]
    fn test_overflow_guard_for_huge_attempts() {
        let config = config(u32::MAX, Duration::from_secs(1), Duration::from_secs(300));

        for attempt in [30, 62, 63, 64, 1_000, u32::MAX - 1] {
            let delay = config.next_delay(attempt).unwrap();
            assert!(delay >= Duration::from_secs(150), "attempt {attempt}: {delay:?}");
            assert!(delay < Duration::from_secs(300), "attempt {attempt}: {delay:?}");
        }
    }

    #[test]
    fn test_overflow_guard_uses_bit_length_of_min_delay() {
        // 2^33 ns needs 34 bits; 34 + 29 hits the limit even though
        // 2^29 * 2^33 ns would still fit under max.
        let min = Duration::from_nanos(1 << 33);
        let config = config(100, min, Duration::from_nanos(3 << 61));

        let low = Rnd::new_min();
        assert_eq!(
            config.next_delay_with(28, &low),
            Some(Duration::from_nanos(1 << 61))
        );
        assert_eq!(
            config.next_delay_with(29, &low),
            Some(Duration::from_nanos(3 << 60))
        );
    }

    #[test]
    fn test_min_greater_than_max_falls_back_to_ceiling() {
        let config = config(3, Duration::from_secs(10), Duration::from_secs(2));

        for attempt in 0..3 {
            let delay = config.next_delay(attempt).unwrap();
            assert!(delay >= Duration::from_secs(1));
            assert!(delay < Duration::from_secs(2));
        }
    }

    #[test]
    fn test_degenerate_ceiling_yields_zero_delay() {
        let config = config(3, Duration::from_secs(1), Duration::from_nanos(1));
        assert_eq!(config.next_delay(0), Some(Duration::ZERO));
    }

    #[test]
    fn test_jitter_range() {
        let rnd = Rnd::default();
        let base = Duration::from_millis(30);
        for _ in 0..1_000 {
            let d = jitter(base, &rnd);
            assert!(d >= base && d < base * 2);
        }
        assert_eq!(jitter(Duration::ZERO, &rnd), Duration::ZERO);
    }

    #[test]
    fn test_free_function_matches_method() {
        let config = RetryConfig::new().with_max_retries(1);
        assert!(next_delay(&config, 0).is_some());
        assert_eq!(next_delay(&config, 1), None);
    }

    #[test]
    fn test_config_is_copy_and_debug() {
        let config = RetryConfig::new().with_max_retries(3);
        let copied = config;
        assert_eq!(config, copied);
        assert!(format!("{:?}", config).contains("RetryConfig"));
    }
}
