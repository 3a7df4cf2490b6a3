//! Property-based tests for the backoff calculator

use proptest::prelude::*;
use retryer::RetryConfig;
use std::time::Duration;

fn config(max_retries: u32, min_ms: u64, max_ms: u64) -> RetryConfig {
    RetryConfig::new()
        .with_max_retries(max_retries)
        .with_min_delay(Duration::from_millis(min_ms))
        .with_max_delay(Duration::from_millis(max_ms))
}

proptest! {
    #[test]
    fn prop_exhausted_at_or_past_budget(
        max_retries in 0u32..50,
        extra in 0u32..1_000,
    ) {
        let config = config(max_retries, 30, 300_000);
        prop_assert_eq!(config.next_delay(max_retries.saturating_add(extra)), None);
    }

    #[test]
    fn prop_delay_within_exponential_band_when_uncapped(
        min_ms in 1u64..1_000,
        attempt in 0u32..10,
    ) {
        // max is large enough that the ceiling never triggers here
        let config = config(10, min_ms, 1_000 * 1_000 * 1_000);
        let delay = config.next_delay(attempt).unwrap();

        let low = Duration::from_millis(min_ms) * (1u32 << attempt);
        prop_assert!(delay >= low, "{:?} < {:?}", delay, low);
        prop_assert!(delay < low * 2, "{:?} >= {:?}", delay, low * 2);
    }

    #[test]
    fn prop_delay_never_exceeds_max(
        min_ms in 1u64..10_000,
        max_ms in 1u64..600_000,
        attempt in any::<u32>(),
    ) {
        let config = config(u32::MAX, min_ms, max_ms);
        if let Some(delay) = config.next_delay(attempt) {
            prop_assert!(delay <= Duration::from_millis(max_ms));
        }
    }

    #[test]
    fn prop_ceiling_stays_in_upper_half(
        attempt in 20u32..u32::MAX,
    ) {
        let config = config(u32::MAX, 30, 300_000);
        let delay = config.next_delay(attempt).unwrap();
        prop_assert!(delay >= Duration::from_millis(150_000));
        prop_assert!(delay < Duration::from_millis(300_000));
    }
}

#[test]
fn repeated_sweeps_stay_between_min_and_max() {
    let config = config(100, 1_000, 5 * 60 * 1_000);

    for _ in 0..3 {
        for attempt in 0..100 {
            let delay = config.next_delay(attempt).unwrap();
            assert!(delay >= Duration::from_secs(1), "attempt {attempt}: {delay:?}");
            assert!(delay <= Duration::from_secs(300), "attempt {attempt}: {delay:?}");
        }
    }
}
