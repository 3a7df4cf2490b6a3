//! Exponential backoff with jitter for fallible async operations.
//!
//! The module splits into two pieces:
//!
//! - **Backoff calculator**: [`RetryConfig::next_delay`] is a pure function of
//!   the attempt index and the configuration. It returns `None` once the
//!   retry budget is spent.
//! - **Retry loop**: [`RetryConfig::execute`] drives the operation, asks the
//!   caller's predicate whether an error is worth retrying, and waits between
//!   attempts with a sleep that gives way to a [`CancelSignal`].
//!
//! # Quick Start
//!
//! ```rust
//! use retryer::{CancelSignal, RetryConfig};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let config = RetryConfig::new()
//!     .with_max_retries(3)
//!     .with_min_delay(Duration::from_millis(10))
//!     .with_max_delay(Duration::from_secs(1));
//!
//! let signal = CancelSignal::new().with_timeout(Duration::from_secs(30));
//!
//! let result = config
//!     .execute(&signal, |_| async { Ok::<_, String>(42) }, |_| true)
//!     .await;
//!
//! assert_eq!(result, Ok(42));
//! # });
//! ```
//!
//! # Delays
//!
//! After failed attempt `n` (0-indexed) the loop waits
//! `2^n * jitter(min_delay)`, where `jitter(d)` is uniform in `[d, 2d)`. Once
//! that would pass `max_delay` every further wait is `jitter(max_delay / 2)`,
//! so no wait ever exceeds `max_delay`.
//!
//! # Outcomes
//!
//! | ending                            | result                              |
//! |-----------------------------------|-------------------------------------|
//! | operation succeeded               | `Ok(value)`                         |
//! | predicate rejected the error      | `Err(RetryError::NonRetryable(e))`  |
//! | retry budget spent                | `Err(RetryError::Exhausted(last))`  |
//! | signal fired during a backoff     | `Err(RetryError::Cancelled(reason))`|
//!
//! [`CancelSignal`]: crate::cancel::CancelSignal

mod error;
mod executor;
mod policy;

pub use error::RetryError;
pub use executor::execute;
pub use policy::{
    next_delay, RetryConfig, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES, DEFAULT_MIN_DELAY,
};
