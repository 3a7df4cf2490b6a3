//! # Retryer
//!
//! Retry fallible async operations with exponential backoff and jitter.
//!
//! A retry sequence runs an operation until it succeeds, fails with an error
//! the caller does not want retried, uses up its retry budget, or is
//! cancelled. Delays between attempts grow exponentially from a minimum,
//! are randomized so independent callers do not retry in lockstep, and never
//! exceed a configured maximum.
//!
//! ## Quick Example
//!
//! ```rust
//! use retryer::{CancelSignal, RetryConfig, RetryError};
//! use std::time::Duration;
//!
//! #[derive(Debug, PartialEq)]
//! enum FetchError {
//!     Temporary,
//!     NotFound,
//! }
//!
//! # tokio_test::block_on(async {
//! let config = RetryConfig::new()
//!     .with_max_retries(5)
//!     .with_min_delay(Duration::from_millis(1));
//!
//! let result = config
//!     .execute(
//!         &CancelSignal::new(),
//!         |_signal| async { Err::<(), _>(FetchError::NotFound) },
//!         |err| matches!(err, FetchError::Temporary),
//!     )
//!     .await;
//!
//! // Not retried: the predicate only accepts temporary errors.
//! assert_eq!(result, Err(RetryError::NonRetryable(FetchError::NotFound)));
//! # });
//! ```
//!
//! ## Features
//!
//! - `tracing`: emit `debug` events when a retry is scheduled and when a
//!   sequence stops.
//! - `serde`: (de)serialize [`RetryConfig`]; omitted fields keep their defaults.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cancel;
pub mod retry;
mod rnd;

// Re-exports
pub use cancel::{CancelError, CancelSignal};
pub use retry::{
    execute, next_delay, RetryConfig, RetryError, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES,
    DEFAULT_MIN_DELAY,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancel::{CancelError, CancelSignal};
    pub use crate::retry::{execute, RetryConfig, RetryError};
}
