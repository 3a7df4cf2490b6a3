//! Error type for retry sequences.

use crate::cancel::CancelError;

/// Why a retry sequence ended without success.
///
/// [`is_exhausted`](Self::is_exhausted) separates "ran out of retries" from
/// every other ending, so callers can alert on budget exhaustion and treat
/// hard failures or cancellation differently.
///
/// # Examples
///
/// ```rust
/// use retryer::{execute, CancelSignal, RetryConfig, RetryError};
/// use std::time::Duration;
///
/// # tokio_test::block_on(async {
/// let config = RetryConfig::new()
///     .with_max_retries(2)
///     .with_min_delay(Duration::from_millis(1));
///
/// let result: Result<(), _> = execute(
///     &config,
///     &CancelSignal::new(),
///     |_| async { Err("always fails") },
///     |_| true,
/// )
/// .await;
///
/// match result {
///     Err(err) => {
///         assert!(err.is_exhausted());
///         assert_eq!(err.into_error(), Some("always fails"));
///     }
///     Ok(_) => panic!("Expected failure"),
/// }
/// # });
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The operation failed with an error the predicate declined to retry.
    NonRetryable(E),
    /// Every allowed retry failed; holds the error from the final attempt.
    Exhausted(E),
    /// The cancellation signal fired while waiting to retry.
    Cancelled(CancelError),
}

impl<E> RetryError<E> {
    /// Returns true only when the retry budget was used up.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted(_))
    }

    /// Returns true when the sequence stopped on a non-retryable error.
    pub fn is_non_retryable(&self) -> bool {
        matches!(self, Self::NonRetryable(_))
    }

    /// Returns true when the sequence was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// Get a reference to the operation's error, if the sequence ended on one.
    pub fn error(&self) -> Option<&E> {
        match self {
            Self::NonRetryable(e) | Self::Exhausted(e) => Some(e),
            Self::Cancelled(_) => None,
        }
    }

    /// Extract the operation's error, discarding how the sequence ended.
    pub fn into_error(self) -> Option<E> {
        match self {
            Self::NonRetryable(e) | Self::Exhausted(e) => Some(e),
            Self::Cancelled(_) => None,
        }
    }

    /// The cancellation reason, if the sequence was cancelled.
    pub fn cancel_error(&self) -> Option<CancelError> {
        match self {
            Self::Cancelled(c) => Some(*c),
            _ => None,
        }
    }

    /// Split into the `(exhausted, error)` pair.
    ///
    /// Cancellation is converted into the operation's error type, which lets
    /// callers that use one error type for everything handle all endings
    /// through a single value.
    pub fn into_parts(self) -> (bool, E)
    where
        E: From<CancelError>,
    {
        match self {
            Self::NonRetryable(e) => (false, e),
            Self::Exhausted(e) => (true, e),
            Self::Cancelled(c) => (false, E::from(c)),
        }
    }

    /// Transform the operation's error, keeping how the sequence ended.
    pub fn map_err<F, E2>(self, f: F) -> RetryError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            Self::NonRetryable(e) => RetryError::NonRetryable(f(e)),
            Self::Exhausted(e) => RetryError::Exhausted(f(e)),
            Self::Cancelled(c) => RetryError::Cancelled(c),
        }
    }
}

impl<E> From<CancelError> for RetryError<E> {
    fn from(err: CancelError) -> Self {
        Self::Cancelled(err)
    }
}

impl<E: std::fmt::Display> std::fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonRetryable(e) => write!(f, "non-retryable error: {}", e),
            Self::Exhausted(e) => write!(f, "retries exhausted: {}", e),
            Self::Cancelled(c) => write!(f, "retry cancelled: {}", c),
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NonRetryable(e) | Self::Exhausted(e) => Some(e),
            Self::Cancelled(c) => Some(c),
        }
    }
}
