//! Cooperative cancellation for retry sequences.
//!
//! A [`CancelSignal`] is handed to every invocation of a retried operation and
//! raced against every backoff wait. It combines an explicit cancellation
//! token with an optional deadline, so an overall time budget for a retry
//! sequence is expressed through the same handle as a manual cancel.
//!
//! # Examples
//!
//! ```rust
//! use retryer::cancel::{self, CancelError, CancelSignal};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let signal = CancelSignal::new();
//! signal.cancel();
//!
//! let result = cancel::sleep(Duration::from_secs(60), &signal).await;
//! assert_eq!(result, Err(CancelError::Cancelled));
//! # });
//! ```

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a [`CancelSignal`] fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum CancelError {
    /// The signal was cancelled explicitly.
    #[error("operation cancelled")]
    Cancelled,
    /// The signal's deadline elapsed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// A cloneable cancellation handle with an optional deadline.
///
/// Clones share the same cancellation state. Derived signals created with
/// [`child`](Self::child), [`with_deadline`](Self::with_deadline) or
/// [`with_timeout`](Self::with_timeout) are cancelled together with their
/// parent, while cancelling a derived signal leaves the parent untouched.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CancelSignal {
    /// Create a signal that never fires unless cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a signal that can be cancelled independently of this one.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a signal that additionally fires at `deadline`.
    ///
    /// If this signal already has an earlier deadline, the earlier one is kept.
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        };

        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Derive a signal that additionally fires once `timeout` has elapsed.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now()
            .checked_add(timeout)
            .unwrap_or_else(far_future);
        self.with_deadline(deadline)
    }

    /// Cancel this signal and every signal derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The deadline this signal carries, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// The underlying cancellation token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Returns true once the signal has been cancelled or its deadline has passed.
    pub fn is_cancelled(&self) -> bool {
        self.error().is_some()
    }

    /// The reason this signal fired, or `None` while it is still live.
    ///
    /// An explicit cancel takes precedence over an elapsed deadline.
    pub fn error(&self) -> Option<CancelError> {
        if self.token.is_cancelled() {
            return Some(CancelError::Cancelled);
        }

        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(CancelError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Wait until the signal fires and return the reason.
    pub async fn cancelled(&self) -> CancelError {
        match self.deadline {
            Some(deadline) => tokio::select! {
                biased;
                () = self.token.cancelled() => CancelError::Cancelled,
                () = tokio::time::sleep_until(deadline) => CancelError::DeadlineExceeded,
            },
            None => {
                self.token.cancelled().await;
                CancelError::Cancelled
            }
        }
    }
}

impl From<CancellationToken> for CancelSignal {
    fn from(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }
}

/// Sleep for `duration` unless `signal` fires first.
///
/// Returns `Ok(())` when the full duration elapsed and the signal's error when
/// it fired first. The timer is dropped as soon as either side completes.
pub async fn sleep(duration: Duration, signal: &CancelSignal) -> Result<(), CancelError> {
    if let Some(err) = signal.error() {
        return Err(err);
    }

    tokio::select! {
        biased;
        err = signal.cancelled() => Err(err),
        () = tokio::time::sleep(duration) => Ok(()),
    }
}

// Roughly 30 years out, matching what tokio uses for "never".
fn far_future() -> Instant {
    Instant::now() + Duration::from_secs(86400 * 365 * 30)
}
