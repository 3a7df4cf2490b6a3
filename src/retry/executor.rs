//! The retry loop.

use std::future::Future;

use crate::cancel::{self, CancelSignal};
use crate::retry::{RetryConfig, RetryError};

impl RetryConfig {
    /// Run `operation` until it succeeds, fails with an error `is_retryable`
    /// rejects, runs out of retries, or `signal` fires during a backoff wait.
    ///
    /// The operation receives a clone of `signal` on every attempt so it can
    /// stop mid-flight; the loop itself does not impose a per-attempt timeout.
    /// Waits between attempts come from [`next_delay`](Self::next_delay).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use retryer::{CancelSignal, RetryConfig};
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let calls = AtomicU32::new(0);
    /// let config = RetryConfig::new()
    ///     .with_max_retries(5)
    ///     .with_min_delay(Duration::from_millis(1));
    ///
    /// let result = config
    ///     .execute(
    ///         &CancelSignal::new(),
    ///         |_| {
    ///             let n = calls.fetch_add(1, Ordering::SeqCst);
    ///             async move { if n < 2 { Err("transient") } else { Ok(n) } }
    ///         },
    ///         |err| *err == "transient",
    ///     )
    ///     .await;
    ///
    /// assert_eq!(result, Ok(2));
    /// assert_eq!(calls.load(Ordering::SeqCst), 3);
    /// # });
    /// ```
    pub async fn execute<T, E, F, Fut, P>(
        &self,
        signal: &CancelSignal,
        mut operation: F,
        is_retryable: P,
    ) -> Result<T, RetryError<E>>
    where
        F: FnMut(CancelSignal) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0u32;

        loop {
            let error = match operation(signal.clone()).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            if !is_retryable(&error) {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt, "operation failed with a non-retryable error");
                return Err(RetryError::NonRetryable(error));
            }

            let Some(delay) = self.next_delay(attempt) else {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt, "retries exhausted");
                return Err(RetryError::Exhausted(error));
            };

            #[cfg(feature = "tracing")]
            tracing::debug!(attempt, ?delay, "retrying after backoff");

            if let Err(cancelled) = cancel::sleep(delay, signal).await {
                #[cfg(feature = "tracing")]
                tracing::debug!(attempt, reason = %cancelled, "retry cancelled");
                return Err(RetryError::Cancelled(cancelled));
            }

            attempt += 1;
        }
    }
}

/// Run `operation` under `config`; see [`RetryConfig::execute`].
///
/// # Examples
///
/// ```rust
/// use retryer::{execute, CancelSignal, RetryConfig};
///
/// # tokio_test::block_on(async {
/// let result = execute(
///     &RetryConfig::default(),
///     &CancelSignal::new(),
///     |_| async { Ok::<_, std::io::Error>("done") },
///     |_| true,
/// )
/// .await;
///
/// assert_eq!(result.unwrap(), "done");
/// # });
/// ```
pub async fn execute<T, E, F, Fut, P>(
    config: &RetryConfig,
    signal: &CancelSignal,
    operation: F,
    is_retryable: P,
) -> Result<T, RetryError<E>>
where
    F: FnMut(CancelSignal) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    config.execute(signal, operation, is_retryable).await
}
