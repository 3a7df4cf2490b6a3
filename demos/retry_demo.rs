//! Retry Demo
//!
//! Runs an operation that always fails with a temporary error and shows the
//! growing, jittered waits between attempts until the retry budget runs out.
//!
//! Run with: cargo run --example retry_demo --features tracing

use retryer::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DemoError {
    Temporary,
    #[allow(dead_code)]
    Fatal,
}

impl std::fmt::Display for DemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DemoError::Temporary => write!(f, "temporary"),
            DemoError::Fatal => write!(f, "fatal"),
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = RetryConfig::new()
        .with_max_retries(5)
        .with_min_delay(Duration::from_millis(300))
        .with_max_delay(Duration::from_secs(300));

    let count = AtomicU32::new(0);
    let result: Result<(), _> = config
        .execute(
            &CancelSignal::new(),
            |_| {
                let n = count.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::info!(count = n, "calling operation");
                async { Err(DemoError::Temporary) }
            },
            |err| *err == DemoError::Temporary,
        )
        .await;

    if let Err(err) = result {
        tracing::info!(exhausted = err.is_exhausted(), error = %err, "retry over");
    }
}
