//! Bounded retry with Fibonacci backoff for the transfer engine.
//!
//! The policy object carries the whole retry contract — attempt cap, backoff
//! schedule, wall-clock deadline, and the retryable-error predicate — so the
//! engine never hardcodes backoff math inline. Only transient store faults
//! are retried; business-rule failures propagate on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::AppError;

/// Retry contract for the atomic transfer commit.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// First backoff delay; later delays follow the Fibonacci sequence
    pub initial_backoff: Duration,

    /// Wall-clock bound on the whole operation, retries included
    pub deadline: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(10),
            deadline: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Fibonacci-spaced delays: 10ms, 10ms, 20ms, 30ms, 50ms, ...
    fn backoff(&self) -> impl Iterator<Item = Duration> {
        let base = self.initial_backoff;
        std::iter::successors(Some((base, base)), |&(a, b)| Some((b, a + b))).map(|(a, _)| a)
    }

    /// Run `op` until it succeeds, fails terminally, or the policy is spent.
    ///
    /// Transient store errors are retried with backoff up to `max_attempts`;
    /// everything else returns immediately. Exhausting the attempts or the
    /// deadline yields `TransferFailed` wrapping the last cause.
    pub async fn run<T, F, Fut>(&self, op: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        match tokio::time::timeout(self.deadline, self.run_attempts(op)).await {
            Ok(result) => result,
            Err(_) => Err(AppError::TransferFailed("deadline exceeded".to_string())),
        }
    }

    async fn run_attempts<T, F, Fut>(&self, mut op: F) -> Result<T, AppError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let mut delays = self.backoff();
        let mut attempt = 1u32;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if retryable(&err) => {
                    if attempt >= self.max_attempts {
                        return Err(AppError::TransferFailed(err.to_string()));
                    }

                    let delay = delays.next().unwrap_or(self.initial_backoff);
                    tracing::warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient store error, retrying: {err}"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Whether an application error is a transient store fault.
fn retryable(err: &AppError) -> bool {
    matches!(err, AppError::Database(db_err) if is_transient(db_err))
}

/// Classify a store error as transient (worth retrying) or terminal.
///
/// Transient: serialization conflicts (`40001`), deadlocks (`40P01`), and
/// connection-level faults. Everything else — constraint violations, bad
/// SQL, decode errors — will not heal on retry.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            matches!(db.code().as_deref(), Some("40001") | Some("40P01"))
        }
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => true,
        _ => false,
    }
}
