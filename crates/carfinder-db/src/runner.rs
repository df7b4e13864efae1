//! Deadline-bound execution of blocking database work.

use crate::pool::DbPool;
use rusqlite::{Connection, InterruptHandle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors raised while acquiring a connection or enforcing a deadline.
#[derive(Debug, Error)]
pub enum DbError {
    /// No connection could be established before the deadline.
    #[error("database connection failed: {0}")]
    Connection(#[source] r2d2::Error),

    /// The operation did not finish within its deadline.
    #[error("database operation timed out after {0:?}")]
    Timeout(Duration),

    /// The blocking task panicked or was cancelled.
    #[error("database task failed: {0}")]
    Task(String),
}

impl DbError {
    /// Returns `true` for deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, DbError::Timeout(_))
    }
}

/// SQLite VM instructions between cancellation checks.
const PROGRESS_CHECK_OPS: i32 = 1_000;

/// Cancels the blocking half of a run when dropped while armed.
///
/// Setting the flag stops any statement the op starts later (through the
/// progress handler); the interrupt stops the one running now.
struct CancelOnDrop {
    cancelled: Arc<AtomicBool>,
    interrupt: InterruptHandle,
    armed: bool,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.cancelled.store(true, Ordering::Relaxed);
            self.interrupt.interrupt();
        }
    }
}

/// Runs `op` against a pooled connection, bounded by `deadline`.
///
/// The connection is acquired on the blocking thread pool with at most
/// `deadline` to spare. `op` then runs on the blocking pool with whatever
/// remains of the deadline. If that expires, or the returned future is
/// dropped first, the run is cancelled: the current statement is
/// interrupted and every statement `op` starts afterwards fails straight
/// away, so the connection goes back to the pool without finishing the
/// remaining work.
///
/// The connection never outlives `op`: it is dropped back into the pool on
/// every exit path.
///
/// # Errors
///
/// Returns [`DbError`] (converted into `E`) for connection, timeout or task
/// failures, and whatever `op` itself returns.
pub async fn run_with_deadline<T, E, F>(pool: &DbPool, deadline: Duration, op: F) -> Result<T, E>
where
    F: FnOnce(&Connection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: From<DbError> + Send + 'static,
{
    let started = Instant::now();

    let acquire_pool = pool.clone();
    let conn = tokio::task::spawn_blocking(move || acquire_pool.get_timeout(deadline))
        .await
        .map_err(|e| DbError::Task(e.to_string()))?
        .map_err(DbError::Connection)?;

    let remaining = deadline.saturating_sub(started.elapsed());
    if remaining.is_zero() {
        return Err(DbError::Timeout(deadline).into());
    }

    let cancelled = Arc::new(AtomicBool::new(false));
    let mut guard = CancelOnDrop {
        cancelled: Arc::clone(&cancelled),
        interrupt: conn.get_interrupt_handle(),
        armed: true,
    };

    let mut task = tokio::task::spawn_blocking(move || {
        conn.progress_handler(
            PROGRESS_CHECK_OPS,
            Some(move || cancelled.load(Ordering::Relaxed)),
        );
        let result = op(&*conn);
        conn.progress_handler(0, None::<fn() -> bool>);
        result
    });

    match tokio::time::timeout(remaining, &mut task).await {
        Ok(joined) => {
            guard.armed = false;
            joined.map_err(|e| DbError::Task(e.to_string()))?
        }
        Err(_) => {
            drop(guard);
            tracing::debug!(
                deadline_ms = deadline.as_millis() as u64,
                "database operation exceeded deadline, cancelled"
            );
            Err(DbError::Timeout(deadline).into())
        }
    }
}
