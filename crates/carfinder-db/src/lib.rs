//! Database access layer for the car catalog.
//!
//! Provides the read-only SQLite connection pool (via `r2d2`) and the
//! deadline runner that every request goes through to reach the database.
//!
//! # Design decisions
//!
//! - **Read-only connections**: the service never writes. Connections are
//!   opened with `SQLITE_OPEN_READ_ONLY`, so an accidental write fails at
//!   the storage layer.
//! - **Lazy pool**: no connection is opened at startup. An unreachable
//!   database surfaces as a per-request connection error.
//! - **Deadlines**: SQLite calls are blocking, so they run on the blocking
//!   thread pool. A request deadline interrupts the in-flight statement
//!   instead of leaving it running after the caller has given up.

mod pool;
mod runner;

pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
pub use runner::{run_with_deadline, DbError};
