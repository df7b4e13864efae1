//! Connection pool creation and configuration.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::time::Duration;
use thiserror::Error;

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    /// Busy timeout for SQLite connections, in milliseconds.
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

/// A type alias for the SQLite connection pool.
pub type DbPool = Pool<SqliteConnectionManager>;

/// Errors that can occur when creating the database pool.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The connection string is empty.
    #[error("database url must not be empty")]
    EmptyUrl,

    /// The pool configuration was rejected.
    #[error("invalid database pool settings: {0}")]
    InvalidSettings(String),
}

/// Creates a pool of read-only SQLite connections.
///
/// `db_url` is a file path or a `file:` URI. Connections are opened on
/// demand, so this never touches the database itself; a missing or
/// unreadable database is reported when a request first asks for a
/// connection.
///
/// # Errors
///
/// Returns `PoolError::EmptyUrl` for a blank URL and
/// `PoolError::InvalidSettings` if the pool size is zero.
pub fn create_pool(db_url: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    if db_url.trim().is_empty() {
        return Err(PoolError::EmptyUrl);
    }
    if settings.pool_max_size == 0 {
        return Err(PoolError::InvalidSettings(
            "pool_max_size must be at least 1".to_string(),
        ));
    }

    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;

    let manager = SqliteConnectionManager::file(db_url)
        .with_flags(flags)
        .with_init(move |conn| {
            conn.busy_timeout(Duration::from_millis(settings.busy_timeout_ms))
        });

    let pool = Pool::builder()
        .max_size(settings.pool_max_size)
        .min_idle(Some(0))
        .build_unchecked(manager);

    tracing::debug!(
        url = db_url,
        max_size = settings.pool_max_size,
        "created read-only database pool"
    );

    Ok(pool)
}
