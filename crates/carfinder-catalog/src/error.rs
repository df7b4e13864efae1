//! Error types for catalog reads and car search.

/// Errors that can occur while reading the catalog or searching cars.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The statement could not be prepared, bound or executed. Filter
    /// values that fail integer coercion land here.
    #[error("query failed: {0}")]
    Query(#[source] rusqlite::Error),

    /// A result row did not have the expected shape.
    #[error("failed to scan {entity} row: {source}")]
    RowScan {
        /// The record being built (`brand`, `model` or `car`).
        entity: &'static str,
        /// The underlying column conversion error.
        source: rusqlite::Error,
    },

    /// The cursor failed while stepping through results.
    #[error("failed while reading {entity} rows: {source}")]
    Iteration {
        /// The record being built.
        entity: &'static str,
        /// The underlying SQLite error.
        source: rusqlite::Error,
    },
}
