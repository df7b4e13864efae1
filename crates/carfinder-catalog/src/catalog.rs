//! Full-table catalog reads used to populate the search form.

use carfinder_types::{Brand, Model};
use rusqlite::{Connection, Params, Row};

use crate::error::CatalogError;

/// Returns every brand, ordered by id.
///
/// # Errors
///
/// See [`CatalogError`] for the failure classes.
pub fn list_brands(conn: &Connection) -> Result<Vec<Brand>, CatalogError> {
    let brands = query_all(conn, "SELECT id, name FROM brands ORDER BY id", [], "brand", |row| {
        Ok(Brand {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;

    tracing::debug!(count = brands.len(), "loaded brands");
    Ok(brands)
}

/// Returns every model, ordered by id.
///
/// # Errors
///
/// See [`CatalogError`] for the failure classes.
pub fn list_models(conn: &Connection) -> Result<Vec<Model>, CatalogError> {
    let models = query_all(
        conn,
        "SELECT id, brand_id, name FROM models ORDER BY id",
        [],
        "model",
        |row| {
            Ok(Model {
                id: row.get(0)?,
                brand_id: row.get(1)?,
                name: row.get(2)?,
            })
        },
    )?;

    tracing::debug!(count = models.len(), "loaded models");
    Ok(models)
}

/// Prepares `sql`, binds `params` and maps every row with `map`.
///
/// Keeps the three failure points apart: preparing or binding is
/// [`CatalogError::Query`], stepping the cursor is
/// [`CatalogError::Iteration`], and a row `map` rejects is
/// [`CatalogError::RowScan`].
pub(crate) fn query_all<T, P, F>(
    conn: &Connection,
    sql: &str,
    params: P,
    entity: &'static str,
    map: F,
) -> Result<Vec<T>, CatalogError>
where
    P: Params,
    F: Fn(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql).map_err(CatalogError::Query)?;
    let mut rows = stmt.query(params).map_err(CatalogError::Query)?;

    let mut out = Vec::new();
    loop {
        let row = match rows.next() {
            Ok(Some(row)) => row,
            Ok(None) => break,
            Err(source) => return Err(CatalogError::Iteration { entity, source }),
        };
        let record = map(row).map_err(|source| CatalogError::RowScan { entity, source })?;
        out.push(record);
    }

    Ok(out)
}
