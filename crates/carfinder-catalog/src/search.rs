//! Filtered car search over the `cars -> models -> brands` join.

use carfinder_types::Car;
use rusqlite::{params_from_iter, Connection};

use crate::catalog::query_all;
use crate::error::CatalogError;
use crate::query::{Comparison, FilterQuery};

const BASE_QUERY: &str = "SELECT c.id, b.name AS brand_name, m.name AS model_name, c.year, c.price
     FROM cars c
     JOIN models m ON c.model_id = m.id
     JOIN brands b ON m.brand_id = b.id";

/// Optional search filters, one per dimension.
///
/// Values are opaque strings. `None` and `Some("")` both mean "do not
/// filter on this dimension".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CarFilter {
    /// Brand id.
    pub brand: Option<String>,
    /// Model id.
    pub model: Option<String>,
    /// Exact model year.
    pub year: Option<String>,
    /// Inclusive upper bound on price.
    pub max_price: Option<String>,
}

impl CarFilter {
    /// Builds a filter from decoded query-string pairs.
    ///
    /// Recognised keys are `brand`, `model`, `year` and `price`. When a key
    /// repeats, the first value wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut filter = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "brand" => &mut filter.brand,
                "model" => &mut filter.model,
                "year" => &mut filter.year,
                "price" => &mut filter.max_price,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        filter
    }

    /// Builds the search query for this filter.
    pub fn to_query(&self) -> FilterQuery {
        let mut query = FilterQuery::new(BASE_QUERY);
        query
            .and_present("b.id", Comparison::Eq, self.brand.as_deref())
            .and_present("m.id", Comparison::Eq, self.model.as_deref())
            .and_present("c.year", Comparison::Eq, self.year.as_deref())
            .and_present("c.price", Comparison::AtMost, self.max_price.as_deref())
            .order_by("c.id");
        query
    }
}

/// Returns every car matching all present filters, ordered by car id.
///
/// With no filters present this is the full join. Cars whose model or
/// brand row is missing never appear.
///
/// # Errors
///
/// A filter value that is not an integer fails binding and is reported as
/// [`CatalogError::Query`]. See [`CatalogError`] for the other classes.
pub fn search_cars(conn: &Connection, filter: &CarFilter) -> Result<Vec<Car>, CatalogError> {
    tracing::info!(
        brand = filter.brand.as_deref().unwrap_or(""),
        model = filter.model.as_deref().unwrap_or(""),
        year = filter.year.as_deref().unwrap_or(""),
        price = filter.max_price.as_deref().unwrap_or(""),
        "searching cars"
    );

    let (sql, values) = filter.to_query().render();
    let cars = query_all(conn, &sql, params_from_iter(values.iter()), "car", |row| {
        Ok(Car {
            id: row.get(0)?,
            brand_name: row.get(1)?,
            model_name: row.get(2)?,
            year: row.get(3)?,
            price: row.get(4)?,
        })
    })?;

    tracing::debug!(count = cars.len(), "found cars");
    Ok(cars)
}
