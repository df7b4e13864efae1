//! Catalog reads and car search.
//!
//! Every operation takes an already-acquired [`rusqlite::Connection`];
//! connection lifetime and deadlines belong to `carfinder-db`.
//!
//! # Search
//!
//! [`search_cars`] joins `cars -> models -> brands` and narrows the result
//! with up to four optional filters, applied in a fixed order:
//!
//! | Filter | Condition |
//! |--------|-----------|
//! | `brand` | `b.id = ?N` |
//! | `model` | `m.id = ?N` |
//! | `year` | `c.year = ?N` |
//! | `max_price` | `c.price <= ?N` |
//!
//! Filter values are only ever bound as statement parameters (see
//! [`FilterQuery`]); they never become part of the SQL text.

mod catalog;
mod error;
mod query;
mod search;

pub use catalog::{list_brands, list_models};
pub use error::CatalogError;
pub use query::{Comparison, FilterQuery, FilterValue};
pub use search::{search_cars, CarFilter};
