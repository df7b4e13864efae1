//! Shared record types for the car catalog.
//!
//! All three records are read-only snapshots of rows in the `brands`,
//! `models` and `cars` tables. They are built per request and serialised
//! straight into HTTP responses, so their serde field names are part of
//! the public JSON contract.

use serde::{Deserialize, Serialize};

/// A car manufacturer (`brands` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    /// Primary key.
    pub id: i64,
    /// Display name, e.g. `Toyota`.
    pub name: String,
}

/// A model line belonging to a brand (`models` row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Primary key.
    pub id: i64,
    /// References [`Brand::id`].
    pub brand_id: i64,
    /// Display name, e.g. `Corolla`.
    pub name: String,
}

/// A car for sale, with brand and model names resolved through the
/// `cars -> models -> brands` join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    /// Primary key of the `cars` row.
    pub id: i64,
    pub brand_name: String,
    pub model_name: String,
    /// Model year.
    pub year: i64,
    /// Asking price in whole currency units.
    pub price: i64,
}
