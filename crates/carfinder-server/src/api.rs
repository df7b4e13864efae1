//! HTTP handlers for the catalog page and the search API.

use crate::{page, AppState};
use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use carfinder_catalog::{list_brands, list_models, search_cars, CarFilter, CatalogError};
use carfinder_db::{run_with_deadline, DbError};
use carfinder_types::Car;
use std::sync::Arc;
use thiserror::Error;

/// API error type. Every variant is a `500` with a plain-text body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, deadline or task failure.
    #[error(transparent)]
    Database(#[from] DbError),
    #[error("failed to load brands: {0}")]
    Brands(#[source] CatalogError),
    #[error("failed to load models: {0}")]
    Models(#[source] CatalogError),
    #[error("car search failed: {0}")]
    Search(#[source] CatalogError),
    #[error("failed to render page: {0}")]
    Render(#[source] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match &self {
            ApiError::Database(e) if e.is_timeout() => {
                tracing::warn!(error = %message, "request hit database deadline");
            }
            _ => tracing::error!(error = %message, "request failed"),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

/// Handler for `GET /`.
///
/// Renders the search page with the full brand and model lists embedded
/// for the client-side filter controls.
pub async fn index_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, ApiError> {
    let (brands, models) = run_with_deadline(&state.pool, state.request_timeout, |conn| {
        let brands = list_brands(conn).map_err(ApiError::Brands)?;
        let models = list_models(conn).map_err(ApiError::Models)?;
        Ok::<_, ApiError>((brands, models))
    })
    .await?;

    let html = page::render_index(&brands, &models).map_err(ApiError::Render)?;
    Ok(Html(html))
}

/// Handler for `GET /search?brand=&model=&year=&price=`.
///
/// All parameters are optional; empty values are ignored and a repeated
/// parameter keeps its first value. Responds with a JSON array of cars.
pub async fn search_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let filter = CarFilter::from_pairs(params);
    let cars = run_with_deadline(&state.pool, state.request_timeout, move |conn| {
        search_cars(conn, &filter).map_err(ApiError::Search)
    })
    .await?;

    Ok(Json(cars))
}
