//! Car catalog server library logic.

pub mod api;
pub mod config;
pub mod page;

use axum::{http::Method, routing::get, Extension, Json, Router};
use carfinder_db::{DbPool, DbRuntimeSettings, PoolError};
use config::Config;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-only database connection pool.
    pub pool: DbPool,
    /// Deadline applied to the database work of each request.
    pub request_timeout: Duration,
    /// Directory served under `/static`.
    pub static_dir: String,
}

impl AppState {
    /// Builds the state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `PoolError` if the pool settings are rejected.
    pub fn from_config(config: &Config) -> Result<Self, PoolError> {
        let url = config.database.url.as_deref().unwrap_or_default();
        let pool = carfinder_db::create_pool(
            url,
            DbRuntimeSettings {
                busy_timeout_ms: config.database.busy_timeout_ms,
                pool_max_size: config.database.pool_max_size,
            },
        )?;

        Ok(Self {
            pool,
            request_timeout: config.server.request_timeout(),
            static_dir: config.server.static_dir.clone(),
        })
    }
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    // The search API is called from other origins; the page is not.
    let search_routes = Router::new()
        .route("/search", get(api::search_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        );

    let router = Router::new()
        .route("/", get(api::index_handler))
        .route("/health", get(health))
        .merge(search_routes);

    let static_dir = state.static_dir.clone();
    if std::path::Path::new(&static_dir).is_dir() {
        tracing::info!(path = %static_dir, "serving static files at /static");
    } else {
        tracing::warn!(path = %static_dir, "static directory not found, /static will return 404");
    }
    let router = router.nest_service("/static", ServeDir::new(&static_dir));

    router
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
