//! Car catalog server binary.
//!
//! Loads configuration, initialises structured logging and the read-only
//! database pool, then serves the search page and API until SIGTERM/SIGINT.

use carfinder_server::{app, config, AppState};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env is normal; anything in it only fills unset variables.
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    let (config_path, config_source) = config::resolve_config_path(
        std::env::args().nth(1),
        std::env::var("CARFINDER_CONFIG_PATH").ok(),
    );

    let config = config::load_config(Some(config_path.as_str()))
        .expect("failed to load configuration: the server cannot start without valid config");

    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        source = config_source.as_str(),
        path = %config_path,
        dotenv = dotenv_loaded,
        request_timeout_ms = config.server.request_timeout_ms,
        "resolved startup configuration"
    );

    let state = AppState::from_config(&config)
        .expect("failed to create database pool: check database.url in config");

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .expect("failed to bind to address: is another process using this port?");

    tracing::info!(%addr, "carfinder server listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async {
            let signal = shutdown_signal().await;
            tracing::info!(signal, "shutting down");
        })
        .await
        .expect("server error");

    tracing::info!("carfinder server stopped");
}

/// Resolves with the name of the first shutdown signal received.
async fn shutdown_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                res.expect("failed to install Ctrl+C handler");
                "SIGINT"
            }
            _ = term.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
        "ctrl-c"
    }
}
