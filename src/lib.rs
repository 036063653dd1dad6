//! Company portal backend: polls with one vote per user, and an issue tracker
//! with status updates, comments and spreadsheet / PDF export.
//!
//! # Layout
//! - `services` holds the poll engine and issue tracker logic
//! - `db` holds the persistence ports plus MongoDB and in-memory adapters
//! - `controllers` and `routes` map the REST surface onto the services
//! - `middleware` resolves the bearer token into an `Identity`
//!
//! # Running
//! ```sh
//! STORE=memory JWT_SECRET=dev RUST_LOG=info cargo run
//! ```

use std::{process, sync::Arc};

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

pub mod config;
pub mod controllers;
pub mod db;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use config::{Config, StoreKind};
use db::{connection::init_db, memory_store::MemoryStore, mongo_store::MongoStore};
use state::AppState;
use utils::{error::AppResult, session::SessionKeys};

/// Routes without CORS or tracing layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(controllers::health::root))
        .nest("/polls", routes::poll_routes::poll_routes(state.clone()))
        .nest("/issues", routes::issue_routes::issue_routes(state))
}

async fn build_state(config: &Config) -> AppResult<AppState> {
    let sessions = SessionKeys::new(&config.jwt_secret);

    match config.store {
        StoreKind::Memory => {
            info!("Using in-memory store");
            Ok(AppState::new(Arc::new(MemoryStore::new()), sessions))
        }
        StoreKind::Mongo => {
            let uri = config.mongo_uri.as_deref().unwrap_or_default();
            let db = init_db(uri, &config.db_name).await?;
            Ok(AppState::new(Arc::new(MongoStore::new(db)), sessions))
        }
    }
}

pub async fn start_server() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    once_cell::sync::Lazy::force(&controllers::health::START_TIME);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    let state = match build_state(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize store: {}", e);
            process::exit(1);
        }
    };

    let origin = match config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => origin,
        Err(_) => {
            error!("Failed to parse CORS origin: {}", config.cors_origin);
            process::exit(1);
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_DISPOSITION]);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = match TcpListener::bind(config.server_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", config.server_addr, e);
            process::exit(1);
        }
    };

    info!("Server running at http://{}", config.server_addr);
    info!("CORS origin: {}", config.cors_origin);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        process::exit(1);
    }

    info!("Server shut down");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
