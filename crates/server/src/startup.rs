use std::net::SocketAddr;

use axum::Router;
use common::env::{ensure_dirs, ensure_json_array_file};
use configs::{AppConfig, StorageConfig};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Create the public, avatar and temp directories and seed empty data files.
pub async fn prepare_storage(storage: &StorageConfig) -> Result<(), StartupError> {
    // public/avatars is served statically, tmp holds uploads until they are moved
    let avatars = storage.avatars_dir();
    ensure_dirs(&storage.public_dir, &[avatars.as_str(), storage.temp_dir.as_str()])
        .await
        .map_err(|e| StartupError::Storage(e.to_string()))?;
    // stores refuse to create their documents; seed them once here
    ensure_json_array_file(&storage.contacts_path)
        .await
        .map_err(|e| StartupError::Storage(e.to_string()))?;
    ensure_json_array_file(&storage.users_path)
        .await
        .map_err(|e| StartupError::Storage(e.to_string()))?;
    Ok(())
}

/// Prepare storage and build the application router for `cfg`.
pub async fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    prepare_storage(&cfg.storage).await?;
    // stores, services and the avatar pipeline
    let state = ServerState::from_config(cfg);
    Ok(routes::build_router(state, build_cors()))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bad bind address: {e}")))
}

/// Public entry: build the app and run the HTTP server until Ctrl-C.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    // fallback secret is public; local runs only
    if cfg.auth.is_dev_secret() {
        warn!("JWT_SECRET not set; using the development secret");
    }

    // build router
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg)?;
    info!(%addr, contacts = %cfg.storage.contacts_path, "starting contacts api");
    // bind and serve
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| StartupError::Any(e.into()))?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // without a signal handler, keep serving instead of shutting down at once
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
