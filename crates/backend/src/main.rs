pub mod domain;
pub mod handlers;
pub mod shared;
pub mod system;

use std::net::SocketAddr;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

/// Каталог собранного frontend (trunk build)
const STATIC_DIR: &str = "dist";

fn build_router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH
        // ========================================
        .route("/api/system/auth/login", post(system::handlers::auth::login))
        .route(
            "/api/system/auth/me",
            get(system::handlers::auth::current_user)
                .layer(middleware::from_fn(system::auth::middleware::require_auth)),
        )
        // ========================================
        // DATA GATEWAY
        // ========================================
        .route(
            "/api/gateway",
            get(handlers::gateway::read).post(handlers::gateway::write),
        )
        .fallback_service(ServeDir::new(STATIC_DIR))
        .layer(middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;

    let config = shared::config::get_config();

    let db_path = shared::config::get_database_path(config);
    shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    system::initialization::ensure_admin_user_exists(&config.auth).await?;
    domain::a001_service_catalog::seed::seed_if_empty().await?;

    let addr: SocketAddr = ([0, 0, 0, 0], config.server.port).into();
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            tracing::error!(
                "Port {} is already in use, change [server] port in config.toml",
                config.server.port
            );
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            return Err(e.into());
        }
    };
    tracing::info!("Quote gateway listening on http://{}", addr);

    axum::serve(listener, build_router()).await?;
    Ok(())
}
