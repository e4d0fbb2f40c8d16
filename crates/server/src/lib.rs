//! Chat Relay Server Library
//!
//! Presence tracking and call/message signaling over one WebSocket per
//! client, plus a small HTTP utility surface. Credential auth and message
//! persistence live in external services; this process only relays.

pub mod config;
pub mod error;
pub mod handlers;
pub mod presence;
pub mod socket;

use axum::http::HeaderValue;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{AppState, ServerConfig};

pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        // Already set, ignore
    }

    info!("=== Chat Relay Server ===");
    info!("Features: Presence Registry | Call Signaling | Message Relay");

    let config = ServerConfig::from_env();
    config.ensure_dirs().await?;
    info!("Uploads directory: {:?}", config.uploads_dir);
    info!("Allowed origin: {}", config.frontend_origin);

    let port = config.port;
    let state = AppState::new(config);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Chat relay listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the full application router. Split out from [`run`] so tests can
/// drive it without binding a port.
pub fn router(state: AppState) -> Router {
    // Restrict CORS to the configured frontend origin; fall back to
    // permissive when the value is not a valid header.
    let cors = match state.config.frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(_) => CorsLayer::permissive(),
    };

    Router::new()
        // Relay socket
        .route("/ws", get(socket::ws_handler))
        // Utility endpoints
        .route("/api/uuid", get(handlers::generate_uuid))
        .route("/api/ping-external", get(handlers::ping_external))
        // Uploaded recordings and images
        .nest_service(
            "/uploads/recordings",
            ServeDir::new(state.config.recordings_dir()),
        )
        .nest_service("/uploads/images", ServeDir::new(state.config.images_dir()))
        // Health check
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
