//! Galleria Portal - Mall-directory web portal.
//!
//! This binary serves both portal surfaces on port 3000: the user dashboard
//! (browsing, filtering, price comparison) and the admin dashboard
//! (shop/offer CRUD, admin-request approval, log viewer).
//!
//! # Architecture
//!
//! - Axum web framework with Askama templates for server-side rendering
//! - Cookie sessions via tower-sessions (signed, in-process store)
//! - Persistence and identity behind gateway traits (`gateway` module);
//!   the in-memory backend plugs in here, a managed backend would plug in
//!   the same way
//! - Fire-and-forget audit logging through a bounded channel

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

mod config;
mod error;
mod filters;
mod gateway;
mod middleware;
mod models;
mod routes;
mod services;
mod state;

use config::PortalConfig;
use gateway::SessionChange;
use gateway::memory::MemoryBackend;
use state::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment
    let config = PortalConfig::from_env().expect("Failed to load configuration");

    // Initialize tracing with EnvFilter
    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "galleria_portal=info,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Wire up the backend. Every gateway contract is served by the
    // in-memory backend; a managed backend would slot into the same traits.
    let backend = Arc::new(MemoryBackend::new());

    if config.seed_demo {
        backend
            .seed_demo()
            .await
            .expect("Failed to seed demo data");
        tracing::info!("Demo data seeded");
    }

    // Subscribe to identity session transitions once, at the application
    // boundary, and log them.
    spawn_session_change_listener(&backend);

    // Build application state
    let state = AppState::new(
        config,
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend,
    );

    // Create session layer
    let session_layer = middleware::create_session_layer(state.config());

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Start server
    let addr = state.config().socket_addr();
    tracing::info!("portal listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Log identity session transitions for the lifetime of the process.
fn spawn_session_change_listener(backend: &Arc<MemoryBackend>) {
    use gateway::IdentityGateway;

    let mut changes = backend.subscribe();
    tokio::spawn(async move {
        loop {
            match changes.recv().await {
                Ok(SessionChange::SignedIn(identity)) => {
                    tracing::info!(uid = %identity.uid, "session started");
                }
                Ok(SessionChange::SignedOut(Some(uid))) => {
                    tracing::info!(%uid, "session ended");
                }
                Ok(SessionChange::SignedOut(None)) => {
                    tracing::info!("session ended (no uid)");
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "session change listener lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
