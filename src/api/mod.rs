//! HTTP API over the ward store: the contract the presentation layer
//! consumes.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::error::Result;
use crate::store::WardStore;

/// Shared app state.
#[derive(Clone)]
pub struct AppState {
    /// The ward store backing every request.
    pub store: Arc<dyn WardStore>,
}

/// Build the router with CORS and request tracing.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(cors::Any);

    Router::new()
        .route("/api/login", post(handlers::login))
        .route(
            "/api/ward/{id}",
            get(handlers::get_ward).post(handlers::update_ward),
        )
        .route("/healthcheck", get(|| async { "OK" }))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until ctrl-c.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let app = create_app(state);
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
