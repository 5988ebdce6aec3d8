//! Router configuration and server setup.

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::handlers;
use crate::state::WebState;

/// Creates the router with every page and API route configured.
pub fn create_router(state: WebState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Pages
        .route("/", get(handlers::landing_page))
        .route("/library", get(handlers::library_page))
        .route("/word", get(handlers::word_page))
        .route("/knee", get(handlers::knee_page))
        .route("/heart", get(handlers::heart_page))
        .route("/contact", get(handlers::contact_page))
        .route("/message.json", get(handlers::floating_message))
        // API
        .route("/api/health", get(handlers::health))
        .route("/api/library", get(handlers::list_library))
        .layer(cors)
        .with_state(state)
}

/// Serves `router` on `addr` until the process stops.
pub async fn serve(addr: &str, router: Router) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "HTTP server listening");
    axum::serve(listener, router).await
}
