//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server exposes a single health endpoint that reflects the database
//! connection, and serves the built client bundle for every other path.
//! Unknown paths fall back to `index.html` so client-side routes such as
//! `/login` resolve after a hard reload.

use std::path::Path;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::state::AppState;


fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new().route("/healthz", get(healthz)).layer(cors).with_state(state)
}

/// API routes plus the static client bundle rooted at `static_dir`.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let client = ServeDir::new(static_dir)
        .append_index_html_on_directories(true)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    api_routes(state)
        .fallback_service(client)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

async fn healthz(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "database unavailable")
        }
    }
}
