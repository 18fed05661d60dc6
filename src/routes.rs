//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`        - Index page with the shorten form
//! - `POST /create`  - Create a short link (form field `url`)
//! - `GET  /health`  - Health check
//! - `GET  /{code}`  - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slashes are trimmed, so `/create/` and
//!   `/{code}/` keep working

use crate::api::handlers::{create_handler, health_handler, index_handler, resolve_handler};
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/", get(index_handler))
        .route("/create", post(create_handler))
        .route("/health", get(health_handler))
        .route("/{code}", get(resolve_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
