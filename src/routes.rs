//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`          - Health check (database)
//! - `GET /api/deals`       - Filtered deal listing
//! - `GET /api/deals/{id}`  - Single deal
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Configurable allowed origins (all by default)
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `cors_origins` - allowed browser origins; `*` allows any
pub fn app_router(state: AppState, cors_origins: &[String]) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api", api::routes::deal_routes())
        .with_state(state)
        .layer(cors::layer(cors_origins))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
