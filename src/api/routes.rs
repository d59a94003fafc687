//! API route configuration.

use crate::api::handlers::{get_deal_handler, list_deals_handler};
use crate::state::AppState;
use axum::{Router, routing::get};

/// Deal read routes, nested under `/api`.
///
/// # Endpoints
///
/// - `GET /deals`       - Filtered listing (full result set)
/// - `GET /deals/{id}`  - Single deal
pub fn deal_routes() -> Router<AppState> {
    Router::new()
        .route("/deals", get(list_deals_handler))
        .route("/deals/{id}", get(get_deal_handler))
}
