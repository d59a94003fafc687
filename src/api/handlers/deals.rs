//! Handlers for deal read endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use validator::Validate;

use crate::api::dto::deals::DealQueryParams;
use crate::domain::entities::Deal;
use crate::error::AppError;
use crate::state::AppState;

/// Lists every deal matching the filter parameters.
///
/// # Endpoint
///
/// `GET /api/deals`
///
/// # Query Parameters
///
/// - `search` (optional): Case-insensitive substring of name, contact name or company
/// - `stage` (optional): One of `new`, `in_progress`, `negotiation`, `won`, `lost`
/// - `minValue` / `maxValue` (optional): Inclusive bounds on deal value
/// - `startDate` (optional): Lower bound on `created_at`
/// - `endDate` (optional): Upper bound on `close_date`
///
/// # Response
///
/// A JSON array of all matching deals ordered by `created_at` descending.
/// No server-side pagination is applied.
///
/// # Errors
///
/// Returns 400 Bad Request if a parameter cannot be parsed or fails validation.
pub async fn list_deals_handler(
    State(state): State<AppState>,
    query: Result<Query<DealQueryParams>, QueryRejection>,
) -> Result<Json<Vec<Deal>>, AppError> {
    let Query(params) = query?;
    params.validate()?;

    let deals = state.deal_service.list_deals(&params.into_filter()).await?;

    Ok(Json(deals))
}

/// Retrieves a single deal.
///
/// # Endpoint
///
/// `GET /api/deals/{id}`
///
/// # Errors
///
/// Returns 404 Not Found with `{"message": "Deal not found"}` if no deal has this id.
/// Returns 400 Bad Request if the id is not an integer.
pub async fn get_deal_handler(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Deal>, AppError> {
    let Path(id) = path?;

    let deal = state.deal_service.get_deal(id).await?;

    Ok(Json(deal))
}
