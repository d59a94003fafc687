//! Deal search and lookup service.

use std::sync::Arc;

use crate::domain::entities::Deal;
use crate::domain::repositories::{DealFilter, DealRepository};
use crate::error::AppError;
use serde_json::json;

/// Service for filtered deal listing and single-deal lookup.
///
/// The listing is unbounded: every matching row is returned and
/// pagination happens on the client.
pub struct DealService {
    repository: Arc<dyn DealRepository>,
}

impl DealService {
    /// Creates a new deal service.
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self { repository }
    }

    /// Lists all deals matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list_deals(&self, filter: &DealFilter) -> Result<Vec<Deal>, AppError> {
        let deals = self.repository.find_filtered(filter).await?;

        tracing::info!(
            matched = deals.len(),
            filtered = !filter.is_empty(),
            "Listed deals"
        );

        Ok(deals)
    }

    /// Retrieves a single deal.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] with the message `Deal not found` if no row
    /// has this id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn get_deal(&self, id: i64) -> Result<Deal, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Deal not found", json!({ "id": id })))
    }

    /// Checks database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }
}
