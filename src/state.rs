//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::DealService;
use crate::domain::repositories::DealRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub deal_service: Arc<DealService>,
}

impl AppState {
    /// Builds the state around a deal repository.
    pub fn new(repository: Arc<dyn DealRepository>) -> Self {
        Self {
            deal_service: Arc::new(DealService::new(repository)),
        }
    }
}
