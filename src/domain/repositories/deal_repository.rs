//! Repository trait for deal reads.

use crate::domain::entities::{Deal, DealStage};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Filter criteria for listing deals.
///
/// Every field is optional; present fields are combined with logical AND.
/// `start_date` bounds `created_at` while `end_date` bounds `close_date`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealFilter {
    /// Case-insensitive substring matched against name, contact name and company.
    pub search: Option<String>,
    pub stage: Option<DealStage>,
    pub min_value: Option<Decimal>,
    pub max_value: Option<Decimal>,
    /// Lower bound (inclusive) on `created_at`.
    pub start_date: Option<DateTime<Utc>>,
    /// Upper bound (inclusive) on `close_date`.
    pub end_date: Option<DateTime<Utc>>,
}

impl DealFilter {
    /// Creates a filter that matches every deal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds substring search. Empty strings are ignored.
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.is_empty());
        self
    }

    /// Restricts results to one stage.
    pub fn with_stage(mut self, stage: Option<DealStage>) -> Self {
        self.stage = stage;
        self
    }

    /// Adds inclusive bounds on deal value.
    pub fn with_value_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Adds the `created_at` lower bound and the `close_date` upper bound.
    pub fn with_date_range(
        mut self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// Returns true if no predicate is active.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Repository interface for reading deals.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgDealRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_deal.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DealRepository: Send + Sync {
    /// Returns every deal matching `filter`, newest `created_at` first.
    ///
    /// No limit is applied; the complete filtered set is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_filtered(&self, filter: &DealFilter) -> Result<Vec<Deal>, AppError>;

    /// Finds a deal by its identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Deal))` if found
    /// - `Ok(None)` if not found
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_id(&self, id: i64) -> Result<Option<Deal>, AppError>;

    /// Checks that the backing store answers queries.
    async fn ping(&self) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_filter_is_empty() {
        assert!(DealFilter::new().is_empty());
    }

    #[test]
    fn test_empty_search_is_dropped() {
        let filter = DealFilter::new().with_search(Some(String::new()));
        assert!(filter.search.is_none());
        assert!(filter.is_empty());
    }

    #[test]
    fn test_builder_sets_fields() {
        let filter = DealFilter::new()
            .with_search(Some("acme".to_string()))
            .with_stage(Some(DealStage::Won))
            .with_value_range(Some(Decimal::new(100, 0)), None);

        assert_eq!(filter.search.as_deref(), Some("acme"));
        assert_eq!(filter.stage, Some(DealStage::Won));
        assert_eq!(filter.min_value, Some(Decimal::new(100, 0)));
        assert!(filter.max_value.is_none());
        assert!(!filter.is_empty());
    }
}
