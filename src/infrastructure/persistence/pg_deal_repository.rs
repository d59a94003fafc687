//! PostgreSQL implementation of the deal repository.
//!
//! Filtered reads are assembled with [`sqlx::QueryBuilder`]. Every filter value
//! goes through `push_bind`, so user input only ever reaches the server as a
//! bound parameter.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use crate::domain::entities::Deal;
use crate::domain::repositories::{DealFilter, DealRepository};
use crate::error::AppError;

const SELECT_DEALS: &str =
    "SELECT id, name, contact_name, company, value, stage, created_at, close_date FROM deals";

/// PostgreSQL repository for deal reads.
pub struct PgDealRepository {
    pool: Arc<PgPool>,
}

impl PgDealRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Escapes `LIKE` metacharacters so the search text matches literally.
///
/// PostgreSQL uses `\` as the default `LIKE` escape character.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Builds the filtered listing query for `filter`.
///
/// Predicates are ANDed in a fixed order (search, stage, min value, max value,
/// start date, end date) and the result is ordered by `created_at DESC`.
pub fn build_filtered_query(filter: &DealFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_DEALS);
    qb.push(" WHERE TRUE");

    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", escape_like(search));
        qb.push(" AND (name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR contact_name ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR company ILIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(stage) = filter.stage {
        qb.push(" AND stage = ").push_bind(stage);
    }
    if let Some(min) = filter.min_value {
        qb.push(" AND value >= ").push_bind(min);
    }
    if let Some(max) = filter.max_value {
        qb.push(" AND value <= ").push_bind(max);
    }
    if let Some(start) = filter.start_date {
        qb.push(" AND created_at >= ").push_bind(start);
    }
    if let Some(end) = filter.end_date {
        qb.push(" AND close_date <= ").push_bind(end);
    }

    qb.push(" ORDER BY created_at DESC");
    qb
}

#[async_trait]
impl DealRepository for PgDealRepository {
    async fn find_filtered(&self, filter: &DealFilter) -> Result<Vec<Deal>, AppError> {
        let mut qb = build_filtered_query(filter);
        tracing::debug!(sql = qb.sql(), "Executing filtered deal query");

        let deals = qb
            .build_query_as::<Deal>()
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(deals)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Deal>, AppError> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            SELECT id, name, contact_name, company, value, stage, created_at, close_date
            FROM deals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(deal)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::DealStage;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    #[test]
    fn test_empty_filter_has_no_predicates() {
        let qb = build_filtered_query(&DealFilter::new());
        assert_eq!(
            qb.sql(),
            format!("{SELECT_DEALS} WHERE TRUE ORDER BY created_at DESC")
        );
    }

    #[test]
    fn test_search_binds_three_parameters() {
        let filter = DealFilter::new().with_search(Some("acme".to_string()));
        let qb = build_filtered_query(&filter);

        assert_eq!(
            qb.sql(),
            format!(
                "{SELECT_DEALS} WHERE TRUE AND (name ILIKE $1 OR contact_name ILIKE $2 \
                 OR company ILIKE $3) ORDER BY created_at DESC"
            )
        );
    }

    #[test]
    fn test_all_filters_in_order() {
        let filter = DealFilter::new()
            .with_search(Some("acme".to_string()))
            .with_stage(Some(DealStage::Won))
            .with_value_range(Some(Decimal::new(1000, 0)), Some(Decimal::new(5000, 0)))
            .with_date_range(
                Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()),
                Some(Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap()),
            );
        let qb = build_filtered_query(&filter);
        let sql = qb.sql();

        assert!(sql.contains(" AND stage = $4"));
        assert!(sql.contains(" AND value >= $5"));
        assert!(sql.contains(" AND value <= $6"));
        assert!(sql.contains(" AND created_at >= $7"));
        assert!(sql.contains(" AND close_date <= $8"));
        assert!(sql.ends_with("ORDER BY created_at DESC"));
    }

    #[test]
    fn test_end_date_bounds_close_date() {
        let filter = DealFilter::new()
            .with_date_range(None, Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()));
        let qb = build_filtered_query(&filter);

        assert!(qb.sql().contains("close_date <= $1"));
        assert!(!qb.sql().contains("created_at >="));
    }

    #[test]
    fn test_user_input_never_reaches_sql_text() {
        let hostile = "x'; DROP TABLE deals; --";
        let filter = DealFilter::new().with_search(Some(hostile.to_string()));
        let qb = build_filtered_query(&filter);

        assert!(!qb.sql().contains("DROP TABLE"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("acme"), "acme");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
