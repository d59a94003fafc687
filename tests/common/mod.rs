#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use deals_service::domain::entities::{Deal, DealStage};
use deals_service::domain::repositories::{DealFilter, DealRepository};
use deals_service::error::AppError;
use deals_service::state::AppState;
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// In-memory repository applying the same predicates as the SQL query.
#[derive(Default)]
pub struct InMemoryDealRepository {
    deals: Vec<Deal>,
    unavailable: AtomicBool,
}

impl InMemoryDealRepository {
    pub fn new(deals: Vec<Deal>) -> Self {
        Self {
            deals,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut.into());
        }
        Ok(())
    }
}

fn matches(deal: &Deal, filter: &DealFilter) -> bool {
    if let Some(search) = &filter.search {
        let needle = search.to_lowercase();
        let hit = [&deal.name, &deal.contact_name, &deal.company]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle));
        if !hit {
            return false;
        }
    }
    if filter.stage.is_some_and(|stage| deal.stage != stage) {
        return false;
    }
    if filter.min_value.is_some_and(|min| deal.value < min) {
        return false;
    }
    if filter.max_value.is_some_and(|max| deal.value > max) {
        return false;
    }
    if filter.start_date.is_some_and(|start| deal.created_at < start) {
        return false;
    }
    if let Some(end) = filter.end_date {
        match deal.close_date {
            Some(close) if close <= end => {}
            _ => return false,
        }
    }
    true
}

#[async_trait]
impl DealRepository for InMemoryDealRepository {
    async fn find_filtered(&self, filter: &DealFilter) -> Result<Vec<Deal>, AppError> {
        self.check_available()?;
        let mut found: Vec<Deal> = self
            .deals
            .iter()
            .filter(|deal| matches(deal, filter))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Deal>, AppError> {
        self.check_available()?;
        Ok(self.deals.iter().find(|deal| deal.id == id).cloned())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
}

pub fn deal(
    id: i64,
    name: &str,
    company: &str,
    value: i64,
    stage: DealStage,
    days_after_base: i64,
) -> Deal {
    Deal {
        id,
        name: name.to_string(),
        contact_name: format!("Contact {id}"),
        company: company.to_string(),
        value: Decimal::new(value, 0),
        stage,
        created_at: base_time() + Duration::days(days_after_base),
        close_date: None,
    }
}

/// A small pipeline: two Acme deals (one won), plus others.
pub fn sample_deals() -> Vec<Deal> {
    let mut won_later = deal(5, "Globex upsell", "Globex", 90_000, DealStage::Won, 20);
    won_later.close_date = Some(base_time() + Duration::days(60));

    let mut acme_won = deal(2, "Acme renewal", "Acme Corp", 12_500, DealStage::Won, 5);
    acme_won.close_date = Some(base_time() + Duration::days(30));

    vec![
        deal(1, "Acme pilot", "Acme Corp", 5_000, DealStage::New, 1),
        acme_won,
        deal(3, "Initech rollout", "Initech", 48_000, DealStage::Negotiation, 10),
        deal(4, "Umbrella audit", "Umbrella", 7_500, DealStage::Lost, 15),
        won_later,
    ]
}

/// `n` deals with ids `1..=n`, newest last.
pub fn numbered_deals(n: i64) -> Vec<Deal> {
    (1..=n)
        .map(|id| deal(id, &format!("Deal {id}"), "Acme Corp", 1_000 * id, DealStage::New, id))
        .collect()
}

pub fn create_test_state(deals: Vec<Deal>) -> AppState {
    AppState::new(Arc::new(InMemoryDealRepository::new(deals)))
}

pub async fn insert_deal(pool: &PgPool, deal: &Deal) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO deals (name, contact_name, company, value, stage, created_at, close_date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(&deal.name)
    .bind(&deal.contact_name)
    .bind(&deal.company)
    .bind(deal.value)
    .bind(deal.stage)
    .bind(deal.created_at)
    .bind(deal.close_date)
    .fetch_one(pool)
    .await
    .unwrap()
}
