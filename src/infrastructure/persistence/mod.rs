//! PostgreSQL repository implementations.
//!
//! - [`PgDealRepository`] - Filtered and single-deal reads

pub mod pg_deal_repository;

pub use pg_deal_repository::PgDealRepository;
