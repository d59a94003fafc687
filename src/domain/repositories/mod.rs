//! Repository trait definitions for the domain layer.
//!
//! Traits define the data-access contract; the PostgreSQL implementation lives
//! in `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.

pub mod deal_repository;

pub use deal_repository::{DealFilter, DealRepository};

#[cfg(test)]
pub use deal_repository::MockDealRepository;
