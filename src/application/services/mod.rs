//! Business logic services for the application layer.

pub mod deal_service;

pub use deal_service::DealService;
