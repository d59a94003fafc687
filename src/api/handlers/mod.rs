//! HTTP request handlers for API endpoints.

pub mod deals;
pub mod health;

pub use deals::{get_deal_handler, list_deals_handler};
pub use health::health_handler;
