//! Application layer services.
//!
//! Services consume repository traits and provide a clean API for HTTP handlers.
//!
//! - [`services::deal_service::DealService`] - Filtered deal listing and lookup

pub mod services;
