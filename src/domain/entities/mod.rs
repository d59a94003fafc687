//! Core domain entities.
//!
//! - [`Deal`] - A sales-pipeline record
//! - [`DealStage`] - Enumerated lifecycle stage of a deal
//!
//! Deals are read-only to this service; there are no creation or patch types.

pub mod deal;

pub use deal::{Deal, DealStage, UnknownStage};
