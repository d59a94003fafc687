//! Domain layer containing business entities and repository contracts.
//!
//! - [`entities`] - Core data structures ([`entities::Deal`], [`entities::DealStage`])
//! - [`repositories`] - Data access trait definitions
//!

pub mod entities;
pub mod repositories;
