//! Infrastructure layer: concrete implementations of domain contracts.
//!
//! - [`persistence`] - PostgreSQL repositories built on SQLx

pub mod persistence;
