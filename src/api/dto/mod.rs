//! Data Transfer Objects for API requests and responses.
//!
//! Query parameters are parsed with Serde and `serde_with`, then checked with
//! `validator`. Deals themselves are serialized directly from
//! [`crate::domain::entities::Deal`].

pub mod deals;
pub mod health;
