//! REST API layer for HTTP request/response handling.
//!
//! - [`dto`] - Query parameter and response types
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Request tracing and CORS layers
//! - [`routes`] - Route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
