//! Deals browsing client.
//!
//! - [`criteria`] - raw filter input and its query-string form
//! - [`state`] - [`BrowserState`] and the pure [`reduce`] function
//! - [`paginator`] - client-side slicing and the page-number window
//! - [`response`] - decoding of the list response envelopes
//! - [`api`] - the [`DealsSource`] seam and its HTTP implementation
//! - [`query_builder`] - debounce and request ordering

pub mod api;
pub mod criteria;
pub mod error;
pub mod paginator;
pub mod query_builder;
pub mod response;
pub mod state;

pub use api::{DealsSource, HttpDealsClient, REQUEST_TIMEOUT};
pub use criteria::{FilterCriteria, FilterKey, QueryParams};
pub use error::ClientError;
pub use paginator::PageControl;
pub use query_builder::{DEBOUNCE_WINDOW, FETCH_ERROR_MESSAGE, QueryBuilder};
pub use response::{DealPage, DealsResponse, DecodeError};
pub use state::{Action, BrowserState, PAGE_SIZE_OPTIONS, PaginationState, reduce};
