//! Decoding of the deals list response.
//!
//! The endpoint has historically answered with several envelopes. Each known
//! shape is a [`DealsResponse`] variant; [`DealsResponse::canonicalize`] is the
//! one place they collapse into a [`DealPage`]. Anything else is a
//! [`DecodeError`], never an empty list.

use crate::domain::entities::Deal;
use serde_json::{Map, Value};

/// Canonical result of one list request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealPage {
    pub deals: Vec<Deal>,
    /// Number of matching deals on the server.
    pub total: u64,
}

/// Every response shape the client understands.
#[derive(Debug, Clone, PartialEq)]
pub enum DealsResponse {
    /// `[ ... ]`
    Bare(Vec<Deal>),
    /// `{ "deals": [ ... ], "total"?: n }`
    Deals { deals: Vec<Deal>, total: Option<u64> },
    /// `{ "data": [ ... ], "total"?: n }`
    Data { deals: Vec<Deal>, total: Option<u64> },
    /// `{ "data": { "deals": [ ... ], "total"?: n }, "total"?: n }`
    NestedData { deals: Vec<Deal>, total: Option<u64> },
}

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("response body is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
    #[error("unsupported response shape")]
    UnsupportedShape,
    #[error("invalid deal in response: {0}")]
    InvalidDeal(#[source] serde_json::Error),
    #[error("'{0}' is not a non-negative integer")]
    InvalidTotal(&'static str),
}

const TOTAL_KEYS: [&str; 2] = ["total", "totalCount"];

impl DealsResponse {
    pub fn from_slice(body: &[u8]) -> Result<Self, DecodeError> {
        let value = serde_json::from_slice(body).map_err(DecodeError::MalformedJson)?;
        Self::decode(value)
    }

    /// Classifies a JSON value.
    ///
    /// Shapes are tried in order: bare array, top-level `deals`, `data` as an
    /// array, then `data.deals`. The explicit count is read from `total` or
    /// `totalCount`, inner object first, then top level.
    pub fn decode(value: Value) -> Result<Self, DecodeError> {
        let mut object = match value {
            Value::Array(items) => return Ok(DealsResponse::Bare(parse_deals(items)?)),
            Value::Object(object) => object,
            _ => return Err(DecodeError::UnsupportedShape),
        };

        let top_total = find_total(&object)?;

        if let Some(deals) = object.remove("deals") {
            let Value::Array(items) = deals else {
                return Err(DecodeError::UnsupportedShape);
            };
            return Ok(DealsResponse::Deals {
                deals: parse_deals(items)?,
                total: top_total,
            });
        }

        match object.remove("data") {
            Some(Value::Array(items)) => Ok(DealsResponse::Data {
                deals: parse_deals(items)?,
                total: top_total,
            }),
            Some(Value::Object(mut inner)) => {
                let Some(Value::Array(items)) = inner.remove("deals") else {
                    return Err(DecodeError::UnsupportedShape);
                };
                let total = find_total(&inner)?.or(top_total);
                Ok(DealsResponse::NestedData {
                    deals: parse_deals(items)?,
                    total,
                })
            }
            _ => Err(DecodeError::UnsupportedShape),
        }
    }

    /// Collapses any shape into a page; `total` falls back to the number of
    /// deals when the server sent no count.
    pub fn canonicalize(self) -> DealPage {
        let (deals, total) = match self {
            DealsResponse::Bare(deals) => (deals, None),
            DealsResponse::Deals { deals, total }
            | DealsResponse::Data { deals, total }
            | DealsResponse::NestedData { deals, total } => (deals, total),
        };
        let total = total.unwrap_or(deals.len() as u64);
        DealPage { deals, total }
    }
}

fn parse_deals(items: Vec<Value>) -> Result<Vec<Deal>, DecodeError> {
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(DecodeError::InvalidDeal))
        .collect()
}

fn find_total(object: &Map<String, Value>) -> Result<Option<u64>, DecodeError> {
    for key in TOTAL_KEYS {
        match object.get(key) {
            None | Some(Value::Null) => continue,
            Some(value) => {
                return value
                    .as_u64()
                    .map(Some)
                    .ok_or(DecodeError::InvalidTotal(key));
            }
        }
    }
    Ok(None)
}
