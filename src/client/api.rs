//! HTTP access to the deals endpoints.

use super::criteria::QueryParams;
use super::error::ClientError;
use super::response::{DealPage, DealsResponse, DecodeError};
use crate::domain::entities::Deal;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Outbound request timeout; expiry surfaces as [`ClientError::Network`].
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the query builder gets deals from.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DealsSource: Send + Sync {
    /// `GET /api/deals` with the given parameters.
    async fn fetch_deals(&self, params: &QueryParams) -> Result<DealPage, ClientError>;

    /// `GET /api/deals/{id}`.
    async fn fetch_deal(&self, id: i64) -> Result<Deal, ClientError>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// [`DealsSource`] backed by the deals HTTP API.
#[derive(Debug, Clone)]
pub struct HttpDealsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpDealsClient {
    /// Creates a client for the service at `base_url` (e.g. `http://localhost:3000`).
    ///
    /// Endpoints are resolved relative to the base, so a path prefix such as
    /// `http://gateway/deals-service` is kept.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Like [`HttpDealsClient::new`] with a custom per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("expected an http(s) URL".to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl DealsSource for HttpDealsClient {
    async fn fetch_deals(&self, params: &QueryParams) -> Result<DealPage, ClientError> {
        let url = self.endpoint("api/deals")?;
        tracing::debug!(%url, params = ?params.as_slice(), "GET deals");

        let response = self.http.get(url).query(params.as_slice()).send().await?;
        let body = error_for_status(response).await?.bytes().await?;

        Ok(DealsResponse::from_slice(&body)?.canonicalize())
    }

    async fn fetch_deal(&self, id: i64) -> Result<Deal, ClientError> {
        let url = self.endpoint(&format!("api/deals/{id}"))?;
        tracing::debug!(%url, "GET deal");

        let response = self.http.get(url).send().await?;
        let body = error_for_status(response).await?.bytes().await?;

        serde_json::from_slice(&body)
            .map_err(|e| ClientError::Decode(DecodeError::InvalidDeal(e)))
    }
}

/// Maps non-2xx responses onto the error taxonomy, preferring the server's
/// `message` field.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    Err(match status {
        StatusCode::BAD_REQUEST => ClientError::Validation(message),
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    })
}
