//! HTTP client for the Clic Santé public scheduling API.
//!
//! Wraps `reqwest` with the portal's static identification headers, URL
//! construction, bounded retries, and typed response decoding. The
//! per-endpoint operations live in sibling modules as further `impl` blocks.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use vaxscan_core::AppConfig;

use crate::error::ClientError;
use crate::retry::RetryPolicy;

/// Client for the scheduling API.
///
/// Build it once from [`AppConfig`] and share it by reference: the inner
/// `reqwest::Client` pools connections across concurrent tasks.
#[derive(Debug)]
pub struct ClicSanteClient {
    client: Client,
    base_url: Url,
    pub(crate) booking_base_url: String,
    pub(crate) timezone: String,
    pub(crate) unified_service_id: u32,
    pub(crate) service_marker: String,
    pub(crate) max_concurrent_days: usize,
    retry: RetryPolicy,
}

/// A response whose status the caller still has to interpret.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub url: Url,
    pub body: String,
}

impl RawResponse {
    /// Fails with [`ClientError::UnexpectedStatus`] unless the status is 2xx.
    pub fn require_success(self) -> Result<Self, ClientError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ClientError::UnexpectedStatus {
                status: self.status.as_u16(),
                url: self.url.to_string(),
            })
        }
    }

    pub fn json<T: DeserializeOwned>(&self, context: &str) -> Result<T, ClientError> {
        serde_json::from_str(&self.body).map_err(|e| ClientError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

impl ClicSanteClient {
    /// Creates a client pointed at `config.api_base_url`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidBaseUrl`] if the base URL does not parse.
    /// - [`ClientError::InvalidHeader`] if a configured header value contains
    ///   characters not allowed in HTTP headers.
    /// - [`ClientError::Http`] if the underlying `reqwest::Client` cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        // Exactly one trailing slash, so `Url::join` appends to the base path
        // instead of replacing its last segment.
        let normalised = format!("{}/", config.api_base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.api_base_url.clone(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("product"),
            header_value("product", &config.product)?,
        );
        headers.insert(
            AUTHORIZATION,
            header_value("authorization", &config.api_authorization)?,
        );
        headers.insert(
            HeaderName::from_static("x-trimoz-role"),
            header_value("x-trimoz-role", &config.role)?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("vaxscan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            booking_base_url: config.booking_base_url.trim_end_matches('/').to_owned(),
            timezone: config.timezone.clone(),
            unified_service_id: config.unified_service_id,
            service_marker: config.service_marker.clone(),
            max_concurrent_days: config.max_concurrent_days.max(1),
            retry: RetryPolicy::new(config.max_retries, config.retry_backoff_base_ms),
        })
    }

    /// Builds the full request URL for `path` (relative to the base URL) with
    /// percent-encoded query parameters.
    pub(crate) fn build_url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request and reads the body, retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure after all retries.
    /// - [`ClientError::UnexpectedStatus`] for 429/5xx after all retries.
    pub(crate) async fn get(&self, url: &Url) -> Result<RawResponse, ClientError> {
        self.retry.run(|| self.get_once(url)).await
    }

    /// Sends a single GET request without retrying.
    ///
    /// HTTP 429 and 5xx are surfaced as [`ClientError::UnexpectedStatus`] so
    /// the retry loop in [`get`](Self::get) can see them; every other status
    /// is returned to the caller untouched.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] for 429/5xx.
    pub(crate) async fn get_once(&self, url: &Url) -> Result<RawResponse, ClientError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        Ok(RawResponse {
            status,
            url: url.clone(),
            body,
        })
    }

    /// The unified service ID as a query value (`"237"`).
    pub(crate) fn unified_service_param(&self) -> String {
        self.unified_service_id.to_string()
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
        name,
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
