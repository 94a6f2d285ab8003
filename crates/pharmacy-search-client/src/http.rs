//! HTTP implementation of the record API.

use std::time::Duration;

use pharmacy_search_core::models::CriteriaSet;
use pharmacy_search_core::search::{ApiResponse, RecordApi, TransportError};
use reqwest::header::CONTENT_TYPE;

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// Path of the search endpoint, relative to the API base URL.
pub const SEARCH_PATH: &str = "/patients/search";

/// Blocking HTTP client for the central record service.
pub struct HttpRecordApi {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl HttpRecordApi {
    pub fn new(base_url: &str, timeout_secs: u64) -> ClientResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Self::new(config.api_url(), config.timeout_secs())
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, SEARCH_PATH)
    }

    fn transport_error(&self, e: reqwest::Error) -> TransportError {
        if e.is_connect() {
            TransportError(format!("Cannot connect to record API at {}", self.base_url))
        } else if e.is_timeout() {
            TransportError(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            TransportError(e.to_string())
        }
    }
}

impl RecordApi for HttpRecordApi {
    fn search_patients(&self, criteria: &CriteriaSet) -> Result<ApiResponse, TransportError> {
        let response = self
            .client
            .post(self.search_url())
            .json(criteria)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().map_err(|e| self.transport_error(e))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "Record API responded");

        Ok(ApiResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            content_type,
            body,
        })
    }
}
