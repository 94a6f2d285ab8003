//! Search execution against the remote record API.

use std::sync::Arc;

use thiserror::Error;

use super::{SearchError, SearchResult};
use crate::models::{CriteriaSet, PatientRecord, SearchResultSet};

/// Raw response from the record API, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Status reason phrase (e.g. "Bad Request"), if known
    pub reason: Option<String>,
    /// Value of the Content-Type header, if any
    pub content_type: Option<String>,
    /// Response body as text
    pub body: String,
}

impl ApiResponse {
    /// A response with a JSON content type.
    pub fn json(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: None,
            content_type: Some("application/json".into()),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The request never produced a response (connection refused, timeout, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Remote record API collaborator.
pub trait RecordApi: Send + Sync {
    /// `POST /patients/search` with the criteria as the JSON body.
    fn search_patients(&self, criteria: &CriteriaSet) -> Result<ApiResponse, TransportError>;
}

/// Sends normalized criteria to the record API and decodes the reply.
#[derive(Clone)]
pub struct SearchExecutor {
    api: Arc<dyn RecordApi>,
}

impl SearchExecutor {
    pub fn new(api: Arc<dyn RecordApi>) -> Self {
        Self { api }
    }

    /// Run a search. Empty criteria are refused without contacting the API.
    pub fn execute(&self, criteria: &CriteriaSet) -> SearchResult<SearchResultSet> {
        let criteria = criteria.clone().normalized();
        if criteria.is_empty() {
            return Err(SearchError::EmptyCriteria);
        }

        // Field names only; values identify patients
        let fields: Vec<&str> = criteria.present().map(|(f, _)| f.wire_name()).collect();
        tracing::debug!(fields = ?fields, "Dispatching patient search");

        let response = self
            .api
            .search_patients(&criteria)
            .map_err(|e| SearchError::RemoteFailure {
                status: None,
                message: e.to_string(),
            })?;

        if !response.is_success() {
            return Err(remote_failure(&response));
        }

        let records = decode_records(&response)?;
        tracing::info!(count = records.len(), "Patient search returned");

        Ok(SearchResultSet::new(criteria, records))
    }
}

fn remote_failure(response: &ApiResponse) -> SearchError {
    let detail = if response.body.trim().is_empty() {
        response.reason.clone().unwrap_or_default()
    } else {
        response.body.clone()
    };
    SearchError::RemoteFailure {
        status: Some(response.status),
        message: format!("HTTP {}: {}", response.status, detail),
    }
}

/// Strict decode of a success payload: a JSON array of patient records.
fn decode_records(response: &ApiResponse) -> SearchResult<Vec<PatientRecord>> {
    if let Some(content_type) = &response.content_type {
        if !content_type.to_ascii_lowercase().contains("json") {
            return Err(SearchError::InvalidResponse(format!(
                "unexpected content type '{}'",
                content_type
            )));
        }
    }

    serde_json::from_str(&response.body).map_err(|e| SearchError::InvalidResponse(e.to_string()))
}
