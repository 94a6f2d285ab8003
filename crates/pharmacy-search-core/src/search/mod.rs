//! Patient search pipeline.
//!
//! Validation → Execution → History → Synthesis → Presentation

mod controller;
mod executor;
mod presets;
mod synthesizer;
mod validator;

pub use controller::*;
pub use executor::*;
pub use presets::*;
pub use synthesizer::*;
pub use validator::*;

use thiserror::Error;

/// Message shown when a search is submitted with no criteria.
pub const EMPTY_CRITERIA_MESSAGE: &str = "Please enter at least one search criterion";

/// Search errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{}", EMPTY_CRITERIA_MESSAGE)]
    EmptyCriteria,

    #[error("{message}")]
    RemoteFailure {
        /// HTTP status, absent for transport failures
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Error category, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorKind {
    EmptyCriteria,
    RemoteFailure,
    InvalidResponse,
}

impl SearchError {
    pub fn kind(&self) -> SearchErrorKind {
        match self {
            SearchError::EmptyCriteria => SearchErrorKind::EmptyCriteria,
            SearchError::RemoteFailure { .. } => SearchErrorKind::RemoteFailure,
            SearchError::InvalidResponse(_) => SearchErrorKind::InvalidResponse,
        }
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
