//! Client configuration, resolved once at startup.
//!
//! | Variable                    | Default                                   |
//! |-----------------------------|-------------------------------------------|
//! | `PHARMACY_API_URL`          | `http://localhost:9000`                   |
//! | `PHARMACY_API_TIMEOUT_SECS` | `30`                                      |
//! | `PHARMACY_SEARCH_DB`        | `<data dir>/pharmacy-search/history.db`   |

use std::path::{Path, PathBuf};

use crate::error::{ClientError, ClientResult};

pub const API_URL_VAR: &str = "PHARMACY_API_URL";
pub const API_TIMEOUT_VAR: &str = "PHARMACY_API_TIMEOUT_SECS";
pub const HISTORY_DB_VAR: &str = "PHARMACY_SEARCH_DB";

pub const DEFAULT_API_URL: &str = "http://localhost:9000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "pharmacy_search=info"
}

/// Default location of the history database.
pub fn default_history_db() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pharmacy-search")
        .join("history.db")
}

/// Settings for talking to the record API and storing history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: String,
    timeout_secs: u64,
    history_db: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_db: default_history_db(),
        }
    }
}

impl ClientConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> ClientResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> ClientResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = var(API_URL_VAR).unwrap_or(defaults.api_url);
        let timeout_secs = match var(API_TIMEOUT_VAR) {
            Some(raw) => parse_timeout(&raw)?,
            None => defaults.timeout_secs,
        };
        let history_db = var(HISTORY_DB_VAR)
            .map(PathBuf::from)
            .unwrap_or(defaults.history_db);

        Self::new(api_url, timeout_secs, history_db)
    }

    pub fn new(
        api_url: impl Into<String>,
        timeout_secs: u64,
        history_db: impl Into<PathBuf>,
    ) -> ClientResult<Self> {
        let api_url = api_url.into().trim().trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "{API_URL_VAR} must be an http(s) URL, got '{api_url}'"
            )));
        }
        if timeout_secs == 0 {
            return Err(ClientError::Config(format!(
                "{API_TIMEOUT_VAR} must be greater than zero"
            )));
        }

        Ok(Self {
            api_url,
            timeout_secs,
            history_db: history_db.into(),
        })
    }

    /// Base URL of the record API, without a trailing slash.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn history_db(&self) -> &Path {
        &self.history_db
    }

    /// Same settings with a different API URL.
    pub fn with_api_url(self, api_url: impl Into<String>) -> ClientResult<Self> {
        Self::new(api_url, self.timeout_secs, self.history_db)
    }

    /// Same settings with a different history database.
    pub fn with_history_db(mut self, history_db: impl Into<PathBuf>) -> Self {
        self.history_db = history_db.into();
        self
    }
}

fn parse_timeout(raw: &str) -> ClientResult<u64> {
    raw.trim().parse().map_err(|_| {
        ClientError::Config(format!(
            "{API_TIMEOUT_VAR} must be a whole number of seconds, got '{raw}'"
        ))
    })
}
