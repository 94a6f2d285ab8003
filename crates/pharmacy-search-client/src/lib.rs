//! Pharmacy Patient Search Client
//!
//! Wires the search core to the outside world:
//!
//! - [`http`]: `reqwest` implementation of the record API
//! - [`presenter`]: plain-text rendering of search outcomes
//! - [`config`]: environment-driven settings
//! - [`cli`]: the `pharmacy-search` command line

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod presenter;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpRecordApi;
pub use presenter::TerminalPresenter;
