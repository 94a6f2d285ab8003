//! Pharmacy Patient Search Core
//!
//! Multi-criteria patient search over a remote record API, with client-side
//! result synthesis, a bounded search history and CSV export.
//!
//! # Architecture
//!
//! ```text
//! CriteriaModel ──→ CriteriaValidator ──→ SearchExecutor ──→ RecordApi (remote)
//!                                               │
//!                                     [SearchResultSet]
//!                                               │
//!                 ┌─────────────────────────────┼──────────────────────────┐
//!                 │                             │                          │
//!                 ▼                             ▼                          ▼
//!       SearchHistoryStore              ResultSynthesizer           ResultExporter
//!       (KeyValueStore)               stats + highlighting               CSV
//!                 │                             │
//!                 └────────────┬────────────────┘
//!                              ▼
//!                      SearchController ──→ SearchPresenter
//! ```
//!
//! All matching happens remotely. This crate only builds the query and
//! post-processes the response; it performs no network I/O of its own.
//!
//! # Modules
//!
//! - [`models`]: Domain types (CriteriaSet, PatientRecord, SearchHistoryEntry, ...)
//! - [`search`]: Validation, execution, synthesis and the session controller
//! - [`history`]: Bounded, persisted search history
//! - [`export`]: Delimited-text export
//! - [`db`]: SQLite-backed key-value persistence

pub mod db;
pub mod export;
pub mod history;
pub mod models;
pub mod search;

// Re-export commonly used types
pub use db::{Database, KeyValueStore, MemoryStore};
pub use export::{ExportArtifact, QuoteMode, ResultExporter};
pub use history::SearchHistoryStore;
pub use models::{
    Address, CriteriaField, CriteriaModel, CriteriaSet, PatientRecord, SearchHistoryEntry,
    SearchResultSet, SynthesizedStats,
};
pub use search::{
    ApiResponse, CriteriaValidator, RecordApi, ResultSynthesizer, SearchController, SearchError,
    SearchExecutor, SearchOutcome, SearchPresenter, TransportError,
};
