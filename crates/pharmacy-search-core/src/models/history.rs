//! Search history entries.

use serde::{Deserialize, Serialize};

use super::criteria::CriteriaSet;

/// Label used when a criteria set has no present fields.
pub const EMPTY_SEARCH_LABEL: &str = "Empty search";

/// A remembered search that can be replayed.
///
/// Older history written by the browser client used `timestamp` and
/// `description` for the last two fields; both are still accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistoryEntry {
    /// Monotonic millisecond timestamp, unique within a store
    pub id: i64,
    /// Criteria snapshot as searched
    pub criteria: CriteriaSet,
    /// RFC 3339 time the search was recorded
    #[serde(alias = "timestamp")]
    pub recorded_at: String,
    /// Human-readable summary, e.g. "Store: 101, Last: Smith"
    #[serde(alias = "description")]
    pub label: String,
}

impl SearchHistoryEntry {
    /// Summarize a criteria set as `"Field: value"` pairs in fixed order.
    pub fn label_for(criteria: &CriteriaSet) -> String {
        let parts: Vec<String> = criteria
            .present()
            .map(|(field, value)| format!("{}: {}", field.label(), value))
            .collect();

        if parts.is_empty() {
            EMPTY_SEARCH_LABEL.to_string()
        } else {
            parts.join(", ")
        }
    }
}
