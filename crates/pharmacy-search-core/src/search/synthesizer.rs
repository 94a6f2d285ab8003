//! Result synthesis: aggregate counts and term-highlighted views.

use std::collections::HashSet;

use regex::{Captures, RegexBuilder};
use serde::Serialize;

use crate::models::{CriteriaField, CriteriaSet, PatientRecord, SearchResultSet, SynthesizedStats};

/// Strings wrapped around each highlighted match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self {
            open: "<mark>".into(),
            close: "</mark>".into(),
        }
    }
}

/// Display view of one record with search terms marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightedRecord {
    pub display_key: String,
    pub first_name: String,
    pub last_name: String,
    pub preferred_name: Option<String>,
    pub store_id: String,
    pub province: String,
    pub city: String,
    pub phone_number: String,
    pub health_number: String,
    /// Language code, uppercased for display
    pub language: String,
}

/// Stats plus per-record views for one result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    pub stats: SynthesizedStats,
    pub views: Vec<HighlightedRecord>,
}

/// Derives statistics and highlighted views from search results.
#[derive(Debug, Clone, Default)]
pub struct ResultSynthesizer {
    marker: HighlightMarker,
}

impl ResultSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_marker(marker: HighlightMarker) -> Self {
        Self { marker }
    }

    /// Count results, distinct stores and distinct provinces in one pass.
    pub fn stats(&self, records: &[PatientRecord]) -> SynthesizedStats {
        let mut stores = HashSet::new();
        let mut provinces = HashSet::new();
        for record in records {
            stores.insert(record.store_id.as_str());
            provinces.insert(record.province());
        }

        SynthesizedStats {
            result_count: records.len(),
            distinct_store_count: stores.len(),
            distinct_province_count: provinces.len(),
        }
    }

    /// Stats and highlighted views for a result set, in result order.
    pub fn synthesize(&self, results: &SearchResultSet) -> SynthesisReport {
        SynthesisReport {
            stats: self.stats(&results.records),
            views: results
                .records
                .iter()
                .map(|record| self.highlight_record(record, &results.criteria))
                .collect(),
        }
    }

    /// Mark every case-insensitive occurrence of `term` in `value`.
    ///
    /// The term is matched literally. Matched text keeps its original casing.
    /// With no value or no term the value comes back unchanged.
    pub fn highlight(&self, value: Option<&str>, term: Option<&str>) -> Option<String> {
        let value = value?;
        let term = match term {
            Some(t) if !t.is_empty() => t,
            _ => return Some(value.to_string()),
        };

        let pattern = match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "Highlight pattern rejected, leaving text unmarked");
                return Some(value.to_string());
            }
        };

        let marked = pattern.replace_all(value, |caps: &Captures| {
            format!("{}{}{}", self.marker.open, &caps[0], self.marker.close)
        });
        Some(marked.into_owned())
    }

    fn mark(&self, value: &str, criteria: &CriteriaSet, field: CriteriaField) -> String {
        self.highlight(Some(value), criteria.get(field))
            .unwrap_or_else(|| value.to_string())
    }

    /// Build the display view of a record against the criteria that found it.
    pub fn highlight_record(
        &self,
        record: &PatientRecord,
        criteria: &CriteriaSet,
    ) -> HighlightedRecord {
        HighlightedRecord {
            display_key: record.display_key(),
            first_name: self.mark(&record.first_name, criteria, CriteriaField::FirstName),
            last_name: self.mark(&record.last_name, criteria, CriteriaField::LastName),
            preferred_name: record.preferred_name().map(str::to_string),
            store_id: self.mark(&record.store_id, criteria, CriteriaField::StoreId),
            province: self.mark(record.province(), criteria, CriteriaField::Province),
            city: record.address.city.clone(),
            phone_number: record.phone_number.clone(),
            health_number: self.mark(
                &record.provincial_health_number,
                criteria,
                CriteriaField::HealthNumber,
            ),
            language: record.language_preference.to_uppercase(),
        }
    }
}
