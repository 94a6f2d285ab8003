//! Search results and the statistics derived from them.

use serde::{Deserialize, Serialize};

use super::criteria::CriteriaSet;
use super::patient::PatientRecord;

/// Records returned for one search, in the order the record API sent them,
/// paired with the criteria that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub criteria: CriteriaSet,
    pub records: Vec<PatientRecord>,
}

impl SearchResultSet {
    pub fn new(criteria: CriteriaSet, records: Vec<PatientRecord>) -> Self {
        Self { criteria, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Find a record by its `"{store_id}-{patient_id}"` display key.
    pub fn find(&self, display_key: &str) -> Option<&PatientRecord> {
        self.records.iter().find(|r| r.display_key() == display_key)
    }
}

/// Aggregate counts over a result set. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesizedStats {
    pub result_count: usize,
    pub distinct_store_count: usize,
    pub distinct_province_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::fixtures::patient;

    #[test]
    fn test_find_by_display_key() {
        let set = SearchResultSet::new(
            CriteriaSet::default(),
            vec![patient("101", "1", "BC"), patient("102", "1", "ON")],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.find("102-1").map(|r| r.province()), Some("ON"));
        assert!(set.find("103-1").is_none());
    }
}
