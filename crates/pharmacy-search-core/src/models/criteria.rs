//! Search criteria: the form model and its normalized snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five searchable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriteriaField {
    StoreId,
    Province,
    FirstName,
    LastName,
    HealthNumber,
}

impl CriteriaField {
    /// All fields in their fixed presentation order.
    pub const ALL: [CriteriaField; 5] = [
        CriteriaField::StoreId,
        CriteriaField::Province,
        CriteriaField::FirstName,
        CriteriaField::LastName,
        CriteriaField::HealthNumber,
    ];

    /// Short label used in history summaries.
    pub fn label(&self) -> &'static str {
        match self {
            CriteriaField::StoreId => "Store",
            CriteriaField::Province => "Province",
            CriteriaField::FirstName => "First",
            CriteriaField::LastName => "Last",
            CriteriaField::HealthNumber => "Health#",
        }
    }

    /// Wire name of the field in the search request body.
    pub fn wire_name(&self) -> &'static str {
        match self {
            CriteriaField::StoreId => "storeId",
            CriteriaField::Province => "province",
            CriteriaField::FirstName => "firstName",
            CriteriaField::LastName => "lastName",
            CriteriaField::HealthNumber => "healthNumber",
        }
    }
}

impl fmt::Display for CriteriaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Snapshot of the search fields for one search invocation.
///
/// Absent fields are omitted from the serialized form, so the search request
/// body carries only what the user filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub province: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_number: Option<String>,
}

impl CriteriaSet {
    /// Get a field value.
    pub fn get(&self, field: CriteriaField) -> Option<&str> {
        match field {
            CriteriaField::StoreId => self.store_id.as_deref(),
            CriteriaField::Province => self.province.as_deref(),
            CriteriaField::FirstName => self.first_name.as_deref(),
            CriteriaField::LastName => self.last_name.as_deref(),
            CriteriaField::HealthNumber => self.health_number.as_deref(),
        }
    }

    /// Builder-style setter, mostly for tests and presets.
    pub fn with(mut self, field: CriteriaField, value: impl Into<String>) -> Self {
        *self.slot(field) = Some(value.into());
        self
    }

    fn slot(&mut self, field: CriteriaField) -> &mut Option<String> {
        match field {
            CriteriaField::StoreId => &mut self.store_id,
            CriteriaField::Province => &mut self.province,
            CriteriaField::FirstName => &mut self.first_name,
            CriteriaField::LastName => &mut self.last_name,
            CriteriaField::HealthNumber => &mut self.health_number,
        }
    }

    /// Trim every value and drop the ones that end up empty.
    pub fn normalized(mut self) -> Self {
        for field in CriteriaField::ALL {
            let slot = self.slot(field);
            *slot = slot.take().and_then(|v| normalize_value(&v));
        }
        self
    }

    /// True when no field is present.
    pub fn is_empty(&self) -> bool {
        CriteriaField::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Present fields with their values, in fixed order.
    pub fn present(&self) -> impl Iterator<Item = (CriteriaField, &str)> + '_ {
        CriteriaField::ALL
            .into_iter()
            .filter_map(move |f| self.get(f).map(|v| (f, v)))
    }
}

fn normalize_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Raw, user-editable search form state.
///
/// Values are kept exactly as typed; normalization happens in
/// [`CriteriaModel::to_criteria_set`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CriteriaModel {
    values: [String; 5],
}

impl CriteriaModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(field: CriteriaField) -> usize {
        match field {
            CriteriaField::StoreId => 0,
            CriteriaField::Province => 1,
            CriteriaField::FirstName => 2,
            CriteriaField::LastName => 3,
            CriteriaField::HealthNumber => 4,
        }
    }

    /// Raw value of a field as typed.
    pub fn get(&self, field: CriteriaField) -> &str {
        &self.values[Self::index(field)]
    }

    pub fn set(&mut self, field: CriteriaField, value: impl Into<String>) {
        self.values[Self::index(field)] = value.into();
    }

    /// Reset every field to empty.
    pub fn clear(&mut self) {
        self.values = Default::default();
    }

    /// Fill the form from a criteria snapshot; absent fields become empty.
    pub fn apply(&mut self, criteria: &CriteriaSet) {
        for field in CriteriaField::ALL {
            self.set(field, criteria.get(field).unwrap_or_default());
        }
    }

    /// Normalized snapshot: values trimmed, empty strings become absent.
    pub fn to_criteria_set(&self) -> CriteriaSet {
        CriteriaSet {
            store_id: normalize_value(self.get(CriteriaField::StoreId)),
            province: normalize_value(self.get(CriteriaField::Province)),
            first_name: normalize_value(self.get(CriteriaField::FirstName)),
            last_name: normalize_value(self.get(CriteriaField::LastName)),
            health_number: normalize_value(self.get(CriteriaField::HealthNumber)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_criteria_set().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_to_criteria_set_trims_and_drops_blanks() {
        let mut model = CriteriaModel::new();
        model.set(CriteriaField::StoreId, "  101 ");
        model.set(CriteriaField::FirstName, "   ");
        model.set(CriteriaField::LastName, "Smith");

        let criteria = model.to_criteria_set();
        assert_eq!(criteria.store_id.as_deref(), Some("101"));
        assert_eq!(criteria.first_name, None);
        assert_eq!(criteria.last_name.as_deref(), Some("Smith"));
        assert!(!criteria.is_empty());
    }

    #[test]
    fn test_empty_model() {
        let mut model = CriteriaModel::new();
        assert!(model.is_empty());

        model.set(CriteriaField::Province, "\t");
        assert!(model.is_empty());
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let criteria = CriteriaSet::default().with(CriteriaField::LastName, "Smith");
        let json = serde_json::to_string(&criteria).unwrap();
        assert_eq!(json, r#"{"lastName":"Smith"}"#);
    }

    #[test]
    fn test_absence_differs_from_empty_string() {
        let absent = CriteriaSet::default();
        let empty = CriteriaSet::default().with(CriteriaField::Province, "");
        assert_ne!(absent, empty);
        assert_eq!(absent, empty.normalized());
    }

    #[test]
    fn test_apply_round_trips_through_model() {
        let criteria = CriteriaSet::default()
            .with(CriteriaField::StoreId, "102")
            .with(CriteriaField::HealthNumber, "AB12");

        let mut model = CriteriaModel::new();
        model.set(CriteriaField::FirstName, "stale");
        model.apply(&criteria);

        assert_eq!(model.get(CriteriaField::FirstName), "");
        assert_eq!(model.to_criteria_set(), criteria);
    }

    #[test]
    fn test_present_in_fixed_order() {
        let criteria = CriteriaSet::default()
            .with(CriteriaField::HealthNumber, "X1")
            .with(CriteriaField::StoreId, "7");
        let fields: Vec<_> = criteria.present().map(|(f, _)| f).collect();
        assert_eq!(fields, vec![CriteriaField::StoreId, CriteriaField::HealthNumber]);
    }

    proptest! {
        #[test]
        fn prop_normalized_values_are_trimmed_and_non_empty(
            values in proptest::collection::vec(".{0,12}", 5)
        ) {
            let mut model = CriteriaModel::new();
            for (field, value) in CriteriaField::ALL.iter().zip(values.iter()) {
                model.set(*field, value.clone());
            }
            let criteria = model.to_criteria_set();
            for (_, value) in criteria.present() {
                prop_assert!(!value.is_empty());
                prop_assert_eq!(value, value.trim());
            }
            prop_assert_eq!(criteria.clone().normalized(), criteria);
        }
    }
}
