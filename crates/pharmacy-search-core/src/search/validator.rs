//! Per-field format rules for search criteria.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::models::{CriteriaField, CriteriaSet};

// ASCII digits only; `\d` in `regex` is Unicode-aware.
static STORE_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());
static HEALTH_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());
static PERSON_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z\s'-]+$").unwrap());

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: CriteriaField,
    pub message: String,
}

/// Validator for search criteria.
#[derive(Debug, Default, Clone, Copy)]
pub struct CriteriaValidator;

impl CriteriaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check every present field; an empty result means the criteria are valid.
    pub fn validate(&self, criteria: &CriteriaSet) -> Vec<FieldError> {
        CriteriaField::ALL
            .into_iter()
            .filter_map(|field| self.check_field(field, criteria.get(field)?))
            .collect()
    }

    /// Check one raw field value. Blank values are always valid.
    pub fn check_field(&self, field: CriteriaField, value: &str) -> Option<FieldError> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let (pattern, message): (&Regex, &str) = match field {
            CriteriaField::StoreId => (&*STORE_ID, "Store ID should contain only numbers"),
            CriteriaField::HealthNumber => (
                &*HEALTH_NUMBER,
                "Health number should contain only letters and numbers",
            ),
            CriteriaField::FirstName | CriteriaField::LastName => (
                &*PERSON_NAME,
                "Name should contain only letters, spaces, apostrophes, and hyphens",
            ),
            // Chosen from a fixed list upstream
            CriteriaField::Province => return None,
        };

        if pattern.is_match(value) {
            None
        } else {
            Some(FieldError {
                field,
                message: message.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn validate(criteria: CriteriaSet) -> Vec<FieldError> {
        CriteriaValidator::new().validate(&criteria)
    }

    #[test]
    fn test_alphanumeric_store_id_fails_only_that_field() {
        let errors = validate(
            CriteriaSet::default()
                .with(CriteriaField::StoreId, "12a")
                .with(CriteriaField::LastName, "Smith"),
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, CriteriaField::StoreId);
        assert_eq!(errors[0].message, "Store ID should contain only numbers");
    }

    #[test]
    fn test_store_id_rejects_non_ascii_digits() {
        // Arabic-Indic digits
        let errors = validate(CriteriaSet::default().with(CriteriaField::StoreId, "١٢٣"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_names_allow_apostrophe_hyphen_space() {
        let errors = validate(
            CriteriaSet::default()
                .with(CriteriaField::FirstName, "Mary Anne")
                .with(CriteriaField::LastName, "O'Brien-Smith"),
        );
        assert!(errors.is_empty());

        let errors = validate(CriteriaSet::default().with(CriteriaField::FirstName, "R2D2"));
        assert_eq!(errors[0].field, CriteriaField::FirstName);
    }

    #[test]
    fn test_health_number_case_insensitive_alphanumeric() {
        assert!(
            validate(CriteriaSet::default().with(CriteriaField::HealthNumber, "ab12CD")).is_empty()
        );
        assert_eq!(
            validate(CriteriaSet::default().with(CriteriaField::HealthNumber, "AB-12")).len(),
            1
        );
    }

    #[test]
    fn test_absent_and_province_always_valid() {
        assert!(validate(CriteriaSet::default()).is_empty());
        assert!(validate(CriteriaSet::default().with(CriteriaField::Province, "B.C.!")).is_empty());
    }

    #[test]
    fn test_errors_in_field_order() {
        let errors = validate(
            CriteriaSet::default()
                .with(CriteriaField::HealthNumber, "#")
                .with(CriteriaField::FirstName, "1")
                .with(CriteriaField::StoreId, "x"),
        );
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                CriteriaField::StoreId,
                CriteriaField::FirstName,
                CriteriaField::HealthNumber
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_digit_store_ids_pass(id in "[0-9]{1,8}") {
            prop_assert!(CriteriaValidator::new()
                .check_field(CriteriaField::StoreId, &id)
                .is_none());
        }

        #[test]
        fn prop_store_ids_with_letters_fail(prefix in "[0-9]{0,4}", letter in "[a-zA-Z]") {
            let id = format!("{prefix}{letter}");
            prop_assert!(CriteriaValidator::new()
                .check_field(CriteriaField::StoreId, &id)
                .is_some());
        }
    }
}
