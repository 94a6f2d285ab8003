//! Patient records as returned by the remote record API.

use serde::{Deserialize, Serialize};

/// Structured mailing address of a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub unit_number: Option<String>,
    pub street_number: String,
    pub street_name: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    /// Unit, street number and street name, space-joined, blanks omitted.
    pub fn street_line(&self) -> String {
        [
            self.unit_number.as_deref(),
            Some(self.street_number.as_str()),
            Some(self.street_name.as_str()),
        ]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// A patient record held by one store.
///
/// Identity is the pair (`store_id`, `patient_id`). Field names follow the
/// record API's JSON shape; decoding is strict so a payload missing a
/// required field is rejected rather than half-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    #[serde(rename = "pharmacyId")]
    pub store_id: String,
    pub patient_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub pref_name: Option<String>,
    pub date_of_birth: String,
    pub phone_number: String,
    #[serde(rename = "provHealthNumber")]
    pub provincial_health_number: String,
    #[serde(flatten)]
    pub address: Address,
    /// Two-letter language code (e.g. "en", "fr")
    #[serde(rename = "langPref")]
    pub language_preference: String,
    #[serde(rename = "smsOptInPref")]
    pub sms_opt_in: bool,
}

impl PatientRecord {
    /// Display key of the form `"{store_id}-{patient_id}"`.
    pub fn display_key(&self) -> String {
        format!("{}-{}", self.store_id, self.patient_id)
    }

    /// Preferred name, treating an empty string as absent.
    pub fn preferred_name(&self) -> Option<&str> {
        self.pref_name.as_deref().filter(|n| !n.is_empty())
    }

    pub fn province(&self) -> &str {
        &self.address.province
    }
}
