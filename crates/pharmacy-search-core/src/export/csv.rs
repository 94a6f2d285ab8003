//! Delimited-text export of a result set.

use chrono::NaiveDate;

use crate::models::PatientRecord;

/// Column names, in output order.
pub const COLUMNS: [&str; 14] = [
    "Store ID",
    "Patient ID",
    "First Name",
    "Last Name",
    "Preferred Name",
    "Date of Birth",
    "Phone",
    "Health Number",
    "Address",
    "City",
    "Province",
    "Postal Code",
    "Language",
    "SMS Opt-in",
];

/// How double quotes inside a field are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuoteMode {
    /// Wrap in quotes without escaping embedded quotes.
    ///
    /// Matches files produced by the browser client. A field containing `"`
    /// yields a row that strict CSV readers will misparse.
    #[default]
    Verbatim,
    /// Wrap in quotes and double embedded quotes (RFC 4180).
    Escaped,
}

/// A rendered export ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

/// Serializes patient records to comma-separated text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultExporter {
    quote_mode: QuoteMode,
}

impl ResultExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quote_mode(quote_mode: QuoteMode) -> Self {
        Self { quote_mode }
    }

    /// Header row plus one quoted row per record, each `\n`-terminated.
    pub fn to_delimited_text(&self, records: &[PatientRecord]) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str(&COLUMNS.join(","));
        csv.push('\n');

        for record in records {
            let street_line = record.address.street_line();
            let fields: [&str; 14] = [
                &record.store_id,
                &record.patient_id,
                &record.first_name,
                &record.last_name,
                record.preferred_name().unwrap_or(""),
                &record.date_of_birth,
                &record.phone_number,
                &record.provincial_health_number,
                &street_line,
                &record.address.city,
                &record.address.province,
                &record.address.postal_code,
                &record.language_preference,
                if record.sms_opt_in { "Yes" } else { "No" },
            ];
            let row: Vec<String> = fields.iter().map(|field| self.quote(field)).collect();

            csv.push_str(&row.join(","));
            csv.push('\n');
        }

        csv
    }

    /// Build the artifact for a result list exported on `date`.
    pub fn export(&self, records: &[PatientRecord], date: NaiveDate) -> ExportArtifact {
        ExportArtifact {
            file_name: export_file_name(date),
            contents: self.to_delimited_text(records),
        }
    }

    fn quote(&self, field: &str) -> String {
        match self.quote_mode {
            QuoteMode::Verbatim => format!("\"{}\"", field),
            QuoteMode::Escaped => format!("\"{}\"", field.replace('"', "\"\"")),
        }
    }
}

/// File name for an export made on `date`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("patient_search_results_{}.csv", date.format("%Y-%m-%d"))
}
