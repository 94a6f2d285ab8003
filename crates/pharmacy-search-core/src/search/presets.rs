//! One-click quick searches.

use crate::models::{CriteriaField, CriteriaSet};

/// A named single-field search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickSearch {
    pub label: &'static str,
    pub field: CriteriaField,
    pub value: &'static str,
}

/// Built-in quick searches, in display order.
pub const QUICK_SEARCHES: &[QuickSearch] = &[
    QuickSearch {
        label: "BC Patients",
        field: CriteriaField::Province,
        value: "BC",
    },
    QuickSearch {
        label: "Store 101",
        field: CriteriaField::StoreId,
        value: "101",
    },
    QuickSearch {
        label: "Ontario Patients",
        field: CriteriaField::Province,
        value: "ON",
    },
    QuickSearch {
        label: "Alberta Patients",
        field: CriteriaField::Province,
        value: "AB",
    },
    QuickSearch {
        label: "Quebec Patients",
        field: CriteriaField::Province,
        value: "QC",
    },
    QuickSearch {
        label: "Store 102",
        field: CriteriaField::StoreId,
        value: "102",
    },
    QuickSearch {
        label: "Store 103",
        field: CriteriaField::StoreId,
        value: "103",
    },
    QuickSearch {
        label: "All Smiths",
        field: CriteriaField::LastName,
        value: "Smith",
    },
];

impl QuickSearch {
    /// Look up a preset by label, ignoring case.
    pub fn find(label: &str) -> Option<&'static QuickSearch> {
        QUICK_SEARCHES
            .iter()
            .find(|q| q.label.eq_ignore_ascii_case(label.trim()))
    }

    pub fn criteria(&self) -> CriteriaSet {
        CriteriaSet::default().with(self.field, self.value)
    }
}
