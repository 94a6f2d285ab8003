//! Domain models for patient search.

mod criteria;
mod history;
pub(crate) mod patient;
mod results;

pub use criteria::*;
pub use history::*;
pub use patient::{Address, PatientRecord};
pub use results::*;
