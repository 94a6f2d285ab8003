//! Export of search results.

mod csv;

pub use csv::*;
