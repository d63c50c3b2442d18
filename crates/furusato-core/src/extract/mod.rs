//! Donation certificate field extraction.

mod pipeline;
pub mod rules;

pub use pipeline::ExtractionContext;
pub use rules::{extract_amount, extract_city, extract_date, FieldExtractor};
