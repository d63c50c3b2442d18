//! Core library for furusato nozei donation certificate extraction.
//!
//! This crate provides:
//! - Page text sources (plain text, PDF text layers, tesseract OCR)
//! - A named-entity recognition seam for an external NER model
//! - Field extraction: municipality, Reiwa-era donation date, amount
//! - Per-page output records and configuration

pub mod error;
pub mod extract;
pub mod models;
pub mod ner;
pub mod source;

pub use error::{FurusatoError, NerError, Result, SourceError};
pub use extract::{extract_amount, extract_city, extract_date, ExtractionContext, FieldExtractor};
pub use models::config::FurusatoConfig;
pub use models::record::{OutputRecord, PageText};
pub use ner::{CommandRecognizer, EntityLabel, EntityRecognizer, EntitySpan, NoopRecognizer};
pub use source::{PageTextSource, SourceRegistry};
