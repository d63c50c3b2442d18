//! Rule-based field extractors for donation certificates.

pub mod amounts;
pub mod city;
pub mod dates;
pub mod era;
pub mod patterns;

pub use amounts::{extract_amount, AmountExtractor};
pub use city::{extract_city, CityCandidates, CityExtractor, CityTier, CITY_TIERS};
pub use dates::{extract_date, normalize_whitespace, DateExtractor};
pub use era::{reiwa_to_gregorian, EraDate, REIWA_OFFSET};
pub use patterns::*;

use crate::ner::EntitySpan;

/// Trait for field extractors.
///
/// Extractors are pure: the same text and spans always give the same value.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Resolve the field from page text and the page's NER spans.
    fn extract(&self, text: &str, entities: &[EntitySpan]) -> Option<Self::Output>;
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Regex,
    Ner,
}

/// An intermediate candidate considered during one extractor call.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMatch<T> {
    /// Candidate value.
    pub value: T,
    /// Which evidence produced it.
    pub source: MatchSource,
    /// Byte span in the searched text, for regex candidates.
    pub position: Option<(usize, usize)>,
}

impl<T> CandidateMatch<T> {
    pub fn new(value: T, source: MatchSource) -> Self {
        Self {
            value,
            source,
            position: None,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Remove repeats, keeping the first occurrence of each value in order.
pub(crate) fn dedup_preserving_order<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    values.into_iter().filter(|v| seen.insert(*v)).collect()
}
