//! Donation amount extraction.

use super::patterns::AMOUNT_PATTERN;
use super::{CandidateMatch, FieldExtractor, MatchSource};
use crate::ner::EntitySpan;

/// Amount field extractor.
///
/// The first yen amount on the page is the donation; later figures are
/// totals or unrelated numbers and are never consulted.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Every yen amount in text order, commas removed.
    pub fn extract_all(&self, text: &str) -> Vec<CandidateMatch<String>> {
        AMOUNT_PATTERN
            .captures_iter(text)
            .filter_map(|caps| {
                let digits = caps.get(1)?;
                let amount = digits.as_str().replace(',', "");
                (!amount.is_empty()).then(|| {
                    CandidateMatch::new(amount, MatchSource::Regex)
                        .with_position(digits.start(), digits.end())
                })
            })
            .collect()
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = String;

    fn extract(&self, text: &str, _entities: &[EntitySpan]) -> Option<Self::Output> {
        let caps = AMOUNT_PATTERN.captures(text)?;
        let amount = caps[1].replace(',', "");
        (!amount.is_empty()).then_some(amount)
    }
}

/// Extract the donation amount as a digit string.
pub fn extract_amount(text: &str) -> Option<String> {
    AmountExtractor::new().extract(text, &[])
}
