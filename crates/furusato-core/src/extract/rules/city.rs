//! Municipality extraction.
//!
//! Certificates usually print the issuing municipality's own address first
//! (letterhead or footer) and the donor's municipality of record second, so
//! the second distinct mention wins when there is one. Pattern evidence is
//! preferred over NER evidence; see [`CITY_TIERS`] for the exact order.

use tracing::debug;

use super::patterns::{strip_prefecture, CITY_PATTERN, MUNICIPALITY_SUFFIX};
use super::{dedup_preserving_order, FieldExtractor};
use crate::ner::EntitySpan;

/// Candidate municipality names gathered from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityCandidates<'a> {
    /// Pattern matches, first occurrence order, no repeats.
    pub regex_unique: Vec<&'a str>,
    /// Place entities ending in 市/区/町/村, in NER order, repeats kept.
    pub ner_all: Vec<&'a str>,
    /// `ner_all` without repeats.
    pub ner_unique: Vec<&'a str>,
}

impl<'a> CityCandidates<'a> {
    pub fn collect(text: &'a str, entities: &'a [EntitySpan]) -> Self {
        let regex_unique = dedup_preserving_order(CITY_PATTERN.find_iter(text).map(|m| m.as_str()));

        let ner_all: Vec<&str> = entities
            .iter()
            .filter(|e| e.label.is_place() && MUNICIPALITY_SUFFIX.is_match(&e.text))
            .map(|e| e.text.as_str())
            .collect();
        let ner_unique = dedup_preserving_order(ner_all.iter().copied());

        Self {
            regex_unique,
            ner_all,
            ner_unique,
        }
    }
}

/// One strategy of the municipality cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CityTier {
    /// Two or more distinct pattern matches: the second one.
    SecondRegexMatch,
    /// Two or more distinct NER places: the second one.
    SecondNerMatch,
    /// Two or more NER place mentions: the most frequent, earliest on ties.
    MostFrequentNer,
    /// Exactly one pattern match.
    SoleRegexMatch,
    /// Exactly one distinct NER place.
    SoleNerMatch,
}

/// Cascade order. The first tier that yields a value decides.
pub const CITY_TIERS: [CityTier; 5] = [
    CityTier::SecondRegexMatch,
    CityTier::SecondNerMatch,
    CityTier::MostFrequentNer,
    CityTier::SoleRegexMatch,
    CityTier::SoleNerMatch,
];

impl CityTier {
    /// Apply this tier alone. Returns the raw (unstripped) winner.
    pub fn resolve<'a>(&self, candidates: &CityCandidates<'a>) -> Option<&'a str> {
        match self {
            Self::SecondRegexMatch => candidates.regex_unique.get(1).copied(),
            Self::SecondNerMatch => candidates.ner_unique.get(1).copied(),
            Self::MostFrequentNer if candidates.ner_all.len() >= 2 => {
                most_frequent(&candidates.ner_all)
            }
            Self::MostFrequentNer => None,
            Self::SoleRegexMatch => sole(&candidates.regex_unique),
            Self::SoleNerMatch => sole(&candidates.ner_unique),
        }
    }
}

fn sole<'a>(values: &[&'a str]) -> Option<&'a str> {
    match values {
        [only] => Some(*only),
        _ => None,
    }
}

/// Most common value; on equal counts the value seen first wins.
fn most_frequent<'a>(values: &[&'a str]) -> Option<&'a str> {
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for &value in values {
        match counts.iter().position(|(seen, _)| *seen == value) {
            Some(index) => counts[index].1 += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(&'a str, usize)> = None;
    for (value, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Municipality field extractor.
pub struct CityExtractor;

impl CityExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Run the cascade, returning the deciding tier with the stripped name.
    pub fn resolve(&self, text: &str, entities: &[EntitySpan]) -> Option<(CityTier, String)> {
        let candidates = CityCandidates::collect(text, entities);
        debug!(
            "City candidates: regex={:?} ner={:?}",
            candidates.regex_unique, candidates.ner_all
        );

        CITY_TIERS.iter().find_map(|tier| {
            tier.resolve(&candidates)
                .map(|raw| (*tier, strip_prefecture(raw)))
        })
    }
}

impl Default for CityExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CityExtractor {
    type Output = String;

    fn extract(&self, text: &str, entities: &[EntitySpan]) -> Option<Self::Output> {
        let (tier, city) = self.resolve(text, entities)?;
        debug!("City resolved by {:?}: {}", tier, city);
        Some(city)
    }
}

/// Extract the donor's municipality (prefecture removed).
pub fn extract_city(text: &str, entities: &[EntitySpan]) -> Option<String> {
    CityExtractor::new().extract(text, entities)
}
