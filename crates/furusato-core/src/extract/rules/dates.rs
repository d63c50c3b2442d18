//! Donation date extraction.
//!
//! Dates come from two places: NER `Date` spans and direct 令和 pattern
//! matches over the page. All surviving candidates are pooled and the
//! earliest by month/day wins, since certificates also print issue dates and
//! fiscal-year boundaries that fall later in the year.

use regex::Captures;
use tracing::debug;

use super::era::EraDate;
use super::patterns::{era_year_mentioned, parse_digits, ERA_DATE_FRAGMENT, HEISEI, REIWA, REIWA_DATE};
use super::{CandidateMatch, FieldExtractor, MatchSource};
use crate::ner::{EntityLabel, EntitySpan};

/// Replace newlines and ideographic spaces with ASCII spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.replace('\n', " ").replace('\u{3000}', " ")
}

/// Build a date from year/month/[day] captures. Day defaults to 1.
fn era_date_from_captures(caps: &Captures<'_>) -> Option<EraDate> {
    let era_year = parse_digits(&caps[1])?;
    let month = parse_digits(&caps[2])?;
    let day = match caps.get(3) {
        Some(day) => parse_digits(day.as_str())?,
        None => 1,
    };
    Some(EraDate::new(era_year, month, day))
}

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }

    /// All accepted candidates, NER-derived first, each source in text order.
    pub fn candidates(&self, text: &str, entities: &[EntitySpan]) -> Vec<CandidateMatch<EraDate>> {
        let clean = normalize_whitespace(text);
        let mut results = Vec::new();

        for entity in entities.iter().filter(|e| e.label == EntityLabel::Date) {
            if entity.text.contains(HEISEI) {
                continue;
            }

            let span = normalize_whitespace(&entity.text);
            let Some(date) = ERA_DATE_FRAGMENT
                .captures(&span)
                .and_then(|caps| era_date_from_captures(&caps))
            else {
                continue;
            };

            let year = date.gregorian_year();
            if era_year_mentioned(&clean, HEISEI, year) {
                debug!("Dropping NER date {:?}: {} follows {}", entity.text, year, HEISEI);
                continue;
            }
            // The span itself may be OCR noise; insist the page spells the
            // same year after 令和 somewhere.
            if !era_year_mentioned(&clean, REIWA, year) {
                debug!("Dropping NER date {:?}: no {}{}年 on page", entity.text, REIWA, year);
                continue;
            }

            results.push(CandidateMatch::new(date, MatchSource::Ner));
        }

        for caps in REIWA_DATE.captures_iter(&clean) {
            let Some(date) = era_date_from_captures(&caps) else {
                continue;
            };

            let year = date.gregorian_year();
            if era_year_mentioned(&clean, HEISEI, year) {
                debug!("Dropping {}: {} follows {}", &caps[0], year, HEISEI);
                continue;
            }

            let full_match = &caps[0];
            let start = caps.get(0).map_or(0, |m| m.start());
            results.push(
                CandidateMatch::new(date, MatchSource::Regex)
                    .with_position(start, start + full_match.len()),
            );
        }

        results
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, text: &str, entities: &[EntitySpan]) -> Option<Self::Output> {
        let candidates = self.candidates(text, entities);
        debug!("Date candidates: {:?}", candidates);

        // min_by_key keeps the first of equal keys
        let earliest = candidates.into_iter().min_by_key(|c| c.value.sort_key())?;
        if earliest.value.to_naive_date().is_none() {
            debug!("Date {:?} is not a calendar date; emitting as read", earliest.value);
        }

        Some(earliest.value.format())
    }
}

/// Extract the donation date as `YYYY/MM/DD`.
pub fn extract_date(text: &str, entities: &[EntitySpan]) -> Option<String> {
    DateExtractor::new().extract(text, entities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(text: &str) -> EntitySpan {
        EntitySpan::new("Date", text)
    }

    #[test]
    fn test_earliest_month_day_wins() {
        let text = "受領日 令和5年4月10日\n寄附日 令和5年3月1日";
        assert_eq!(extract_date(text, &[]), Some("2023/03/01".to_string()));
    }

    #[test]
    fn test_day_defaults_to_first() {
        assert_eq!(extract_date("令和6年12月", &[]), Some("2024/12/01".to_string()));
    }

    #[test]
    fn test_whitespace_normalized() {
        let text = "令和\u{3000}5年 7月";
        // 年 and 月 must be adjacent to their digits; the space breaks it
        assert_eq!(extract_date(text, &[]), None);

        let text = "令和\u{3000}5年7月7日";
        assert_eq!(extract_date(text, &[]), Some("2023/07/07".to_string()));

        let text = "令和\n5年7月7日";
        assert_eq!(extract_date(text, &[]), Some("2023/07/07".to_string()));
    }

    #[test]
    fn test_full_width_digits() {
        assert_eq!(extract_date("令和５年３月１日", &[]), Some("2023/03/01".to_string()));
        // Any script \d matches
        assert_eq!(
            extract_date("令和\u{0665}年\u{0663}月\u{0661}日", &[]),
            Some("2023/03/01".to_string())
        );
    }

    #[test]
    fn test_heisei_text_is_ignored() {
        assert_eq!(extract_date("平成30年4月1日", &[]), None);
        assert_eq!(extract_date("平成30年4月1日", &[date("平成30年4月1日")]), None);
    }

    #[test]
    fn test_heisei_year_rejects_regex_candidate() {
        let text = "令和5年3月1日 平成 2023 年";
        assert_eq!(extract_date(text, &[]), None);
    }

    #[test]
    fn test_heisei_year_rejects_only_that_year() {
        let text = "令和5年3月1日 令和6年5月1日 平成2023年";
        assert_eq!(extract_date(text, &[]), Some("2024/05/01".to_string()));
    }

    #[test]
    fn test_ner_date_requires_reiwa_gregorian_year_on_page() {
        // 5年 -> 2023; the page never spells 令和2023年
        let extractor = DateExtractor::new();
        let candidates = extractor.candidates("寄附日 5年2月3日", &[date("5年2月3日")]);
        assert!(candidates.is_empty());

        let text = "寄附日 5年2月3日 (令和2023年)";
        let candidates = extractor.candidates(text, &[date("5年2月3日")]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, MatchSource::Ner);
        assert_eq!(candidates[0].value, EraDate::new(5, 2, 3));
    }

    #[test]
    fn test_heisei_year_rejects_ner_candidate() {
        let extractor = DateExtractor::new();
        let entities = [date("5年2月3日")];

        // 令和2023年 is present, but 平成2023年 wins
        let text = "寄附日 5年2月3日 令和2023年 平成2023年";
        assert!(extractor.candidates(text, &entities).is_empty());

        let text = "寄附日 5年2月3日 令和2023年 平成2019年";
        let candidates = extractor.candidates(text, &entities);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, MatchSource::Ner);
        assert_eq!(candidates[0].value, EraDate::new(5, 2, 3));
    }

    #[test]
    fn test_ner_and_regex_pooled() {
        let text = "令和5年6月1日 5年2月3日 令和2023年";
        let entities = [date("5年2月3日"), EntitySpan::new("City", "5年1月1日")];
        assert_eq!(extract_date(text, &entities), Some("2023/02/03".to_string()));
    }

    #[test]
    fn test_regex_candidates_carry_position() {
        let text = "ab令和5年3月1日";
        let candidates = DateExtractor::new().candidates(text, &[]);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, MatchSource::Regex);
        assert_eq!(candidates[0].position, Some((2, text.len())));
    }

    #[test]
    fn test_no_date() {
        assert_eq!(extract_date("寄附金受領証明書", &[]), None);
    }

    #[test]
    fn test_idempotent() {
        let text = "令和5年4月10日 令和5年3月1日";
        assert_eq!(extract_date(text, &[]), extract_date(text, &[]));
    }
}
