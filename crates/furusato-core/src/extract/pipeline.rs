//! Per-page extraction pipeline.

use std::time::Instant;

use tracing::{debug, info, warn, Level};

use crate::models::config::{ExtractionConfig, FurusatoConfig};
use crate::models::record::{OutputRecord, PageText};
use crate::ner::{CommandRecognizer, EntityRecognizer, EntitySpan, NoopRecognizer};

use super::rules::{AmountExtractor, CityExtractor, DateExtractor, FieldExtractor};

/// Everything the extractors share for a run: settings and the NER model.
///
/// Build once, then pass by reference to every page. The context holds no
/// mutable state, so it can be shared across threads.
pub struct ExtractionContext {
    config: ExtractionConfig,
    recognizer: Box<dyn EntityRecognizer>,
    city: CityExtractor,
    date: DateExtractor,
    amount: AmountExtractor,
}

impl ExtractionContext {
    /// Create a context with default settings and no NER.
    pub fn new() -> Self {
        Self {
            config: ExtractionConfig::default(),
            recognizer: Box::new(NoopRecognizer),
            city: CityExtractor::new(),
            date: DateExtractor::new(),
            amount: AmountExtractor::new(),
        }
    }

    /// Create a context from the full configuration, starting the configured
    /// recognizer if there is one.
    pub fn from_config(config: &FurusatoConfig) -> crate::Result<Self> {
        let context = Self::new().with_config(config.extraction.clone());

        if config.ner.is_enabled() {
            let recognizer = CommandRecognizer::new(&config.ner.command)?;
            info!("Using NER command: {}", config.ner.command.join(" "));
            Ok(context.with_recognizer(recognizer))
        } else {
            info!("No NER command configured, using patterns only");
            Ok(context)
        }
    }

    /// Set extraction settings.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the named-entity recognizer.
    pub fn with_recognizer(mut self, recognizer: impl EntityRecognizer + 'static) -> Self {
        self.recognizer = Box::new(recognizer);
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract one record from one page.
    ///
    /// Blank text gives an all-empty record. A failing recognizer is logged
    /// and the page is extracted from patterns alone.
    pub fn extract_page(&self, page: &PageText) -> OutputRecord {
        let start = Instant::now();
        info!("Processing {} page {}", page.document, page.page);

        if page.is_blank() {
            warn!("{} page {}: OCR produced no text", page.document, page.page);
            return OutputRecord::empty(&page.document, page.page);
        }

        debug!("---- OCR text ----\n{}", page.raw);

        let entities = self.recognize(page);

        let record = OutputRecord {
            document: page.document.clone(),
            page: page.page,
            municipality: self.city.extract(&page.raw, &entities).unwrap_or_default(),
            date: self.date.extract(&page.raw, &entities).unwrap_or_default(),
            amount: self.amount.extract(&page.raw, &entities).unwrap_or_default(),
        };

        if tracing::enabled!(Level::DEBUG) {
            debug!(
                "{} page {}: municipality={:?} date={:?} amount={:?} (other amounts: {:?}) in {:?}",
                page.document,
                page.page,
                record.municipality,
                record.date,
                record.amount,
                self.other_amounts(&page.raw),
                start.elapsed()
            );
        }

        record
    }

    /// Extract every page of a document, in page order.
    ///
    /// Blank pages are kept as empty records unless
    /// `emit_blank_pages` is off.
    pub fn extract_document(&self, document: &str, pages: &[String]) -> Vec<OutputRecord> {
        pages
            .iter()
            .enumerate()
            .map(|(index, raw)| PageText::new(document, index as u32 + 1, raw.as_str()))
            .filter(|page| self.config.emit_blank_pages || !page.is_blank())
            .map(|page| self.extract_page(&page))
            .collect()
    }

    /// Yen amounts after the first one, which the amount field ignores.
    fn other_amounts(&self, raw: &str) -> Vec<String> {
        self.amount
            .extract_all(raw)
            .into_iter()
            .skip(1)
            .map(|a| a.value)
            .collect()
    }

    fn recognize(&self, page: &PageText) -> Vec<EntitySpan> {
        match self.recognizer.recognize(&page.raw) {
            Ok(entities) => {
                debug!("---- NER result ----");
                for entity in &entities {
                    debug!("[{}] {}", entity.label, entity.text);
                }
                entities
            }
            Err(e) => {
                warn!(
                    "{} page {}: NER failed, continuing without entities: {}",
                    page.document, page.page, e
                );
                Vec::new()
            }
        }
    }
}

impl Default for ExtractionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NerError;
    use pretty_assertions::assert_eq;

    const CERTIFICATE: &str = "寄附金受領証明書\n\
        東京都渋谷区神南一丁目 ふるさと納税事務局\n\
        寄附者住所 岡山県倉敷市西中新田\n\
        寄附日 令和5年4月10日\n\
        受領日 令和5年3月1日\n\
        寄附金額 ￥12,345円\n\
        合計金額 50,000円";

    struct FailingRecognizer;

    impl EntityRecognizer for FailingRecognizer {
        fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, NerError> {
            Err(NerError::Spawn("model not loaded".to_string()))
        }
    }

    #[test]
    fn test_extract_page() {
        let context = ExtractionContext::new();
        let record = context.extract_page(&PageText::new("a.pdf", 1, CERTIFICATE));

        assert_eq!(
            record,
            OutputRecord {
                document: "a.pdf".to_string(),
                page: 1,
                municipality: "倉敷市".to_string(),
                date: "2023/03/01".to_string(),
                amount: "12345".to_string(),
            }
        );
    }

    #[test]
    fn test_other_amounts_skip_the_donation() {
        let context = ExtractionContext::new();
        assert_eq!(context.other_amounts(CERTIFICATE), vec!["50000"]);
        assert!(context.other_amounts("金額 3,000円").is_empty());

        let record = context.extract_page(&PageText::new("a.pdf", 1, CERTIFICATE));
        assert_eq!(record.amount, "12345");
    }

    #[test]
    fn test_blank_page_gives_empty_record() {
        let context = ExtractionContext::new();
        let record = context.extract_page(&PageText::new("a.pdf", 2, " \u{3000}\n"));
        assert_eq!(record, OutputRecord::empty("a.pdf", 2));
    }

    #[test]
    fn test_recognizer_spans_reach_city_tiers() {
        let context = ExtractionContext::new().with_recognizer(|_: &str| {
            vec![
                EntitySpan::new("City", "札幌市"),
                EntitySpan::new("GPE", "旭川市"),
            ]
        });
        let record = context.extract_page(&PageText::new("a.pdf", 1, "寄附金額 3,000円"));

        assert_eq!(record.municipality, "旭川市");
        assert_eq!(record.amount, "3000");
        assert_eq!(record.date, "");
    }

    #[test]
    fn test_recognizer_runs_once_per_page() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let context = ExtractionContext::new().with_recognizer(move |_: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        });

        context.extract_page(&PageText::new("a.pdf", 1, CERTIFICATE));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_recognizer_falls_back_to_patterns() {
        let context = ExtractionContext::new().with_recognizer(FailingRecognizer);
        let record = context.extract_page(&PageText::new("a.pdf", 1, CERTIFICATE));
        assert_eq!(record.municipality, "倉敷市");
    }

    #[test]
    fn test_extract_document_keeps_page_order_and_blank_pages() {
        let context = ExtractionContext::new();
        let pages = vec![
            CERTIFICATE.to_string(),
            String::new(),
            "大阪府大阪市 金額 7,000円".to_string(),
        ];

        let records = context.extract_document("b.pdf", &pages);
        let summary: Vec<(u32, &str, &str)> = records
            .iter()
            .map(|r| (r.page, r.municipality.as_str(), r.amount.as_str()))
            .collect();

        assert_eq!(
            summary,
            vec![(1, "倉敷市", "12345"), (2, "", ""), (3, "大阪市", "7000")]
        );
    }

    #[test]
    fn test_extract_document_can_skip_blank_pages() {
        let context = ExtractionContext::new().with_config(ExtractionConfig {
            emit_blank_pages: false,
        });
        let pages = vec![String::new(), "大阪府大阪市".to_string()];

        let records = context.extract_document("b.pdf", &pages);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].page, 2);
    }

    #[test]
    fn test_from_config_with_empty_ner() {
        let context = ExtractionContext::from_config(&FurusatoConfig::default()).unwrap();
        assert!(context.config().emit_blank_pages);
    }

    #[test]
    fn test_context_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ExtractionContext>();
    }
}
