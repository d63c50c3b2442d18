//! Page text sources.
//!
//! OCR is an external collaborator: each source turns one input file into
//! the recognized text of its pages, one string per page (possibly empty).

mod pdf;
mod tesseract;
mod text;

pub use pdf::PdfTextSource;
pub use tesseract::TesseractSource;
pub use text::PlainTextSource;

use std::path::Path;

use crate::error::SourceError;
use crate::models::config::OcrConfig;

/// Result type for page text sources.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Produces per-page text for a document.
pub trait PageTextSource: Send + Sync {
    /// Lower-case file extensions this source reads.
    fn extensions(&self) -> &[&'static str];

    /// Recognized text of every page, in page order.
    fn page_texts(&self, path: &Path) -> Result<Vec<String>>;
}

/// Picks a source by file extension.
pub struct SourceRegistry {
    sources: Vec<Box<dyn PageTextSource>>,
    max_pages: usize,
}

impl SourceRegistry {
    /// Registry with no sources.
    pub fn empty() -> Self {
        Self {
            sources: Vec::new(),
            max_pages: 0,
        }
    }

    /// Text files, PDF text layers and images through tesseract.
    pub fn from_config(config: &OcrConfig) -> Self {
        Self::empty()
            .with_source(PlainTextSource)
            .with_source(PdfTextSource)
            .with_source(TesseractSource::new(config.clone()))
            .with_max_pages(config.max_pages)
    }

    /// Register a source. Earlier sources win on shared extensions.
    pub fn with_source(mut self, source: impl PageTextSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Limit pages read per document (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Whether some source reads this file.
    pub fn supports(&self, path: &Path) -> bool {
        self.source_for(path).is_some()
    }

    /// Read the pages of `path`.
    pub fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
        let source = self
            .source_for(path)
            .ok_or_else(|| SourceError::Unsupported(path.display().to_string()))?;

        let mut pages = source.page_texts(path)?;
        if self.max_pages > 0 && pages.len() > self.max_pages {
            tracing::debug!(
                "Truncating {} from {} to {} pages",
                path.display(),
                pages.len(),
                self.max_pages
            );
            pages.truncate(self.max_pages);
        }
        Ok(pages)
    }

    fn source_for(&self, path: &Path) -> Option<&dyn PageTextSource> {
        let extension = extension_of(path)?;
        self.sources
            .iter()
            .find(|s| s.extensions().iter().any(|e| *e == extension))
            .map(|s| s.as_ref())
    }
}

pub(crate) fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct FixedSource;

    impl PageTextSource for FixedSource {
        fn extensions(&self) -> &[&'static str] {
            &["fixed"]
        }

        fn page_texts(&self, _path: &Path) -> Result<Vec<String>> {
            Ok(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        }
    }

    #[test]
    fn test_dispatch_by_extension() {
        let registry = SourceRegistry::from_config(&OcrConfig::default());
        assert!(registry.supports(Path::new("a.PDF")));
        assert!(registry.supports(Path::new("scan.jpeg")));
        assert!(registry.supports(Path::new("ocr.txt")));
        assert!(!registry.supports(Path::new("notes.docx")));
        assert!(!registry.supports(Path::new("no_extension")));
    }

    #[test]
    fn test_unsupported_file() {
        let registry = SourceRegistry::empty();
        assert!(matches!(
            registry.page_texts(Path::new("a.pdf")),
            Err(SourceError::Unsupported(_))
        ));
    }

    #[test]
    fn test_max_pages() {
        let registry = SourceRegistry::empty().with_source(FixedSource).with_max_pages(2);
        assert_eq!(registry.page_texts(Path::new("x.fixed")).unwrap(), vec!["1", "2"]);

        let registry = SourceRegistry::empty().with_source(FixedSource);
        assert_eq!(registry.page_texts(Path::new("x.fixed")).unwrap().len(), 3);
    }
}
