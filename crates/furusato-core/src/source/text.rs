//! Pre-recognized text files.

use std::path::Path;

use tracing::debug;

use super::{PageTextSource, Result};

/// Page separator written by tesseract between pages.
const FORM_FEED: char = '\x0c';

/// Reads OCR output saved as UTF-8 text, pages separated by form feeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextSource;

impl PlainTextSource {
    /// Split text into pages. A trailing form feed does not start a page.
    pub fn split_pages(text: &str) -> Vec<String> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let body = text.strip_suffix(FORM_FEED).unwrap_or(text);
        body.split(FORM_FEED).map(str::to_string).collect()
    }
}

impl PageTextSource for PlainTextSource {
    fn extensions(&self) -> &[&'static str] {
        &["txt"]
    }

    fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
        let text = std::fs::read_to_string(path)?;
        let pages = Self::split_pages(&text);
        debug!("Read {} pages from {}", pages.len(), path.display());
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_pages() {
        assert_eq!(PlainTextSource::split_pages("a\x0cb"), vec!["a", "b"]);
        assert_eq!(PlainTextSource::split_pages("a\x0cb\x0c"), vec!["a", "b"]);
        assert_eq!(PlainTextSource::split_pages("a\x0c\x0cb"), vec!["a", "", "b"]);
        assert_eq!(PlainTextSource::split_pages(""), vec![""]);
        assert_eq!(PlainTextSource::split_pages("\u{feff}証明書"), vec!["証明書"]);
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.txt");
        std::fs::write(&path, "岡山県倉敷市\x0c令和5年3月1日\x0c").unwrap();

        let pages = PlainTextSource.page_texts(&path).unwrap();
        assert_eq!(pages, vec!["岡山県倉敷市", "令和5年3月1日"]);
    }
}
