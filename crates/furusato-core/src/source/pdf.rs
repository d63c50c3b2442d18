//! PDF text layers via lopdf.
//!
//! Scanned certificates that were already OCR'd (for example by a scanner
//! driver) carry a searchable text layer; reading it avoids a second OCR.

use std::path::Path;

use lopdf::Document;
use tracing::{debug, warn};

use super::{PageTextSource, Result};
use crate::error::SourceError;

/// Reads the embedded text of each PDF page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextSource;

impl PdfTextSource {
    /// Load a document, decrypting PDFs protected by an empty password.
    pub fn load(data: &[u8]) -> Result<Document> {
        let mut doc = Document::load_mem(data).map_err(|e| SourceError::Pdf(e.to_string()))?;

        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(SourceError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");
        }

        if doc.get_pages().is_empty() {
            return Err(SourceError::NoPages);
        }

        Ok(doc)
    }

    /// Text of every page. A page whose text cannot be decoded is empty.
    pub fn extract_pages(doc: &Document) -> Vec<String> {
        doc.get_pages()
            .keys()
            .map(|&page| match doc.extract_text(&[page]) {
                Ok(text) => text,
                Err(e) => {
                    warn!("Failed to extract text from PDF page {}: {}", page, e);
                    String::new()
                }
            })
            .collect()
    }

    /// Whether a PDF has pages but no text on any of them, i.e. it is a
    /// plain scan without a text layer.
    pub fn lacks_text_layer(pages: &[String]) -> bool {
        !pages.is_empty() && pages.iter().all(|p| p.trim().is_empty())
    }
}

impl PageTextSource for PdfTextSource {
    fn extensions(&self) -> &[&'static str] {
        &["pdf"]
    }

    fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
        let data = std::fs::read(path)?;
        let doc = Self::load(&data)?;
        let pages = Self::extract_pages(&doc);
        debug!("Loaded PDF {} with {} pages", path.display(), pages.len());
        if Self::lacks_text_layer(&pages) {
            warn!(
                "{} has no text layer on any of its {} pages; the document needs OCR",
                path.display(),
                pages.len()
            );
        }
        Ok(pages)
    }
}
