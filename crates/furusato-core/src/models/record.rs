//! Page input and per-page output records.

use serde::{Deserialize, Serialize};

/// OCR output for one document page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Document identifier (file name).
    pub document: String,

    /// Page number (1-indexed).
    pub page: u32,

    /// Raw recognized text. May contain newlines and full-width spaces.
    pub raw: String,
}

impl PageText {
    pub fn new(document: impl Into<String>, page: u32, raw: impl Into<String>) -> Self {
        Self {
            document: document.into(),
            page,
            raw: raw.into(),
        }
    }

    /// Empty or whitespace-only text counts as an OCR failure.
    /// `char::is_whitespace` covers the ideographic space U+3000.
    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }
}

/// One extracted row. Absent fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Document name.
    pub document: String,

    /// Page number (1-indexed).
    pub page: u32,

    /// Municipality without its prefecture, e.g. `倉敷市`.
    pub municipality: String,

    /// Donation date as `YYYY/MM/DD`.
    pub date: String,

    /// Donation amount, digits only.
    pub amount: String,
}

impl OutputRecord {
    /// A record with every field empty.
    pub fn empty(document: impl Into<String>, page: u32) -> Self {
        Self {
            document: document.into(),
            page,
            ..Default::default()
        }
    }

    /// Column headers used by the CSV sink.
    pub const HEADERS: [&'static str; 5] = ["ファイル名", "ページ数", "市区町村名", "日付", "金額"];

    /// The record as CSV fields, in header order.
    pub fn to_row(&self) -> [String; 5] {
        [
            self.document.clone(),
            self.page.to_string(),
            self.municipality.clone(),
            self.date.clone(),
            self.amount.clone(),
        ]
    }

    /// True when no field was extracted.
    pub fn is_empty(&self) -> bool {
        self.municipality.is_empty() && self.date.is_empty() && self.amount.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_page_detection() {
        assert!(PageText::new("a.pdf", 1, "").is_blank());
        assert!(PageText::new("a.pdf", 1, " \n\t").is_blank());
        assert!(PageText::new("a.pdf", 1, "\u{3000}\u{3000}\n").is_blank());
        assert!(!PageText::new("a.pdf", 1, "寄附金受領証明書").is_blank());
    }

    #[test]
    fn test_empty_record_row() {
        let record = OutputRecord::empty("a.pdf", 3);
        assert!(record.is_empty());
        assert_eq!(
            record.to_row(),
            ["a.pdf".to_string(), "3".to_string(), String::new(), String::new(), String::new()]
        );
    }
}
