//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for the furusato pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FurusatoConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Named-entity recognizer configuration.
    pub ner: NerConfig,

    /// OCR / page text configuration.
    pub ocr: OcrConfig,

    /// CSV output configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Emit an all-empty record for pages whose OCR text is blank.
    /// When false, blank pages produce no row at all.
    pub emit_blank_pages: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            emit_blank_pages: true,
        }
    }
}

/// External NER command configuration.
///
/// The command receives the page text on stdin and must print one JSON
/// object per entity (`{"label": "City", "text": "倉敷市"}`) on stdout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    /// Program and arguments. Empty disables NER (regex-only extraction).
    pub command: Vec<String>,
}

impl NerConfig {
    /// Whether an external recognizer is configured.
    pub fn is_enabled(&self) -> bool {
        !self.command.is_empty()
    }
}

/// OCR configuration for image inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path to the tesseract executable.
    pub tesseract_path: PathBuf,

    /// Tesseract language pack.
    pub language: String,

    /// OCR engine mode (`--oem`).
    pub oem: u8,

    /// Page segmentation mode (`--psm`).
    pub psm: u8,

    /// Maximum pages to read per document (0 = unlimited).
    pub max_pages: usize,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: PathBuf::from("tesseract"),
            language: "jpn".to_string(),
            oem: 3,
            psm: 4,
            max_pages: 0,
        }
    }
}

/// CSV output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Prefix the CSV with a UTF-8 byte order mark (spreadsheet friendly).
    pub write_bom: bool,

    /// Write the header row.
    pub write_header: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_bom: true,
            write_header: true,
        }
    }
}

impl FurusatoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
