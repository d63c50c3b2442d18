//! Error types for the furusato-core library.

use thiserror::Error;

/// Main error type for the furusato library.
#[derive(Error, Debug)]
pub enum FurusatoError {
    /// Page text could not be read from a document.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// Named-entity recognition failed.
    #[error("NER error: {0}")]
    Ner(#[from] NerError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning a document into per-page text.
#[derive(Error, Debug)]
pub enum SourceError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Pdf(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// The OCR engine could not be started or exited with a failure.
    #[error("OCR failed: {0}")]
    Ocr(String),

    /// No page-text source handles this file type.
    #[error("unsupported file format: {0}")]
    Unsupported(String),

    /// I/O error while reading the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external named-entity recognizer.
#[derive(Error, Debug)]
pub enum NerError {
    /// The recognizer command is empty or could not be spawned.
    #[error("failed to start recognizer: {0}")]
    Spawn(String),

    /// The recognizer exited with a non-zero status.
    #[error("recognizer exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    /// The recognizer produced output that is not a JSON entity line.
    #[error("malformed recognizer output at line {line}: {reason}")]
    Protocol { line: usize, reason: String },
}

/// Result type for the furusato library.
pub type Result<T> = std::result::Result<T, FurusatoError>;
