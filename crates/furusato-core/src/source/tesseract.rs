//! Image OCR through the tesseract command-line tool.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use super::{PageTextSource, Result};
use crate::error::SourceError;
use crate::models::config::OcrConfig;

/// Runs `tesseract <image> stdout -l jpn --oem 3 --psm 4` on one image.
///
/// Each image is one page.
#[derive(Debug, Clone)]
pub struct TesseractSource {
    config: OcrConfig,
}

impl TesseractSource {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Arguments passed after the executable.
    pub fn args(&self, image: &Path) -> Vec<String> {
        vec![
            image.display().to_string(),
            "stdout".to_string(),
            "-l".to_string(),
            self.config.language.clone(),
            "--oem".to_string(),
            self.config.oem.to_string(),
            "--psm".to_string(),
            self.config.psm.to_string(),
        ]
    }
}

impl PageTextSource for TesseractSource {
    fn extensions(&self) -> &[&'static str] {
        &["png", "jpg", "jpeg", "tif", "tiff", "bmp"]
    }

    fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
        if !path.exists() {
            return Err(SourceError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )));
        }

        let output = Command::new(&self.config.tesseract_path)
            .args(self.args(path))
            .output()
            .map_err(|e| {
                SourceError::Ocr(format!("{}: {}", self.config.tesseract_path.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!("tesseract read {} chars from {}", text.chars().count(), path.display());

        // tesseract ends its output with a form feed
        Ok(vec![text.trim_end_matches('\x0c').to_string()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_arguments() {
        let source = TesseractSource::new(OcrConfig::default());
        assert_eq!(
            source.args(Path::new("scan.png")),
            vec!["scan.png", "stdout", "-l", "jpn", "--oem", "3", "--psm", "4"]
        );
    }

    #[test]
    fn test_missing_binary_is_ocr_error() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("scan.png");
        std::fs::write(&image, b"").unwrap();

        let source = TesseractSource::new(OcrConfig {
            tesseract_path: dir.path().join("no-such-tesseract"),
            ..OcrConfig::default()
        });
        assert!(matches!(source.page_texts(&image), Err(SourceError::Ocr(_))));
    }
}
