//! Named-entity recognition seam.
//!
//! The NER model is an external collaborator. The core only needs an ordered
//! list of labeled spans per page; anything that can produce one implements
//! [`EntityRecognizer`].

mod command;

pub use command::CommandRecognizer;

use serde::{Deserialize, Serialize};

use crate::error::NerError;

/// Label vocabulary understood by the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityLabel {
    Date,
    City,
    Province,
    /// Geo-political entity.
    Gpe,
    /// Location.
    Loc,
    /// Any label outside the vocabulary. Ignored by the extractors.
    Other(String),
}

impl EntityLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Date => "Date",
            Self::City => "City",
            Self::Province => "Province",
            Self::Gpe => "GPE",
            Self::Loc => "LOC",
            Self::Other(label) => label,
        }
    }

    /// Labels whose spans may name a municipality.
    pub fn is_place(&self) -> bool {
        matches!(self, Self::City | Self::Province | Self::Gpe | Self::Loc)
    }
}

impl From<&str> for EntityLabel {
    fn from(label: &str) -> Self {
        match label {
            "Date" => Self::Date,
            "City" => Self::City,
            "Province" => Self::Province,
            "GPE" => Self::Gpe,
            "LOC" => Self::Loc,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for EntityLabel {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<EntityLabel> for String {
    fn from(label: EntityLabel) -> Self {
        label.as_str().to_string()
    }
}

impl std::fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One NER result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub label: EntityLabel,
    pub text: String,
}

impl EntitySpan {
    pub fn new(label: impl Into<EntityLabel>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

/// Produces labeled spans for a page of text.
pub trait EntityRecognizer: Send + Sync {
    /// Recognize entities in `text`, in text order.
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, NerError>;
}

/// Recognizer that finds nothing; extraction falls back to patterns only.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecognizer;

impl EntityRecognizer for NoopRecognizer {
    fn recognize(&self, _text: &str) -> Result<Vec<EntitySpan>, NerError> {
        Ok(Vec::new())
    }
}

impl<F> EntityRecognizer for F
where
    F: Fn(&str) -> Vec<EntitySpan> + Send + Sync,
{
    fn recognize(&self, text: &str) -> Result<Vec<EntitySpan>, NerError> {
        Ok(self(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_label_vocabulary() {
        assert_eq!(EntityLabel::from("GPE"), EntityLabel::Gpe);
        assert_eq!(EntityLabel::from("LOC"), EntityLabel::Loc);
        assert_eq!(EntityLabel::from("Person"), EntityLabel::Other("Person".to_string()));
        assert!(EntityLabel::Province.is_place());
        assert!(!EntityLabel::Date.is_place());
        assert!(!EntityLabel::from("Person").is_place());
    }

    #[test]
    fn test_span_json_shape() {
        let span: EntitySpan = serde_json::from_str(r#"{"label":"City","text":"倉敷市"}"#).unwrap();
        assert_eq!(span, EntitySpan::new("City", "倉敷市"));
        assert_eq!(
            serde_json::to_string(&EntitySpan::new("GPE", "岡山県")).unwrap(),
            r#"{"label":"GPE","text":"岡山県"}"#
        );
    }

    #[test]
    fn test_closure_recognizer() {
        let recognizer = |text: &str| vec![EntitySpan::new("Date", text)];
        let spans = recognizer.recognize("令和5年").unwrap();
        assert_eq!(spans, vec![EntitySpan::new("Date", "令和5年")]);
        assert!(NoopRecognizer.recognize("令和5年").unwrap().is_empty());
    }
}
