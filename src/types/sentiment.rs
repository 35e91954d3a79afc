//! Sentiment classification types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Raw label emitted by a binary sentiment model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SentimentLabel {
    Positive,
    Negative,
}

impl SentimentLabel {
    /// Parse a model label, case-insensitively.
    ///
    /// Only the binary POSITIVE/NEGATIVE set is recognised.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "POSITIVE" => Some(Self::Positive),
            "NEGATIVE" => Some(Self::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label after the confidence threshold has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FinalLabel {
    Positive,
    Negative,
    Neutral,
}

impl FinalLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "POSITIVE",
            Self::Negative => "NEGATIVE",
            Self::Neutral => "NEUTRAL",
        }
    }
}

impl From<SentimentLabel> for FinalLabel {
    fn from(label: SentimentLabel) -> Self {
        match label {
            SentimentLabel::Positive => Self::Positive,
            SentimentLabel::Negative => Self::Negative,
        }
    }
}

impl fmt::Display for FinalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top prediction of a sentiment model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: SentimentLabel,
    /// Probability of `label` (0.0 to 1.0).
    pub confidence: f32,
}

impl Sentiment {
    pub fn new(label: SentimentLabel, confidence: f32) -> Self {
        Self { label, confidence }
    }
}

/// Why a document could not be classified.
///
/// The `Display` text is what callers see in the outcome's `error` field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// No model was loaded at startup.
    #[error("pipeline not loaded")]
    Unavailable,
    /// The model produced no label.
    #[error("empty result")]
    Empty,
    /// Inference failed at runtime.
    #[error("{0}")]
    Inference(String),
}

/// Output of the classification stage.
pub type ClassificationResult = std::result::Result<Sentiment, ClassifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(SentimentLabel::parse("positive"), Some(SentimentLabel::Positive));
        assert_eq!(SentimentLabel::parse(" NEGATIVE "), Some(SentimentLabel::Negative));
        assert_eq!(SentimentLabel::parse("neutral"), None);
    }

    #[test]
    fn labels_serialize_uppercase() {
        assert_eq!(serde_json::to_string(&FinalLabel::Neutral).unwrap(), "\"NEUTRAL\"");
        assert_eq!(
            serde_json::to_string(&SentimentLabel::Positive).unwrap(),
            "\"POSITIVE\""
        );
    }

    #[test]
    fn classify_error_messages_are_stable() {
        assert_eq!(ClassifyError::Unavailable.to_string(), "pipeline not loaded");
        assert_eq!(ClassifyError::Empty.to_string(), "empty result");
        assert_eq!(ClassifyError::Inference("boom".into()).to_string(), "boom");
    }
}
