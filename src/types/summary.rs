//! Summarization types.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Requested summary length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Short,
    Medium,
    #[default]
    Long,
    Auto,
}

/// Requested summary layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryFormat {
    #[default]
    Paragraph,
    Bullets,
    Auto,
}

/// How closely the summary reuses sentences from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extractiveness {
    Low,
    Medium,
    High,
    #[default]
    Auto,
}

/// Options forwarded to the summarization service.
///
/// Defaults produce a detailed, paragraph-form summary with low sampling
/// randomness, suited to long transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizeOptions {
    pub length: SummaryLength,
    pub format: SummaryFormat,
    pub extractiveness: Extractiveness,
    pub temperature: f32,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self {
            length: SummaryLength::Long,
            format: SummaryFormat::Paragraph,
            extractiveness: Extractiveness::Auto,
            temperature: 0.3,
        }
    }
}

impl SummarizeOptions {
    /// Set the summary length.
    pub fn length(mut self, length: SummaryLength) -> Self {
        self.length = length;
        self
    }

    /// Set the summary format.
    pub fn format(mut self, format: SummaryFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the extractiveness.
    pub fn extractiveness(mut self, extractiveness: Extractiveness) -> Self {
        self.extractiveness = extractiveness;
        self
    }

    /// Set the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Output of the summarization stage.
///
/// Summarization never aborts a document: when the service is unavailable the
/// original text is carried forward together with the reason.
#[derive(Debug, Clone, PartialEq)]
pub enum SummaryResult {
    /// The service returned a summary.
    Ok(String),
    /// The service could not be used; `original` substitutes for the summary.
    Degraded { original: String, detail: String },
}

impl SummaryResult {
    /// Text handed to the classifier: the summary, or the original text when
    /// degraded.
    pub fn classification_input(&self) -> &str {
        match self {
            Self::Ok(summary) => summary,
            Self::Degraded { original, .. } => original,
        }
    }

    /// Text reported back to the caller. Degraded results carry the
    /// diagnostic as a parenthesised first line.
    pub fn display_text(&self) -> Cow<'_, str> {
        match self {
            Self::Ok(summary) => Cow::Borrowed(summary),
            Self::Degraded { original, detail } => Cow::Owned(format!("({detail})\n{original}")),
        }
    }

    /// Whether the original text was substituted.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}
