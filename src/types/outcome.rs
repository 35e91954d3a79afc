//! Per-document outcomes and batch-level reports.

use serde::{Deserialize, Serialize};

use super::FinalLabel;

/// Terminal record for one document.
///
/// Serialized untagged so the wire shape is either
/// `{filename, summary, sentiment_label, confidence}` or `{filename, error}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentOutcome {
    Success {
        filename: String,
        summary: String,
        sentiment_label: FinalLabel,
        confidence: f32,
    },
    Failure {
        filename: String,
        error: String,
    },
}

impl DocumentOutcome {
    pub fn filename(&self) -> &str {
        match self {
            Self::Success { filename, .. } | Self::Failure { filename, .. } => filename,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Error text for failed documents.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failure { error, .. } => Some(error),
            Self::Success { .. } => None,
        }
    }

    /// Final label for successful documents.
    pub fn label(&self) -> Option<FinalLabel> {
        match self {
            Self::Success {
                sentiment_label, ..
            } => Some(*sentiment_label),
            Self::Failure { .. } => None,
        }
    }

    /// Confidence for successful documents.
    pub fn confidence(&self) -> Option<f32> {
        match self {
            Self::Success { confidence, .. } => Some(*confidence),
            Self::Failure { .. } => None,
        }
    }
}

/// Result of one batch invocation.
///
/// `outcomes` has exactly one entry per submitted document, in submission
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub document_count: usize,
    pub threshold: f32,
    pub outcomes: Vec<DocumentOutcome>,
}

impl BatchReport {
    /// Assemble a report from ordered outcomes.
    pub fn new(threshold: f32, outcomes: Vec<DocumentOutcome>) -> Self {
        Self {
            document_count: outcomes.len(),
            threshold,
            outcomes,
        }
    }

    /// Human-readable summary line.
    pub fn message(&self) -> String {
        format!(
            "Analyzed {} file(s) with threshold={}.",
            self.document_count, self.threshold
        )
    }

    pub fn stats(&self) -> BatchStats {
        BatchStats::from_outcomes(&self.outcomes)
    }
}

/// Wire shape of the `/analyze` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub message: String,
    pub results: Vec<DocumentOutcome>,
}

impl From<BatchReport> for AnalyzeResponse {
    fn from(report: BatchReport) -> Self {
        Self {
            message: report.message(),
            results: report.outcomes,
        }
    }
}

/// Aggregate figures over a set of outcomes.
///
/// Percentages and confidences consider successful documents only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStats {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Share of successful documents labelled POSITIVE, in percent.
    pub positive_percent: f32,
    pub average_confidence: Option<f32>,
    pub highest_confidence: Option<f32>,
}

impl BatchStats {
    pub fn from_outcomes(outcomes: &[DocumentOutcome]) -> Self {
        let mut stats = Self {
            total: outcomes.len(),
            ..Self::default()
        };
        let mut confidence_sum = 0.0f32;

        for outcome in outcomes {
            let DocumentOutcome::Success {
                sentiment_label,
                confidence,
                ..
            } = outcome
            else {
                stats.failed += 1;
                continue;
            };

            stats.succeeded += 1;
            match sentiment_label {
                FinalLabel::Positive => stats.positive += 1,
                FinalLabel::Negative => stats.negative += 1,
                FinalLabel::Neutral => stats.neutral += 1,
            }
            confidence_sum += confidence;
            stats.highest_confidence = Some(
                stats
                    .highest_confidence
                    .map_or(*confidence, |best| best.max(*confidence)),
            );
        }

        if stats.succeeded > 0 {
            stats.positive_percent = stats.positive as f32 / stats.succeeded as f32 * 100.0;
            stats.average_confidence = Some(confidence_sum / stats.succeeded as f32);
        }
        stats
    }
}
