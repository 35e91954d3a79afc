//! Sentiment classification stage.
//!
//! Whether a model is present is fixed at construction: an analyzer built
//! without one reports [`ClassifyError::Unavailable`] for every call.

use std::sync::Arc;
use std::time::Instant;

use crate::TonalityError;
use crate::providers::SentimentProvider;
use crate::telemetry;
use crate::types::{ClassificationResult, ClassifyError};

/// Maximum model input length, in tokens. Longer input is truncated.
pub const MAX_INPUT_TOKENS: usize = 512;

/// Classification stage over an optional, process-wide model.
#[derive(Clone)]
pub struct SentimentClassifier {
    provider: Option<Arc<dyn SentimentProvider>>,
}

impl SentimentClassifier {
    /// Classify through `provider`.
    pub fn new(provider: Arc<dyn SentimentProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A classifier whose model failed to load, or was never configured.
    pub fn unavailable() -> Self {
        Self { provider: None }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Name of the backing provider, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name())
    }

    /// Classify `text`.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let provider = self.provider.as_ref().ok_or(ClassifyError::Unavailable)?;

        let start = Instant::now();
        let result = provider.classify(text).await;
        metrics::histogram!(telemetry::STAGE_DURATION_SECONDS, "stage" => "classify")
            .record(start.elapsed().as_secs_f64());

        let sentiment = result.map_err(|e| match e {
            TonalityError::EmptyResponse => ClassifyError::Empty,
            other => ClassifyError::Inference(other.to_string()),
        })?;

        if !(0.0..=1.0).contains(&sentiment.confidence) {
            return Err(ClassifyError::Inference(format!(
                "confidence out of range: {}",
                sentiment.confidence
            )));
        }
        Ok(sentiment)
    }
}
