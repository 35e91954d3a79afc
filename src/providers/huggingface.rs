//! HuggingFace Inference API client for sentiment classification.
//!
//! This client uses HuggingFace's serverless inference endpoints and serves
//! as the sentiment backend on hosts without local inference.
//! See: <https://huggingface.co/docs/api-inference/index>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::traits::SentimentProvider;
use crate::pipeline::MAX_INPUT_TOKENS;
use crate::types::{Sentiment, SentimentLabel};
use crate::{Result, TonalityError};

/// Default base URL for HuggingFace Inference API
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Default sentiment model.
pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";

/// Client for HuggingFace text-classification endpoints.
#[derive(Clone)]
pub struct HuggingFaceClient {
    api_key: String,
    http: Client,
    base_url: String,
    model: String,
}

impl HuggingFaceClient {
    /// Create a new HuggingFace client with the given API key and the default
    /// sentiment model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
            model: DEFAULT_SENTIMENT_MODEL.to_string(),
        }
    }

    /// Use a different text-classification model.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Classify sentiment of `text`.
    ///
    /// The endpoint truncates input to the model limit server-side.
    pub async fn classify(&self, text: &str) -> Result<Sentiment> {
        let url = format!("{}/models/{}", self.base_url, self.model);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ClassificationRequest {
                inputs: text,
                parameters: ClassificationParameters {
                    truncation: true,
                    max_length: MAX_INPUT_TOKENS,
                },
            })
            .send()
            .await
            .map_err(|e| TonalityError::Http(e.to_string()))?;

        self.handle_response_errors(&response)?;

        let body: ClassificationResponse = response
            .json()
            .await
            .map_err(|e| TonalityError::Http(e.to_string()))?;

        let top = body
            .into_scores()
            .into_iter()
            .max_by(|a, b| {
                a.score
                    .partial_cmp(&b.score)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .ok_or(TonalityError::EmptyResponse)?;

        let label = SentimentLabel::parse(&top.label).ok_or_else(|| {
            TonalityError::DataError(format!("unexpected sentiment label: {}", top.label))
        })?;

        Ok(Sentiment::new(label, top.score))
    }

    /// Check response status and map to appropriate error.
    fn handle_response_errors(&self, response: &reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            401 => Err(TonalityError::AuthenticationFailed),
            404 => Err(TonalityError::ModelNotFound(self.model.clone())),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(TonalityError::RateLimited { retry_after })
            }
            503 => Err(TonalityError::Api {
                status: 503,
                message: "Model is loading, please retry".to_string(),
            }),
            code => Err(TonalityError::Api {
                status: code,
                message: format!("HuggingFace API error: {}", status),
            }),
        }
    }
}

#[derive(Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    parameters: ClassificationParameters,
}

#[derive(Serialize)]
struct ClassificationParameters {
    truncation: bool,
    max_length: usize,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// The endpoint returns `[[{label, score}, ...]]` for a single input, older
/// deployments return the flat `[{label, score}, ...]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassificationResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            Self::Nested(outer) => outer.into_iter().next().unwrap_or_default(),
            Self::Flat(scores) => scores,
        }
    }
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl SentimentProvider for HuggingFaceClient {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn classify(&self, text: &str) -> Result<Sentiment> {
        HuggingFaceClient::classify(self, text).await
    }
}
