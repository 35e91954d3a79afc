//! Cohere summarization client.
//!
//! Wraps the `/v1/summarize` endpoint. See:
//! <https://docs.cohere.com/reference/summarize-2>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use super::traits::SummarizeProvider;
use crate::types::{Extractiveness, SummarizeOptions, SummaryFormat, SummaryLength};
use crate::{Result, TonalityError};

/// Default base URL for the Cohere API
const DEFAULT_BASE_URL: &str = "https://api.cohere.ai";

/// Placeholder shipped in sample configs; never a usable key.
const PLACEHOLDER_KEY: &str = "YOUR_COHERE_API_KEY";

/// Client for the Cohere summarization API.
#[derive(Clone)]
pub struct CohereClient {
    api_key: String,
    http: Client,
    base_url: String,
}

impl CohereClient {
    /// Create a new Cohere client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into(),
        }
    }

    /// Whether `key` looks like a real credential (non-blank, not the sample
    /// placeholder).
    pub fn is_valid_key(key: &str) -> bool {
        let key = key.trim();
        !key.is_empty() && key != PLACEHOLDER_KEY
    }

    /// Summarize `text`.
    pub async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String> {
        let url = format!("{}/v1/summarize", self.base_url);

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&SummarizeRequest {
                text,
                length: options.length,
                format: options.format,
                extractiveness: options.extractiveness,
                temperature: options.temperature,
            })
            .send()
            .await
            .map_err(|e| TonalityError::Http(e.to_string()))?;

        let response = check_status(response).await?;

        let body: SummarizeResponse = response
            .json()
            .await
            .map_err(|e| TonalityError::Http(e.to_string()))?;

        match body.summary {
            Some(summary) if !summary.trim().is_empty() => Ok(summary),
            _ => Err(TonalityError::EmptyResponse),
        }
    }
}

/// Check response status and map to the appropriate error.
///
/// Cohere reports failures as `{"message": "..."}`; the message is kept when
/// present.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs);

    let message = response
        .json::<ErrorResponse>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("Cohere API error: {}", status));

    match status.as_u16() {
        401 => Err(TonalityError::AuthenticationFailed),
        429 => Err(TonalityError::RateLimited { retry_after }),
        code => Err(TonalityError::Api {
            status: code,
            message,
        }),
    }
}

#[derive(Serialize)]
struct SummarizeRequest<'a> {
    text: &'a str,
    length: SummaryLength,
    format: SummaryFormat,
    extractiveness: Extractiveness,
    temperature: f32,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl SummarizeProvider for CohereClient {
    fn name(&self) -> &str {
        "cohere"
    }

    async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String> {
        CohereClient::summarize(self, text, options).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_blank_keys_are_invalid() {
        assert!(!CohereClient::is_valid_key(""));
        assert!(!CohereClient::is_valid_key("   "));
        assert!(!CohereClient::is_valid_key(PLACEHOLDER_KEY));
        assert!(CohereClient::is_valid_key("co-live-key"));
    }

    #[test]
    fn request_uses_service_field_names() {
        let options = SummarizeOptions::default();
        let request = SummarizeRequest {
            text: "hello",
            length: options.length,
            format: options.format,
            extractiveness: options.extractiveness,
            temperature: options.temperature,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "hello");
        assert_eq!(json["length"], "long");
        assert_eq!(json["format"], "paragraph");
        assert_eq!(json["extractiveness"], "auto");
    }
}
