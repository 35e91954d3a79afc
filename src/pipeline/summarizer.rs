//! Summarization stage.
//!
//! Wraps a [`SummarizeProvider`] so that no failure escapes: a missing
//! credential, a transport error, a bad response or a timeout all yield
//! [`SummaryResult::Degraded`] carrying the original text.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::providers::SummarizeProvider;
use crate::telemetry;
use crate::types::{SummarizeOptions, SummaryResult};
use crate::TonalityError;

/// Default bound on a single summarization call.
pub const DEFAULT_SUMMARIZE_TIMEOUT: Duration = Duration::from_secs(60);

/// Diagnostic used when no usable credential was configured.
pub const MISSING_CREDENTIAL_DETAIL: &str =
    "Error: No valid summarization API key. Returning original text.";

/// Summarization stage with a fixed provider, options and timeout.
#[derive(Clone)]
pub struct Summarizer {
    provider: Option<Arc<dyn SummarizeProvider>>,
    options: SummarizeOptions,
    timeout: Duration,
}

impl Summarizer {
    /// Summarize through `provider`.
    pub fn new(provider: Arc<dyn SummarizeProvider>) -> Self {
        Self {
            provider: Some(provider),
            options: SummarizeOptions::default(),
            timeout: DEFAULT_SUMMARIZE_TIMEOUT,
        }
    }

    /// A summarizer with no credential; every call degrades immediately.
    pub fn unconfigured() -> Self {
        Self {
            provider: None,
            options: SummarizeOptions::default(),
            timeout: DEFAULT_SUMMARIZE_TIMEOUT,
        }
    }

    /// Set the options sent with every request.
    pub fn options(mut self, options: SummarizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the per-call timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a provider is configured.
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Summarize `text`. Never fails.
    pub async fn summarize(&self, text: &str) -> SummaryResult {
        let Some(provider) = &self.provider else {
            metrics::counter!(telemetry::SUMMARIES_DEGRADED_TOTAL).increment(1);
            return SummaryResult::Degraded {
                original: text.to_owned(),
                detail: MISSING_CREDENTIAL_DETAIL.to_owned(),
            };
        };

        let start = Instant::now();
        let result = tokio::time::timeout(self.timeout, provider.summarize(text, &self.options))
            .await
            .unwrap_or(Err(TonalityError::Timeout(self.timeout)));
        metrics::histogram!(telemetry::STAGE_DURATION_SECONDS, "stage" => "summarize")
            .record(start.elapsed().as_secs_f64());

        match result {
            Ok(summary) => SummaryResult::Ok(summary),
            Err(e) => {
                warn!(
                    provider = provider.name(),
                    remote = e.is_remote(),
                    error = %e,
                    "summarization failed, using original text"
                );
                metrics::counter!(telemetry::SUMMARIES_DEGRADED_TOTAL).increment(1);
                SummaryResult::Degraded {
                    original: text.to_owned(),
                    detail: format!("Summarization error: {e}"),
                }
            }
        }
    }
}
