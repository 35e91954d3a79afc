//! Provider traits for the two external capabilities the pipeline consumes.
//!
//! Providers report raw errors through [`Result`]; the pipeline stages in
//! [`crate::pipeline`] decide how each failure affects a document. This keeps
//! providers substitutable: the summarization service, a HuggingFace
//! endpoint, a local ONNX model and in-test fakes all plug into the same
//! seams.
//!
//! # Example
//!
//! ```ignore
//! struct Echo;
//!
//! #[async_trait]
//! impl SummarizeProvider for Echo {
//!     fn name(&self) -> &str { "echo" }
//!     async fn summarize(&self, text: &str, _: &SummarizeOptions) -> Result<String> {
//!         Ok(text.to_string())
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::Result;
use crate::types::{Sentiment, SummarizeOptions};

// ============================================================================
// Summarize Provider
// ============================================================================

/// Provider for text summarization.
#[async_trait]
pub trait SummarizeProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Condense `text` according to `options`.
    async fn summarize(&self, text: &str, options: &SummarizeOptions) -> Result<String>;
}

// ============================================================================
// Sentiment Provider
// ============================================================================

/// Provider for single-label sentiment classification.
///
/// Implementations truncate over-long input to the model's limit instead of
/// failing, and return [`TonalityError::EmptyResponse`](crate::TonalityError::EmptyResponse)
/// when the model emits no label.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Classify `text`, returning the top label and its probability.
    async fn classify(&self, text: &str) -> Result<Sentiment>;
}
