//! Builder for configuring analyzer instances

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "local-inference")]
use std::path::PathBuf;

use tracing::warn;

use super::{BatchAnalyzer, SentimentClassifier, Summarizer};
use crate::providers::{CohereClient, SentimentProvider, SummarizeProvider};
use crate::types::SummarizeOptions;

#[cfg(feature = "local-inference")]
use crate::model::Device;
#[cfg(feature = "local-inference")]
use crate::providers::LocalSentimentModel;

use super::summarizer::DEFAULT_SUMMARIZE_TIMEOUT;

/// Main entry point for creating analyzer instances.
pub struct Tonality;

impl Tonality {
    /// Create a new builder for configuring the analyzer.
    pub fn builder() -> TonalityBuilder {
        TonalityBuilder::new()
    }
}

/// Builder for configuring analyzer instances.
///
/// Building never fails: a missing summarization credential degrades
/// summaries, and a sentiment model that cannot be loaded leaves the
/// classifier unavailable. Both are logged once here.
pub struct TonalityBuilder {
    cohere_key: Option<String>,
    cohere_base_url: Option<String>,
    summarize_options: SummarizeOptions,
    summarize_timeout: Duration,
    summarizer: Option<Arc<dyn SummarizeProvider>>,
    sentiment: Option<Arc<dyn SentimentProvider>>,
    concurrency: usize,
    #[cfg(feature = "huggingface")]
    huggingface_key: Option<String>,
    #[cfg(feature = "huggingface")]
    huggingface_model: Option<String>,
    #[cfg(feature = "local-inference")]
    local_sentiment_model: Option<LocalSentimentModel>,
    #[cfg(feature = "local-inference")]
    device: Device,
    #[cfg(feature = "local-inference")]
    cache_dir: Option<PathBuf>,
}

impl Default for TonalityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TonalityBuilder {
    pub fn new() -> Self {
        Self {
            cohere_key: None,
            cohere_base_url: None,
            summarize_options: SummarizeOptions::default(),
            summarize_timeout: DEFAULT_SUMMARIZE_TIMEOUT,
            summarizer: None,
            sentiment: None,
            concurrency: 1,
            #[cfg(feature = "huggingface")]
            huggingface_key: None,
            #[cfg(feature = "huggingface")]
            huggingface_model: None,
            #[cfg(feature = "local-inference")]
            local_sentiment_model: None,
            #[cfg(feature = "local-inference")]
            device: Device::default(),
            #[cfg(feature = "local-inference")]
            cache_dir: None,
        }
    }

    /// Configure the Cohere summarization service.
    ///
    /// Blank or placeholder keys are treated as absent.
    pub fn cohere(mut self, api_key: impl Into<String>) -> Self {
        self.cohere_key = Some(api_key.into());
        self
    }

    /// Override the Cohere API base URL.
    pub fn cohere_base_url(mut self, url: impl Into<String>) -> Self {
        self.cohere_base_url = Some(url.into());
        self
    }

    /// Use a custom summarization provider instead of Cohere.
    pub fn summarizer(mut self, provider: Arc<dyn SummarizeProvider>) -> Self {
        self.summarizer = Some(provider);
        self
    }

    /// Set the options sent with every summarization request.
    pub fn summarize_options(mut self, options: SummarizeOptions) -> Self {
        self.summarize_options = options;
        self
    }

    /// Bound each summarization call (default: 60s).
    pub fn summarize_timeout(mut self, timeout: Duration) -> Self {
        self.summarize_timeout = timeout;
        self
    }

    /// Use a custom sentiment provider. Takes precedence over the local
    /// model and the HuggingFace API.
    pub fn sentiment(mut self, provider: Arc<dyn SentimentProvider>) -> Self {
        self.sentiment = Some(provider);
        self
    }

    /// Number of documents processed concurrently within a batch (default: 1).
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    /// Configure the HuggingFace Inference API as sentiment backend.
    #[cfg(feature = "huggingface")]
    pub fn huggingface(mut self, api_key: impl Into<String>) -> Self {
        self.huggingface_key = Some(api_key.into());
        self
    }

    /// Use a different HuggingFace text-classification model.
    #[cfg(feature = "huggingface")]
    pub fn huggingface_model(mut self, model: impl Into<String>) -> Self {
        self.huggingface_model = Some(model.into());
        self
    }

    /// Enable local sentiment inference via ONNX Runtime.
    #[cfg(feature = "local-inference")]
    pub fn local_sentiment(mut self, model: LocalSentimentModel) -> Self {
        self.local_sentiment_model = Some(model);
        self
    }

    /// Set the device for local inference (default: CPU).
    #[cfg(feature = "local-inference")]
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Set the cache directory for model downloads.
    #[cfg(feature = "local-inference")]
    pub fn cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(path.into());
        self
    }

    /// Build the analyzer.
    ///
    /// Loads the local model, if configured, synchronously.
    pub fn build(self) -> BatchAnalyzer {
        let summarizer = self
            .build_summarizer()
            .options(self.summarize_options.clone())
            .timeout(self.summarize_timeout);
        let classifier = self.build_classifier();

        BatchAnalyzer::new(summarizer, classifier).concurrency(self.concurrency)
    }

    fn build_summarizer(&self) -> Summarizer {
        if let Some(provider) = &self.summarizer {
            return Summarizer::new(Arc::clone(provider));
        }

        match self.cohere_key.as_deref() {
            Some(key) if CohereClient::is_valid_key(key) => {
                let client = match &self.cohere_base_url {
                    Some(url) => CohereClient::with_base_url(key, url),
                    None => CohereClient::new(key),
                };
                Summarizer::new(Arc::new(client))
            }
            _ => {
                warn!("no valid summarization API key configured, summaries will pass text through");
                Summarizer::unconfigured()
            }
        }
    }

    fn build_classifier(&self) -> SentimentClassifier {
        if let Some(provider) = &self.sentiment {
            return SentimentClassifier::new(Arc::clone(provider));
        }

        // Local model first, API as fallback.
        #[cfg(feature = "local-inference")]
        if let Some(model) = &self.local_sentiment_model {
            use crate::providers::OnnxSentimentProvider;
            use crate::providers::onnx_sentiment::default_cache_dir;

            let cache_dir = self.cache_dir.clone().unwrap_or_else(default_cache_dir);
            match OnnxSentimentProvider::with_cache_dir(model.clone(), self.device, &cache_dir) {
                Ok(provider) => {
                    tracing::info!(model = model.name(), device = self.device.name(), "sentiment model loaded");
                    return SentimentClassifier::new(Arc::new(provider));
                }
                Err(e) => {
                    tracing::error!(model = model.name(), error = %e, "failed to load sentiment model");
                }
            }
        }

        #[cfg(feature = "huggingface")]
        if let Some(key) = &self.huggingface_key {
            let mut client = crate::providers::HuggingFaceClient::new(key);
            if let Some(model) = &self.huggingface_model {
                client = client.model(model);
            }
            tracing::info!("using HuggingFace Inference API for sentiment");
            return SentimentClassifier::new(Arc::new(client));
        }

        warn!("no sentiment model available, every document will fail classification");
        SentimentClassifier::unavailable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_key_leaves_summarizer_unconfigured() {
        let analyzer = Tonality::builder().cohere("YOUR_COHERE_API_KEY").build();
        assert!(!analyzer.summarizer().is_configured());
    }

    #[test]
    fn valid_key_configures_summarizer() {
        let analyzer = Tonality::builder().cohere("co-key").build();
        assert!(analyzer.summarizer().is_configured());
    }

    #[test]
    fn no_backend_leaves_classifier_unavailable() {
        let analyzer = Tonality::builder().build();
        assert!(!analyzer.classifier().is_available());
    }

    #[cfg(feature = "huggingface")]
    #[test]
    fn huggingface_key_configures_classifier() {
        let analyzer = Tonality::builder().huggingface("hf-key").build();
        assert_eq!(analyzer.classifier().provider_name(), Some("huggingface"));
    }
}
