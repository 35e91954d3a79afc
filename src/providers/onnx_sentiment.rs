//! Local sentiment inference via ONNX Runtime.
//!
//! Runs a sequence-classification model (DistilBERT fine-tuned on SST-2 by
//! default) with a HuggingFace tokenizer. The model is loaded once and shared;
//! inference runs on the blocking thread pool.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use tokenizers::{Tokenizer, TruncationParams};

use super::traits::SentimentProvider;
use crate::error::{Result, TonalityError};
use crate::model::Device;
use crate::pipeline::MAX_INPUT_TOKENS;
use crate::types::{Sentiment, SentimentLabel};

/// Supported local sentiment models.
#[derive(Debug, Clone)]
pub enum LocalSentimentModel {
    /// distilbert-base-uncased-finetuned-sst-2-english — binary SST-2 sentiment.
    DistilBertSst2,
    /// Custom model from local paths. Output order must be (NEGATIVE, POSITIVE).
    Custom {
        model_path: PathBuf,
        tokenizer_path: PathBuf,
    },
}

impl LocalSentimentModel {
    /// Get the HuggingFace repo ID for this model.
    pub fn repo_id(&self) -> Option<&'static str> {
        match self {
            Self::DistilBertSst2 => Some("distilbert/distilbert-base-uncased-finetuned-sst-2-english"),
            Self::Custom { .. } => None,
        }
    }

    /// Get the model name for display.
    pub fn name(&self) -> &str {
        match self {
            Self::DistilBertSst2 => "distilbert-sst-2",
            Self::Custom { model_path, .. } => model_path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("custom"),
        }
    }

    /// Resolve model and tokenizer paths, downloading if needed.
    fn resolve_paths(&self, cache_dir: &Path) -> Result<(PathBuf, PathBuf)> {
        match (self, self.repo_id()) {
            (
                Self::Custom {
                    model_path,
                    tokenizer_path,
                },
                _,
            ) => Ok((model_path.clone(), tokenizer_path.clone())),
            (_, Some(repo_id)) => download_model(repo_id, cache_dir),
            (_, None) => Err(TonalityError::Configuration(format!(
                "no source for model {}",
                self.name()
            ))),
        }
    }
}

/// Information about a sentiment model.
#[derive(Debug, Clone)]
pub struct SentimentModelInfo {
    /// Model name.
    pub name: String,
    /// Output labels in logit order.
    pub labels: Vec<String>,
}

impl From<&LocalSentimentModel> for SentimentModelInfo {
    fn from(model: &LocalSentimentModel) -> Self {
        Self {
            name: model.name().to_string(),
            // SST-2 id2label
            labels: vec!["NEGATIVE".to_string(), "POSITIVE".to_string()],
        }
    }
}

struct Inner {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    model_info: SentimentModelInfo,
}

/// Local sentiment provider using ONNX Runtime.
#[derive(Clone)]
pub struct OnnxSentimentProvider {
    inner: Arc<Inner>,
    device: Device,
}

impl OnnxSentimentProvider {
    /// Create a new provider with the specified model.
    ///
    /// Downloads the model if not cached locally.
    pub fn new(model: LocalSentimentModel, device: Device) -> Result<Self> {
        Self::with_cache_dir(model, device, &default_cache_dir())
    }

    /// Create a provider, downloading into `cache_dir`.
    pub fn with_cache_dir(
        model: LocalSentimentModel,
        device: Device,
        cache_dir: &Path,
    ) -> Result<Self> {
        let (model_path, tokenizer_path) = model.resolve_paths(cache_dir)?;

        let session = build_session(&model_path, &device)?;
        let mut tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            TonalityError::Configuration(format!("Failed to load tokenizer: {}", e))
        })?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_INPUT_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| {
                TonalityError::Configuration(format!("Failed to configure truncation: {}", e))
            })?;
        tokenizer.with_padding(None);

        Ok(Self {
            inner: Arc::new(Inner {
                session: Mutex::new(session),
                tokenizer,
                model_info: (&model).into(),
            }),
            device,
        })
    }

    /// Get model information.
    pub fn model_info(&self) -> &SentimentModelInfo {
        &self.inner.model_info
    }

    /// Device the session runs on.
    pub fn device(&self) -> Device {
        self.device
    }

    /// Run inference synchronously.
    pub fn classify_blocking(&self, text: &str) -> Result<Sentiment> {
        self.inner.classify(text)
    }
}

impl Inner {
    fn classify(&self, text: &str) -> Result<Sentiment> {
        let (input_ids, attention_mask) = self.encode(text)?;
        let logits = self.run_inference(&input_ids, &attention_mask)?;
        logits_to_sentiment(&logits, &self.model_info)
    }

    /// Encode text, truncated to the model limit.
    fn encode(&self, text: &str) -> Result<(Vec<i64>, Vec<i64>)> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| TonalityError::DataError(format!("Tokenization failed: {}", e)))?;

        let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&id| id as i64).collect();
        let attention_mask: Vec<i64> = encoding
            .get_attention_mask()
            .iter()
            .map(|&m| m as i64)
            .collect();

        Ok((input_ids, attention_mask))
    }

    /// Run the ONNX session and return the logits of the single batch row.
    fn run_inference(
        &self,
        input_ids: &[i64],
        attention_mask: &[i64],
    ) -> Result<Vec<f32>> {
        use ort::value::TensorRef;

        let shape = [1_usize, input_ids.len()];

        let input_ids_tensor = TensorRef::from_array_view((shape, input_ids)).map_err(|e| {
            TonalityError::DataError(format!("Failed to create input_ids tensor: {}", e))
        })?;
        let attention_mask_tensor =
            TensorRef::from_array_view((shape, attention_mask)).map_err(|e| {
                TonalityError::DataError(format!("Failed to create attention_mask tensor: {}", e))
            })?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| TonalityError::DataError(format!("ONNX session poisoned: {}", e)))?;

        let outputs = session
            .run(ort::inputs![
                "input_ids" => input_ids_tensor,
                "attention_mask" => attention_mask_tensor,
            ])
            .map_err(|e| TonalityError::DataError(format!("ONNX inference failed: {}", e)))?;

        let logits = outputs
            .get("logits")
            .ok_or_else(|| TonalityError::DataError("No logits output found".to_string()))?;

        let (_, logits_data) = logits
            .try_extract_tensor::<f32>()
            .map_err(|e| TonalityError::DataError(format!("Failed to extract logits: {}", e)))?;

        Ok(logits_data.to_vec())
    }
}

#[async_trait]
impl SentimentProvider for OnnxSentimentProvider {
    fn name(&self) -> &str {
        "onnx"
    }

    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_owned();
        tokio::task::spawn_blocking(move || inner.classify(&text))
            .await
            .map_err(|e| TonalityError::DataError(format!("inference task failed: {}", e)))?
    }
}

/// Convert logits to the top label with its softmax probability.
fn logits_to_sentiment(logits: &[f32], model_info: &SentimentModelInfo) -> Result<Sentiment> {
    if logits.is_empty() {
        return Err(TonalityError::EmptyResponse);
    }
    if logits.len() != model_info.labels.len() {
        return Err(TonalityError::DataError(format!(
            "Expected {} logits, got {}",
            model_info.labels.len(),
            logits.len()
        )));
    }

    let probs = softmax(logits);
    let (index, confidence) = probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .ok_or(TonalityError::EmptyResponse)?;

    let raw = &model_info.labels[index];
    let label = SentimentLabel::parse(raw)
        .ok_or_else(|| TonalityError::DataError(format!("unexpected sentiment label: {}", raw)))?;

    Ok(Sentiment::new(label, confidence))
}

/// Softmax function.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|x| x / sum).collect()
}

/// Build an ONNX session with the appropriate execution provider.
fn build_session(model_path: &Path, device: &Device) -> Result<Session> {
    let builder = Session::builder()
        .map_err(|e| {
            TonalityError::Configuration(format!("Failed to create session builder: {}", e))
        })?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| {
            TonalityError::Configuration(format!("Failed to set optimization level: {}", e))
        })?;

    let builder = match device {
        Device::Cpu => builder,
        #[cfg(feature = "cuda")]
        Device::Cuda { device_id } => {
            use ort::execution_providers::CUDAExecutionProvider;
            builder
                .with_execution_providers([CUDAExecutionProvider::default()
                    .with_device_id(*device_id as i32)
                    .build()])
                .map_err(|e| {
                    TonalityError::Configuration(format!("Failed to configure CUDA: {}", e))
                })?
        }
    };

    builder
        .commit_from_file(model_path)
        .map_err(|e| TonalityError::Configuration(format!("Failed to load ONNX model: {}", e)))
}

/// Get the cache directory for models.
pub fn default_cache_dir() -> PathBuf {
    std::env::var("TONALITY_CACHE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from(".cache"))
                .join("tonality")
                .join("models")
        })
}

/// Download model and tokenizer from HuggingFace Hub.
fn download_model(repo_id: &str, cache_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    use hf_hub::api::sync::ApiBuilder;

    let api = ApiBuilder::new()
        .with_cache_dir(cache_dir.to_path_buf())
        .build()
        .map_err(|e| {
            TonalityError::Configuration(format!("Failed to initialize HF Hub API: {}", e))
        })?;

    let repo = api.model(repo_id.to_string());

    let model_path = repo.get("onnx/model.onnx").map_err(|e| {
        TonalityError::Configuration(format!("Failed to download ONNX model: {}", e))
    })?;

    let tokenizer_path = repo.get("tokenizer.json").map_err(|e| {
        TonalityError::Configuration(format!("Failed to download tokenizer: {}", e))
    })?;

    Ok((model_path, tokenizer_path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sst2_info() -> SentimentModelInfo {
        (&LocalSentimentModel::DistilBertSst2).into()
    }

    #[test]
    fn sst2_labels_follow_logit_order() {
        let info = sst2_info();
        assert_eq!(info.name, "distilbert-sst-2");
        assert_eq!(info.labels, ["NEGATIVE", "POSITIVE"]);
    }

    #[test]
    fn test_softmax() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1]);
        assert!(probs[1] > probs[0]);
    }

    #[test]
    fn positive_logit_wins() {
        let result = logits_to_sentiment(&[-2.0, 3.0], &sst2_info()).unwrap();
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.confidence > 0.99);
    }

    #[test]
    fn negative_logit_wins() {
        let result = logits_to_sentiment(&[1.5, -0.5], &sst2_info()).unwrap();
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.confidence > 0.5 && result.confidence < 1.0);
    }

    #[test]
    fn empty_logits_are_empty_response() {
        let err = logits_to_sentiment(&[], &sst2_info()).unwrap_err();
        assert!(matches!(err, TonalityError::EmptyResponse));
    }

    #[test]
    fn mismatched_logit_count_is_data_error() {
        let err = logits_to_sentiment(&[0.1, 0.2, 0.3], &sst2_info()).unwrap_err();
        assert!(matches!(err, TonalityError::DataError(_)));
    }

    #[test]
    fn test_local_sentiment_model_properties() {
        let model = LocalSentimentModel::DistilBertSst2;
        assert_eq!(model.name(), "distilbert-sst-2");
        assert!(model.repo_id().unwrap().ends_with("sst-2-english"));

        let custom = LocalSentimentModel::Custom {
            model_path: PathBuf::from("/path/to/model.onnx"),
            tokenizer_path: PathBuf::from("/path/to/tokenizer.json"),
        };
        assert_eq!(custom.name(), "model");
        assert_eq!(custom.repo_id(), None);
    }
}
