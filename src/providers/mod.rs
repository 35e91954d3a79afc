//! Provider implementations for the summarization and sentiment capabilities.
//!
//! The summarization service is always available; sentiment backends are
//! selected by feature: `local-inference` for ONNX Runtime, `huggingface` for
//! the hosted inference API.

pub mod cohere;
#[cfg(feature = "huggingface")]
pub mod huggingface;
#[cfg(feature = "local-inference")]
pub mod onnx_sentiment;
pub mod traits;

pub use cohere::CohereClient;
#[cfg(feature = "huggingface")]
pub use huggingface::HuggingFaceClient;
#[cfg(feature = "local-inference")]
pub use onnx_sentiment::{LocalSentimentModel, OnnxSentimentProvider};
pub use traits::{SentimentProvider, SummarizeProvider};
