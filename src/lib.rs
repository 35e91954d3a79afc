//! Tonality - batch sentiment analysis for text documents
//!
//! Each document is summarized by a remote summarization service, the summary
//! is classified by a binary sentiment model, and a confidence threshold turns
//! low-confidence predictions into `NEUTRAL`. One document failing never
//! affects the others in its batch.
//!
//! # Example
//!
//! ```rust,no_run
//! use tonality::{Document, Tonality};
//!
//! #[tokio::main]
//! async fn main() {
//!     let analyzer = Tonality::builder()
//!         .cohere("your-cohere-key")
//!         .huggingface("hf_your_key")
//!         .build();
//!
//!     let report = analyzer
//!         .analyze_batch(
//!             vec![Document::new("call.txt", "Thanks, that fixed it!")],
//!             0.6,
//!         )
//!         .await;
//!
//!     println!("{}", report.message());
//!     for outcome in &report.outcomes {
//!         println!("{}: {:?}", outcome.filename(), outcome.label());
//!     }
//! }
//! ```

#[cfg(feature = "client")]
pub mod client;
pub mod error;
#[cfg(feature = "local-inference")]
pub mod model;
pub mod pipeline;
pub mod providers;
#[cfg(feature = "server")]
pub mod server;
pub mod storage;
pub mod telemetry;
pub mod types;
mod version;

// Re-export main types at crate root
pub use error::{Result, TonalityError};
pub use pipeline::{BatchAnalyzer, Tonality, TonalityBuilder, apply_threshold};
pub use storage::UploadStore;
pub use version::{PKG_VERSION, version_string};

#[cfg(feature = "local-inference")]
pub use model::Device;

// Re-export all types
pub use types::{
    AnalyzeResponse, BatchReport, BatchStats, ClassificationResult, ClassifyError, Document,
    DocumentOutcome, Extractiveness, FinalLabel, Sentiment, SentimentLabel, ServiceHealth,
    SummarizeOptions, SummaryFormat, SummaryLength, SummaryResult,
};
