//! The batch-analysis pipeline.
//!
//! Stages are separate types so each failure mode can be exercised alone:
//! [`Summarizer`] never fails, [`SentimentClassifier`] fails per document,
//! [`apply_threshold`] is total. [`BatchAnalyzer`] chains them.

mod analyzer;
mod builder;
pub mod classifier;
pub mod summarizer;
mod threshold;

pub use analyzer::BatchAnalyzer;
pub use builder::{Tonality, TonalityBuilder};
pub use classifier::{MAX_INPUT_TOKENS, SentimentClassifier};
pub use summarizer::Summarizer;
pub use threshold::apply_threshold;
