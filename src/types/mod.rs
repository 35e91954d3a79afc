//! Public types for the Tonality API.

mod document;
mod health;
mod outcome;
mod sentiment;
mod summary;

pub use document::Document;
pub use health::ServiceHealth;
pub use outcome::{AnalyzeResponse, BatchReport, BatchStats, DocumentOutcome};
pub use sentiment::{ClassificationResult, ClassifyError, FinalLabel, Sentiment, SentimentLabel};
pub use summary::{Extractiveness, SummarizeOptions, SummaryFormat, SummaryLength, SummaryResult};
