//! Batch orchestration.
//!
//! Each document runs ingest → summarize → classify → decide and ends in
//! exactly one [`DocumentOutcome`]. Documents never affect each other; a
//! failure is recorded in place and the batch continues.

use futures_util::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

use super::classifier::SentimentClassifier;
use super::summarizer::Summarizer;
use super::threshold::apply_threshold;
use crate::telemetry;
use crate::types::{BatchReport, ClassifyError, Document, DocumentOutcome};

/// Runs batches through the summarize/classify pipeline.
///
/// Holds the process-wide summarization client and sentiment model; cheap to
/// share behind an `Arc` and stateless across calls.
#[derive(Clone)]
pub struct BatchAnalyzer {
    summarizer: Summarizer,
    classifier: SentimentClassifier,
    concurrency: usize,
}

impl BatchAnalyzer {
    /// Create an analyzer that processes one document at a time.
    pub fn new(summarizer: Summarizer, classifier: SentimentClassifier) -> Self {
        Self {
            summarizer,
            classifier,
            concurrency: 1,
        }
    }

    /// Process up to `n` documents concurrently. Outcome order is unaffected.
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    /// Analyze every document and return outcomes in submission order.
    #[instrument(skip_all, fields(documents = documents.len(), threshold = threshold))]
    pub async fn analyze_batch(&self, documents: Vec<Document>, threshold: f32) -> BatchReport {
        metrics::counter!(telemetry::BATCHES_TOTAL).increment(1);

        // Without a model no document can succeed; skip the remote calls.
        if !self.classifier.is_available() {
            warn!("sentiment model not loaded, failing every document");
            let outcomes = documents
                .into_iter()
                .map(|doc| failure(doc.filename, &ClassifyError::Unavailable))
                .collect();
            return BatchReport::new(threshold, outcomes);
        }

        let outcomes = stream::iter(
            documents
                .iter()
                .map(|doc| self.analyze_document(doc, threshold)),
        )
        .buffered(self.concurrency)
        // Boxed so the closure type stays out of the future's auto-trait
        // check; otherwise axum handlers fail the higher-ranked `Send` bound.
        .boxed()
        .collect::<Vec<_>>()
        .await;

        BatchReport::new(threshold, outcomes)
    }

    /// Run one document through every stage.
    #[instrument(skip(self, document), fields(filename = %document.filename))]
    pub async fn analyze_document(&self, document: &Document, threshold: f32) -> DocumentOutcome {
        let text = document.text();
        let summary = self.summarizer.summarize(&text).await;

        let sentiment = match self.classifier.classify(summary.classification_input()).await {
            Ok(sentiment) => sentiment,
            Err(e) => {
                warn!(error = %e, "classification failed");
                return failure(document.filename.clone(), &e);
            }
        };

        let label = apply_threshold(sentiment.label, sentiment.confidence, threshold);
        debug!(
            raw = %sentiment.label,
            confidence = sentiment.confidence,
            %label,
            degraded = summary.is_degraded(),
            "document classified"
        );
        metrics::counter!(telemetry::DOCUMENTS_TOTAL, "status" => "ok").increment(1);

        DocumentOutcome::Success {
            filename: document.filename.clone(),
            summary: summary.display_text().into_owned(),
            sentiment_label: label,
            confidence: sentiment.confidence,
        }
    }
}

fn failure(filename: String, error: &ClassifyError) -> DocumentOutcome {
    metrics::counter!(telemetry::DOCUMENTS_TOTAL, "status" => "error").increment(1);
    DocumentOutcome::Failure {
        filename,
        error: error.to_string(),
    }
}
