//! Tests for metrics integration.
//!
//! Uses `metrics_util::debugging::DebuggingRecorder` to capture and assert
//! on emitted metrics without needing a real exporter.

use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::MetricKind;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

use tonality::pipeline::{SentimentClassifier, Summarizer};
use tonality::providers::{SentimentProvider, SummarizeProvider};
use tonality::telemetry;
use tonality::types::SummarizeOptions;
use tonality::{BatchAnalyzer, Document, Result, Sentiment, SentimentLabel, TonalityError};

// ============================================================================
// Mock providers
// ============================================================================

struct EchoSummarizer;

#[async_trait]
impl SummarizeProvider for EchoSummarizer {
    fn name(&self) -> &str {
        "echo"
    }

    async fn summarize(&self, text: &str, _options: &SummarizeOptions) -> Result<String> {
        Ok(text.to_string())
    }
}

struct FailingSummarizer;

#[async_trait]
impl SummarizeProvider for FailingSummarizer {
    fn name(&self) -> &str {
        "failing"
    }

    async fn summarize(&self, _text: &str, _options: &SummarizeOptions) -> Result<String> {
        Err(TonalityError::AuthenticationFailed)
    }
}

/// Positive for everything except text containing "broken".
struct MockClassifier;

#[async_trait]
impl SentimentProvider for MockClassifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn classify(&self, text: &str) -> Result<Sentiment> {
        if text.contains("broken") {
            return Err(TonalityError::DataError("bad tensor".to_string()));
        }
        Ok(Sentiment::new(SentimentLabel::Positive, 0.9))
    }
}

// ============================================================================
// Snapshot type alias for readability
// ============================================================================

type SnapshotVec = Vec<(
    metrics_util::CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
)>;

// ============================================================================
// Helpers
// ============================================================================

/// Sum all counter values matching a given metric name and optional label.
fn counter_total(snapshot: &SnapshotVec, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshot
        .iter()
        .filter(|(key, _, _, _)| key.kind() == MetricKind::Counter && key.key().name() == name)
        .filter(|(key, _, _, _)| {
            label.is_none_or(|(k, v)| key.key().labels().any(|l| l.key() == k && l.value() == v))
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(v) => *v,
            _ => 0,
        })
        .sum()
}

/// Check if a histogram entry exists for a metric name and stage.
fn has_stage_histogram(snapshot: &SnapshotVec, stage: &str) -> bool {
    snapshot.iter().any(|(key, _, _, _)| {
        key.kind() == MetricKind::Histogram
            && key.key().name() == telemetry::STAGE_DURATION_SECONDS
            && key
                .key()
                .labels()
                .any(|l| l.key() == "stage" && l.value() == stage)
    })
}

fn analyzer(summarizer: Arc<dyn SummarizeProvider>) -> BatchAnalyzer {
    BatchAnalyzer::new(
        Summarizer::new(summarizer),
        SentimentClassifier::new(Arc::new(MockClassifier)),
    )
}

// ============================================================================
// Tests
// ============================================================================

/// Runs async code within a local recorder scope on the multi-thread runtime.
///
/// `block_in_place` ensures the sync `with_local_recorder` closure stays
/// on the current thread while `block_on` drives the inner async work.
#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn batch_records_document_and_stage_metrics() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    let report = metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                analyzer(Arc::new(EchoSummarizer))
                    .analyze_batch(
                        vec![Document::new("a", "fine"), Document::new("b", "broken")],
                        0.5,
                    )
                    .await
            })
        })
    });
    assert_eq!(report.outcomes.len(), 2);

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(counter_total(&snapshot, telemetry::BATCHES_TOTAL, None), 1);
    assert_eq!(
        counter_total(&snapshot, telemetry::DOCUMENTS_TOTAL, Some(("status", "ok"))),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::DOCUMENTS_TOTAL, Some(("status", "error"))),
        1
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::SUMMARIES_DEGRADED_TOTAL, None),
        0
    );
    assert!(has_stage_histogram(&snapshot, "summarize"));
    assert!(has_stage_histogram(&snapshot, "classify"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn failed_summaries_record_degraded_metric() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                analyzer(Arc::new(FailingSummarizer))
                    .analyze_batch(vec![Document::new("a", "x"), Document::new("b", "y")], 0.5)
                    .await
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_total(&snapshot, telemetry::SUMMARIES_DEGRADED_TOTAL, None),
        2
    );
    assert_eq!(
        counter_total(&snapshot, telemetry::DOCUMENTS_TOTAL, Some(("status", "ok"))),
        2
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 1)]
async fn unavailable_classifier_records_errors() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();

    metrics::with_local_recorder(&recorder, || {
        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async {
                BatchAnalyzer::new(
                    Summarizer::new(Arc::new(EchoSummarizer)),
                    SentimentClassifier::unavailable(),
                )
                .analyze_batch(vec![Document::new("a", "x")], 0.5)
                .await
            })
        })
    });

    let snapshot = snapshotter.snapshot().into_vec();

    assert_eq!(
        counter_total(&snapshot, telemetry::DOCUMENTS_TOTAL, Some(("status", "error"))),
        1
    );
    assert!(!has_stage_histogram(&snapshot, "summarize"));
}

#[tokio::test]
async fn metrics_are_noop_without_recorder() {
    // Verify no panics when no recorder is installed.
    let report = analyzer(Arc::new(EchoSummarizer))
        .analyze_batch(vec![Document::new("a", "fine")], 0.5)
        .await;
    assert!(report.outcomes[0].is_success());
}
