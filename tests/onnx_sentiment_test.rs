//! Live tests for local sentiment inference.
//!
//! These tests require actual model downloads and execution.
//! Run with:
//! ```bash
//! cargo test --test onnx_sentiment_test --features local-inference -- --ignored
//! ```
//!
//! First run will download the DistilBERT SST-2 model (~270MB).

#![cfg(feature = "local-inference")]

use std::sync::Arc;

use tonality::providers::{LocalSentimentModel, OnnxSentimentProvider, SentimentProvider};
use tonality::{Device, Document, FinalLabel, SentimentLabel, Tonality};

#[test]
fn custom_model_with_missing_files_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let model = LocalSentimentModel::Custom {
        model_path: dir.path().join("model.onnx"),
        tokenizer_path: dir.path().join("tokenizer.json"),
    };
    assert!(OnnxSentimentProvider::with_cache_dir(model, Device::Cpu, dir.path()).is_err());
}

#[test]
fn failed_local_load_leaves_classifier_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let analyzer = Tonality::builder()
        .local_sentiment(LocalSentimentModel::Custom {
            model_path: dir.path().join("model.onnx"),
            tokenizer_path: dir.path().join("tokenizer.json"),
        })
        .build();
    assert!(!analyzer.classifier().is_available());
}

#[tokio::test]
#[ignore]
async fn test_live_positive_and_negative() {
    let provider = OnnxSentimentProvider::new(LocalSentimentModel::DistilBertSst2, Device::Cpu)
        .expect("Failed to load sentiment model");

    let positive = provider
        .classify("The support agent was wonderful and solved my problem.")
        .await
        .expect("Inference failed");
    assert_eq!(positive.label, SentimentLabel::Positive);
    assert!(positive.confidence > 0.9);

    let negative = provider
        .classify("This was a terrible experience and nobody helped me.")
        .await
        .expect("Inference failed");
    assert_eq!(negative.label, SentimentLabel::Negative);
    assert!(negative.confidence > 0.9);
}

#[tokio::test]
#[ignore]
async fn test_live_long_input_is_truncated() {
    let provider = OnnxSentimentProvider::new(LocalSentimentModel::DistilBertSst2, Device::Cpu)
        .expect("Failed to load sentiment model");

    let long_text = "great service ".repeat(2000);
    let sentiment = provider
        .classify(&long_text)
        .await
        .expect("Inference on long input failed");
    assert!((0.0..=1.0).contains(&sentiment.confidence));
}

#[tokio::test]
#[ignore]
async fn test_live_batch_through_pipeline() {
    let provider = OnnxSentimentProvider::new(LocalSentimentModel::DistilBertSst2, Device::Cpu)
        .expect("Failed to load sentiment model");
    let analyzer = Tonality::builder().sentiment(Arc::new(provider)).build();

    let report = analyzer
        .analyze_batch(
            vec![
                Document::new("happy.txt", "I absolutely love it."),
                Document::new("sad.txt", "I hate this, it broke on day one."),
            ],
            0.6,
        )
        .await;

    assert_eq!(report.outcomes[0].label(), Some(FinalLabel::Positive));
    assert_eq!(report.outcomes[1].label(), Some(FinalLabel::Negative));
}
