//! Confidence threshold policy.

use crate::types::{FinalLabel, SentimentLabel};

/// Map a raw prediction to its final label.
///
/// A confidence strictly below `threshold` becomes [`FinalLabel::Neutral`];
/// a confidence equal to or above it keeps the model's label. The threshold
/// is applied as given, with no clamping.
pub fn apply_threshold(label: SentimentLabel, confidence: f32, threshold: f32) -> FinalLabel {
    if confidence < threshold {
        FinalLabel::Neutral
    } else {
        label.into()
    }
}
