//! Telemetry metric name constants.
//!
//! Centralised metric names for tonality operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `tonality_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `status` — document outcome: "ok" or "error"
//! - `stage` — pipeline stage: "summarize" or "classify"

/// Total batches analyzed.
pub const BATCHES_TOTAL: &str = "tonality_batches_total";

/// Total documents that reached an outcome.
///
/// Labels: `status` ("ok" | "error").
pub const DOCUMENTS_TOTAL: &str = "tonality_documents_total";

/// Total summaries that fell back to the original text.
pub const SUMMARIES_DEGRADED_TOTAL: &str = "tonality_summaries_degraded_total";

/// Stage duration in seconds.
///
/// Labels: `stage`.
pub const STAGE_DURATION_SECONDS: &str = "tonality_stage_duration_seconds";
