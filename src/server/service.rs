//! HTTP service exposing the batch analyzer.
//!
//! Routes:
//! - `GET /` banner
//! - `GET /health` readiness of the summarizer and classifier
//! - `POST /analyze` multipart batch (`files` parts plus a `threshold` field)

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

use crate::types::{AnalyzeResponse, Document, ServiceHealth};
use crate::{BatchAnalyzer, UploadStore};

/// Default request body limit (64 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<BatchAnalyzer>,
    pub store: Option<UploadStore>,
}

impl AppState {
    pub fn new(analyzer: Arc<BatchAnalyzer>) -> Self {
        Self {
            analyzer,
            store: None,
        }
    }

    /// Persist raw uploads into `store` before analysis.
    pub fn with_store(mut self, store: UploadStore) -> Self {
        self.store = Some(store);
        self
    }
}

/// A malformed request. Nothing was processed.
#[derive(Debug)]
pub struct BadRequest(pub String);

impl IntoResponse for BadRequest {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.0 }))).into_response()
    }
}

/// Build the router with the default body limit.
pub fn router(state: AppState) -> Router {
    router_with_limit(state, DEFAULT_BODY_LIMIT)
}

/// Build the router with a custom body limit in bytes.
pub fn router_with_limit(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Serve `router` on an already-bound listener until the process exits.
pub async fn serve(listener: TcpListener, router: Router) -> crate::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "listening");
    }
    axum::serve(listener, router).await?;
    Ok(())
}

async fn banner() -> Json<serde_json::Value> {
    Json(json!({ "message": "Tonality: summarize + sentiment analysis API" }))
}

async fn health(State(state): State<AppState>) -> Json<ServiceHealth> {
    Json(ServiceHealth {
        status: "ok".to_string(),
        version: crate::version_string(),
        summarizer_configured: state.analyzer.summarizer().is_configured(),
        classifier: state
            .analyzer
            .classifier()
            .provider_name()
            .map(str::to_string),
    })
}

#[instrument(skip_all)]
async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, BadRequest> {
    let (documents, threshold) = read_form(multipart).await?;

    if let Some(store) = &state.store {
        for doc in &documents {
            if let Err(e) = store.save(doc).await {
                warn!(filename = %doc.filename, error = %e, "failed to persist upload");
            }
        }
    }

    let report = state.analyzer.analyze_batch(documents, threshold).await;
    Ok(Json(report.into()))
}

/// Collect `files` parts and the `threshold` field, rejecting the request if
/// either is missing.
async fn read_form(mut multipart: Multipart) -> Result<(Vec<Document>, f32), BadRequest> {
    let mut documents = Vec::new();
    let mut threshold = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| BadRequest(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "files" => {
                let filename = field.file_name().unwrap_or("document").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| BadRequest(format!("failed to read {filename}: {e}")))?;
                documents.push(Document::new(filename, bytes.to_vec()));
            }
            "threshold" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| BadRequest(format!("failed to read threshold: {e}")))?;
                threshold = Some(parse_threshold(&raw)?);
            }
            _ => {}
        }
    }

    if documents.is_empty() {
        return Err(BadRequest("at least one file is required".to_string()));
    }
    let threshold = threshold.ok_or_else(|| BadRequest("threshold is required".to_string()))?;

    Ok((documents, threshold))
}

fn parse_threshold(raw: &str) -> Result<f32, BadRequest> {
    match raw.trim().parse::<f32>() {
        Ok(t) if t.is_finite() => Ok(t),
        _ => Err(BadRequest(format!("invalid threshold: {raw:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_parses_floats() {
        assert_eq!(parse_threshold("0.6").unwrap(), 0.6);
        assert_eq!(parse_threshold(" 1 ").unwrap(), 1.0);
        assert_eq!(parse_threshold("-0.5").unwrap(), -0.5);
    }

    #[test]
    fn threshold_rejects_garbage() {
        assert!(parse_threshold("").is_err());
        assert!(parse_threshold("high").is_err());
        assert!(parse_threshold("NaN").is_err());
        assert!(parse_threshold("inf").is_err());
    }
}
