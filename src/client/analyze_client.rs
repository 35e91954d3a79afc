//! [`AnalyzeClient`] submits documents to tonalityd as multipart uploads.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::Deserialize;

use crate::types::{AnalyzeResponse, Document, ServiceHealth};
use crate::{Result, TonalityError};

/// Default tonalityd address.
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8000";

/// HTTP client for a running tonalityd.
#[derive(Clone)]
pub struct AnalyzeClient {
    http: Client,
    base_url: String,
}

impl AnalyzeClient {
    /// Create a client for the server at `base_url`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let client = AnalyzeClient::new("http://127.0.0.1:8000")?;
    /// ```
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        // Batches are processed synchronously server-side; allow for slow
        // summarization across many documents.
        let http = Client::builder()
            .timeout(Duration::from_secs(600))
            .build()
            .map_err(|e| TonalityError::Http(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a batch and wait for every outcome.
    pub async fn analyze(&self, documents: Vec<Document>, threshold: f32) -> Result<AnalyzeResponse> {
        let mut form = Form::new().text("threshold", threshold.to_string());
        for doc in documents {
            form = form.part("files", Part::bytes(doc.content).file_name(doc.filename));
        }

        let response = self
            .http
            .post(format!("{}/analyze", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TonalityError::Http(format!("failed to reach {}: {e}", self.base_url)))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| TonalityError::Http(e.to_string()))
    }

    /// Read files from disk and submit them as one batch.
    pub async fn analyze_paths(&self, paths: &[impl AsRef<Path>], threshold: f32) -> Result<AnalyzeResponse> {
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let content = tokio::fs::read(path).await?;
            let filename = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            documents.push(Document::new(filename, content));
        }
        self.analyze(documents, threshold).await
    }

    /// Query the server's readiness.
    pub async fn health(&self) -> Result<ServiceHealth> {
        let response = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .map_err(|e| TonalityError::Http(format!("failed to reach {}: {e}", self.base_url)))?;

        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| TonalityError::Http(e.to_string()))
    }
}

/// Map non-success responses, keeping the server's `{"error"}` message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .map(|body| body.error)
        .unwrap_or_else(|| format!("tonalityd error: {status}"));

    match status.as_u16() {
        400 | 413 => Err(TonalityError::InvalidInput(message)),
        code => Err(TonalityError::Api {
            status: code,
            message,
        }),
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}
