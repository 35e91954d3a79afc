//! Service status reported by `GET /health`.

use serde::{Deserialize, Serialize};

/// Readiness of a running analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub version: String,
    /// Whether summaries come from the remote service or pass text through.
    pub summarizer_configured: bool,
    /// Name of the loaded sentiment backend, if any.
    pub classifier: Option<String>,
}

impl ServiceHealth {
    /// A service without a sentiment model fails every document.
    pub fn is_ready(&self) -> bool {
        self.classifier.is_some()
    }
}
