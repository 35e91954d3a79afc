//! Configuration loading for tonalityd.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag; must exist)
//! 2. `~/.tonality/config.toml` (user)
//! 3. `/etc/tonality/config.toml` (system)
//!
//! When no file is found the defaults are used: the daemon starts, and a
//! missing credential only degrades summarization.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.tonality/secrets.toml` (user, must be 0600)
//! 2. `/etc/tonality/secrets.toml` (system, must be 0600)

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::SummarizeOptions;
use crate::{Result, TonalityBuilder, TonalityError};

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub summarizer: SummarizerConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8000).
    #[serde(default = "default_address")]
    pub address: String,
    /// Directory for raw uploads. Uploads are not persisted when unset.
    #[serde(default)]
    pub upload_dir: Option<PathBuf>,
    /// Maximum request body size in megabytes (default: 64).
    #[serde(default = "default_max_body_mb")]
    pub max_body_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            upload_dir: None,
            max_body_mb: default_max_body_mb(),
        }
    }
}

impl ServerConfig {
    /// Request body limit in bytes, saturating on oversized values.
    pub fn body_limit_bytes(&self) -> usize {
        self.max_body_mb.saturating_mul(1024 * 1024)
    }
}

fn default_address() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_max_body_mb() -> usize {
    64
}

/// Batch processing settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Documents processed concurrently per batch (default: 1).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Timeout for one summarization call in seconds (default: 60).
    #[serde(default = "default_summarize_timeout")]
    pub summarize_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            summarize_timeout_secs: default_summarize_timeout(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

fn default_summarize_timeout() -> u64 {
    60
}

/// Summarization service settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummarizerConfig {
    /// Override the service base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Request options (length, format, extractiveness, temperature).
    #[serde(flatten)]
    pub options: SummarizeOptions,
}

/// Which sentiment backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// ONNX Runtime (requires the `local-inference` feature).
    #[default]
    Local,
    /// HuggingFace Inference API.
    Huggingface,
    /// No classifier; every document fails classification.
    None,
}

/// Sentiment classifier settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub backend: ClassifierBackend,
    /// HuggingFace model ID for the `huggingface` backend.
    #[serde(default)]
    pub model: Option<String>,
    /// Custom ONNX model for the `local` backend (with `tokenizer_path`).
    #[serde(default)]
    pub model_path: Option<PathBuf>,
    #[serde(default)]
    pub tokenizer_path: Option<PathBuf>,
    /// Device to use: "cpu" or "cuda" (default: "cpu").
    #[serde(default = "default_device")]
    pub device: String,
    /// Directory for model downloads.
    #[serde(default)]
    pub models_dir: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::default(),
            model: None,
            model_path: None,
            tokenizer_path: None,
            device: default_device(),
            models_dir: None,
        }
    }
}

fn default_device() -> String {
    "cpu".to_string()
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub cohere: Option<ApiKeySecret>,
    #[serde(default)]
    pub huggingface: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Provider name → environment variable name mapping.
const PROVIDER_ENV_VARS: &[(&str, &str)] = &[
    ("cohere", "COHERE_API_KEY"),
    ("huggingface", "HF_API_KEY"),
];

impl Config {
    /// Load configuration from the standard locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a configuration file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TonalityError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            TonalityError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path; `None` when no file exists.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(TonalityError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".tonality").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        let system_config = PathBuf::from("/etc/tonality/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Translate the configuration into an analyzer builder.
    pub fn builder(&self, secrets: &Secrets) -> Result<TonalityBuilder> {
        let mut builder = crate::Tonality::builder()
            .concurrency(self.pipeline.concurrency)
            .summarize_timeout(Duration::from_secs(self.pipeline.summarize_timeout_secs))
            .summarize_options(self.summarizer.options.clone());

        if let Some(key) = secrets.api_key("cohere") {
            builder = builder.cohere(key);
        }
        if let Some(ref url) = self.summarizer.base_url {
            builder = builder.cohere_base_url(url);
        }

        match self.classifier.backend {
            ClassifierBackend::None => {}
            ClassifierBackend::Local => {
                builder = self.configure_local(builder, secrets)?;
                // API fallback when the local model cannot load.
                builder = self.configure_huggingface(builder, secrets);
            }
            ClassifierBackend::Huggingface => {
                builder = self.configure_huggingface(builder, secrets);
            }
        }

        Ok(builder)
    }

    #[cfg(feature = "local-inference")]
    fn configure_local(&self, mut builder: TonalityBuilder, _secrets: &Secrets) -> Result<TonalityBuilder> {
        use crate::model::Device;
        use crate::providers::LocalSentimentModel;

        let device: Device = self.classifier.device.parse()?;
        builder = builder.device(device);

        if let Some(ref dir) = self.classifier.models_dir {
            builder = builder.cache_dir(dir.clone());
        }

        let model = match (&self.classifier.model_path, &self.classifier.tokenizer_path) {
            (Some(model_path), Some(tokenizer_path)) => LocalSentimentModel::Custom {
                model_path: model_path.clone(),
                tokenizer_path: tokenizer_path.clone(),
            },
            (None, None) => LocalSentimentModel::DistilBertSst2,
            _ => {
                return Err(TonalityError::Configuration(
                    "classifier.model_path and classifier.tokenizer_path must be set together"
                        .to_string(),
                ));
            }
        };
        Ok(builder.local_sentiment(model))
    }

    #[cfg(not(feature = "local-inference"))]
    fn configure_local(&self, builder: TonalityBuilder, secrets: &Secrets) -> Result<TonalityBuilder> {
        let has_api_key = cfg!(feature = "huggingface") && secrets.api_key("huggingface").is_some();
        tracing::warn!("{}", local_backend_hint(has_api_key));
        Ok(builder)
    }

    #[cfg(feature = "huggingface")]
    fn configure_huggingface(&self, mut builder: TonalityBuilder, secrets: &Secrets) -> TonalityBuilder {
        if let Some(key) = secrets.api_key("huggingface") {
            builder = builder.huggingface(key);
            if let Some(ref model) = self.classifier.model {
                builder = builder.huggingface_model(model);
            }
        }
        builder
    }

    #[cfg(not(feature = "huggingface"))]
    fn configure_huggingface(&self, builder: TonalityBuilder, _secrets: &Secrets) -> TonalityBuilder {
        builder
    }
}

/// Startup warning for `backend = "local"` in a build without local inference.
#[cfg_attr(feature = "local-inference", allow(dead_code))]
fn local_backend_hint(has_api_key: bool) -> &'static str {
    if has_api_key {
        "built without the `local-inference` feature; classifying sentiment through the HuggingFace API"
    } else {
        "built without the `local-inference` feature and no HuggingFace key is set \
         (secrets.toml [huggingface] or HF_API_KEY); every document will fail with \
         \"pipeline not loaded\". Rebuild with `--features local-inference` or configure a key"
    }
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Returns empty secrets if no file exists (providers may use env vars).
    pub fn load() -> Result<Self> {
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".tonality").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        let system_secrets = PathBuf::from("/etc/tonality/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load a secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            TonalityError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            TonalityError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            TonalityError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(TonalityError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// Get API key for a provider, falling back to the corresponding environment variable.
    pub fn api_key(&self, provider: &str) -> Option<String> {
        let from_file = match provider {
            "cohere" => self.cohere.as_ref(),
            "huggingface" => self.huggingface.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone());

        from_file.or_else(|| {
            PROVIDER_ENV_VARS
                .iter()
                .find(|(name, _)| *name == provider)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SummaryFormat, SummaryLength};

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1:8000");
        assert_eq!(config.server.max_body_mb, 64);
        assert!(config.server.upload_dir.is_none());
        assert_eq!(config.pipeline.concurrency, 1);
        assert_eq!(config.pipeline.summarize_timeout_secs, 60);
        assert_eq!(config.classifier.backend, ClassifierBackend::Local);
        assert_eq!(config.summarizer.options, SummarizeOptions::default());
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8000"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8000");
        assert_eq!(config.server.max_body_mb, 64);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:9000"
            upload_dir = "/var/lib/tonality/uploads"
            max_body_mb = 16

            [pipeline]
            concurrency = 4
            summarize_timeout_secs = 15

            [summarizer]
            base_url = "http://localhost:4000"
            length = "medium"
            format = "bullets"
            temperature = 0.1

            [classifier]
            backend = "huggingface"
            model = "siebert/sentiment-roberta-large-english"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.server.upload_dir,
            Some(PathBuf::from("/var/lib/tonality/uploads"))
        );
        assert_eq!(config.pipeline.concurrency, 4);
        assert_eq!(config.pipeline.summarize_timeout_secs, 15);
        assert_eq!(
            config.summarizer.base_url.as_deref(),
            Some("http://localhost:4000")
        );
        assert_eq!(config.summarizer.options.length, SummaryLength::Medium);
        assert_eq!(config.summarizer.options.format, SummaryFormat::Bullets);
        assert!((config.summarizer.options.temperature - 0.1).abs() < 1e-6);
        assert_eq!(config.classifier.backend, ClassifierBackend::Huggingface);
    }

    #[test]
    fn local_backend_hint_names_the_fix() {
        let hint = local_backend_hint(false);
        assert!(hint.contains("local-inference"));
        assert!(hint.contains("HF_API_KEY"));
        assert!(hint.contains("pipeline not loaded"));

        assert!(local_backend_hint(true).contains("HuggingFace API"));
    }

    #[test]
    fn body_limit_saturates() {
        let mut server = ServerConfig::default();
        assert_eq!(server.body_limit_bytes(), 64 * 1024 * 1024);

        server.max_body_mb = usize::MAX;
        assert_eq!(server.body_limit_bytes(), usize::MAX);
    }

    #[test]
    fn parse_secrets() {
        let toml = r#"
            [cohere]
            api_key = "co-test-key"
        "#;
        let secrets: Secrets = toml::from_str(toml).unwrap();
        assert_eq!(secrets.cohere.as_ref().unwrap().api_key, "co-test-key");
        assert!(secrets.huggingface.is_none());
    }

    #[test]
    fn api_key_from_secrets() {
        let secrets = Secrets {
            cohere: Some(ApiKeySecret {
                api_key: "from-file".to_string(),
            }),
            ..Default::default()
        };
        assert_eq!(secrets.api_key("cohere"), Some("from-file".to_string()));
        assert_eq!(secrets.api_key("nonexistent"), None);
    }

    #[test]
    fn explicit_config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn config_loads_from_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[pipeline]\nconcurrency = 3\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.pipeline.concurrency, 3);
    }

    #[cfg(unix)]
    #[test]
    fn world_readable_secrets_are_rejected() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        fs::write(&path, "[cohere]\napi_key = \"k\"\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let err = Secrets::load_from_file(&path).unwrap_err().to_string();
        assert!(err.contains("insecure permissions"));

        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();
        let secrets = Secrets::load_from_file(&path).unwrap();
        assert_eq!(secrets.api_key("cohere"), Some("k".to_string()));
    }

    #[test]
    fn backend_none_leaves_classifier_unavailable() {
        let config: Config = toml::from_str("[classifier]\nbackend = \"none\"\n").unwrap();
        let analyzer = config.builder(&Secrets::default()).unwrap().build();
        assert!(!analyzer.classifier().is_available());
    }

    #[cfg(feature = "huggingface")]
    #[test]
    fn huggingface_backend_uses_secret_key() {
        let config: Config = toml::from_str("[classifier]\nbackend = \"huggingface\"\n").unwrap();
        let secrets = Secrets {
            huggingface: Some(ApiKeySecret {
                api_key: "hf-key".to_string(),
            }),
            ..Default::default()
        };
        let analyzer = config.builder(&secrets).unwrap().build();
        assert_eq!(analyzer.classifier().provider_name(), Some("huggingface"));
    }
}
