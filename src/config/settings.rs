// Configuration structs

use super::backend::Backend;
use super::constants::{DEFAULT_OUTPUT_FILE, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::errors::IdeanatorError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const LOG_LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// User settings, read from `~/.ideanator/config.toml` and `IDEANATOR_*` env vars.
///
/// Every field has a default so a missing or partial file is fine:
/// ```toml
/// backend = "ollama"
/// ollama_url = "http://gpu-box:11434"
/// model = "qwen2.5:7b"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server flavour to talk to
    pub backend: Backend,

    /// Model override; falls back to the backend preset when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Base URL of a local Ollama daemon (without `/v1`)
    pub ollama_url: String,

    /// Port `mlx_lm.server` listens on
    pub mlx_port: u16,

    /// Full base URL for the `external` backend (including `/v1`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,

    /// Default tracing level when `RUST_LOG` is unset
    pub log_level: String,

    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,

    /// Prompt template override file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompts_path: Option<PathBuf>,

    /// Where batch results are written when `--output` is not given
    pub output_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: Backend::Mlx,
            model: None,
            ollama_url: "http://localhost:11434".to_string(),
            mlx_port: 8080,
            external_url: None,
            log_level: "INFO".to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            prompts_path: None,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

impl Settings {
    /// Validate configuration and return helpful errors
    pub fn validate(&self) -> Result<(), IdeanatorError> {
        check_url("ollama_url", &self.ollama_url)?;
        if let Some(url) = &self.external_url {
            check_url("external_url", url)?;
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_uppercase().as_str()) {
            return Err(IdeanatorError::Configuration(format!(
                "log_level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.log_level
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(IdeanatorError::Configuration(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(model) = &self.model {
            if model.trim().is_empty() {
                return Err(IdeanatorError::Configuration(
                    "model must not be empty when set".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Effective chat-completions base URL for a backend.
    pub fn backend_url(&self, backend: Backend) -> String {
        match backend {
            Backend::Mlx => format!("http://localhost:{}/v1", self.mlx_port),
            Backend::Ollama => format!("{}/v1", self.ollama_url.trim_end_matches('/')),
            Backend::External => self
                .external_url
                .clone()
                .unwrap_or_else(|| backend.preset().default_url.to_string()),
        }
    }

    /// Effective model id for a backend.
    pub fn backend_model(&self, backend: Backend) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| backend.preset().default_model.to_string())
    }
}

fn check_url(field: &str, url: &str) -> Result<(), IdeanatorError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(IdeanatorError::Configuration(format!(
            "{field} must start with http:// or https://, got '{url}'"
        )))
    }
}
