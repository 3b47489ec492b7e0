// Model-server backends and their defaults

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::IdeanatorError;

/// Which kind of OpenAI-compatible server the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// `mlx_lm.server` on Apple silicon
    #[default]
    Mlx,
    /// Ollama's OpenAI-compatible endpoint
    Ollama,
    /// Any other server the user already runs
    External,
}

/// Immutable defaults for one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendPreset {
    pub default_model: &'static str,
    pub default_url: &'static str,
    /// Whether the backend normally runs as a local server process
    pub needs_server: bool,
}

const MLX_PRESET: BackendPreset = BackendPreset {
    default_model: "mlx-community/Llama-3.2-3B-Instruct-4bit",
    default_url: "http://localhost:8080/v1",
    needs_server: true,
};

const OLLAMA_PRESET: BackendPreset = BackendPreset {
    default_model: "llama3.2:3b",
    default_url: "http://localhost:11434/v1",
    needs_server: true,
};

const EXTERNAL_PRESET: BackendPreset = BackendPreset {
    default_model: "default",
    default_url: "http://localhost:8000/v1",
    needs_server: false,
};

impl Backend {
    pub const ALL: [Backend; 3] = [Backend::Mlx, Backend::Ollama, Backend::External];

    pub fn preset(self) -> &'static BackendPreset {
        match self {
            Backend::Mlx => &MLX_PRESET,
            Backend::Ollama => &OLLAMA_PRESET,
            Backend::External => &EXTERNAL_PRESET,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Backend::Mlx => "mlx",
            Backend::Ollama => "ollama",
            Backend::External => "external",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = IdeanatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mlx" => Ok(Backend::Mlx),
            "ollama" => Ok(Backend::Ollama),
            "external" => Ok(Backend::External),
            other => Err(IdeanatorError::Parse(format!(
                "unknown backend '{other}' (expected mlx, ollama or external)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_string() {
        assert_eq!("mlx".parse::<Backend>().unwrap(), Backend::Mlx);
        assert_eq!("Ollama".parse::<Backend>().unwrap(), Backend::Ollama);
        assert_eq!("external".parse::<Backend>().unwrap(), Backend::External);
        assert!(matches!(
            "vllm".parse::<Backend>(),
            Err(IdeanatorError::Parse(_))
        ));
    }

    #[test]
    fn test_presets() {
        assert!(Backend::Mlx.preset().default_model.contains("mlx-community"));
        assert!(Backend::Mlx.preset().default_url.contains("8080"));
        assert!(Backend::Ollama.preset().default_model.contains("llama3.2"));
        assert!(Backend::Ollama.preset().default_url.contains("11434"));
        assert!(!Backend::External.preset().needs_server);
    }

    #[test]
    fn test_all_backends_have_presets() {
        for backend in Backend::ALL {
            let preset = backend.preset();
            assert!(!preset.default_model.is_empty());
            assert!(!preset.default_url.is_empty());
        }
    }
}
