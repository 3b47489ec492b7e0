// Configuration loader
// Loads settings from ~/.ideanator/config.toml (or an explicit path), then
// applies IDEANATOR_* environment overrides.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::backend::Backend;
use super::settings::Settings;

/// Load settings: explicit file > `~/.ideanator/config.toml` > defaults,
/// then environment overrides, then validation.
pub fn load_settings(explicit_path: Option<&Path>) -> Result<Settings> {
    let settings = match explicit_path {
        Some(path) => read_settings_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => read_settings_file(&path)?,
            _ => {
                tracing::debug!("No config file found, using defaults");
                Settings::default()
            }
        },
    };

    let settings = apply_env_overrides(settings, |key| std::env::var(key).ok())?;

    settings
        .validate()
        .context("Configuration validation failed")?;

    Ok(settings)
}

/// `~/.ideanator/config.toml`, if a home directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ideanator").join("config.toml"))
}

fn read_settings_file(path: &Path) -> Result<Settings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;

    let settings: Settings = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;

    tracing::debug!(path = %path.display(), "Loaded settings");
    Ok(settings)
}

/// Apply `IDEANATOR_*` overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(mut settings: Settings, lookup: F) -> Result<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(backend) = get("IDEANATOR_BACKEND") {
        settings.backend = backend
            .parse::<Backend>()
            .map_err(|e| anyhow!("IDEANATOR_BACKEND: {e}"))?;
    }
    if let Some(model) = get("IDEANATOR_MODEL") {
        settings.model = Some(model);
    }
    if let Some(url) = get("IDEANATOR_OLLAMA_URL") {
        settings.ollama_url = url;
    }
    if let Some(port) = get("IDEANATOR_MLX_PORT") {
        settings.mlx_port = port
            .trim()
            .parse()
            .with_context(|| format!("IDEANATOR_MLX_PORT is not a port number: '{port}'"))?;
    }
    if let Some(url) = get("IDEANATOR_EXTERNAL_URL") {
        settings.external_url = Some(url);
    }
    if let Some(level) = get("IDEANATOR_LOG_LEVEL") {
        settings.log_level = level.to_ascii_uppercase();
    }

    Ok(settings)
}
