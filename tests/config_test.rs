// Integration tests for settings files and prompt overrides

use anyhow::Result;
use ideanator::config::{load_settings, Backend};
use ideanator::errors::IdeanatorError;
use ideanator::prompts::PromptSet;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_explicit_config_file_is_loaded() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
backend = "ollama"
model = "qwen2.5:7b"
ollama_url = "http://gpu-box:11434"
request_timeout_secs = 30
"#,
    )?;

    let settings = load_settings(Some(&path))?;
    assert_eq!(settings.backend, Backend::Ollama);
    assert_eq!(settings.backend_url(settings.backend), "http://gpu-box:11434/v1");
    assert_eq!(settings.backend_model(settings.backend), "qwen2.5:7b");
    assert_eq!(settings.request_timeout_secs, 30);
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let dir = TempDir::new()?;

    let malformed = dir.path().join("malformed.toml");
    fs::write(&malformed, "backend = ")?;
    assert!(load_settings(Some(&malformed)).is_err());

    let bad_url = dir.path().join("bad_url.toml");
    fs::write(&bad_url, "ollama_url = \"gpu-box:11434\"\n")?;
    let err = load_settings(Some(&bad_url)).unwrap_err();
    assert!(format!("{err:#}").contains("ollama_url"));

    let missing = dir.path().join("missing.toml");
    assert!(load_settings(Some(&missing)).is_err());
    Ok(())
}

#[test]
fn test_prompt_override_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("prompts.toml");

    let custom =
        ideanator::prompts::DEFAULT_PROMPTS.replace("max_tokens = 800", "max_tokens = 1200");
    fs::write(&path, custom)?;
    let prompts = PromptSet::from_path(&path)?;
    assert_eq!(prompts.stages.validate.max_tokens, 1200);
    assert_eq!(prompts.stages.extract.max_tokens, 1000);

    fs::write(&path, "vagueness = \"only this\"\n")?;
    let err = PromptSet::from_path(&path).unwrap_err();
    assert!(matches!(err, IdeanatorError::PromptLoad(_)));
    Ok(())
}
