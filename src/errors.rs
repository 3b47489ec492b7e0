// Typed errors for the ideanator library
//
// The interview engine itself never fails on model trouble (see
// `llm::Completion`); these errors cover the surrounding plumbing:
// configuration, prompt templates, batch input and result files.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdeanatorError {
    /// Configuration loading or validation failed
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Caller-supplied input was malformed (batch file, empty idea, ...)
    #[error("invalid input: {0}")]
    Validation(String),

    /// Prompt template file missing, unreadable, or incomplete
    #[error("failed to load prompts: {0}")]
    PromptLoad(String),

    /// Model server unreachable or misbehaving
    #[error("server error: {0}")]
    Server(String),

    /// A structured payload could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type IdeanatorResult<T> = std::result::Result<T, IdeanatorError>;

/// Message shown when a batch file does not have the expected shape.
pub fn batch_shape_error(path: &str) -> IdeanatorError {
    IdeanatorError::Validation(format!(
        "expected {{\"ideas\": [{{\"content\": \"...\"}}]}} in '{path}'"
    ))
}
