// Request/response types at the model-client boundary

use serde::Serialize;

/// One model call: a system prompt, a single user message and sampling knobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_message: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request with neutral defaults (temperature 0.6, 300 tokens)
    pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
            temperature: 0.6,
            max_tokens: 300,
        }
    }

    /// Set temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Outcome of a model call.
///
/// Clients never propagate ordinary failures (timeouts, HTTP errors, bad
/// payloads) as `Err`; they report them as `Failed` so the interview keeps
/// going with degraded output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Text(String),
    Failed(String),
}

impl Completion {
    pub fn is_failed(&self) -> bool {
        matches!(self, Completion::Failed(_))
    }

    /// Failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Completion::Failed(msg) => Some(msg),
            Completion::Text(_) => None,
        }
    }

    /// Text to feed downstream parsers.
    ///
    /// Failures render as `[ERROR: ...]` so they stay visible in transcripts
    /// and parse into empty structured output.
    pub fn into_text(self) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::Failed(msg) => format!("[ERROR: {msg}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = CompletionRequest::new("sys", "user")
            .with_temperature(0.2)
            .with_max_tokens(800);
        assert_eq!(req.system_prompt, "sys");
        assert_eq!(req.user_message, "user");
        assert!((req.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, 800);
    }

    #[test]
    fn test_failed_completion_renders_sentinel() {
        let c = Completion::Failed("connection refused".to_string());
        assert!(c.is_failed());
        assert_eq!(c.error(), Some("connection refused"));
        assert_eq!(c.into_text(), "[ERROR: connection refused]");
    }

    #[test]
    fn test_text_completion_passes_through() {
        let c = Completion::Text("hello".to_string());
        assert!(!c.is_failed());
        assert_eq!(c.into_text(), "hello");
    }
}
