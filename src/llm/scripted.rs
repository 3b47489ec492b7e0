// Scripted client: deterministic test double for `LlmClient`

use async_trait::async_trait;
use std::sync::Mutex;

use super::types::{Completion, CompletionRequest};
use super::LlmClient;

/// Returns queued responses in order (cycling when exhausted) and records
/// every request it receives.
pub struct ScriptedClient {
    responses: Vec<Completion>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedClient {
    /// Build from plain text responses
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_completions(responses.into_iter().map(|s| Completion::Text(s.into())))
    }

    /// Build from completions, allowing scripted failures
    pub fn from_completions<I>(responses: I) -> Self
    where
        I: IntoIterator<Item = Completion>,
    {
        Self {
            responses: responses.into_iter().collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of every request received so far
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn call(&self, request: &CompletionRequest) -> Completion {
        let index = match self.calls.lock() {
            Ok(mut calls) => {
                calls.push(request.clone());
                calls.len() - 1
            }
            Err(_) => return Completion::Failed("scripted client poisoned".to_string()),
        };

        if self.responses.is_empty() {
            return Completion::Failed("scripted client has no responses".to_string());
        }
        self.responses[index % self.responses.len()].clone()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responses_cycle_and_calls_recorded() {
        let client = ScriptedClient::new(["a", "b"]);
        let req = CompletionRequest::new("s", "u");

        assert_eq!(client.call(&req).await.into_text(), "a");
        assert_eq!(client.call(&req).await.into_text(), "b");
        assert_eq!(client.call(&req).await.into_text(), "a");
        assert_eq!(client.call_count(), 3);
        assert_eq!(client.calls()[0].system_prompt, "s");
    }

    #[tokio::test]
    async fn test_empty_script_fails_softly() {
        let client = ScriptedClient::new(Vec::<String>::new());
        let c = client.call(&CompletionRequest::new("s", "u")).await;
        assert!(c.is_failed());
    }
}
