// Model client abstraction
//
// The interview and refactoring engines only ever need one capability:
// send a system prompt plus one user message, get text back. Concrete
// clients (the OpenAI-compatible HTTP client, the scripted test double)
// implement `LlmClient`.

use async_trait::async_trait;

pub mod openai;
pub mod scripted;
pub mod types;

pub use openai::OpenAiCompatClient;
pub use scripted::ScriptedClient;
pub use types::{Completion, CompletionRequest};

/// Trait for chat-completion clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Perform one completion.
    ///
    /// Must not fail for ordinary transport or API problems: those are
    /// reported as `Completion::Failed`.
    async fn call(&self, request: &CompletionRequest) -> Completion;

    /// Client name for logging (e.g. "mlx", "ollama", "scripted")
    fn name(&self) -> &str;
}
