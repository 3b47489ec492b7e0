// Ideanator - develop vague ideas through guided questioning
// Library exports

pub mod arise;
pub mod cli;
pub mod config;
pub mod errors;
pub mod llm;
pub mod prompts;
pub mod refactor;
pub mod storage;

pub use arise::{AriseLoop, IdeaResult, ProgressCallback, ProgressEvent};
pub use errors::{IdeanatorError, IdeanatorResult};
pub use llm::{Completion, CompletionRequest, LlmClient};
pub use prompts::PromptSet;
pub use refactor::{refactor_idea, RefactoredIdea};
