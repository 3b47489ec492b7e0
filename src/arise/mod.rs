// ARISE: Anchor, Reveal, Imagine, Scope
//
// Drives a structured interview that pulls the missing context out of a
// vague idea. A vagueness assessment picks which phases to run; each phase
// asks two questions, collects an answer (human or simulated) and marks its
// dimensions covered. The finished transcript goes to the refactoring engine.

pub mod generic;
pub mod loop_runner;
pub mod parser;
pub mod phases;
pub mod progress;
pub mod types;
pub mod vagueness;

pub use generic::is_generic;
pub use loop_runner::AriseLoop;
pub use parser::{parse_response, strip_reasoning};
pub use phases::{build_phase_prompt, plan};
pub use progress::{
    FnProgress, InputHandle, InputHandoff, ProgressCallback, ProgressEvent, ProgressMessage,
};
pub use types::{
    ConversationTurn, Dimension, DimensionCoverage, GenericFlag, IdeaResult, ParsedResponse, Phase,
    Role, VaguenessAssessment,
};
