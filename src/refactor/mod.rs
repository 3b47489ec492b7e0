// Refactoring engine
//
// Compresses a finished ARISE interview into a structured idea statement:
// Extract (once) → Synthesize ↔ Validate (bounded self-refine), plus
// programmatic exploration and contradiction analysis over the transcript.

pub mod analysis;
pub mod engine;
pub mod json;
pub mod output;
pub mod types;

pub use analysis::{compute_exploration_status, detect_contradictions};
pub use engine::{refactor_idea, RefactorEngine};
pub use output::{format_exploration_status, format_refactored, parse_synthesis};
pub use types::{
    CompletenessResult, Contradiction, ExplorationLevel, ExplorationStatus, ExtractedInsights,
    FaithfulnessResult, RefactoredIdea, SycophancyResult, ValidationResult,
};
