// Refactoring pipeline types: stage outputs and the final refactored idea

use serde::{Deserialize, Serialize};

/// Placeholder for any dimension the extractor found nothing about
pub const NOT_DISCUSSED: &str = "NOT DISCUSSED";

/// Critique text meaning "no issues"
pub const PASS_CRITIQUE: &str = "PASS";

/// Two statements from the conversation that disagree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contradiction {
    /// What the user said first
    pub earlier: String,
    /// What the user said later; preferred when resolving
    pub later: String,
    /// Turn reference, e.g. "anchor vs scope"
    #[serde(default)]
    pub turns: String,
}

/// Stage 1 output: the transcript organized by dimension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedInsights {
    pub problem: String,
    pub audience: String,
    pub solution: String,
    pub differentiation: String,
    pub motivation: String,
    /// The user's exact words
    pub key_phrases: Vec<String>,
    pub contradictions: Vec<Contradiction>,
    /// casual | formal | technical
    pub user_register: String,
    pub unresolved: Vec<String>,
}

impl Default for ExtractedInsights {
    fn default() -> Self {
        Self {
            problem: NOT_DISCUSSED.to_string(),
            audience: NOT_DISCUSSED.to_string(),
            solution: NOT_DISCUSSED.to_string(),
            differentiation: NOT_DISCUSSED.to_string(),
            motivation: NOT_DISCUSSED.to_string(),
            key_phrases: Vec::new(),
            contradictions: Vec::new(),
            user_register: "casual".to_string(),
            unresolved: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaithfulnessResult {
    pub supported_count: u32,
    pub implied_count: u32,
    pub unsupported_count: u32,
    pub unsupported_claims: Vec<String>,
}

/// Whether the four must-have dimensions made it into the statement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletenessResult {
    pub problem: bool,
    pub audience: bool,
    pub solution: bool,
    pub differentiation: bool,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SycophancyResult {
    pub flags: Vec<String>,
    /// none | mild | significant
    pub severity: String,
}

impl Default for SycophancyResult {
    fn default() -> Self {
        Self {
            flags: Vec::new(),
            severity: "none".to_string(),
        }
    }
}

/// Stage 3 output; `confidence` gates the self-refine loop
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationResult {
    pub faithfulness: FaithfulnessResult,
    pub completeness: CompletenessResult,
    pub sycophancy: SycophancyResult,
    /// In [0, 1]
    pub confidence: f64,
    /// What needs fixing, or "PASS"
    pub critique: String,
}

impl ValidationResult {
    pub fn passed(&self) -> bool {
        self.critique.trim() == PASS_CRITIQUE
    }
}

/// How thoroughly the conversation covered one dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplorationLevel {
    WellExplored,
    PartiallyExplored,
    #[default]
    NotExplored,
}

impl ExplorationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ExplorationLevel::WellExplored => "well_explored",
            ExplorationLevel::PartiallyExplored => "partially_explored",
            ExplorationLevel::NotExplored => "not_explored",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExplorationLevel::WellExplored => "✅ Well-explored",
            ExplorationLevel::PartiallyExplored => "⚠️ Partially explored",
            ExplorationLevel::NotExplored => "🔲 Not yet explored",
        }
    }
}

/// Per-dimension exploration, computed from conversation structure only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorationStatus {
    pub problem: ExplorationLevel,
    pub audience: ExplorationLevel,
    pub solution: ExplorationLevel,
    pub differentiation: ExplorationLevel,
    pub motivation: ExplorationLevel,
}

impl ExplorationStatus {
    /// (name, level) pairs in display order
    pub fn entries(&self) -> [(&'static str, ExplorationLevel); 5] {
        [
            ("problem", self.problem),
            ("audience", self.audience),
            ("solution", self.solution),
            ("differentiation", self.differentiation),
            ("motivation", self.motivation),
        ]
    }
}

/// Final output of the refactoring engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefactoredIdea {
    pub one_liner: String,
    pub problem: String,
    pub solution: String,
    pub audience: String,
    pub differentiator: String,
    pub open_questions: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_insights: Option<ExtractedInsights>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploration_status: Option<ExplorationStatus>,
    /// Model-detected contradictions followed by heuristic ones
    pub contradictions: Vec<Contradiction>,
    pub refinement_rounds: usize,
    /// Text of the last synthesis attempt
    pub raw_synthesis: String,
}
