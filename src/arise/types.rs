// ARISE types: dimensions, phases, coverage, transcript turns and the per-idea result

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::refactor::types::RefactoredIdea;

/// Marker stored on every generic-question flag
pub const GENERIC_FLAG_MARKER: &str = "GENERIC - could apply to any idea";

/// The six topics an idea should address before it can be refined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    PersonalMotivation,
    TargetAudience,
    CoreProblem,
    SuccessVision,
    ConstraintsRisks,
    Differentiation,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::PersonalMotivation,
        Dimension::TargetAudience,
        Dimension::CoreProblem,
        Dimension::SuccessVision,
        Dimension::ConstraintsRisks,
        Dimension::Differentiation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::PersonalMotivation => "personal_motivation",
            Dimension::TargetAudience => "target_audience",
            Dimension::CoreProblem => "core_problem",
            Dimension::SuccessVision => "success_vision",
            Dimension::ConstraintsRisks => "constraints_risks",
            Dimension::Differentiation => "differentiation",
        }
    }

    /// Phrase used in interviewer prompts ("You still need to learn about ...")
    pub fn label(self) -> &'static str {
        match self {
            Dimension::PersonalMotivation => "their personal motivation and story",
            Dimension::TargetAudience => "who specifically this is for",
            Dimension::CoreProblem => "the specific pain point being solved",
            Dimension::SuccessVision => "what success looks like concretely",
            Dimension::ConstraintsRisks => "potential risks and what could go wrong",
            Dimension::Differentiation => "what makes this different from alternatives",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four ARISE interview phases, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Anchor,
    Reveal,
    Imagine,
    Scope,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Anchor, Phase::Reveal, Phase::Imagine, Phase::Scope];

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Anchor => "anchor",
            Phase::Reveal => "reveal",
            Phase::Imagine => "imagine",
            Phase::Scope => "scope",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Anchor => "Phase 1 - ANCHOR (Personal Reality)",
            Phase::Reveal => "Phase 2 - REVEAL (Deeper Job)",
            Phase::Imagine => "Phase 3 - IMAGINE (Ideal Outcome)",
            Phase::Scope => "Phase 4 - SCOPE (Boundaries & Risks)",
        }
    }

    /// Dimensions marked covered once this phase completes
    pub fn dimensions(self) -> &'static [Dimension] {
        match self {
            Phase::Anchor => &[Dimension::PersonalMotivation, Dimension::TargetAudience],
            Phase::Reveal => &[Dimension::CoreProblem],
            Phase::Imagine => &[Dimension::SuccessVision],
            Phase::Scope => &[Dimension::ConstraintsRisks, Dimension::Differentiation],
        }
    }

    /// What to ask about when no dimension is left uncovered
    pub fn default_need(self) -> &'static str {
        match self {
            Phase::Anchor => "their personal motivation",
            Phase::Reveal => "the deeper problem",
            Phase::Imagine => "their success vision",
            Phase::Scope => "constraints and risks",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which dimensions are known (true) or missing (false) for one idea.
///
/// Always holds exactly one entry per `Dimension`; a fresh value has
/// everything covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionCoverage {
    coverage: BTreeMap<Dimension, bool>,
}

impl Default for DimensionCoverage {
    fn default() -> Self {
        Self {
            coverage: Dimension::ALL.iter().map(|d| (*d, true)).collect(),
        }
    }
}

impl DimensionCoverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_covered(&self, dimension: Dimension) -> bool {
        self.coverage.get(&dimension).copied().unwrap_or(false)
    }

    pub fn covered_count(&self) -> usize {
        self.coverage.values().filter(|v| **v).count()
    }

    /// e.g. "2/6"
    pub fn score_str(&self) -> String {
        format!("{}/{}", self.covered_count(), Dimension::ALL.len())
    }

    /// Prompt labels of missing dimensions, in canonical order
    pub fn uncovered_labels(&self) -> Vec<String> {
        self.coverage
            .iter()
            .filter(|(_, covered)| !**covered)
            .map(|(d, _)| d.label().to_string())
            .collect()
    }

    pub fn mark_missing(&mut self, dimension: Dimension) {
        self.coverage.insert(dimension, false);
    }

    pub fn mark_all_missing(&mut self) {
        for covered in self.coverage.values_mut() {
            *covered = false;
        }
    }

    pub fn mark_covered(&mut self, dimensions: &[Dimension]) {
        for d in dimensions {
            self.coverage.insert(*d, true);
        }
    }

    pub fn as_map(&self) -> &BTreeMap<Dimension, bool> {
        &self.coverage
    }
}

/// Structured decomposition of one interviewer response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedResponse {
    pub reflection: String,
    pub question_1: String,
    pub question_2: String,
    /// Model output exactly as received
    pub raw: String,
    /// Display text: the found parts joined, or the stripped text
    pub clean: String,
}

impl ParsedResponse {
    /// Non-empty questions, question 1 first
    pub fn questions(&self) -> impl Iterator<Item = &str> {
        [self.question_1.as_str(), self.question_2.as_str()]
            .into_iter()
            .filter(|q| !q.is_empty())
    }
}

/// Who produced a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Interviewer,
    User,
    UserSimulated,
}

impl Role {
    /// True for both real and simulated respondents
    pub fn is_user(self) -> bool {
        matches!(self, Role::User | Role::UserSimulated)
    }
}

/// One entry of the append-only transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub phase: Phase,
    pub role: Role,
    pub content: String,
    /// Only set on interviewer turns; never persisted
    #[serde(skip)]
    pub parsed: Option<ParsedResponse>,
}

impl ConversationTurn {
    pub fn interviewer(phase: Phase, parsed: ParsedResponse) -> Self {
        Self {
            phase,
            role: Role::Interviewer,
            content: parsed.clean.clone(),
            parsed: Some(parsed),
        }
    }

    pub fn respondent(phase: Phase, role: Role, content: impl Into<String>) -> Self {
        Self {
            phase,
            role,
            content: content.into(),
            parsed: None,
        }
    }
}

/// A question judged not to reference the idea
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericFlag {
    pub phase: Phase,
    pub question: String,
    pub flag: String,
}

impl GenericFlag {
    pub fn new(phase: Phase, question: impl Into<String>) -> Self {
        Self {
            phase,
            question: question.into(),
            flag: GENERIC_FLAG_MARKER.to_string(),
        }
    }
}

/// Snapshot of the initial vagueness assessment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VaguenessAssessment {
    pub dimensions: BTreeMap<Dimension, bool>,
    pub score: String,
    pub uncovered: Vec<String>,
    pub raw_response: String,
}

impl VaguenessAssessment {
    pub fn from_coverage(coverage: &DimensionCoverage, raw_response: impl Into<String>) -> Self {
        Self {
            dimensions: coverage.as_map().clone(),
            score: coverage.score_str(),
            uncovered: coverage.uncovered_labels(),
            raw_response: raw_response.into(),
        }
    }
}

/// Everything produced for one idea; the unit persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaResult {
    pub original_idea: String,
    pub timestamp: DateTime<Utc>,
    pub vagueness_assessment: VaguenessAssessment,
    pub phases_executed: Vec<Phase>,
    pub conversation: Vec<ConversationTurn>,
    pub generic_flags: Vec<GenericFlag>,
    /// Legacy single-shot synthesis text
    pub synthesis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refactored: Option<RefactoredIdea>,
    /// Set when the run stopped early on a cancellation signal
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cancelled: bool,
}

impl IdeaResult {
    pub fn new(original_idea: impl Into<String>, vagueness_assessment: VaguenessAssessment) -> Self {
        Self {
            original_idea: original_idea.into(),
            timestamp: Utc::now(),
            vagueness_assessment,
            phases_executed: Vec::new(),
            conversation: Vec::new(),
            generic_flags: Vec::new(),
            synthesis: String::new(),
            refactored: None,
            cancelled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_coverage_is_complete() {
        let cov = DimensionCoverage::new();
        for d in Dimension::ALL {
            assert!(cov.is_covered(d));
        }
        assert_eq!(cov.covered_count(), 6);
        assert_eq!(cov.score_str(), "6/6");
        assert!(cov.uncovered_labels().is_empty());
    }

    #[test]
    fn test_mark_missing_and_covered() {
        let mut cov = DimensionCoverage::new();
        cov.mark_all_missing();
        assert_eq!(cov.score_str(), "0/6");
        assert_eq!(cov.uncovered_labels().len(), 6);

        cov.mark_covered(Phase::Anchor.dimensions());
        assert_eq!(cov.covered_count(), 2);
        assert_eq!(
            cov.uncovered_labels()[0],
            "the specific pain point being solved"
        );
        assert_eq!(cov.as_map().len(), 6);
    }

    #[test]
    fn test_every_dimension_belongs_to_exactly_one_phase() {
        for d in Dimension::ALL {
            let owners = Phase::ALL
                .iter()
                .filter(|p| p.dimensions().contains(&d))
                .count();
            assert_eq!(owners, 1, "{d} should map to one phase");
        }
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(
            serde_json::to_string(&Role::UserSimulated).unwrap(),
            "\"user_simulated\""
        );
        assert_eq!(serde_json::to_string(&Phase::Imagine).unwrap(), "\"imagine\"");
        assert_eq!(
            serde_json::to_string(&Dimension::ConstraintsRisks).unwrap(),
            "\"constraints_risks\""
        );
    }

    #[test]
    fn test_conversation_turn_omits_parsed() {
        let parsed = ParsedResponse {
            reflection: "r".into(),
            clean: "r".into(),
            ..Default::default()
        };
        let turn = ConversationTurn::interviewer(Phase::Anchor, parsed);
        let json = serde_json::to_value(&turn).unwrap();
        assert_eq!(json["role"], "interviewer");
        assert_eq!(json["content"], "r");
        assert!(json.get("parsed").is_none());
    }

    #[test]
    fn test_idea_result_shape() {
        let mut cov = DimensionCoverage::new();
        cov.mark_missing(Dimension::CoreProblem);
        let assessment = VaguenessAssessment::from_coverage(&cov, "CORE_PROBLEM");
        let result = IdeaResult::new("idea", assessment);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["vagueness_assessment"]["score"], "5/6");
        assert_eq!(
            json["vagueness_assessment"]["dimensions"]["core_problem"],
            false
        );
        assert!(json.get("refactored").is_none());
        assert!(json.get("cancelled").is_none());
        assert!(json["timestamp"].as_str().unwrap().contains('T'));
    }

    #[test]
    fn test_parsed_questions_skip_empty() {
        let parsed = ParsedResponse {
            question_2: "Why?".into(),
            ..Default::default()
        };
        assert_eq!(parsed.questions().collect::<Vec<_>>(), vec!["Why?"]);
    }
}
