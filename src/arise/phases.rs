// Phase planning and per-phase interviewer prompts

use rand::seq::SliceRandom;
use rand::Rng;

use super::types::{Dimension, DimensionCoverage, Phase};
use crate::prompts::{fill, FewShotExample, PromptSet};

/// Most missing-dimension labels named in one interviewer prompt
const MAX_STILL_NEED: usize = 3;

/// Decide which phases to run for the given coverage.
///
/// Anchor and Scope always run. Reveal runs when the core problem or the
/// audience is missing; Imagine runs when the success vision is missing.
pub fn plan(coverage: &DimensionCoverage) -> Vec<Phase> {
    let mut phases = vec![Phase::Anchor];

    if !coverage.is_covered(Dimension::CoreProblem) || !coverage.is_covered(Dimension::TargetAudience)
    {
        phases.push(Phase::Reveal);
    }
    if !coverage.is_covered(Dimension::SuccessVision) {
        phases.push(Phase::Imagine);
    }

    phases.push(Phase::Scope);
    phases
}

/// Pick one few-shot example for the phase
pub fn choose_example<'a, R: Rng + ?Sized>(
    prompts: &'a PromptSet,
    phase: Phase,
    rng: &mut R,
) -> Option<&'a FewShotExample> {
    prompts.examples_for(phase).choose(rng)
}

/// What the interviewer still needs: up to three uncovered labels, or the
/// phase's default focus when nothing is uncovered.
pub fn still_need(phase: Phase, uncovered: &[String]) -> String {
    if uncovered.is_empty() {
        phase.default_need().to_string()
    } else {
        uncovered
            .iter()
            .take(MAX_STILL_NEED)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Build the system prompt for one phase with a randomly chosen example.
pub fn build_phase_prompt(
    prompts: &PromptSet,
    phase: Phase,
    conversation: &str,
    uncovered: &[String],
) -> String {
    let example = choose_example(prompts, phase, &mut rand::thread_rng()).cloned();
    build_phase_prompt_with(prompts, phase, conversation, uncovered, example.as_ref())
}

/// Build the system prompt for one phase with a fixed example.
pub fn build_phase_prompt_with(
    prompts: &PromptSet,
    phase: Phase,
    conversation: &str,
    uncovered: &[String],
    example: Option<&FewShotExample>,
) -> String {
    let need = still_need(phase, uncovered);
    let (example_user, example_response) = example
        .map(|ex| (ex.user.as_str(), ex.response.as_str()))
        .unwrap_or(("", ""));

    fill(
        prompts.phase_template(phase),
        &[
            ("still_need", need.as_str()),
            ("example_user", example_user),
            ("example_response", example_response),
            ("conversation", conversation),
        ],
    )
}
