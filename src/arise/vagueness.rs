// Inverted vagueness assessment
//
// Asks the model which dimensions are MISSING rather than which are present:
// small models say yes to "does this have X?" but will list absences.

use super::types::{Dimension, DimensionCoverage};
use crate::config::constants::{TEMPERATURES, TOKENS, VAGUENESS_WORD_THRESHOLD};
use crate::llm::{Completion, CompletionRequest, LlmClient};

/// Run the assessment call and score its output.
///
/// Returns the coverage together with the completion so the caller can
/// surface a failed call; a failed call scores like any other text.
pub async fn assess(
    client: &dyn LlmClient,
    vagueness_prompt: &str,
    idea: &str,
) -> (DimensionCoverage, Completion) {
    let request = CompletionRequest::new(vagueness_prompt, idea)
        .with_temperature(TEMPERATURES.decision)
        .with_max_tokens(TOKENS.decision);

    let completion = client.call(&request).await;
    let raw = completion.clone().into_text();
    (score_response(&raw, idea), completion)
}

/// Turn the model's list of missing dimensions into coverage.
///
/// A dimension is missing when its name appears anywhere in the response.
/// A "NONE" claim on an idea under the word threshold marks everything
/// missing, overriding the per-name matches.
pub fn score_response(raw: &str, idea: &str) -> DimensionCoverage {
    let mut coverage = DimensionCoverage::new();
    let raw_upper = raw.to_uppercase();

    for dimension in Dimension::ALL {
        if raw_upper.contains(&dimension.as_str().to_uppercase()) {
            coverage.mark_missing(dimension);
        }
    }

    let word_count = idea.split_whitespace().count();
    if raw_upper.contains("NONE") && word_count < VAGUENESS_WORD_THRESHOLD {
        tracing::debug!(
            word_count,
            threshold = VAGUENESS_WORD_THRESHOLD,
            "Safety net: NONE claimed for a short idea, marking all dimensions missing"
        );
        coverage.mark_all_missing();
    }

    tracing::debug!(score = %coverage.score_str(), "Vagueness scored");
    coverage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedClient;

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_named_dimensions_are_missing() {
        let cov = score_response("CORE_PROBLEM\nsuccess_vision", &words(30));
        assert!(!cov.is_covered(Dimension::CoreProblem));
        assert!(!cov.is_covered(Dimension::SuccessVision));
        assert!(cov.is_covered(Dimension::TargetAudience));
        assert_eq!(cov.score_str(), "4/6");
    }

    #[test]
    fn test_none_on_short_idea_marks_everything_missing() {
        let cov = score_response("NONE", "I want to build a language learning app.");
        assert_eq!(cov.covered_count(), 0);
    }

    #[test]
    fn test_none_at_threshold_is_trusted() {
        let cov = score_response("NONE", &words(VAGUENESS_WORD_THRESHOLD));
        assert_eq!(cov.covered_count(), 6);

        let cov = score_response("NONE", &words(VAGUENESS_WORD_THRESHOLD - 1));
        assert_eq!(cov.covered_count(), 0);
    }

    #[test]
    fn test_safety_net_overrides_name_matches() {
        let cov = score_response("CORE_PROBLEM or NONE", "short idea");
        assert_eq!(cov.covered_count(), 0);
    }

    #[tokio::test]
    async fn test_assess_uses_decision_settings() {
        let client = ScriptedClient::new(["TARGET_AUDIENCE"]);
        let (cov, completion) = assess(&client, "prompt", "An idea").await;

        assert!(!cov.is_covered(Dimension::TargetAudience));
        assert!(!completion.is_failed());

        let call = &client.calls()[0];
        assert_eq!(call.user_message, "An idea");
        assert_eq!(call.temperature, TEMPERATURES.decision);
        assert_eq!(call.max_tokens, TOKENS.decision);
    }

    #[tokio::test]
    async fn test_failed_call_keeps_full_coverage() {
        let client = ScriptedClient::from_completions([Completion::Failed("timeout".into())]);
        let (cov, completion) = assess(&client, "prompt", &words(30)).await;
        assert!(completion.is_failed());
        assert_eq!(cov.covered_count(), 6);
    }
}
