// Three-stage refactoring engine: Extract → Synthesize → Validate
//
// Extract runs once. Synthesize and Validate then alternate while the
// validator's confidence stays below the threshold, up to a fixed number of
// refine rounds; after that the last synthesis is accepted as is.

use super::analysis::{compute_exploration_status, detect_contradictions};
use super::json::{parse_extraction, parse_validation};
use super::output::parse_synthesis;
use super::types::{ExtractedInsights, RefactoredIdea, ValidationResult};
use crate::arise::progress::{ProgressCallback, ProgressEvent};
use crate::arise::types::{ConversationTurn, Phase};
use crate::config::constants::{CONFIDENCE_THRESHOLD, MAX_REFINE_ROUNDS};
use crate::llm::{Completion, CompletionRequest, LlmClient};
use crate::prompts::{fill, StagePrompt, StagePrompts};

/// Runs the refactoring stages against one client and template set
pub struct RefactorEngine<'a> {
    client: &'a dyn LlmClient,
    stages: &'a StagePrompts,
    callback: Option<&'a dyn ProgressCallback>,
}

impl<'a> RefactorEngine<'a> {
    pub fn new(client: &'a dyn LlmClient, stages: &'a StagePrompts) -> Self {
        Self {
            client,
            stages,
            callback: None,
        }
    }

    pub fn with_callback(mut self, callback: Option<&'a dyn ProgressCallback>) -> Self {
        self.callback = callback;
        self
    }

    /// Turn a finished interview into a validated, structured idea.
    pub async fn refactor(
        &self,
        transcript: &str,
        conversation: &[ConversationTurn],
        phases_executed: &[Phase],
    ) -> RefactoredIdea {
        self.status("Stage 1: Extracting structured insights...").await;
        let insights = self.extract(transcript).await;
        self.status(&format!(
            "Extracted {} key phrases, {} contradictions",
            insights.key_phrases.len(),
            insights.contradictions.len()
        ))
        .await;

        self.status("Stage 2: Synthesizing refined statement...").await;
        let mut synthesis = self.synthesize(&insights, transcript, None).await;

        self.status("Stage 3: Validating faithfulness and completeness...").await;
        let mut validation = self.validate(&synthesis, transcript).await;

        let mut rounds = 0;
        while validation.confidence < CONFIDENCE_THRESHOLD && rounds < MAX_REFINE_ROUNDS {
            rounds += 1;
            tracing::debug!(round = rounds, confidence = validation.confidence, "Self-refine");
            self.status(&format!(
                "Self-refine round {rounds}: confidence {:.2} < {CONFIDENCE_THRESHOLD}, revising...",
                validation.confidence
            ))
            .await;

            synthesis = self
                .synthesize(&insights, transcript, Some(&validation.critique))
                .await;
            validation = self.validate(&synthesis, transcript).await;
        }

        if validation.confidence >= CONFIDENCE_THRESHOLD {
            self.status(&format!(
                "Validation passed (confidence: {:.2})",
                validation.confidence
            ))
            .await;
        } else {
            self.status(&format!(
                "Accepted after {rounds} rounds (confidence: {:.2})",
                validation.confidence
            ))
            .await;
        }

        let mut idea = parse_synthesis(&synthesis);
        idea.exploration_status = Some(compute_exploration_status(conversation, phases_executed));
        idea.contradictions = insights
            .contradictions
            .iter()
            .cloned()
            .chain(detect_contradictions(conversation))
            .collect();
        idea.extracted_insights = Some(insights);
        idea.validation = Some(validation);
        idea.refinement_rounds = rounds;
        idea.raw_synthesis = synthesis;
        idea
    }

    /// Stage 1: organize the transcript into per-dimension insights
    pub async fn extract(&self, transcript: &str) -> ExtractedInsights {
        let stage = &self.stages.extract;
        let user = fill(&stage.user_template, &[("transcript", transcript)]);
        let raw = self.call_stage("extract", stage, &stage.system_prompt, &user).await;
        parse_extraction(&raw)
    }

    /// Stage 2: write the idea statement, addressing a prior critique if given
    pub async fn synthesize(
        &self,
        insights: &ExtractedInsights,
        transcript: &str,
        critique: Option<&str>,
    ) -> String {
        let stage = &self.stages.synthesize;
        let mut system = fill(
            &stage.system_prompt,
            &[("banned_words", stage.banned_words().as_str())],
        );
        if let Some(critique) = critique.filter(|c| !c.is_empty()) {
            system.push_str(&format!(
                "\n\nPREVIOUS ATTEMPT CRITIQUE - address these issues:\n{critique}\n\
                 Fix the specific problems identified above while preserving what was good."
            ));
        }

        let insights_json = serde_json::to_string_pretty(insights).unwrap_or_default();
        let user = fill(
            &stage.user_template,
            &[("insights", insights_json.as_str()), ("transcript", transcript)],
        );
        self.call_stage("synthesize", stage, &system, &user).await
    }

    /// Stage 3: check faithfulness, completeness and sycophancy
    pub async fn validate(&self, statement: &str, transcript: &str) -> ValidationResult {
        let stage = &self.stages.validate;
        let user = fill(
            &stage.user_template,
            &[("statement", statement), ("transcript", transcript)],
        );
        let raw = self.call_stage("validate", stage, &stage.system_prompt, &user).await;
        parse_validation(&raw)
    }

    async fn call_stage(&self, name: &str, stage: &StagePrompt, system: &str, user: &str) -> String {
        let request = CompletionRequest::new(system, user)
            .with_temperature(stage.temperature)
            .with_max_tokens(stage.max_tokens);

        let completion = self.client.call(&request).await;
        if let Completion::Failed(message) = &completion {
            self.status(&format!("Warning: {name} call failed: {message}"))
                .await;
        }
        completion.into_text()
    }

    async fn status(&self, message: &str) {
        if let Some(callback) = self.callback {
            callback.on_event(ProgressEvent::Status, message).await;
        }
    }
}

/// Convenience wrapper running the full pipeline once
pub async fn refactor_idea(
    client: &dyn LlmClient,
    stages: &StagePrompts,
    transcript: &str,
    conversation: &[ConversationTurn],
    phases_executed: &[Phase],
    callback: Option<&dyn ProgressCallback>,
) -> RefactoredIdea {
    RefactorEngine::new(client, stages)
        .with_callback(callback)
        .refactor(transcript, conversation, phases_executed)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedClient;
    use crate::prompts::PromptSet;

    const EXTRACT: &str = r#"{"problem": "gamified apps", "key_phrases": ["real dialogue"]}"#;
    const SYNTH: &str = "[ONE-LINER] Dialogue practice.\n[PROBLEM] Too gamified.";

    fn validation(confidence: f64, critique: &str) -> String {
        format!(r#"{{"confidence": {confidence}, "critique": "{critique}"}}"#)
    }

    #[tokio::test]
    async fn test_passes_first_time() {
        let prompts = PromptSet::embedded().unwrap();
        let client = ScriptedClient::new([EXTRACT.to_string(), SYNTH.to_string(), validation(0.9, "PASS")]);

        let idea = RefactorEngine::new(&client, &prompts.stages)
            .refactor("transcript", &[], &[])
            .await;

        assert_eq!(idea.refinement_rounds, 0);
        assert_eq!(idea.one_liner, "Dialogue practice.");
        assert_eq!(client.call_count(), 3);
        assert_eq!(idea.extracted_insights.unwrap().problem, "gamified apps");
    }

    #[tokio::test]
    async fn test_critique_is_fed_back() {
        let prompts = PromptSet::embedded().unwrap();
        let client = ScriptedClient::new([
            EXTRACT.to_string(),
            SYNTH.to_string(),
            validation(0.5, "Problem is invented"),
            SYNTH.to_string(),
            validation(0.85, "PASS"),
        ]);

        let idea = RefactorEngine::new(&client, &prompts.stages)
            .refactor("transcript", &[], &[])
            .await;
        assert_eq!(idea.refinement_rounds, 1);

        let calls = client.calls();
        assert!(!calls[1].system_prompt.contains("PREVIOUS ATTEMPT CRITIQUE"));
        assert!(calls[3].system_prompt.contains("PREVIOUS ATTEMPT CRITIQUE"));
        assert!(calls[3].system_prompt.contains("Problem is invented"));
        assert!(calls[1].system_prompt.contains("revolutionize"));
        assert!(calls[1].user_message.contains("\"real dialogue\""));
    }

    #[tokio::test]
    async fn test_stage_settings_are_used() {
        let prompts = PromptSet::embedded().unwrap();
        let client = ScriptedClient::new([EXTRACT.to_string(), SYNTH.to_string(), validation(0.9, "PASS")]);
        RefactorEngine::new(&client, &prompts.stages)
            .refactor("the transcript", &[], &[])
            .await;

        let calls = client.calls();
        assert_eq!(calls[0].max_tokens, 1000);
        assert_eq!(calls[1].max_tokens, 700);
        assert_eq!(calls[2].max_tokens, 800);
        assert!(calls[0].user_message.contains("the transcript"));
        assert!(calls[2].user_message.contains("Dialogue practice."));
    }

    #[tokio::test]
    async fn test_failed_calls_still_produce_output() {
        let prompts = PromptSet::embedded().unwrap();
        let client = ScriptedClient::from_completions([Completion::Failed("down".into())]);

        let idea = RefactorEngine::new(&client, &prompts.stages)
            .refactor("t", &[], &[])
            .await;

        assert_eq!(idea.refinement_rounds, MAX_REFINE_ROUNDS);
        assert_eq!(idea.one_liner, "[ERROR: down]");
        assert_eq!(client.call_count(), 1 + 2 * (1 + MAX_REFINE_ROUNDS));
    }
}
