// ARISE loop runner: vagueness scoring, phased interview, then refactoring

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::generic::is_generic;
use super::parser::parse_response;
use super::phases::{build_phase_prompt, plan};
use super::progress::{read_stdin_line, ProgressCallback, ProgressEvent};
use super::types::{ConversationTurn, GenericFlag, IdeaResult, Phase, Role, VaguenessAssessment};
use super::vagueness;
use crate::config::constants::{SYNTHESIS_USER_MESSAGE, TEMPERATURES, TOKENS};
use crate::llm::{Completion, CompletionRequest, LlmClient};
use crate::prompts::{fill, PromptSet};
use crate::refactor::{format_refactored, RefactorEngine};

/// The ARISE interview loop.
///
/// One run takes a raw idea through:
/// - an inverted vagueness assessment deciding which phases to run
/// - one interviewer question round per phase, answered by a human
///   (interactive) or by a simulated user (batch)
/// - the legacy single-shot synthesis
/// - the three-stage refactoring engine
///
/// Each run owns its coverage, transcript and turn list, so one loop can
/// serve several ideas in sequence and separate loops can run concurrently.
pub struct AriseLoop {
    client: Arc<dyn LlmClient>,
    prompts: Arc<PromptSet>,
    callback: Option<Arc<dyn ProgressCallback>>,
    cancel: CancellationToken,
}

impl AriseLoop {
    pub fn new(client: Arc<dyn LlmClient>, prompts: Arc<PromptSet>) -> Self {
        Self {
            client,
            prompts,
            callback: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Stop advancing phases once `cancel` fires
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Batch mode: answers come from the simulated user
    pub async fn run_batch(&self, idea: &str) -> IdeaResult {
        self.run(idea, false).await
    }

    /// Interactive mode: answers come from `PromptUser` or stdin
    pub async fn run_interactive(&self, idea: &str) -> IdeaResult {
        self.run(idea, true).await
    }

    /// Run the full pipeline for one idea.
    ///
    /// Model failures never abort the run; they surface as `status` warnings
    /// and degrade the affected output. A cancellation returns the partial
    /// result with `cancelled` set and skips synthesis and refactoring.
    pub async fn run(&self, idea: &str, interactive: bool) -> IdeaResult {
        tracing::info!(interactive, "Processing idea");

        // ── 1. Vagueness calibration ────────────────────────────────────────
        self.emit(ProgressEvent::Status, "Scoring vagueness (inverted prompt)...")
            .await;
        let (mut coverage, completion) =
            vagueness::assess(self.client.as_ref(), &self.prompts.vagueness, idea).await;
        self.warn_if_failed("vagueness", &completion).await;

        let uncovered = coverage.uncovered_labels();
        let phases = plan(&coverage);
        let missing = if uncovered.is_empty() {
            "None".to_string()
        } else {
            uncovered.join(", ")
        };
        let phase_names: Vec<&str> = phases.iter().map(|p| p.as_str()).collect();
        self.emit(
            ProgressEvent::Vagueness,
            &format!(
                "Covered: {} | Missing: {} | Phases: {}",
                coverage.score_str(),
                missing,
                phase_names.join(" → ")
            ),
        )
        .await;

        let mut result = IdeaResult::new(
            idea,
            VaguenessAssessment::from_coverage(&coverage, completion.into_text()),
        );

        // ── 2. Phase loop ───────────────────────────────────────────────────
        let mut transcript = format!("Original idea: {idea}\n");

        for phase in phases {
            if self.cancel.is_cancelled() {
                result.cancelled = true;
                break;
            }

            let label = phase.label();
            tracing::debug!(phase = %phase, "Starting phase");
            self.emit(ProgressEvent::PhaseStart, label).await;

            let system_prompt = build_phase_prompt(
                &self.prompts,
                phase,
                &transcript,
                &coverage.uncovered_labels(),
            );
            // Anchor has no prior conversation to reference
            let user_message = if phase == Phase::Anchor {
                idea
            } else {
                transcript.as_str()
            };
            let request = CompletionRequest::new(system_prompt, user_message)
                .with_temperature(TEMPERATURES.questioning)
                .with_max_tokens(TOKENS.question);

            let completion = self.client.call(&request).await;
            self.warn_if_failed("interviewer", &completion).await;
            let parsed = parse_response(&completion.into_text());
            self.emit(ProgressEvent::Interviewer, &parsed.clean).await;

            for question in parsed.questions() {
                if is_generic(question, idea) {
                    result.generic_flags.push(GenericFlag::new(phase, question));
                    self.emit(ProgressEvent::GenericFlag, question).await;
                }
            }

            transcript.push_str(&format!("\n[Interviewer - {label}]:\n{}\n", parsed.clean));
            let display = parsed.clean.clone();
            result
                .conversation
                .push(ConversationTurn::interviewer(phase, parsed));

            let (answer, role) = if interactive {
                match self.human_answer(label).await {
                    Some(answer) => (answer, Role::User),
                    None => {
                        result.cancelled = true;
                        break;
                    }
                }
            } else {
                (self.simulated_answer(idea, &display).await, Role::UserSimulated)
            };

            transcript.push_str(&format!("\n[User]:\n{answer}\n"));
            result
                .conversation
                .push(ConversationTurn::respondent(phase, role, answer));

            coverage.mark_covered(phase.dimensions());
            result.phases_executed.push(phase);
        }

        if result.cancelled {
            tracing::info!(phases = result.phases_executed.len(), "Run cancelled");
            self.emit(ProgressEvent::Status, "Cancelled, skipping synthesis.")
                .await;
            return result;
        }

        // ── 3. Legacy synthesis ─────────────────────────────────────────────
        self.emit(ProgressEvent::Status, "Running legacy synthesis...")
            .await;
        let request = CompletionRequest::new(
            fill(&self.prompts.synthesis, &[("conversation", transcript.as_str())]),
            SYNTHESIS_USER_MESSAGE,
        )
        .with_temperature(TEMPERATURES.synthesis)
        .with_max_tokens(TOKENS.synthesis);
        let completion = self.client.call(&request).await;
        self.warn_if_failed("synthesis", &completion).await;
        result.synthesis = completion.into_text();

        // ── 4. Three-stage refactoring ──────────────────────────────────────
        self.emit(ProgressEvent::Status, "Running three-stage refactoring engine...")
            .await;
        let refactored = RefactorEngine::new(self.client.as_ref(), &self.prompts.stages)
            .with_callback(self.callback.as_deref())
            .refactor(&transcript, &result.conversation, &result.phases_executed)
            .await;

        self.emit(ProgressEvent::Refactored, &format_refactored(&refactored))
            .await;
        result.refactored = Some(refactored);

        tracing::info!(
            phases = result.phases_executed.len(),
            generic_flags = result.generic_flags.len(),
            "Idea processed"
        );
        result
    }

    /// Ask the callback for an answer, falling back to stdin when it gives
    /// nothing (or an empty string).
    ///
    /// Returns `None` once the run is cancelled, even if an answer arrived.
    async fn human_answer(&self, label: &str) -> Option<String> {
        let answer = self.emit(ProgressEvent::PromptUser, label).await;
        if self.cancel.is_cancelled() {
            return None;
        }
        if let Some(answer) = callback_answer(answer) {
            return Some(answer);
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            line = read_stdin_line("\nYour response: ") => match line {
                Ok(line) => Some(line),
                Err(e) => {
                    tracing::warn!("Failed to read answer from stdin: {e}");
                    Some(String::new())
                }
            },
        }
    }

    async fn simulated_answer(&self, idea: &str, interviewer_text: &str) -> String {
        let request = CompletionRequest::new(
            fill(&self.prompts.simulated_user, &[("original_idea", idea)]),
            interviewer_text,
        )
        .with_temperature(TEMPERATURES.simulation)
        .with_max_tokens(TOKENS.simulation);

        let completion = self.client.call(&request).await;
        self.warn_if_failed("simulated user", &completion).await;
        let answer = completion.into_text();
        self.emit(ProgressEvent::UserSim, &answer).await;
        answer
    }

    async fn warn_if_failed(&self, what: &str, completion: &Completion) {
        if let Some(message) = completion.error() {
            self.emit(
                ProgressEvent::Status,
                &format!("Warning: {what} call failed: {message}"),
            )
            .await;
        }
    }

    async fn emit(&self, event: ProgressEvent, data: &str) -> Option<String> {
        match &self.callback {
            Some(callback) => callback.on_event(event, data).await,
            None => None,
        }
    }
}

/// An empty callback answer counts as no answer
fn callback_answer(answer: Option<String>) -> Option<String> {
    answer.filter(|a| !a.is_empty())
}
