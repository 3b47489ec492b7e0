// Prompt templates
//
// The engine treats prompt wording as opaque configuration data: it only
// fills `{placeholder}` slots and sends the result. Defaults are embedded at
// compile time; an override file with the same shape can replace them.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::arise::types::Phase;
use crate::errors::{IdeanatorError, IdeanatorResult};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("valid regex"));

/// Built-in templates, embedded at compile time.
pub const DEFAULT_PROMPTS: &str = include_str!("default_prompts.toml");

/// Complete set of templates used by one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptSet {
    /// Inverted vagueness assessment (asks what is MISSING)
    pub vagueness: String,

    /// Simulated-user persona; `{original_idea}`
    pub simulated_user: String,

    /// Legacy single-shot synthesis; `{conversation}`
    pub synthesis: String,

    pub phases: PhasePrompts,

    /// Few-shot interviewer examples per phase
    pub examples: ExamplePool,

    pub stages: StagePrompts,
}

/// Per-phase interviewer templates.
///
/// Placeholders: `{still_need}`, `{example_user}`, `{example_response}`,
/// `{conversation}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhasePrompts {
    pub anchor: String,
    pub reveal: String,
    pub imagine: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamplePool {
    pub anchor: Vec<FewShotExample>,
    #[serde(default)]
    pub reveal: Vec<FewShotExample>,
    #[serde(default)]
    pub imagine: Vec<FewShotExample>,
    #[serde(default)]
    pub scope: Vec<FewShotExample>,
}

/// One user line plus the interviewer response we want imitated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FewShotExample {
    pub user: String,
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagePrompts {
    pub extract: StagePrompt,
    pub synthesize: StagePrompt,
    pub validate: StagePrompt,
}

/// Template and sampling settings for one refactoring stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagePrompt {
    pub system_prompt: String,
    pub user_template: String,
    pub temperature: f32,
    pub max_tokens: u32,

    /// Phrases the stage must never produce (synthesize only)
    #[serde(default)]
    pub banned_phrases: Vec<String>,
}

impl StagePrompt {
    /// Banned phrases as one comma-separated string for `{banned_words}`
    pub fn banned_words(&self) -> String {
        self.banned_phrases.join(", ")
    }
}

impl PromptSet {
    /// Parse the embedded defaults
    pub fn embedded() -> IdeanatorResult<Self> {
        Self::from_toml_str(DEFAULT_PROMPTS)
    }

    /// Load templates from a TOML file
    pub fn from_path(path: &Path) -> IdeanatorResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            IdeanatorError::PromptLoad(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load from `path` when given, else the embedded defaults
    pub fn load(path: Option<&Path>) -> IdeanatorResult<Self> {
        match path {
            Some(path) => {
                tracing::info!("Loading prompts from {}", path.display());
                Self::from_path(path)
            }
            None => Self::embedded(),
        }
    }

    pub fn from_toml_str(contents: &str) -> IdeanatorResult<Self> {
        let prompts: PromptSet =
            toml::from_str(contents).map_err(|e| IdeanatorError::PromptLoad(e.to_string()))?;
        prompts.validate()?;
        Ok(prompts)
    }

    fn validate(&self) -> IdeanatorResult<()> {
        let required = [
            ("vagueness", &self.vagueness),
            ("simulated_user", &self.simulated_user),
            ("synthesis", &self.synthesis),
            ("phases.anchor", &self.phases.anchor),
            ("phases.reveal", &self.phases.reveal),
            ("phases.imagine", &self.phases.imagine),
            ("phases.scope", &self.phases.scope),
            ("stages.extract.system_prompt", &self.stages.extract.system_prompt),
            ("stages.synthesize.system_prompt", &self.stages.synthesize.system_prompt),
            ("stages.validate.system_prompt", &self.stages.validate.system_prompt),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(IdeanatorError::PromptLoad(format!("'{key}' is empty")));
            }
        }

        // Other phases fall back to the anchor pool
        if self.examples.anchor.is_empty() {
            return Err(IdeanatorError::PromptLoad(
                "'examples.anchor' needs at least one example".to_string(),
            ));
        }
        Ok(())
    }

    pub fn phase_template(&self, phase: Phase) -> &str {
        match phase {
            Phase::Anchor => &self.phases.anchor,
            Phase::Reveal => &self.phases.reveal,
            Phase::Imagine => &self.phases.imagine,
            Phase::Scope => &self.phases.scope,
        }
    }

    /// Few-shot pool for a phase, falling back to the anchor pool when empty
    pub fn examples_for(&self, phase: Phase) -> &[FewShotExample] {
        let pool = match phase {
            Phase::Anchor => &self.examples.anchor,
            Phase::Reveal => &self.examples.reveal,
            Phase::Imagine => &self.examples.imagine,
            Phase::Scope => &self.examples.scope,
        };
        if pool.is_empty() {
            &self.examples.anchor
        } else {
            pool
        }
    }
}

/// Replace each `{key}` in `template` with its value.
///
/// Only the named keys are touched, so literal braces in JSON examples
/// survive untouched. Substitution is a single pass over the template:
/// placeholders inside inserted values are never expanded.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let key = &caps[1];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map_or_else(|| caps[0].to_string(), |(_, v)| (*v).to_string())
        })
        .into_owned()
}
