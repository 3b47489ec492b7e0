// Project-wide constants
//
// Centralised here so sampling temperatures, token budgets and thresholds
// have one source of truth. Import via `use crate::config::constants::*;`.

/// Sampling temperature per kind of model call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperatures {
    /// Vagueness assessment (deterministic)
    pub decision: f32,
    /// Interviewer question generation
    pub questioning: f32,
    /// Legacy single-shot synthesis
    pub synthesis: f32,
    /// Simulated user answers in batch mode
    pub simulation: f32,
}

/// Max-token budget per kind of model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimits {
    pub decision: u32,
    pub question: u32,
    pub synthesis: u32,
    pub simulation: u32,
}

pub const TEMPERATURES: Temperatures = Temperatures {
    decision: 0.0,
    questioning: 0.6,
    synthesis: 0.3,
    simulation: 0.7,
};

pub const TOKENS: TokenLimits = TokenLimits {
    decision: 200,
    question: 250,
    synthesis: 500,
    simulation: 200,
};

/// Ideas shorter than this many words cannot claim full coverage.
pub const VAGUENESS_WORD_THRESHOLD: usize = 20;

/// Validation confidence at or above which the self-refine loop stops.
pub const CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Maximum number of Synthesize/Validate re-runs after the first attempt.
pub const MAX_REFINE_ROUNDS: usize = 2;

/// Confidence assigned when the validator's output cannot be parsed.
///
/// Must stay below `CONFIDENCE_THRESHOLD` so an unparseable validation
/// always triggers a refine round.
pub const VALIDATION_FALLBACK_CONFIDENCE: f64 = 0.6;

/// User words per dimension needed for "well explored".
pub const EXPLORATION_WORD_THRESHOLD: usize = 20;

/// Default output file for batch runs.
pub const DEFAULT_OUTPUT_FILE: &str = "arise_results.json";

/// HTTP timeout for a single model call.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// HTTP timeout for the preflight reachability check.
pub const PREFLIGHT_TIMEOUT_SECS: u64 = 5;

/// User message sent with the legacy synthesis prompt.
pub const SYNTHESIS_USER_MESSAGE: &str = "Please synthesize now.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperatures() {
        assert_eq!(TEMPERATURES.decision, 0.0);
        assert!((TEMPERATURES.questioning - 0.6).abs() < f32::EPSILON);
        assert!((TEMPERATURES.synthesis - 0.3).abs() < f32::EPSILON);
        assert!((TEMPERATURES.simulation - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_token_limits() {
        assert_eq!(TOKENS.decision, 200);
        assert_eq!(TOKENS.question, 250);
        assert_eq!(TOKENS.synthesis, 500);
        assert_eq!(TOKENS.simulation, 200);
    }

    #[test]
    fn test_fallback_confidence_below_threshold() {
        assert!(VALIDATION_FALLBACK_CONFIDENCE < CONFIDENCE_THRESHOLD);
    }
}
