// Programmatic analysis over the conversation structure
//
// Neither function calls the model: exploration depth comes from which
// phases ran and how much the respondent wrote, and contradictions come
// from a negation-pair heuristic.

use std::collections::{HashMap, HashSet};

use super::types::{Contradiction, ExplorationLevel, ExplorationStatus};
use crate::arise::types::{ConversationTurn, Phase};
use crate::config::constants::EXPLORATION_WORD_THRESHOLD;

/// Negated/affirmed word pairs, matched as substrings of lowercased turns
const NEGATION_PAIRS: [(&str, &str); 6] = [
    ("not", "yes"),
    ("don't", "do"),
    ("can't", "can"),
    ("won't", "will"),
    ("isn't", "is"),
    ("no", "yes"),
];

/// Words too common to indicate a shared topic
const TRIVIAL_WORDS: [&str; 17] = [
    "i", "the", "a", "to", "is", "it", "and", "or", "but", "my", "that", "this", "in", "of", "for",
    "on", "with",
];

/// Characters of each statement kept in a detected contradiction
const QUOTE_CHARS: usize = 100;

/// Phases whose answers speak to each exploration dimension
fn covering_phases(dimension: &str) -> &'static [Phase] {
    match dimension {
        "motivation" => &[Phase::Anchor],
        "audience" => &[Phase::Anchor, Phase::Reveal],
        "problem" => &[Phase::Reveal],
        "solution" => &[Phase::Imagine, Phase::Scope],
        "differentiation" => &[Phase::Scope],
        _ => &[],
    }
}

/// Label each dimension by how much the respondent said in its phases.
///
/// No covering phase ran: not explored. Otherwise at least
/// `EXPLORATION_WORD_THRESHOLD` respondent words across those phases is
/// well explored, anything less is partially explored.
pub fn compute_exploration_status(
    conversation: &[ConversationTurn],
    phases_executed: &[Phase],
) -> ExplorationStatus {
    let mut words_per_phase: HashMap<Phase, usize> = HashMap::new();
    for turn in conversation.iter().filter(|t| t.role.is_user()) {
        *words_per_phase.entry(turn.phase).or_default() += turn.content.split_whitespace().count();
    }

    let ran: HashSet<Phase> = phases_executed.iter().copied().collect();
    let level = |dimension: &str| -> ExplorationLevel {
        let ran_phases: Vec<Phase> = covering_phases(dimension)
            .iter()
            .copied()
            .filter(|p| ran.contains(p))
            .collect();
        if ran_phases.is_empty() {
            return ExplorationLevel::NotExplored;
        }
        let words: usize = ran_phases
            .iter()
            .map(|p| words_per_phase.get(p).copied().unwrap_or(0))
            .sum();
        if words >= EXPLORATION_WORD_THRESHOLD {
            ExplorationLevel::WellExplored
        } else {
            ExplorationLevel::PartiallyExplored
        }
    };

    ExplorationStatus {
        problem: level("problem"),
        audience: level("audience"),
        solution: level("solution"),
        differentiation: level("differentiation"),
        motivation: level("motivation"),
    }
}

/// Find respondent turns that may contradict a later turn.
///
/// A pair is flagged when the two turns share a non-trivial word and one
/// contains the negated form of a pair while the other contains the
/// affirmed form. At most one contradiction is recorded per pair of turns.
pub fn detect_contradictions(conversation: &[ConversationTurn]) -> Vec<Contradiction> {
    let user_turns: Vec<&ConversationTurn> =
        conversation.iter().filter(|t| t.role.is_user()).collect();
    if user_turns.len() < 2 {
        return Vec::new();
    }

    let lowered: Vec<String> = user_turns.iter().map(|t| t.content.to_lowercase()).collect();
    let mut found = Vec::new();

    for i in 0..user_turns.len() {
        for j in (i + 1)..user_turns.len() {
            let (earlier_lower, later_lower) = (&lowered[i], &lowered[j]);
            if !shares_topic(earlier_lower, later_lower) {
                continue;
            }

            let opposed = NEGATION_PAIRS.iter().any(|(neg, pos)| {
                (earlier_lower.contains(neg) && later_lower.contains(pos))
                    || (earlier_lower.contains(pos) && later_lower.contains(neg))
            });
            if opposed {
                let (earlier, later) = (user_turns[i], user_turns[j]);
                found.push(Contradiction {
                    earlier: truncate_chars(&earlier.content, QUOTE_CHARS),
                    later: truncate_chars(&later.content, QUOTE_CHARS),
                    turns: format!("{} vs {}", earlier.phase, later.phase),
                });
            }
        }
    }

    if !found.is_empty() {
        tracing::debug!(count = found.len(), "Heuristic contradictions found");
    }
    found
}

fn shares_topic(a: &str, b: &str) -> bool {
    let a_words: HashSet<&str> = a.split_whitespace().collect();
    b.split_whitespace()
        .any(|w| a_words.contains(w) && !TRIVIAL_WORDS.contains(&w))
}

pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
