// Synthesis section parsing and display formatting for refactored ideas

use once_cell::sync::Lazy;
use regex::Regex;

use super::analysis::truncate_chars;
use super::types::{ExplorationStatus, RefactoredIdea};

fn section_regex(header: &str) -> Regex {
    Regex::new(&format!(r"(?is)\[{header}\]\s*:?\s*(.+?)(?:\[|\z)")).expect("valid regex")
}

static ONE_LINER: Lazy<Regex> = Lazy::new(|| section_regex("ONE[- ]?LINER"));
static PROBLEM: Lazy<Regex> = Lazy::new(|| section_regex("PROBLEM"));
static SOLUTION: Lazy<Regex> = Lazy::new(|| section_regex("SOLUTION"));
static AUDIENCE: Lazy<Regex> = Lazy::new(|| section_regex("AUDIENCE"));
static DIFFERENTIATOR: Lazy<Regex> = Lazy::new(|| section_regex("DIFFERENTIATOR"));
static OPEN_QUESTIONS: Lazy<Regex> = Lazy::new(|| section_regex("OPEN QUESTIONS?"));

static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-•*]\s*(.+)").expect("valid regex"));

/// Raw-text prefix used as the one-liner when no section parsed
const FALLBACK_ONE_LINER_CHARS: usize = 200;

/// Characters of each side shown per contradiction in the summary
const CONTRADICTION_PREVIEW_CHARS: usize = 60;

fn section(pattern: &Regex, raw: &str) -> String {
    pattern
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Parse bracketed synthesis sections into a `RefactoredIdea`.
///
/// Only the text fields and open questions are filled; pipeline metadata is
/// attached by the engine. When neither a one-liner nor a problem is found
/// the start of the raw text becomes the one-liner.
pub fn parse_synthesis(raw: &str) -> RefactoredIdea {
    let mut idea = RefactoredIdea {
        one_liner: section(&ONE_LINER, raw),
        problem: section(&PROBLEM, raw),
        solution: section(&SOLUTION, raw),
        audience: section(&AUDIENCE, raw),
        differentiator: section(&DIFFERENTIATOR, raw),
        raw_synthesis: raw.to_string(),
        ..Default::default()
    };

    let questions = section(&OPEN_QUESTIONS, raw);
    idea.open_questions = BULLET
        .captures_iter(&questions)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if idea.one_liner.is_empty() && idea.problem.is_empty() {
        tracing::debug!("No synthesis sections found, using raw prefix as one-liner");
        idea.one_liner = truncate_chars(raw, FALLBACK_ONE_LINER_CHARS);
    }

    idea
}

/// One "  Problem: ✅ Well-explored" line per dimension
pub fn format_exploration_status(status: &ExplorationStatus) -> String {
    status
        .entries()
        .iter()
        .map(|(name, level)| format!("  {}: {}", title_case(name), level.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-section summary of a refactored idea for display
pub fn format_refactored(idea: &RefactoredIdea) -> String {
    let mut lines: Vec<String> = Vec::new();

    if !idea.one_liner.is_empty() {
        lines.push(format!("ONE-LINER: {}", idea.one_liner));
    }
    for (label, value) in [
        ("PROBLEM", &idea.problem),
        ("SOLUTION", &idea.solution),
        ("AUDIENCE", &idea.audience),
        ("DIFFERENTIATOR", &idea.differentiator),
    ] {
        if !value.is_empty() {
            lines.push(format!("\n{label}: {value}"));
        }
    }

    if !idea.open_questions.is_empty() {
        lines.push("\nOPEN QUESTIONS:".to_string());
        lines.extend(idea.open_questions.iter().map(|q| format!("  • {q}")));
    }

    if let Some(status) = &idea.exploration_status {
        lines.push("\nEXPLORATION STATUS:".to_string());
        lines.push(format_exploration_status(status));
    }

    if !idea.contradictions.is_empty() {
        lines.push(format!("\nCONTRADICTIONS ({}):", idea.contradictions.len()));
        for c in &idea.contradictions {
            lines.push(format!(
                "  ⚠ {}... vs {}...",
                truncate_chars(&c.earlier, CONTRADICTION_PREVIEW_CHARS),
                truncate_chars(&c.later, CONTRADICTION_PREVIEW_CHARS)
            ));
        }
    }

    if let Some(v) = &idea.validation {
        lines.push(format!(
            "\nVALIDATION: confidence={:.2} | refinement rounds={}",
            v.confidence, idea.refinement_rounds
        ));
    }

    lines.join("\n")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refactor::types::{Contradiction, ExplorationLevel, ValidationResult};

    const SYNTHESIS: &str = "[ONE-LINER] A Spanish dialogue app for college students.\n\
        [PROBLEM] Current tools are too gamified.\n\
        [SOLUTION] Real conversation practice.\n\
        [AUDIENCE] College students learning Spanish.\n\
        [DIFFERENTIATOR] Focus on dialogue, not points.\n\
        [OPEN QUESTIONS]\n\
        - How to find partners?\n\
        • What about pricing?\n";

    #[test]
    fn test_all_sections_parsed() {
        let idea = parse_synthesis(SYNTHESIS);
        assert_eq!(idea.one_liner, "A Spanish dialogue app for college students.");
        assert_eq!(idea.problem, "Current tools are too gamified.");
        assert_eq!(idea.solution, "Real conversation practice.");
        assert_eq!(idea.audience, "College students learning Spanish.");
        assert_eq!(idea.differentiator, "Focus on dialogue, not points.");
        assert_eq!(idea.open_questions, vec!["How to find partners?", "What about pricing?"]);
        assert_eq!(idea.raw_synthesis, SYNTHESIS);
    }

    #[test]
    fn test_header_variants() {
        let idea = parse_synthesis("[one liner]: Short.\n[Open Question]\n* Only one?");
        assert_eq!(idea.one_liner, "Short.");
        assert_eq!(idea.open_questions, vec!["Only one?"]);
    }

    #[test]
    fn test_unstructured_text_becomes_one_liner() {
        let raw = "y".repeat(300);
        let idea = parse_synthesis(&raw);
        assert_eq!(idea.one_liner.len(), 200);
        assert!(idea.problem.is_empty());

        assert_eq!(parse_synthesis("").one_liner, "");
    }

    #[test]
    fn test_problem_only_keeps_empty_one_liner() {
        let idea = parse_synthesis("[PROBLEM] Slow invoices.");
        assert_eq!(idea.one_liner, "");
        assert_eq!(idea.problem, "Slow invoices.");
    }

    #[test]
    fn test_format_exploration_status() {
        let status = ExplorationStatus {
            problem: ExplorationLevel::WellExplored,
            audience: ExplorationLevel::PartiallyExplored,
            ..Default::default()
        };
        let text = format_exploration_status(&status);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "  Problem: ✅ Well-explored");
        assert_eq!(lines[1], "  Audience: ⚠️ Partially explored");
        assert_eq!(lines[4], "  Motivation: 🔲 Not yet explored");
    }

    #[test]
    fn test_format_refactored() {
        let mut idea = parse_synthesis(SYNTHESIS);
        idea.validation = Some(ValidationResult {
            confidence: 0.85,
            ..Default::default()
        });
        idea.refinement_rounds = 1;
        idea.contradictions.push(Contradiction {
            earlier: "no".into(),
            later: "yes".into(),
            turns: String::new(),
        });

        let text = format_refactored(&idea);
        assert!(text.starts_with("ONE-LINER: A Spanish dialogue app"));
        assert!(text.contains("\n\nPROBLEM: Current tools are too gamified."));
        assert!(text.contains("  • How to find partners?"));
        assert!(text.contains("CONTRADICTIONS (1):\n  ⚠ no... vs yes..."));
        assert!(text.ends_with("VALIDATION: confidence=0.85 | refinement rounds=1"));
        assert!(!text.contains("EXPLORATION STATUS"));
    }
}
