// Tiered JSON extraction for the Extract and Validate stages
//
// Tier 1: JSON inside a fenced code block. Tier 2: the widest bare {...}
// span. Tier 3 (extract only): per-field label matching on the raw text.
// Validate has no field tier; it falls back to a fixed below-threshold
// confidence instead.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

use super::types::{ExtractedInsights, ValidationResult};
use crate::config::constants::VALIDATION_FALLBACK_CONFIDENCE;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("valid regex"));

static BARE_JSON: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

/// Label patterns for the field-matching fallback, one per insight field
static FIELD_LABELS: Lazy<Vec<(InsightField, Regex)>> = Lazy::new(|| {
    [
        (InsightField::Problem, "problem|pain"),
        (InsightField::Audience, "audience|who|target"),
        (InsightField::Solution, "solution|approach"),
        (InsightField::Differentiation, "differentiation|different|unique"),
        (InsightField::Motivation, "motivation|why|cares"),
    ]
    .into_iter()
    .map(|(field, labels)| {
        let pattern = format!(r##"(?im)^\s*[-*"#]*\s*(?:{labels})[\w ]*"?\s*:\s*(.+?)\s*$"##);
        (field, Regex::new(&pattern).expect("valid regex"))
    })
    .collect()
});

/// Characters kept from unparseable validator output in the fallback critique
const RAW_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, Copy)]
enum InsightField {
    Problem,
    Audience,
    Solution,
    Differentiation,
    Motivation,
}

/// Locate a JSON object in model output: fenced block first, then bare braces.
pub fn find_json_object(text: &str) -> Option<&str> {
    if let Some(m) = FENCED_JSON.captures(text).and_then(|caps| caps.get(1)) {
        return Some(m.as_str());
    }
    BARE_JSON.find(text).map(|m| m.as_str())
}

fn parse_json_tiers<T: DeserializeOwned>(raw: &str, stage: &str) -> Option<T> {
    let json = find_json_object(raw)?;
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(stage, "JSON parse failed: {e}");
            None
        }
    }
}

/// Parse Stage 1 output, falling back to label matching.
pub fn parse_extraction(raw: &str) -> ExtractedInsights {
    if let Some(insights) = parse_json_tiers(raw, "extract") {
        return insights;
    }
    tracing::debug!("Extraction JSON unavailable, matching field labels");
    extract_from_text(raw)
}

/// Best-effort field recovery from free text; unmatched fields stay
/// "NOT DISCUSSED".
pub fn extract_from_text(raw: &str) -> ExtractedInsights {
    let mut insights = ExtractedInsights::default();

    for (field, pattern) in FIELD_LABELS.iter() {
        let Some(value) = pattern
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_matches(|c: char| c == '"' || c == ',' || c.is_whitespace()))
            .filter(|v| !v.is_empty())
        else {
            continue;
        };

        let slot = match field {
            InsightField::Problem => &mut insights.problem,
            InsightField::Audience => &mut insights.audience,
            InsightField::Solution => &mut insights.solution,
            InsightField::Differentiation => &mut insights.differentiation,
            InsightField::Motivation => &mut insights.motivation,
        };
        *slot = value.to_string();
    }

    insights
}

/// Parse Stage 3 output.
///
/// Unparseable output, or a confidence outside [0, 1], yields the fixed
/// fallback confidence with the raw text embedded in the critique.
pub fn parse_validation(raw: &str) -> ValidationResult {
    if let Some(result) = parse_json_tiers::<ValidationResult>(raw, "validate") {
        if result.confidence.is_finite() && (0.0..=1.0).contains(&result.confidence) {
            return result;
        }
        tracing::warn!(confidence = result.confidence, "Validation confidence out of range");
    }

    let preview: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
    ValidationResult {
        confidence: VALIDATION_FALLBACK_CONFIDENCE,
        critique: format!("Could not parse validation output. Raw: {preview}"),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refactor::types::NOT_DISCUSSED;

    #[test]
    fn test_fenced_json_preferred() {
        let text = "Noise {not json}\n```json\n{\"problem\": \"slow\"}\n```";
        assert_eq!(find_json_object(text), Some("{\"problem\": \"slow\"}"));
    }

    #[test]
    fn test_bare_json_found() {
        let text = "Here you go: {\"a\": {\"b\": 1}} thanks";
        assert_eq!(find_json_object(text), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(find_json_object("no braces"), None);
    }

    #[test]
    fn test_parse_extraction_from_json() {
        let raw = r#"```
{"problem": "Too gamified", "key_phrases": ["real dialogue"], "contradictions": [{"earlier": "a", "later": "b"}]}
```"#;
        let insights = parse_extraction(raw);
        assert_eq!(insights.problem, "Too gamified");
        assert_eq!(insights.key_phrases, vec!["real dialogue"]);
        assert_eq!(insights.contradictions[0].turns, "");
        assert_eq!(insights.solution, NOT_DISCUSSED);
    }

    #[test]
    fn test_parse_extraction_label_fallback() {
        let raw = "Problem: students freeze in real conversations\nWho: college students\nsomething else";
        let insights = parse_extraction(raw);
        assert_eq!(insights.problem, "students freeze in real conversations");
        assert_eq!(insights.audience, "college students");
        assert_eq!(insights.motivation, NOT_DISCUSSED);
    }

    #[test]
    fn test_label_fallback_on_broken_json() {
        let raw = "{\n  \"problem\": \"slow invoices\",\n  \"audience\": \"freelancers\",\n";
        let insights = parse_extraction(raw);
        assert_eq!(insights.problem, "slow invoices");
        assert_eq!(insights.audience, "freelancers");
    }

    #[test]
    fn test_error_text_yields_defaults() {
        let insights = parse_extraction("[ERROR: connection refused]");
        assert_eq!(insights, ExtractedInsights::default());
    }

    #[test]
    fn test_parse_validation() {
        let raw = r#"{"confidence": 0.85, "critique": "PASS", "sycophancy": {"flags": [], "severity": "none"}}"#;
        let v = parse_validation(raw);
        assert!((v.confidence - 0.85).abs() < 1e-9);
        assert!(v.passed());
    }

    #[test]
    fn test_unparseable_validation_falls_back() {
        let raw = "x".repeat(500);
        let v = parse_validation(&raw);
        assert!((v.confidence - VALIDATION_FALLBACK_CONFIDENCE).abs() < 1e-9);
        assert!(v.critique.starts_with("Could not parse validation output. Raw: "));
        assert!(v.critique.ends_with(&"x".repeat(200)));
        assert!(!v.critique.ends_with(&"x".repeat(201)));
    }

    #[test]
    fn test_out_of_range_confidence_falls_back() {
        let v = parse_validation(r#"{"confidence": 8.5, "critique": "PASS"}"#);
        assert!((v.confidence - VALIDATION_FALLBACK_CONFIDENCE).abs() < 1e-9);
    }
}
