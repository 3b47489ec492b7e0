// Interviewer response parser
//
// Models are asked for [REFLECTION] / [QUESTION 1] / [QUESTION 2] sections
// but small local models drift: they wrap answers in reasoning blocks, use
// bold or angle-bracket markers, or ignore the format entirely. Parsing runs
// as an ordered chain of tiers (strict, then fuzzy) and falls back to the
// stripped text when no tier finds anything.

use once_cell::sync::Lazy;
use regex::Regex;

use super::types::ParsedResponse;

const REASONING_TAGS: [&str; 3] = ["think", "thinking", "reasoning"];

/// (closed block, bare opening tag) per reasoning tag
static REASONING_BLOCKS: Lazy<Vec<(Regex, Regex)>> = Lazy::new(|| {
    REASONING_TAGS
        .iter()
        .map(|tag| {
            let closed = Regex::new(&format!(r"(?is)<{tag}>.*?</{tag}>")).expect("valid regex");
            let open = Regex::new(&format!(r"(?i)<{tag}>")).expect("valid regex");
            (closed, open)
        })
        .collect()
});

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

static FUZZY_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:\[|<|\*\*)\s*(reflection|question\s*\d*)\s*:?\s*(?:\]|>|\*\*)\s*:?")
        .expect("valid regex")
});

static CLOSING_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</[^>]*>").expect("valid regex"));

const STRICT_MARKERS: [&str; 3] = ["[REFLECTION]", "[QUESTION 1]", "[QUESTION 2]"];

/// Sections found by one parsing tier
#[derive(Debug, Default, PartialEq, Eq)]
struct Sections {
    reflection: String,
    question_1: String,
    question_2: String,
}

impl Sections {
    /// A tier counts as successful when it found a reflection or a first question
    fn is_found(&self) -> bool {
        !self.reflection.is_empty() || !self.question_1.is_empty()
    }
}

type Tier = fn(&str) -> Sections;

/// Tried in order; the first tier that finds something wins
const TIERS: [(&str, Tier); 2] = [("strict", strict_sections), ("fuzzy", fuzzy_sections)];

/// Parse one interviewer response into reflection and questions.
pub fn parse_response(raw_text: &str) -> ParsedResponse {
    let stripped = strip_reasoning(raw_text);

    let sections = TIERS
        .iter()
        .find_map(|(name, tier)| {
            let sections = tier(&stripped);
            if sections.is_found() {
                tracing::trace!(tier = name, "Parsed interviewer response");
                Some(sections)
            } else {
                None
            }
        })
        .unwrap_or_default();

    let parts: Vec<&str> = [
        sections.reflection.as_str(),
        sections.question_1.as_str(),
        sections.question_2.as_str(),
    ]
    .into_iter()
    .filter(|p| !p.is_empty())
    .collect();

    let clean = if parts.is_empty() {
        stripped.clone()
    } else {
        parts.join("\n\n")
    };

    ParsedResponse {
        reflection: sections.reflection,
        question_1: sections.question_1,
        question_2: sections.question_2,
        raw: raw_text.to_string(),
        clean,
    }
}

/// Remove reasoning blocks, truncating at an unclosed opening tag.
pub fn strip_reasoning(text: &str) -> String {
    let mut out = text.to_string();
    for (closed, open) in REASONING_BLOCKS.iter() {
        out = closed.replace_all(&out, "").into_owned();
        // The model ran out of budget mid-thought
        if let Some(m) = open.find(&out) {
            out.truncate(m.start());
        }
    }
    EXCESS_NEWLINES.replace_all(&out, "\n\n").trim().to_string()
}

fn strict_sections(text: &str) -> Sections {
    let starts: Vec<Option<usize>> = STRICT_MARKERS.iter().map(|m| text.find(m)).collect();

    let section = |index: usize| -> String {
        let Some(start) = starts[index] else {
            return String::new();
        };
        let body_start = start + STRICT_MARKERS[index].len();
        let end = starts
            .iter()
            .flatten()
            .copied()
            .filter(|s| *s > start)
            .min()
            .unwrap_or(text.len());
        if end <= body_start {
            return String::new();
        }
        text[body_start..end].trim().to_string()
    };

    Sections {
        reflection: section(0),
        question_1: section(1),
        question_2: section(2),
    }
}

fn fuzzy_sections(text: &str) -> Sections {
    let markers: Vec<(usize, usize, bool)> = FUZZY_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let is_reflection = caps
                .get(1)
                .map(|m| m.as_str().eq_ignore_ascii_case("reflection"))
                .unwrap_or(false);
            Some((whole.start(), whole.end(), is_reflection))
        })
        .collect();

    let mut sections = Sections::default();
    let mut questions: Vec<String> = Vec::new();

    for (i, (_, body_start, is_reflection)) in markers.iter().enumerate() {
        let end = markers.get(i + 1).map(|m| m.0).unwrap_or(text.len());
        let body = CLOSING_TAG
            .replace_all(&text[*body_start..end], "")
            .trim()
            .to_string();

        if *is_reflection {
            if sections.reflection.is_empty() {
                sections.reflection = body;
            }
        } else if questions.len() < 2 {
            questions.push(body);
        }
    }

    let mut questions = questions.into_iter();
    sections.question_1 = questions.next().unwrap_or_default();
    sections.question_2 = questions.next().unwrap_or_default();
    sections
}
