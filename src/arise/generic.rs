// Genericness detector: flags interviewer questions that could apply to any idea

use std::collections::HashSet;

/// Idea-framing words that carry no information about the idea itself
const STOP_WORDS: [&str; 28] = [
    "want", "make", "create", "build", "develop", "design", "that", "helps", "people", "with",
    "their", "them", "this", "would", "platform", "allows", "from", "about", "have", "will", "into",
    "your", "they", "could", "should", "more", "most", "also",
];

const MIN_KEYWORD_CHARS: usize = 4;

/// Distinctive keywords of an idea: lowercased, punctuation-trimmed,
/// at least four characters, stop words removed.
pub fn idea_keywords(idea: &str) -> HashSet<String> {
    idea.split_whitespace()
        .map(|w| w.to_lowercase().trim_matches(|c| ".,!?".contains(c)).to_string())
        .filter(|w| w.chars().count() >= MIN_KEYWORD_CHARS)
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// True when `question` mentions none of the idea's keywords.
///
/// Empty input on either side counts as generic. An idea made only of stop
/// words cannot be assessed and never flags.
pub fn is_generic(question: &str, idea: &str) -> bool {
    if question.trim().is_empty() || idea.trim().is_empty() {
        return true;
    }

    let keywords = idea_keywords(idea);
    if keywords.is_empty() {
        return false;
    }

    let question = question.to_lowercase();
    !keywords.iter().any(|kw| question.contains(kw.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDEA: &str = "I want to build an app that helps people learn languages.";

    #[test]
    fn test_keyword_overlap_is_not_generic() {
        assert!(!is_generic("What's your experience learning languages?", IDEA));
    }

    #[test]
    fn test_no_overlap_is_generic() {
        assert!(is_generic("What are your goals for the future?", IDEA));
    }

    #[test]
    fn test_empty_inputs_are_generic() {
        assert!(is_generic("", IDEA));
        assert!(is_generic("Any question at all?", ""));
        assert!(is_generic("   ", IDEA));
    }

    #[test]
    fn test_only_stop_words_cannot_assess() {
        // want, create, platform, helps and people are all stop words
        let idea = "I want to create a platform that helps people.";
        assert!(idea_keywords(idea).is_empty());
        assert!(!is_generic("How would you reach them?", idea));
    }

    #[test]
    fn test_short_words_are_ignored() {
        let keywords = idea_keywords("I want to do AI for art.");
        assert!(keywords.is_empty());
    }

    #[test]
    fn test_case_and_punctuation() {
        let idea = "I want to help students, especially FRESHMEN.";
        let keywords = idea_keywords(idea);
        assert!(keywords.contains("students"));
        assert!(keywords.contains("freshmen"));
        assert!(!is_generic("What challenges do Freshmen face?", idea));
    }

    #[test]
    fn test_substring_match_counts() {
        // keyword "learn" appears inside "relearning"
        assert!(!is_generic("How do you picture relearning?", "learn"));
    }
}
