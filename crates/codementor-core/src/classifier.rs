//! Query classification.
//!
//! Classes are checked in precedence order: greeting, short-hint request,
//! off-topic, then the default question path.

use once_cell::sync::Lazy;
use regex::Regex;

/// Whole-string greetings, compared after lowercasing and stripping
/// trailing punctuation.
const GREETINGS: &[&str] = &[
    "hi",
    "hii",
    "hello",
    "hey",
    "hiya",
    "hola",
    "yo",
    "sup",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "hi there",
    "hello there",
    "hey there",
];

const SHORT_HINT_PHRASES: &[&str] = &[
    "small hint",
    "short hint",
    "quick hint",
    "tiny hint",
    "little hint",
    "one hint",
    "a hint only",
    "just a hint",
];

/// General-knowledge trigger terms.
const OFF_TOPIC_TERMS: &[&str] = &[
    "capital",
    "what is happening",
    "news",
    "who is",
    "weather",
    "president",
    "country",
    "india",
    "britain",
    "france",
];

const HELPFUL_KEYWORDS: &[&str] = &[
    "hint",
    "debug",
    "approach",
    "complexity",
    "edge case",
    "optimize",
    "optimise",
    "bug",
    "error",
    "wrong",
    "stuck",
    "explain",
    "algorithm",
    "tle",
    "time limit",
    "test case",
    "failing",
    "intuition",
    "data structure",
    "recursion",
    "improve",
];

static QUESTION_PHRASING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:can|could|would|will) you\b|^how (?:do|can|should|would) i\b|^what (?:should|would|if)\b|^is there\b|^where\b|^why\b",
    )
    .expect("valid question regex")
});

/// Class of a user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// A bare greeting, answered with a canned reply.
    Greeting,
    /// A request for a small generic hint.
    ShortHint,
    /// A general-knowledge question, refused.
    OffTopic,
    /// Anything else; goes to the model.
    Question {
        /// Whether the turn counts toward the recommendation threshold.
        helpful: bool,
    },
}

/// Classify a trimmed, non-empty query.
pub fn classify(query: &str) -> QueryKind {
    let lowered = query.trim().to_lowercase();
    if is_greeting(&lowered) {
        QueryKind::Greeting
    } else if is_short_hint(&lowered) {
        QueryKind::ShortHint
    } else if is_off_topic(&lowered) {
        QueryKind::OffTopic
    } else {
        QueryKind::Question {
            helpful: is_helpful(&lowered),
        }
    }
}

pub fn is_greeting(query: &str) -> bool {
    let lowered = query.trim().to_lowercase();
    let bare = lowered.trim_end_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace());
    GREETINGS.contains(&bare)
}

pub fn is_short_hint(query: &str) -> bool {
    let lowered = query.to_lowercase();
    SHORT_HINT_PHRASES.iter().any(|p| lowered.contains(p))
}

/// Substring heuristic shared by the client and the proxy server.
pub fn is_off_topic(query: &str) -> bool {
    let lowered = query.to_lowercase();
    OFF_TOPIC_TERMS.iter().any(|t| lowered.contains(t))
}

pub fn is_helpful(query: &str) -> bool {
    let lowered = query.trim().to_lowercase();
    HELPFUL_KEYWORDS.iter().any(|k| lowered.contains(k)) || QUESTION_PHRASING.is_match(&lowered)
}
