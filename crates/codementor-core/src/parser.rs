//! Extraction of practice problems from loosely-structured model output.
//!
//! Models asked for "a JSON array of {title,url} objects, and nothing
//! else" often answer with prose around the array, trailing commas or a
//! plain numbered list. Each [`RecommendationParser`] tries one strategy;
//! [`ParserChain`] runs them in order and stops at the first that
//! extracts anything.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use codementor_protocols::Problem;

use crate::normalize::ProblemNormalizer;

/// One extraction strategy.
pub trait RecommendationParser: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &str;

    /// Extract normalized problems, or `None` when nothing was found.
    fn parse(&self, text: &str, normalizer: &ProblemNormalizer) -> Option<Vec<Problem>>;
}

/// Parses the text between the first `[` and the last `]` as JSON.
#[derive(Debug, Default)]
pub struct BracketJsonParser;

impl RecommendationParser for BracketJsonParser {
    fn name(&self) -> &str {
        "bracket-json"
    }

    fn parse(&self, text: &str, normalizer: &ProblemNormalizer) -> Option<Vec<Problem>> {
        let array = bracketed(text)?;
        let value: Value = serde_json::from_str(array).ok()?;
        from_json_array(&value, normalizer)
    }
}

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("valid trailing comma regex"));

/// Like [`BracketJsonParser`] after removing trailing commas.
#[derive(Debug, Default)]
pub struct TrailingCommaParser;

impl RecommendationParser for TrailingCommaParser {
    fn name(&self) -> &str {
        "trailing-comma"
    }

    fn parse(&self, text: &str, normalizer: &ProblemNormalizer) -> Option<Vec<Problem>> {
        let array = bracketed(text)?;
        let repaired = TRAILING_COMMA.replace_all(array, "$1");
        let value: Value = serde_json::from_str(&repaired).ok()?;
        from_json_array(&value, normalizer)
    }
}

static EMBEDDED_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s)\]>"'`,]+"#).expect("valid url regex"));
static ORDINAL_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*•]+|\d+[.)]|\(\d+\)|[a-zA-Z][.)])\s*").expect("valid ordinal regex")
});
static FIELD_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:title|url|link)\s*:").expect("valid label regex"));

/// Line-oriented fallback: every line with an embedded URL is a problem,
/// the rest of the line (minus ordinal markers) is its title.
#[derive(Debug, Default)]
pub struct LineHeuristicParser;

impl LineHeuristicParser {
    fn parse_line(line: &str) -> Option<(String, String)> {
        let found = EMBEDDED_URL.find(line)?;
        let url = found
            .as_str()
            .trim_end_matches(['.', ';', ':'])
            .to_string();

        let rest = format!("{}{}", &line[..found.start()], &line[found.end()..]);
        let rest = ORDINAL_MARKER.replace(&rest, "");
        let rest = rest
            .replace("()", " ")
            .replace("<>", " ")
            .replace(['[', ']', '{', '}'], " ")
            .replace(['*', '"', '`'], "");
        let title = FIELD_LABEL.replace_all(&rest, " ");
        let title = title
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let title = title
            .trim_matches(|c: char| {
                c.is_whitespace() || matches!(c, '-' | ':' | '|' | ',' | '(' | ')' | '–')
            })
            .to_string();

        Some((title, url))
    }
}

impl RecommendationParser for LineHeuristicParser {
    fn name(&self) -> &str {
        "line-heuristic"
    }

    fn parse(&self, text: &str, normalizer: &ProblemNormalizer) -> Option<Vec<Problem>> {
        let problems: Vec<Problem> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(Self::parse_line)
            .filter_map(|(title, url)| normalizer.normalize_problem(&Problem { title, url }))
            .collect();
        non_empty(problems)
    }
}

/// Ordered chain of strategies.
pub struct ParserChain {
    parsers: Vec<Box<dyn RecommendationParser>>,
}

impl ParserChain {
    /// An empty chain.
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Append a strategy.
    pub fn with_parser(mut self, parser: impl RecommendationParser + 'static) -> Self {
        self.parsers.push(Box::new(parser));
        self
    }

    /// Names of the strategies in order.
    pub fn names(&self) -> Vec<&str> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    /// Run strategies in order and return the first non-empty result,
    /// deduplicated by URL. Empty when every strategy fails.
    pub fn parse(&self, text: &str, normalizer: &ProblemNormalizer) -> Vec<Problem> {
        for parser in &self.parsers {
            if let Some(problems) = parser.parse(text, normalizer) {
                debug!(parser = parser.name(), count = problems.len(), "Extracted problems");
                return dedup(problems);
            }
        }
        Vec::new()
    }
}

impl Default for ParserChain {
    fn default() -> Self {
        Self::new()
            .with_parser(BracketJsonParser)
            .with_parser(TrailingCommaParser)
            .with_parser(LineHeuristicParser)
    }
}

fn bracketed(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (end > start).then(|| &text[start..=end])
}

fn from_json_array(value: &Value, normalizer: &ProblemNormalizer) -> Option<Vec<Problem>> {
    let items = value.as_array()?;
    non_empty(items.iter().filter_map(|item| normalizer.normalize(item)).collect())
}

fn non_empty(problems: Vec<Problem>) -> Option<Vec<Problem>> {
    if problems.is_empty() { None } else { Some(problems) }
}

fn dedup(problems: Vec<Problem>) -> Vec<Problem> {
    let mut seen = HashSet::new();
    problems
        .into_iter()
        .filter(|p| {
            let identity = if p.url.is_empty() {
                p.title.to_lowercase()
            } else {
                p.url.trim_end_matches('/').to_lowercase()
            };
            seen.insert(identity)
        })
        .collect()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
