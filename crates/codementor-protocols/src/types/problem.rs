//! Problem, review and page-context types.

use serde::{Deserialize, Serialize};

/// Title reported by a context source when the page title cannot be read.
pub const TITLE_NOT_FOUND: &str = "Title not found";

/// A recommended practice problem.
///
/// After normalization at least one of `title` and `url` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Problem {
    pub title: String,
    pub url: String,
}

impl Problem {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Recommended practice grouped by concept and originating problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    /// Concept label, e.g. "Two Pointers".
    pub concept: String,

    /// Title of the problem that triggered the recommendation.
    pub source: String,

    /// Normalized practice problems.
    pub problems: Vec<Problem>,
}

impl ReviewEntry {
    pub fn new(concept: impl Into<String>, source: impl Into<String>, problems: Vec<Problem>) -> Self {
        Self {
            concept: concept.into(),
            source: source.into(),
            problems,
        }
    }

    /// Whether two entries share the same `(concept, source)` identity.
    pub fn same_identity(&self, other: &ReviewEntry) -> bool {
        self.concept == other.concept && self.source == other.source
    }
}

/// Persisted collection of review entries, in insertion order.
pub type ReviewCatalog = Vec<ReviewEntry>;

/// A problem the user marked as solved, labelled with its topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolvedProblem {
    pub title: String,
    pub topic: String,
}

/// Snapshot of the problem page the user is working on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemContext {
    pub title: String,
    pub description: String,

    /// Current editor contents, if they could be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ProblemContext {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Whether the page title was actually found.
    pub fn has_title(&self) -> bool {
        let title = self.title.trim();
        !title.is_empty() && title != TITLE_NOT_FOUND
    }
}
