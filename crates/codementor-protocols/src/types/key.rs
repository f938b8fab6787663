//! Problem keys derived from page URLs.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// Path segment that precedes the problem slug.
const PROBLEMS_SEGMENT: &str = "problems";

/// Identifies one problem; namespaces its persisted transcript.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemKey(String);

impl ProblemKey {
    /// Derive the key from a page URL such as
    /// `https://leetcode.com/problems/two-sum/description/`.
    ///
    /// Returns `None` when the URL has no problem-slug segment.
    pub fn from_url(page_url: &str) -> Option<Self> {
        let url = Url::parse(page_url.trim()).ok()?;
        let mut segments = url.path_segments()?;
        segments.find(|s| *s == PROBLEMS_SEGMENT)?;
        let slug = segments.find(|s| !s.is_empty())?;
        Some(Self(slug.to_ascii_lowercase()))
    }

    /// Build a key from an already-known slug.
    pub fn from_slug(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key of this problem's transcript.
    pub fn chat_history_key(&self) -> String {
        format!("chatHistory_{}", self.0)
    }

    /// Storage key of the last short hint shown for this problem.
    pub fn last_hint_key(&self) -> String {
        format!("lastShortHint_{}", self.0)
    }
}

impl fmt::Display for ProblemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
