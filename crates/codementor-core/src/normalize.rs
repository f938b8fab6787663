//! Problem normalization.
//!
//! Model output names practice problems in many shapes: bare strings,
//! objects keyed `title`/`name`/`label`/`text` and `url`/`link`/`href`,
//! relative paths. [`ProblemNormalizer`] reduces all of them to a
//! [`Problem`] with an absolute URL and a human title.
//!
//! Normalization is idempotent and never panics.

use serde_json::Value;

use codementor_protocols::Problem;

const DEFAULT_ORIGIN: &str = "https://leetcode.com";
const TITLE_FIELDS: [&str; 4] = ["title", "name", "label", "text"];
const URL_FIELDS: [&str; 3] = ["url", "link", "href"];
const PROBLEMS_SEGMENT: &str = "problems";

/// Normalizes candidates against a site origin.
#[derive(Debug, Clone)]
pub struct ProblemNormalizer {
    origin: String,
}

impl ProblemNormalizer {
    /// Create a normalizer for `origin`, e.g. `https://leetcode.com`.
    pub fn new(origin: impl Into<String>) -> Self {
        let origin: String = origin.into();
        Self {
            origin: origin.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Normalize a loosely-shaped candidate.
    ///
    /// Returns `None` only when neither a title nor a URL can be found.
    pub fn normalize(&self, candidate: &Value) -> Option<Problem> {
        let (title, url) = match candidate {
            Value::String(s) => (s.trim().to_string(), String::new()),
            Value::Object(map) => (
                first_text(map, &TITLE_FIELDS),
                first_text(map, &URL_FIELDS),
            ),
            _ => return None,
        };
        self.complete(title, url)
    }

    /// Normalize an already-typed problem.
    pub fn normalize_problem(&self, problem: &Problem) -> Option<Problem> {
        self.complete(problem.title.trim().to_string(), problem.url.trim().to_string())
    }

    fn complete(&self, title: String, url: String) -> Option<Problem> {
        let mut url = self.absolutize(&url);
        let mut title = title;

        if url.is_empty() && !title.is_empty() {
            let slug = slugify(&title);
            if !slug.is_empty() {
                url = self.problem_url(&slug);
            }
        }
        if title.is_empty() && !url.is_empty() {
            title = title_from_url(&url);
        }

        if title.is_empty() && url.is_empty() {
            return None;
        }
        Some(Problem { title, url })
    }

    /// Canonical URL of the problem with `slug`.
    pub fn problem_url(&self, slug: &str) -> String {
        format!("{}/{}/{}/", self.origin, PROBLEMS_SEGMENT, slug)
    }

    fn absolutize(&self, url: &str) -> String {
        let url = url.trim();
        if let Some(rest) = url.strip_prefix("//") {
            format!("https://{}", rest)
        } else if url.starts_with('/') {
            format!("{}{}", self.origin, url)
        } else {
            url.to_string()
        }
    }
}

impl Default for ProblemNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ORIGIN)
    }
}

/// Normalize against the default site origin.
pub fn normalize(candidate: &Value) -> Option<Problem> {
    ProblemNormalizer::default().normalize(candidate)
}

fn first_text(map: &serde_json::Map<String, Value>, fields: &[&str]) -> String {
    fields
        .iter()
        .filter_map(|field| map.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Lowercase, alphanumeric-hyphen slug: `"Two Sum"` -> `"two-sum"`.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Infer a title from the problem slug (or last path segment) of a URL.
pub fn title_from_url(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let segment = segments
        .iter()
        .position(|s| *s == PROBLEMS_SEGMENT)
        .and_then(|i| segments.get(i + 1))
        .or_else(|| segments.last())
        .copied()
        .unwrap_or_default();

    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    title_case(&decoded)
}

fn title_case(words: &str) -> String {
    words
        .split(['-', '_', '+', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
