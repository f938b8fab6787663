//! Recommendation engine.
//!
//! Asks the gateway for a problem's concept, then for related practice
//! problems, and merges them into the review catalog.

use std::sync::Arc;

use tracing::{debug, info, warn};

use codementor_protocols::{
    ModelGateway, NotificationStore, ReviewCatalogStore, ReviewEntry, TopicCacheStore,
    TITLE_NOT_FOUND,
};

use crate::error::MentorError;
use crate::normalize::ProblemNormalizer;
use crate::parser::ParserChain;
use crate::prompts::{concept_prompt, recommendation_prompt, FALLBACK_CONCEPT};
use crate::store::MentorStores;

/// Result of one recommendation cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationOutcome {
    /// The title was missing; nothing was requested.
    Skipped,
    /// A new entry was added and the notification flag set.
    Added(ReviewEntry),
    /// An entry with the same concept and source already existed.
    Duplicate(ReviewEntry),
    /// The model's answer contained no usable problems.
    NoProblems { concept: String },
    /// A gateway or storage call failed.
    Failed { reason: String },
}

impl RecommendationOutcome {
    /// Whether the review catalog changed.
    pub fn added(&self) -> bool {
        matches!(self, RecommendationOutcome::Added(_))
    }
}

/// Builds review entries from model suggestions.
pub struct RecommendationEngine {
    gateway: Arc<dyn ModelGateway>,
    topics: Arc<dyn TopicCacheStore>,
    catalog: Arc<dyn ReviewCatalogStore>,
    notifications: Arc<dyn NotificationStore>,
    normalizer: ProblemNormalizer,
    parsers: ParserChain,
}

impl RecommendationEngine {
    pub fn new(gateway: Arc<dyn ModelGateway>, stores: &MentorStores) -> Self {
        Self {
            gateway,
            topics: stores.topics.clone(),
            catalog: stores.catalog.clone(),
            notifications: stores.notifications.clone(),
            normalizer: ProblemNormalizer::default(),
            parsers: ParserChain::default(),
        }
    }

    pub fn with_normalizer(mut self, normalizer: ProblemNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_parsers(mut self, parsers: ParserChain) -> Self {
        self.parsers = parsers;
        self
    }

    /// Concept label for `title`, from the cache or one remote call.
    ///
    /// The first label written for a title wins. A reply that does not read
    /// as a label, such as a refusal or a notice, yields the fallback
    /// concept and is not cached.
    pub async fn topic_for(&self, title: &str) -> Result<String, MentorError> {
        if let Some(cached) = self.topics.get(title).await? {
            debug!(title, topic = %cached, "Topic cache hit");
            return Ok(cached);
        }
        let raw = self.gateway.ask(&concept_prompt(title)).await?;
        let topic = clean_topic(&raw);
        if !is_concept_label(&topic) {
            warn!(title, reply = %topic, "Concept reply is not a label");
            return Ok(FALLBACK_CONCEPT.to_string());
        }
        Ok(self.topics.put_if_absent(title, &topic).await?)
    }

    /// Run one recommendation cycle for `title`.
    ///
    /// Never fails; every failure is reported in the outcome and leaves
    /// the catalog unchanged.
    pub async fn recommend(&self, title: &str) -> RecommendationOutcome {
        let title = title.trim();
        if title.is_empty() || title == TITLE_NOT_FOUND {
            return RecommendationOutcome::Skipped;
        }
        match self.try_recommend(title).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(title, error = %e, "Recommendation cycle failed");
                RecommendationOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_recommend(&self, title: &str) -> Result<RecommendationOutcome, MentorError> {
        let concept = self.topic_for(title).await?;
        let text = self
            .gateway
            .ask(&recommendation_prompt(&concept, title))
            .await?;

        let problems: Vec<_> = self
            .parsers
            .parse(&text, &self.normalizer)
            .into_iter()
            .filter(|p| !p.title.eq_ignore_ascii_case(title))
            .collect();
        if problems.is_empty() {
            info!(title, concept = %concept, "No problems extracted from recommendation reply");
            return Ok(RecommendationOutcome::NoProblems { concept });
        }

        let entry = ReviewEntry::new(concept, title, problems);
        if !self.catalog.insert(entry.clone()).await? {
            debug!(title, concept = %entry.concept, "Review entry already present");
            return Ok(RecommendationOutcome::Duplicate(entry));
        }
        self.notifications.set_notification(true).await?;
        info!(
            title,
            concept = %entry.concept,
            problems = entry.problems.len(),
            "Added review entry"
        );
        Ok(RecommendationOutcome::Added(entry))
    }
}

/// First line of a model answer, without quotes or a trailing period.
pub fn clean_topic(raw: &str) -> String {
    let line = raw.trim().lines().next().unwrap_or_default();
    let topic = line
        .trim()
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '*' | '.'));
    if topic.is_empty() {
        FALLBACK_CONCEPT.to_string()
    } else {
        topic.to_string()
    }
}

const MAX_CONCEPT_WORDS: usize = 5;
const MAX_CONCEPT_CHARS: usize = 48;

/// Whether `topic` is short enough to be a concept name.
pub fn is_concept_label(topic: &str) -> bool {
    topic.chars().count() <= MAX_CONCEPT_CHARS
        && topic.split_whitespace().count() <= MAX_CONCEPT_WORDS
        && !topic.ends_with(['?', '!'])
}

#[cfg(test)]
#[path = "recommend_tests.rs"]
mod tests;
