//! Key-value store and repository protocol definitions.
//!
//! The key-value store is the only shared mutable resource across page
//! loads. Repositories give each persisted entity a typed interface over it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::types::{ProblemKey, ReviewCatalog, ReviewEntry, SolvedProblem, Transcript, ChatTurn};

/// Storage key of the review catalog.
pub const REVIEW_LIST_KEY: &str = "reviewList";
/// Storage key of the topic cache.
pub const TOPIC_CACHE_KEY: &str = "topicCache";
/// Storage key of the solved-problem set.
pub const SOLVED_PROBLEMS_KEY: &str = "solvedProblems";
/// Storage key of the review notification flag.
pub const HAS_NOTIFICATION_KEY: &str = "hasNotification";
/// Prefix of per-problem transcript keys.
pub const CHAT_HISTORY_PREFIX: &str = "chatHistory_";
/// Prefix of per-problem last-hint keys.
pub const LAST_HINT_PREFIX: &str = "lastShortHint_";

/// Namespace of a stored key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreArea {
    /// Cleared when the browsing session ends.
    Session,
    /// Persisted indefinitely.
    Local,
}

impl StoreArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreArea::Session => "session",
            StoreArea::Local => "local",
        }
    }
}

/// Asynchronous key-value store.
///
/// Each `set` call writes its whole object; values are JSON.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the store ID.
    fn id(&self) -> &str;

    /// Read the given keys. Missing keys are absent from the result.
    async fn get(&self, area: StoreArea, keys: &[&str]) -> Result<Map<String, Value>, StoreError>;

    /// Write every entry of `items`.
    async fn set(&self, area: StoreArea, items: Map<String, Value>) -> Result<(), StoreError>;

    /// Remove the given keys.
    async fn remove(&self, area: StoreArea, keys: &[String]) -> Result<(), StoreError>;

    /// List every key in the area.
    async fn keys(&self, area: StoreArea) -> Result<Vec<String>, StoreError>;

    /// Read one key.
    async fn get_one(&self, area: StoreArea, key: &str) -> Result<Option<Value>, StoreError> {
        let mut found = self.get(area, &[key]).await?;
        Ok(found.remove(key))
    }

    /// Write one key.
    async fn set_one(&self, area: StoreArea, key: &str, value: Value) -> Result<(), StoreError> {
        let mut items = Map::new();
        items.insert(key.to_string(), value);
        self.set(area, items).await
    }
}

/// Per-problem transcripts.
#[async_trait]
pub trait ChatHistoryStore: Send + Sync {
    /// Load the transcript, empty if none was saved.
    async fn load(&self, key: &ProblemKey) -> Result<Transcript, StoreError>;

    /// Replace the stored transcript.
    async fn save(&self, key: &ProblemKey, turns: &[ChatTurn]) -> Result<(), StoreError>;
}

/// The review catalog.
#[async_trait]
pub trait ReviewCatalogStore: Send + Sync {
    async fn list(&self) -> Result<ReviewCatalog, StoreError>;

    /// Insert unless an entry with the same `(concept, source)` exists.
    ///
    /// Returns whether the entry was inserted.
    async fn insert(&self, entry: ReviewEntry) -> Result<bool, StoreError>;
}

/// Topic labels keyed by problem title; first written value wins.
#[async_trait]
pub trait TopicCacheStore: Send + Sync {
    async fn get(&self, title: &str) -> Result<Option<String>, StoreError>;

    /// Store `topic` unless a label is already cached; returns the cached label.
    async fn put_if_absent(&self, title: &str, topic: &str) -> Result<String, StoreError>;
}

/// Last short hint shown per problem.
#[async_trait]
pub trait HintStore: Send + Sync {
    async fn last_hint(&self, key: &ProblemKey) -> Result<Option<String>, StoreError>;

    async fn set_last_hint(&self, key: &ProblemKey, hint: &str) -> Result<(), StoreError>;
}

/// Solved problems, one per title.
#[async_trait]
pub trait SolvedProblemStore: Send + Sync {
    async fn list(&self) -> Result<Vec<SolvedProblem>, StoreError>;

    /// Append unless the title is already recorded; returns whether it was added.
    async fn record(&self, solved: SolvedProblem) -> Result<bool, StoreError>;
}

/// The review badge notification flag.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn has_notification(&self) -> Result<bool, StoreError>;

    async fn set_notification(&self, pending: bool) -> Result<(), StoreError>;
}
