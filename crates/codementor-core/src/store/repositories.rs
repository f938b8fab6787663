//! Typed repositories over a [`KvStore`].
//!
//! Every mutation writes one whole value under one key.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use codementor_protocols::store::{
    HAS_NOTIFICATION_KEY, REVIEW_LIST_KEY, SOLVED_PROBLEMS_KEY, TOPIC_CACHE_KEY,
};
use codementor_protocols::{
    ChatHistoryStore, ChatTurn, HintStore, KvStore, NotificationStore, ProblemKey,
    ReviewCatalog, ReviewCatalogStore, ReviewEntry, SolvedProblem, SolvedProblemStore,
    StoreArea, StoreError, TopicCacheStore, Transcript,
};

async fn read<T: DeserializeOwned>(
    kv: &dyn KvStore,
    area: StoreArea,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match kv.get_one(area, key).await? {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

async fn write<T: Serialize + ?Sized>(
    kv: &dyn KvStore,
    area: StoreArea,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    kv.set_one(area, key, serde_json::to_value(value)?).await
}

/// Transcripts under `chatHistory_<slug>` in the local area.
pub struct KvChatHistoryStore {
    kv: Arc<dyn KvStore>,
}

impl KvChatHistoryStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl ChatHistoryStore for KvChatHistoryStore {
    async fn load(&self, key: &ProblemKey) -> Result<Transcript, StoreError> {
        Ok(read(self.kv.as_ref(), StoreArea::Local, &key.chat_history_key())
            .await?
            .unwrap_or_default())
    }

    async fn save(&self, key: &ProblemKey, turns: &[ChatTurn]) -> Result<(), StoreError> {
        write(self.kv.as_ref(), StoreArea::Local, &key.chat_history_key(), turns).await
    }
}

/// The review catalog under `reviewList`.
pub struct KvReviewCatalogStore {
    kv: Arc<dyn KvStore>,
}

impl KvReviewCatalogStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl ReviewCatalogStore for KvReviewCatalogStore {
    async fn list(&self) -> Result<ReviewCatalog, StoreError> {
        Ok(read(self.kv.as_ref(), StoreArea::Local, REVIEW_LIST_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn insert(&self, entry: ReviewEntry) -> Result<bool, StoreError> {
        let mut catalog = self.list().await?;
        if catalog.iter().any(|existing| existing.same_identity(&entry)) {
            return Ok(false);
        }
        catalog.push(entry);
        write(self.kv.as_ref(), StoreArea::Local, REVIEW_LIST_KEY, &catalog).await?;
        Ok(true)
    }
}

/// Concept labels under `topicCache`, keyed by problem title.
pub struct KvTopicCacheStore {
    kv: Arc<dyn KvStore>,
}

impl KvTopicCacheStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    async fn cache(&self) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(read(self.kv.as_ref(), StoreArea::Local, TOPIC_CACHE_KEY)
            .await?
            .unwrap_or_default())
    }
}

#[async_trait]
impl TopicCacheStore for KvTopicCacheStore {
    async fn get(&self, title: &str) -> Result<Option<String>, StoreError> {
        Ok(self.cache().await?.remove(title))
    }

    async fn put_if_absent(&self, title: &str, topic: &str) -> Result<String, StoreError> {
        let mut cache = self.cache().await?;
        if let Some(existing) = cache.get(title) {
            return Ok(existing.clone());
        }
        cache.insert(title.to_string(), topic.to_string());
        write(self.kv.as_ref(), StoreArea::Local, TOPIC_CACHE_KEY, &cache).await?;
        Ok(topic.to_string())
    }
}

/// Last short hint per problem, in the session area.
pub struct KvHintStore {
    kv: Arc<dyn KvStore>,
}

impl KvHintStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl HintStore for KvHintStore {
    async fn last_hint(&self, key: &ProblemKey) -> Result<Option<String>, StoreError> {
        read(self.kv.as_ref(), StoreArea::Session, &key.last_hint_key()).await
    }

    async fn set_last_hint(&self, key: &ProblemKey, hint: &str) -> Result<(), StoreError> {
        write(self.kv.as_ref(), StoreArea::Session, &key.last_hint_key(), hint).await
    }
}

/// Solved problems under `solvedProblems`.
pub struct KvSolvedProblemStore {
    kv: Arc<dyn KvStore>,
}

impl KvSolvedProblemStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl SolvedProblemStore for KvSolvedProblemStore {
    async fn list(&self) -> Result<Vec<SolvedProblem>, StoreError> {
        Ok(read(self.kv.as_ref(), StoreArea::Local, SOLVED_PROBLEMS_KEY)
            .await?
            .unwrap_or_default())
    }

    async fn record(&self, solved: SolvedProblem) -> Result<bool, StoreError> {
        let mut all = self.list().await?;
        if all.iter().any(|s| s.title == solved.title) {
            return Ok(false);
        }
        all.push(solved);
        write(self.kv.as_ref(), StoreArea::Local, SOLVED_PROBLEMS_KEY, &all).await?;
        Ok(true)
    }
}

/// The `hasNotification` flag.
pub struct KvNotificationStore {
    kv: Arc<dyn KvStore>,
}

impl KvNotificationStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl NotificationStore for KvNotificationStore {
    async fn has_notification(&self) -> Result<bool, StoreError> {
        Ok(read(self.kv.as_ref(), StoreArea::Local, HAS_NOTIFICATION_KEY)
            .await?
            .unwrap_or(false))
    }

    async fn set_notification(&self, pending: bool) -> Result<(), StoreError> {
        write(self.kv.as_ref(), StoreArea::Local, HAS_NOTIFICATION_KEY, &pending).await
    }
}

#[cfg(test)]
#[path = "repositories_tests.rs"]
mod tests;
