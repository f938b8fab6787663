//! Repository bundle.

use std::sync::Arc;

use tracing::info;

use codementor_protocols::store::{CHAT_HISTORY_PREFIX, LAST_HINT_PREFIX};
use codementor_protocols::store::{
    HAS_NOTIFICATION_KEY, REVIEW_LIST_KEY, SOLVED_PROBLEMS_KEY, TOPIC_CACHE_KEY,
};
use codementor_protocols::{
    ChatHistoryStore, HintStore, KvStore, NotificationStore, ReviewCatalogStore,
    SolvedProblemStore, StoreArea, StoreError, TopicCacheStore,
};

use super::memory::MemoryKvStore;
use super::repositories::{
    KvChatHistoryStore, KvHintStore, KvNotificationStore, KvReviewCatalogStore,
    KvSolvedProblemStore, KvTopicCacheStore,
};

/// Every repository the assistant uses, sharing one key-value store.
#[derive(Clone)]
pub struct MentorStores {
    pub history: Arc<dyn ChatHistoryStore>,
    pub catalog: Arc<dyn ReviewCatalogStore>,
    pub topics: Arc<dyn TopicCacheStore>,
    pub hints: Arc<dyn HintStore>,
    pub solved: Arc<dyn SolvedProblemStore>,
    pub notifications: Arc<dyn NotificationStore>,
    kv: Arc<dyn KvStore>,
}

impl MentorStores {
    /// Repositories over `kv`.
    pub fn over(kv: Arc<dyn KvStore>) -> Self {
        Self {
            history: Arc::new(KvChatHistoryStore::new(kv.clone())),
            catalog: Arc::new(KvReviewCatalogStore::new(kv.clone())),
            topics: Arc::new(KvTopicCacheStore::new(kv.clone())),
            hints: Arc::new(KvHintStore::new(kv.clone())),
            solved: Arc::new(KvSolvedProblemStore::new(kv.clone())),
            notifications: Arc::new(KvNotificationStore::new(kv.clone())),
            kv,
        }
    }

    /// Repositories over a fresh [`MemoryKvStore`].
    pub fn in_memory() -> Self {
        Self::over(Arc::new(MemoryKvStore::new()))
    }

    /// The underlying key-value store.
    pub fn kv(&self) -> &Arc<dyn KvStore> {
        &self.kv
    }

    /// Clear every namespaced key in both areas.
    ///
    /// Returns the number of keys removed.
    pub async fn reset(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for area in [StoreArea::Session, StoreArea::Local] {
            let keys: Vec<String> = self
                .kv
                .keys(area)
                .await?
                .into_iter()
                .filter(|key| is_namespaced(key))
                .collect();
            if keys.is_empty() {
                continue;
            }
            removed += keys.len();
            self.kv.remove(area, &keys).await?;
        }
        info!(removed, "Cleared stored assistant state");
        Ok(removed)
    }
}

fn is_namespaced(key: &str) -> bool {
    key.starts_with(CHAT_HISTORY_PREFIX)
        || key.starts_with(LAST_HINT_PREFIX)
        || [
            REVIEW_LIST_KEY,
            TOPIC_CACHE_KEY,
            SOLVED_PROBLEMS_KEY,
            HAS_NOTIFICATION_KEY,
        ]
        .contains(&key)
}
