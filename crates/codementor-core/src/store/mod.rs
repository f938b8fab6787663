//! Key-value backed persistence.
//!
//! [`MemoryKvStore`] is a process-local [`KvStore`](codementor_protocols::KvStore);
//! the repositories in [`repositories`] give each persisted entity a typed
//! view over any store, and [`MentorStores`] bundles them.

mod memory;
pub mod repositories;
mod stores;

pub use memory::MemoryKvStore;
pub use repositories::{
    KvChatHistoryStore, KvHintStore, KvNotificationStore, KvReviewCatalogStore,
    KvSolvedProblemStore, KvTopicCacheStore,
};
pub use stores::MentorStores;
