//! # codementor Protocols
//!
//! Data model and protocol definitions (traits) for the codementor assistant.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`ModelGateway`] - Turns a transcript into one remote text-generation call
//! - [`KvStore`] - Asynchronous key-value store with `session` and `local` areas
//! - [`ChatHistoryStore`], [`ReviewCatalogStore`], [`TopicCacheStore`] - Repositories over the store
//! - [`ProblemContextSource`] - Reads the current problem page
//! - [`ChatView`] - Presentation of turns, notices and the review badge
//! - [`PageLifecycle`] - Page navigation notifications
//!
//! [`extract_text`] reads reply text out of any supported response envelope.

pub mod envelope;
pub mod error;
pub mod gateway;
pub mod page;
pub mod store;
pub mod types;

pub use envelope::{body_text, extract_text, NO_TEXT};
pub use error::{GatewayError, StoreError};
pub use gateway::ModelGateway;
pub use page::{ChatView, NullChatView, PageEvent, PageLifecycle, ProblemContextSource};
pub use store::{
    ChatHistoryStore, HintStore, KvStore, NotificationStore, ReviewCatalogStore,
    SolvedProblemStore, StoreArea, TopicCacheStore,
};
pub use types::*;
