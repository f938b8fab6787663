//! # codementor Core
//!
//! Client-side assistant logic: the conversation manager, the
//! recommendation engine, tolerant parsing of model output and problem
//! normalization.
//!
//! ## Components
//!
//! - [`ConversationManager`] - Classifies queries, drives the gateway and persists transcripts
//! - [`RecommendationEngine`] - Topic labels and practice problems for the review catalog
//! - [`ParserChain`] - Ordered extraction strategies for loosely-structured model output
//! - [`ProblemNormalizer`] - Turns heterogeneous candidates into [`Problem`](codementor_protocols::Problem)s
//! - [`MentorStores`] - Repositories over a [`KvStore`](codementor_protocols::KvStore)
//! - [`PageNotifier`] - In-process page lifecycle notifications

pub mod classifier;
pub mod conversation;
pub mod error;
pub mod hints;
pub mod navigation;
pub mod normalize;
pub mod parser;
pub mod prompts;
pub mod recommend;
pub mod session;
pub mod store;

#[cfg(test)]
mod testing;

pub use classifier::{classify, QueryKind};
pub use conversation::{ConversationManager, IgnoreReason, SubmitOutcome};
pub use error::MentorError;
pub use navigation::PageNotifier;
pub use normalize::{normalize, ProblemNormalizer};
pub use parser::{ParserChain, RecommendationParser};
pub use recommend::{RecommendationEngine, RecommendationOutcome};
pub use session::{SessionState, SessionToken};
pub use store::{MemoryKvStore, MentorStores};
