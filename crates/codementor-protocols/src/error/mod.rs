//! Error types for the codementor protocol layer.

mod gateway;
mod store;

pub use gateway::*;
pub use store::*;
