//! Data model shared across the codementor crates.

mod turn;
mod problem;
mod key;
mod message;
mod generate;

pub use turn::*;
pub use problem::*;
pub use key::*;
pub use message::*;
pub use generate::*;
