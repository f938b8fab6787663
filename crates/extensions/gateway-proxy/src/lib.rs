//! Model gateway for the codementor proxy server.
//!
//! Posts `{ contents }` to `/api/generate` and reads `{ text }` back, so
//! the client never holds the upstream API key.

mod gateway;

pub use gateway::{ProxyGateway, DEFAULT_ENDPOINT};
