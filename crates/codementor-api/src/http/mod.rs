//! HTTP interface module.
//!
//! Provides the proxy endpoints:
//! - `POST /api/generate` relaying a transcript to the upstream model
//! - `GET /health`

pub mod handlers;
pub mod routes;
