//! # codementor API
//!
//! The proxy between the mentor client and the upstream model vendor.
//! The client posts `{ contents }`; the proxy enforces its own system
//! prompt, refuses off-topic requests, holds the API key and forwards
//! the transcript as a chat-completions request.
//!
//! ```text
//! client --{contents}--> /api/generate --{model, messages}--> upstream
//!        <---{text}-----                <---choices----------
//! ```

pub mod error;
pub mod http;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use http::{
    handlers::{HealthResponse, NOT_CONFIGURED_REPLY, OFF_TOPIC_REPLY},
    routes::create_router,
};
pub use server::ApiServer;
pub use state::{AppState, ModelRoute};
