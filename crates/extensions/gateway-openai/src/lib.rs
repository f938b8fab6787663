//! Model gateway for OpenAI-compatible chat-completion endpoints
//! (the Hugging Face router, OpenAI itself, local servers).

mod api;
mod converter;
mod gateway;

pub use gateway::OpenAiGateway;
