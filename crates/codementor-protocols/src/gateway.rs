//! Model gateway protocol definition.
//!
//! A gateway turns an ordered, role-tagged transcript into one remote
//! text-generation request and returns plain text.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::types::PromptTurn;

/// Core trait for model gateways.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Returns the gateway ID.
    fn id(&self) -> &str;

    /// Send the transcript and return the extracted reply text.
    ///
    /// Implementations never retry. They fail only when the HTTP call
    /// itself fails; an unrecognised payload shape yields a serialized
    /// fallback string.
    async fn generate(&self, turns: &[PromptTurn]) -> Result<String, GatewayError>;

    /// Send a single user prompt.
    async fn ask(&self, prompt: &str) -> Result<String, GatewayError> {
        self.generate(&[PromptTurn::user(prompt)]).await
    }
}
