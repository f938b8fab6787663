//! Proxy gateway implementation.

use async_trait::async_trait;
use tracing::debug;

use codementor_protocols::{
    body_text, GatewayError, GenerateFailure, GenerateRequest, ModelGateway, PromptTurn,
};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/generate";

/// Gateway that relays transcripts through the codementor proxy.
#[derive(Clone)]
pub struct ProxyGateway {
    endpoint: String,
    client: reqwest::Client,
}

impl ProxyGateway {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for ProxyGateway {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

fn failure_message(body: String) -> String {
    match serde_json::from_str::<GenerateFailure>(&body) {
        Ok(GenerateFailure { error, detail: Some(detail) }) => format!("{error}: {detail}"),
        Ok(GenerateFailure { error, detail: None }) => error,
        Err(_) => body,
    }
}

#[async_trait]
impl ModelGateway for ProxyGateway {
    fn id(&self) -> &str {
        "proxy"
    }

    async fn generate(&self, turns: &[PromptTurn]) -> Result<String, GatewayError> {
        if turns.is_empty() {
            return Err(GatewayError::InvalidRequest("empty transcript".to_string()));
        }
        let request = GenerateRequest::from_turns(turns);
        debug!(endpoint = %self.endpoint, turns = turns.len(), "Posting to proxy");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message: failure_message(body),
            });
        }

        Ok(body_text(body))
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
