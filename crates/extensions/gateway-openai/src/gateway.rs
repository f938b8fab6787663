//! OpenAI-compatible gateway implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use codementor_config::UpstreamConfig;
use codementor_protocols::{body_text, GatewayError, ModelGateway, PromptTurn};

use crate::api::ApiRequest;
use crate::converter::convert_turns;

const DEFAULT_API_URL: &str = "https://router.huggingface.co/v1/chat/completions";

/// Gateway posting `{ model, messages, max_tokens }` to a chat-completions URL.
#[derive(Clone)]
pub struct OpenAiGateway {
    api_key: String,
    api_url: String,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    client: reqwest::Client,
}

impl OpenAiGateway {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_url(api_key, DEFAULT_API_URL.to_string(), model)
    }

    /// Create a gateway for a custom endpoint.
    pub fn with_url(api_key: String, api_url: String, model: String) -> Self {
        Self {
            api_key,
            api_url,
            model,
            max_tokens: None,
            temperature: None,
            client: reqwest::Client::new(),
        }
    }

    /// Build from the `[upstream]` section. Fails when no API key is set.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, GatewayError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GatewayError::NotConfigured("upstream API key is missing".to_string()))?;
        Ok(
            Self::with_url(api_key, config.api_url.clone(), config.model.clone())
                .with_max_tokens(config.max_tokens)
                .with_temperature(config.temperature)
                .with_timeout(Duration::from_secs(config.timeout_seconds)),
        )
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        self
    }

    /// The same gateway targeting another model.
    pub fn for_model(&self, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..self.clone()
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, turns: &[PromptTurn]) -> ApiRequest {
        ApiRequest {
            model: self.model.clone(),
            messages: convert_turns(turns),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: Some(false),
        }
    }

    async fn send_request(&self, api_request: &ApiRequest) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(api_request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, message: text });
        }

        response
            .text()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))
    }
}

#[async_trait]
impl ModelGateway for OpenAiGateway {
    fn id(&self) -> &str {
        "openai"
    }

    async fn generate(&self, turns: &[PromptTurn]) -> Result<String, GatewayError> {
        let api_request = self.build_request(turns);
        if api_request.messages.is_empty() {
            return Err(GatewayError::InvalidRequest("no non-empty turns".to_string()));
        }
        debug!(model = %self.model, messages = api_request.messages.len(), "Sending chat completion");

        let body = self.send_request(&api_request).await?;
        Ok(body_text(body))
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
