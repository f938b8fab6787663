//! Proxy API handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use codementor_core::classifier::is_off_topic;
use codementor_core::prompts::{user_question, PROXY_SYSTEM_PROMPT};
use codementor_protocols::{GenerateReply, GenerateRequest, PromptTurn};

use crate::error::ApiError;
use crate::state::AppState;

/// Reply to an off-topic request, sent without contacting the model.
pub const OFF_TOPIC_REPLY: &str = "I can't help with general knowledge or news. \
I'm an on-problem coding mentor, please ask about the current LeetCode problem.";

/// Reply when no upstream API key is configured.
pub const NOT_CONFIGURED_REPLY: &str =
    "Server not configured with HF_API_KEY. Please set it in environment.";

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    /// Model requests currently go to.
    pub model: String,
    pub uptime_seconds: u64,
    pub requests: u64,
}

/// Map request contents to gateway turns behind the server system prompt.
///
/// Blocks whose joined text is blank are dropped.
pub fn upstream_turns(request: &GenerateRequest) -> Vec<PromptTurn> {
    let mut turns = vec![PromptTurn::system(PROXY_SYSTEM_PROMPT)];
    turns.extend(
        request
            .contents
            .iter()
            .flatten()
            .map(|content| content.to_turn())
            .filter(|turn| !turn.text.trim().is_empty()),
    );
    turns
}

/// Relay a transcript to the upstream model.
///
/// POST /api/generate
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateReply>, ApiError> {
    state.increment_requests();

    if req.contents.is_none() {
        return Err(ApiError::MissingContents);
    }

    let last_user = req.last_user_text();
    if user_question(&last_user).is_some_and(|question| is_off_topic(question)) {
        info!("Refusing off-topic request");
        return Ok(Json(GenerateReply {
            text: OFF_TOPIC_REPLY.to_string(),
        }));
    }

    let turns = upstream_turns(&req);

    let Some(route) = state.active_route() else {
        return Ok(Json(GenerateReply {
            text: NOT_CONFIGURED_REPLY.to_string(),
        }));
    };

    debug!(model = %route.model, turns = turns.len(), "Relaying to upstream");
    let mut result = route.gateway.generate(&turns).await;

    if matches!(&result, Err(e) if e.status() == Some(410)) {
        if let Some(fallback) = state.switch_to_fallback() {
            result = fallback.gateway.generate(&turns).await;
        }
    }

    match result {
        Ok(text) => Ok(Json(GenerateReply { text })),
        Err(e) => {
            error!(model = %state.active_model(), "Upstream request failed: {}", e);
            Err(ApiError::from(e))
        }
    }
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        model: state.active_model().to_string(),
        uptime_seconds: state.uptime().as_secs(),
        requests: state.request_count(),
    })
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
