//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub mentor: MentorConfig,
}

/// Proxy server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; `"*"` allows any.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in kilobytes.
    #[serde(default = "default_body_limit_kb")]
    pub body_limit_kb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            body_limit_kb: default_body_limit_kb(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_body_limit_kb() -> usize {
    300
}

/// Model vendor (OpenAI-compatible chat completions) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// Model to switch to when the configured one is gone (HTTP 410).
    #[serde(default = "default_fallback_model", skip_serializing_if = "Option::is_none")]
    pub fallback_model: Option<String>,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_key: None,
            model: default_model(),
            fallback_model: default_fallback_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://router.huggingface.co/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "gpt2".to_string()
}

fn default_fallback_model() -> Option<String> {
    Some("gpt2".to_string())
}

fn default_max_tokens() -> u32 {
    300
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout() -> u64 {
    60
}

/// Chat client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Proxy endpoint receiving `{ contents }` requests.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// SQLite file backing the key-value store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            store_path: default_store_path(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:3000/api/generate".to_string()
}

fn default_store_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".codementor")
        .join("store.db")
}

/// Conversation and recommendation tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorConfig {
    /// Origin used to absolutize and synthesize problem URLs.
    #[serde(default = "default_site_origin")]
    pub site_origin: String,

    /// Helpful turns needed before a recommendation cycle fires.
    #[serde(default = "default_recommendation_threshold")]
    pub recommendation_threshold: u32,

    /// Transcript turns forwarded to the model with each question.
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// Problem description is cut to this many characters in prompts.
    #[serde(default = "default_max_description_chars")]
    pub max_description_chars: usize,
}

impl Default for MentorConfig {
    fn default() -> Self {
        Self {
            site_origin: default_site_origin(),
            recommendation_threshold: default_recommendation_threshold(),
            max_history_turns: default_max_history_turns(),
            max_description_chars: default_max_description_chars(),
        }
    }
}

fn default_site_origin() -> String {
    "https://leetcode.com".to_string()
}

fn default_recommendation_threshold() -> u32 {
    3
}

fn default_max_history_turns() -> usize {
    20
}

fn default_max_description_chars() -> usize {
    6000
}
