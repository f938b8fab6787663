//! Chat turn types.

use serde::{Deserialize, Serialize};

/// A turn in a problem transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who produced the turn.
    pub role: ChatRole,

    /// Plain text of the turn.
    pub text: String,
}

impl ChatTurn {
    /// Create a user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// Create a model turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// Role of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

/// Ordered transcript for one problem.
pub type Transcript = Vec<ChatTurn>;

/// A role-tagged block sent to a [`ModelGateway`](crate::ModelGateway).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTurn {
    pub role: PromptRole,
    pub text: String,
}

impl PromptTurn {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Model,
            text: text.into(),
        }
    }
}

impl From<&ChatTurn> for PromptTurn {
    fn from(turn: &ChatTurn) -> Self {
        let role = match turn.role {
            ChatRole::User => PromptRole::User,
            ChatRole::Model => PromptRole::Model,
        };
        Self {
            role,
            text: turn.text.clone(),
        }
    }
}

/// Role of a prompt block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Model,
}

impl PromptRole {
    /// Parse a loosely-labelled role as sent by clients.
    ///
    /// `model`, `assistant` and `ai` all map to [`PromptRole::Model`];
    /// anything unrecognised is treated as a user block.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "system" => PromptRole::System,
            "model" | "assistant" | "ai" => PromptRole::Model,
            _ => PromptRole::User,
        }
    }

    /// Label used by OpenAI-compatible chat APIs.
    pub fn wire_label(&self) -> &'static str {
        match self {
            PromptRole::System => "system",
            PromptRole::User => "user",
            PromptRole::Model => "assistant",
        }
    }
}

#[cfg(test)]
#[path = "turn_tests.rs"]
mod tests;
