//! Wire format of the proxy's `/api/generate` endpoint.

use serde::{Deserialize, Serialize};

use super::{PromptRole, PromptTurn};

/// Request body: `{ "contents": [{ "role", "parts": [{ "text" }] }] }`.
///
/// `contents` is optional so the server can answer a missing field with
/// its own error body instead of a deserialization rejection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contents: Option<Vec<GenerateContent>>,
}

impl GenerateRequest {
    pub fn from_turns(turns: &[PromptTurn]) -> Self {
        Self {
            contents: Some(turns.iter().map(GenerateContent::from_turn).collect()),
        }
    }

    /// Text of the last block labelled `user`, or an empty string.
    pub fn last_user_text(&self) -> String {
        self.contents
            .iter()
            .flatten()
            .rev()
            .find(|content| content.role == "user")
            .map(GenerateContent::text)
            .unwrap_or_default()
    }
}

/// One role-tagged block of a generate request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateContent {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<ContentPart>,
}

impl GenerateContent {
    pub fn from_turn(turn: &PromptTurn) -> Self {
        let role = match turn.role {
            PromptRole::System => "system",
            PromptRole::User => "user",
            PromptRole::Model => "model",
        };
        Self {
            role: role.to_string(),
            parts: vec![ContentPart { text: turn.text.clone() }],
        }
    }

    /// Parts joined by newlines.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_turn(&self) -> PromptTurn {
        PromptTurn {
            role: PromptRole::from_label(&self.role),
            text: self.text(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPart {
    #[serde(default)]
    pub text: String,
}

/// Successful reply body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateReply {
    pub text: String,
}

/// Error body returned with a non-2xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateFailure {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
