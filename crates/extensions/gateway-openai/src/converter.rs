//! Prompt conversion for the chat-completions API.

use codementor_protocols::PromptTurn;

use crate::api::ApiMessage;

/// Convert prompt turns to API messages, dropping blank ones.
///
/// Model turns are sent with the `assistant` role.
pub fn convert_turns(turns: &[PromptTurn]) -> Vec<ApiMessage> {
    turns
        .iter()
        .filter(|turn| !turn.text.trim().is_empty())
        .map(|turn| ApiMessage {
            role: turn.role.wire_label().to_string(),
            content: turn.text.clone(),
        })
        .collect()
}
