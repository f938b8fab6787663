//! Tolerant text extraction from response envelopes.
//!
//! OpenAI-compatible servers disagree on where the generated text lives,
//! and the proxy answers `{ text }`. [`extract_text`] accepts every shape
//! seen in practice and falls back to the serialized payload rather than
//! failing.

use serde_json::Value;

/// Returned when a response carries no text at all.
pub const NO_TEXT: &str = "Model returned no text.";

/// Extract the reply text from a response payload. Never empty.
pub fn extract_text(payload: &Value) -> String {
    let text = choice_text(payload)
        .or_else(|| {
            payload
                .get("text")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .or_else(|| {
            payload
                .get("error")
                .filter(|e| !e.is_null())
                .map(|e| format!("Model error: {}", describe_error(e)))
        })
        .unwrap_or_else(|| payload.to_string());

    if text.trim().is_empty() {
        NO_TEXT.to_string()
    } else {
        text
    }
}

/// Reply text of a raw success body; non-JSON bodies are returned verbatim.
pub fn body_text(body: String) -> String {
    match serde_json::from_str::<Value>(&body) {
        Ok(payload) => extract_text(&payload),
        Err(_) if body.trim().is_empty() => NO_TEXT.to_string(),
        Err(_) => body,
    }
}

fn choice_text(payload: &Value) -> Option<String> {
    let choice = payload.get("choices")?.get(0)?;
    if let Some(message) = choice.get("message") {
        return Some(message_text(message));
    }
    choice
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn message_text(message: &Value) -> String {
    match message.get("content") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(part_text)
            .collect::<Vec<_>>()
            .join("\n"),
        Some(Value::Object(content)) => content
            .get("value")
            .or_else(|| content.get("text"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| Value::Object(content.clone()).to_string()),
        _ => message.to_string(),
    }
}

fn part_text(part: &Value) -> Option<String> {
    match part {
        Value::String(text) => Some(text.clone()),
        Value::Object(fields) => fields
            .get("text")
            .or_else(|| fields.get("value"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn describe_error(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        other => other
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| other.to_string()),
    }
}
