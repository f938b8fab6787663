//! Page-facing collaborators: context extraction, presentation and
//! navigation notifications.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::types::{ChatTurn, ProblemContext};

/// Reads the state of the problem page.
#[async_trait]
pub trait ProblemContextSource: Send + Sync {
    /// The live page URL.
    async fn current_url(&self) -> String;

    /// Title, description and editor contents of the current problem.
    async fn context(&self) -> ProblemContext;
}

/// Presentation of the chat panel.
///
/// Every method defaults to doing nothing so hosts only implement what
/// they render.
pub trait ChatView: Send + Sync {
    /// Render a transcript turn.
    fn show_turn(&self, _turn: &ChatTurn) {}

    /// Show the pending-reply indicator.
    fn show_loading(&self) {}

    /// Remove the pending-reply indicator.
    fn clear_loading(&self) {}

    /// Show a message that is not part of the transcript.
    fn show_notice(&self, _text: &str) {}

    /// Remove every rendered turn.
    fn clear(&self) {}

    /// Refresh the review badge.
    fn review_badge(&self, _count: usize, _has_notification: bool) {}
}

/// A view that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullChatView;

impl ChatView for NullChatView {}

/// Page lifecycle notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageEvent {
    /// The page finished loading the element the assistant attaches to.
    HookReady,

    /// The page navigated to another URL.
    ProblemChanged { url: String },
}

/// Source of page lifecycle notifications.
pub trait PageLifecycle: Send + Sync {
    /// Subscribe to future events.
    fn subscribe(&self) -> broadcast::Receiver<PageEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_event_serialization() {
        let event = PageEvent::ProblemChanged {
            url: "https://leetcode.com/problems/two-sum/".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "problem_changed");
        assert_eq!(json["url"], "https://leetcode.com/problems/two-sum/");

        let json = serde_json::to_value(PageEvent::HookReady).unwrap();
        assert_eq!(json["type"], "hook_ready");
    }

    #[test]
    fn test_null_view_accepts_everything() {
        let view = NullChatView;
        view.show_turn(&ChatTurn::user("hi"));
        view.show_loading();
        view.clear_loading();
        view.show_notice("notice");
        view.clear();
        view.review_badge(3, true);
    }
}
