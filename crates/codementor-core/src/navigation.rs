//! In-process page lifecycle notifier.
//!
//! Hosts report what they observe (the chat hook becoming available, the
//! current URL); [`PageNotifier`] turns that into [`PageEvent`]s, emitting
//! `ProblemChanged` only when the URL actually changes.

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::debug;

use codementor_protocols::{PageEvent, PageLifecycle};

const CHANNEL_CAPACITY: usize = 32;

pub struct PageNotifier {
    sender: broadcast::Sender<PageEvent>,
    last_url: Mutex<Option<String>>,
}

impl PageNotifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            last_url: Mutex::new(None),
        }
    }

    /// Report that the chat panel can be attached.
    pub fn hook_ready(&self) {
        let _ = self.sender.send(PageEvent::HookReady);
    }

    /// Report the URL currently shown. Returns whether a change was emitted.
    ///
    /// The first observed URL only seeds the watcher.
    pub fn observe_url(&self, url: &str) -> bool {
        let url = url.trim();
        let mut last = self.last_url.lock();
        if last.as_deref() == Some(url) {
            return false;
        }
        let seeded = last.replace(url.to_string()).is_some();
        drop(last);
        if !seeded {
            return false;
        }
        debug!(url, "Page URL changed");
        let _ = self.sender.send(PageEvent::ProblemChanged {
            url: url.to_string(),
        });
        true
    }

    /// Emit a change to `url` unconditionally.
    pub fn navigate(&self, url: &str) {
        *self.last_url.lock() = Some(url.trim().to_string());
        let _ = self.sender.send(PageEvent::ProblemChanged {
            url: url.trim().to_string(),
        });
    }
}

impl Default for PageNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PageLifecycle for PageNotifier {
    fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_only_changes_are_emitted() {
        let notifier = PageNotifier::new();
        let mut rx = notifier.subscribe();

        assert!(!notifier.observe_url("https://leetcode.com/problems/two-sum/"));
        assert!(!notifier.observe_url("https://leetcode.com/problems/two-sum/"));
        assert!(notifier.observe_url("https://leetcode.com/problems/3sum/"));

        assert_eq!(
            rx.recv().await.unwrap(),
            PageEvent::ProblemChanged {
                url: "https://leetcode.com/problems/3sum/".to_string()
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_hook_ready_and_navigate() {
        let notifier = PageNotifier::new();
        let mut rx = notifier.subscribe();
        notifier.hook_ready();
        notifier.navigate("https://leetcode.com/problems/two-sum/");

        assert_eq!(rx.recv().await.unwrap(), PageEvent::HookReady);
        assert!(matches!(rx.recv().await.unwrap(), PageEvent::ProblemChanged { .. }));
        assert!(!notifier.observe_url("https://leetcode.com/problems/two-sum/"));
    }

    #[test]
    fn test_send_without_subscribers() {
        let notifier = PageNotifier::new();
        notifier.hook_ready();
        notifier.observe_url("a");
        assert!(notifier.observe_url("b"));
    }
}
