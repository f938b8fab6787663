//! Fakes shared by the unit tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, oneshot};

use codementor_protocols::{
    ChatTurn, ChatView, GatewayError, ModelGateway, ProblemContext, ProblemContextSource,
    PromptTurn,
};

/// Gateway answering from a queue of scripted replies.
#[derive(Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: Mutex<Vec<Vec<PromptTurn>>>,
    release: Mutex<Option<oneshot::Receiver<()>>>,
    pub entered: Notify,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, error: GatewayError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    pub fn push_reply(&self, text: &str) {
        self.replies.lock().push_back(Ok(text.to_string()));
    }

    /// Hold the next call until the returned sender fires or is dropped.
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.release.lock() = Some(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Vec<PromptTurn>> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    fn id(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, turns: &[PromptTurn]) -> Result<String, GatewayError> {
        self.calls.lock().push(turns.to_vec());
        self.entered.notify_one();
        let hold = self.release.lock().take();
        if let Some(rx) = hold {
            let _ = rx.await;
        }
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Network("no scripted reply".to_string())))
    }
}

/// What a [`RecordingView`] was asked to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Turn(ChatTurn),
    Loading,
    ClearLoading,
    Notice(String),
    Clear,
    Badge(usize, bool),
}

#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Notice(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn turns(&self) -> Vec<ChatTurn> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ViewEvent::Turn(turn) => Some(turn),
                _ => None,
            })
            .collect()
    }

    pub fn take(&self) -> Vec<ViewEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl ChatView for RecordingView {
    fn show_turn(&self, turn: &ChatTurn) {
        self.events.lock().push(ViewEvent::Turn(turn.clone()));
    }

    fn show_loading(&self) {
        self.events.lock().push(ViewEvent::Loading);
    }

    fn clear_loading(&self) {
        self.events.lock().push(ViewEvent::ClearLoading);
    }

    fn show_notice(&self, text: &str) {
        self.events.lock().push(ViewEvent::Notice(text.to_string()));
    }

    fn clear(&self) {
        self.events.lock().push(ViewEvent::Clear);
    }

    fn review_badge(&self, count: usize, has_notification: bool) {
        self.events.lock().push(ViewEvent::Badge(count, has_notification));
    }
}

/// Page context that only changes when told to.
pub struct StaticContext {
    url: Mutex<String>,
    context: Mutex<ProblemContext>,
}

impl StaticContext {
    pub fn new(url: &str, context: ProblemContext) -> Self {
        Self {
            url: Mutex::new(url.to_string()),
            context: Mutex::new(context),
        }
    }

    pub fn navigate(&self, url: &str, context: ProblemContext) {
        *self.url.lock() = url.to_string();
        *self.context.lock() = context;
    }
}

#[async_trait]
impl ProblemContextSource for StaticContext {
    async fn current_url(&self) -> String {
        self.url.lock().clone()
    }

    async fn context(&self) -> ProblemContext {
        self.context.lock().clone()
    }
}
