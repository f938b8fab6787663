//! Conversation manager.
//!
//! Owns the transcript of the active problem, classifies each query,
//! decides whether the model is called and checkpoints the transcript
//! after every answered turn. At most one `submit` runs at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use codementor_config::MentorConfig;
use codementor_protocols::{
    ChatTurn, ChatView, ModelGateway, PageEvent, ProblemContextSource, ProblemKey,
    ReviewCatalog, SolvedProblem, Transcript,
};

use crate::classifier::{QueryKind, classify};
use crate::error::MentorError;
use crate::hints::{pick_hint, render_hint};
use crate::normalize::ProblemNormalizer;
use crate::prompts::{
    FALLBACK_CONCEPT, GREETING_REPLY, NO_RECOMMENDATIONS_NOTICE, OFF_TOPIC_REFUSAL,
    build_prompt, error_notice,
};
use crate::recommend::{RecommendationEngine, RecommendationOutcome};
use crate::session::SessionState;
use crate::store::MentorStores;

/// Why a submission was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Blank input.
    Empty,
    /// Another submission is in flight.
    Busy,
}

/// Result of [`ConversationManager::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Ignored(IgnoreReason),
    Greeting,
    ShortHint { hint: String },
    OffTopic,
    Answered {
        reply: String,
        /// Set when this turn fired a recommendation cycle.
        recommendation: Option<RecommendationOutcome>,
    },
    /// The gateway failed; the user turn was rolled back.
    Failed { error: String },
    /// The page moved to another problem before the reply arrived.
    Discarded,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ConversationManager {
    gateway: Arc<dyn ModelGateway>,
    stores: MentorStores,
    recommender: RecommendationEngine,
    context: Arc<dyn ProblemContextSource>,
    view: Arc<dyn ChatView>,
    config: MentorConfig,
    state: Mutex<SessionState>,
    busy: AtomicBool,
}

impl ConversationManager {
    pub fn new(
        gateway: Arc<dyn ModelGateway>,
        stores: MentorStores,
        context: Arc<dyn ProblemContextSource>,
        view: Arc<dyn ChatView>,
        config: MentorConfig,
    ) -> Self {
        let recommender = RecommendationEngine::new(gateway.clone(), &stores)
            .with_normalizer(ProblemNormalizer::new(config.site_origin.clone()));
        Self {
            gateway,
            stores,
            recommender,
            context,
            view,
            config,
            state: Mutex::new(SessionState::default()),
            busy: AtomicBool::new(false),
        }
    }

    /// Replace the recommendation engine.
    pub fn with_recommender(mut self, recommender: RecommendationEngine) -> Self {
        self.recommender = recommender;
        self
    }

    pub fn transcript(&self) -> Transcript {
        self.state.lock().history.clone()
    }

    pub fn helpful_count(&self) -> u32 {
        self.state.lock().helpful_count
    }

    pub fn problem_key(&self) -> Option<ProblemKey> {
        self.state.lock().problem_key.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Load the session for the page currently shown.
    pub async fn attach(&self) -> usize {
        let url = self.context.current_url().await;
        let restored = self.on_problem_changed(&url).await;
        self.refresh_badge().await;
        restored
    }

    /// Dispatch one page lifecycle event.
    pub async fn handle_page_event(&self, event: PageEvent) {
        match event {
            PageEvent::HookReady => {
                self.attach().await;
            }
            PageEvent::ProblemChanged { url } => {
                self.on_problem_changed(&url).await;
            }
        }
    }

    /// Consume lifecycle events until the channel closes.
    pub async fn run(&self, mut events: broadcast::Receiver<PageEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => self.handle_page_event(event).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Page events lagged; resyncing with the live URL");
                    let url = self.context.current_url().await;
                    self.on_problem_changed(&url).await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    /// Reset the session for `url` and restore its stored transcript.
    ///
    /// A repeated event for the URL already attached leaves the session
    /// and any in-flight reply untouched. Returns the number of restored
    /// turns.
    pub async fn on_problem_changed(&self, url: &str) -> usize {
        let token = {
            let mut state = self.state.lock();
            if state.is_attached_to(url) {
                debug!(url, "Page unchanged; keeping session");
                return 0;
            }
            state.reset_for(url);
            state.token()
        };
        self.view.clear();

        let Some(key) = token.key.clone() else {
            debug!(url, "Page is not a problem page");
            return 0;
        };
        let turns = match self.stores.history.load(&key).await {
            Ok(turns) => turns,
            Err(e) => {
                warn!(problem = %key, error = %e, "Failed to load transcript");
                return 0;
            }
        };

        {
            let mut state = self.state.lock();
            if !state.is_current(&token) {
                return 0;
            }
            state.history = turns.clone();
        }
        for turn in &turns {
            self.view.show_turn(turn);
        }
        info!(problem = %key, turns = turns.len(), "Restored transcript");
        turns.len()
    }

    /// Handle one user query.
    pub async fn submit(&self, query: &str) -> SubmitOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SubmitOutcome::Ignored(IgnoreReason::Empty);
        }
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            debug!("Submission ignored while a reply is pending");
            return SubmitOutcome::Ignored(IgnoreReason::Busy);
        };

        let live_url = self.context.current_url().await;
        self.on_problem_changed(&live_url).await;

        match classify(query) {
            QueryKind::Greeting => {
                self.append_canned(query, GREETING_REPLY).await;
                SubmitOutcome::Greeting
            }
            QueryKind::OffTopic => {
                self.append_canned(query, OFF_TOPIC_REFUSAL).await;
                SubmitOutcome::OffTopic
            }
            QueryKind::ShortHint => self.short_hint(query).await,
            QueryKind::Question { helpful } => self.ask_model(query, helpful).await,
        }
    }

    async fn append_canned(&self, query: &str, reply: &str) {
        let user = ChatTurn::user(query);
        let model = ChatTurn::model(reply);
        let (key, snapshot) = {
            let mut state = self.state.lock();
            state.push(user.clone());
            state.push(model.clone());
            (state.problem_key.clone(), state.history.clone())
        };
        self.view.show_turn(&user);
        self.view.show_turn(&model);
        self.persist(key, &snapshot).await;
    }

    async fn short_hint(&self, query: &str) -> SubmitOutcome {
        let user = ChatTurn::user(query);
        self.view.show_turn(&user);
        let token = self.state.lock().token();

        let ctx = self.context.context().await;
        let topic = if ctx.has_title() {
            match self.recommender.topic_for(ctx.title.trim()).await {
                Ok(topic) => topic,
                Err(e) => {
                    warn!(error = %e, "Topic lookup failed; using the general label");
                    FALLBACK_CONCEPT.to_string()
                }
            }
        } else {
            FALLBACK_CONCEPT.to_string()
        };

        let last = match &token.key {
            Some(key) => self.stores.hints.last_hint(key).await.unwrap_or_else(|e| {
                warn!(problem = %key, error = %e, "Failed to read last hint");
                None
            }),
            None => None,
        };
        let seed = token.key.as_ref().map(ProblemKey::as_str).unwrap_or_default();
        let template = pick_hint(seed, last.as_deref());
        let hint = render_hint(template, &topic);
        let model = ChatTurn::model(hint.clone());

        let snapshot = {
            let mut state = self.state.lock();
            if !state.is_current(&token) {
                return SubmitOutcome::Discarded;
            }
            state.push(user);
            state.push(model.clone());
            state.history.clone()
        };
        if let Some(key) = &token.key {
            if let Err(e) = self.stores.hints.set_last_hint(key, template).await {
                warn!(problem = %key, error = %e, "Failed to store last hint");
            }
        }
        self.view.show_turn(&model);
        self.persist(token.key, &snapshot).await;
        SubmitOutcome::ShortHint { hint }
    }

    async fn ask_model(&self, query: &str, helpful: bool) -> SubmitOutcome {
        let user = ChatTurn::user(query);
        let (token, history) = {
            let mut state = self.state.lock();
            state.push(user.clone());
            (state.token(), state.history.clone())
        };
        self.view.show_turn(&user);
        self.view.show_loading();

        let ctx = self.context.context().await;
        let prompt = build_prompt(&history, &ctx, &self.config);
        let result = self.gateway.generate(&prompt).await;
        self.view.clear_loading();

        let reply = match result {
            Ok(reply) => reply,
            Err(e) => {
                let current = {
                    let mut state = self.state.lock();
                    let current = state.is_current(&token);
                    if current {
                        state.rollback(&user);
                    }
                    current
                };
                if !current {
                    debug!(error = %e, "Dropping failure for a previous problem");
                    return SubmitOutcome::Discarded;
                }
                warn!(gateway = self.gateway.id(), error = %e, "Model call failed");
                self.view.show_notice(&error_notice(&e.to_string()));
                return SubmitOutcome::Failed {
                    error: e.to_string(),
                };
            }
        };

        let model = ChatTurn::model(reply.clone());
        let (fire, snapshot) = {
            let mut state = self.state.lock();
            if !state.is_current(&token) {
                debug!("Dropping reply for a previous problem");
                return SubmitOutcome::Discarded;
            }
            state.push(model.clone());
            let fire = state.record_success(helpful, self.config.recommendation_threshold);
            (fire, state.history.clone())
        };
        self.view.show_turn(&model);
        self.persist(token.key, &snapshot).await;

        let recommendation = if fire {
            Some(self.run_recommendation(&ctx.title).await)
        } else {
            None
        };
        SubmitOutcome::Answered {
            reply,
            recommendation,
        }
    }

    async fn run_recommendation(&self, title: &str) -> RecommendationOutcome {
        info!(title, "Recommendation cycle triggered");
        let outcome = self.recommender.recommend(title).await;
        match &outcome {
            RecommendationOutcome::Added(_) => self.refresh_badge().await,
            RecommendationOutcome::NoProblems { .. } | RecommendationOutcome::Failed { .. } => {
                self.view.show_notice(NO_RECOMMENDATIONS_NOTICE)
            }
            RecommendationOutcome::Skipped | RecommendationOutcome::Duplicate(_) => {}
        }
        outcome
    }

    async fn persist(&self, key: Option<ProblemKey>, turns: &[ChatTurn]) {
        let Some(key) = key else {
            return;
        };
        match self.stores.history.save(&key, turns).await {
            Ok(()) => debug!(problem = %key, turns = turns.len(), "Saved transcript"),
            Err(e) => warn!(problem = %key, error = %e, "Failed to save transcript"),
        }
    }

    /// The review catalog; viewing it clears the notification flag.
    pub async fn review_catalog(&self) -> Result<ReviewCatalog, MentorError> {
        let catalog = self.stores.catalog.list().await?;
        self.stores.notifications.set_notification(false).await?;
        self.view.review_badge(catalog.len(), false);
        Ok(catalog)
    }

    /// Push the catalog size and notification flag to the view.
    pub async fn refresh_badge(&self) {
        let count = self.stores.catalog.list().await.map(|c| c.len());
        let pending = self.stores.notifications.has_notification().await;
        match (count, pending) {
            (Ok(count), Ok(pending)) => self.view.review_badge(count, pending),
            (Err(e), _) | (_, Err(e)) => warn!(error = %e, "Failed to read review badge state"),
        }
    }

    /// Record the current problem as solved, labelled with its topic.
    ///
    /// Returns whether it was newly recorded.
    pub async fn mark_solved(&self) -> Result<bool, MentorError> {
        let ctx = self.context.context().await;
        if !ctx.has_title() {
            return Ok(false);
        }
        let title = ctx.title.trim();
        let topic = self.recommender.topic_for(title).await?;
        let added = self
            .stores
            .solved
            .record(SolvedProblem {
                title: title.to_string(),
                topic,
            })
            .await?;
        Ok(added)
    }

    /// Clear all stored assistant state and the in-memory session.
    pub async fn reset(&self) -> Result<usize, MentorError> {
        let removed = self.stores.reset().await?;
        self.state.lock().clear();
        self.view.clear();
        self.refresh_badge().await;
        Ok(removed)
    }
}

#[cfg(test)]
#[path = "conversation_tests.rs"]
mod tests;
