//! Application state.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::warn;

use codementor_protocols::ModelGateway;

/// A gateway bound to the model it targets.
#[derive(Clone)]
pub struct ModelRoute {
    pub model: String,
    pub gateway: Arc<dyn ModelGateway>,
}

impl ModelRoute {
    pub fn new(model: impl Into<String>, gateway: Arc<dyn ModelGateway>) -> Self {
        Self {
            model: model.into(),
            gateway,
        }
    }
}

/// Application state shared across handlers.
///
/// `primary` is `None` when the server has no upstream API key.
pub struct AppState {
    primary: Option<ModelRoute>,
    fallback: Option<ModelRoute>,
    configured_model: String,
    on_fallback: AtomicBool,
    start_time: Instant,
    request_count: AtomicU64,
}

impl AppState {
    pub fn new(model: impl Into<String>, primary: Option<Arc<dyn ModelGateway>>) -> Self {
        let model = model.into();
        Self {
            primary: primary.map(|gateway| ModelRoute::new(model.clone(), gateway)),
            fallback: None,
            configured_model: model,
            on_fallback: AtomicBool::new(false),
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
        }
    }

    /// Route used after the primary model answers 410 Gone.
    pub fn with_fallback(mut self, model: impl Into<String>, gateway: Arc<dyn ModelGateway>) -> Self {
        self.fallback = Some(ModelRoute::new(model, gateway));
        self
    }

    pub fn is_configured(&self) -> bool {
        self.primary.is_some()
    }

    /// The route requests currently go to.
    pub fn active_route(&self) -> Option<&ModelRoute> {
        if self.on_fallback.load(Ordering::SeqCst) {
            self.fallback.as_ref().or(self.primary.as_ref())
        } else {
            self.primary.as_ref()
        }
    }

    /// Name of the model requests currently go to.
    pub fn active_model(&self) -> &str {
        self.active_route()
            .map(|route| route.model.as_str())
            .unwrap_or(&self.configured_model)
    }

    /// Switch to the fallback route for good.
    ///
    /// Returns the fallback route, or `None` when there is none or the
    /// switch already happened.
    pub fn switch_to_fallback(&self) -> Option<&ModelRoute> {
        let fallback = self.fallback.as_ref()?;
        if self.on_fallback.swap(true, Ordering::SeqCst) {
            return None;
        }
        warn!(from = %self.configured_model, to = %fallback.model, "Upstream model is gone, switching to fallback");
        Some(fallback)
    }

    /// Get uptime.
    pub fn uptime(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }

    /// Get request count.
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// Increment request count.
    pub fn increment_requests(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}
