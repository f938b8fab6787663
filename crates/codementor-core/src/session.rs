//! Per-problem session state owned by the conversation manager.

use codementor_protocols::{ChatTurn, ProblemKey, Transcript};

/// Identifies the problem session a request was issued in.
///
/// A reply is applied only if the token still matches when it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub key: Option<ProblemKey>,
    pub epoch: u64,
}

/// In-memory state of the active problem.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// URL the session was created for.
    pub problem_url: String,
    /// Storage key derived from the URL, if it names a problem.
    pub problem_key: Option<ProblemKey>,
    /// Visible transcript.
    pub history: Transcript,
    /// Successful helpful turns since the last recommendation cycle.
    pub helpful_count: u32,
    epoch: u64,
    attached: bool,
}

impl SessionState {
    pub fn new(problem_url: impl Into<String>) -> Self {
        let problem_url = problem_url.into();
        Self {
            problem_key: ProblemKey::from_url(&problem_url),
            problem_url,
            ..Self::default()
        }
    }

    pub fn token(&self) -> SessionToken {
        SessionToken {
            key: self.problem_key.clone(),
            epoch: self.epoch,
        }
    }

    pub fn is_current(&self, token: &SessionToken) -> bool {
        self.token() == *token
    }

    /// Whether a session has been started for exactly `url`.
    pub fn is_attached_to(&self, url: &str) -> bool {
        self.attached && self.problem_url == url
    }

    /// Start a fresh session for `url`, invalidating outstanding tokens.
    pub fn reset_for(&mut self, url: impl Into<String>) {
        let epoch = self.epoch.wrapping_add(1);
        *self = Self::new(url);
        self.epoch = epoch;
        self.attached = true;
    }

    /// Clear the transcript and counter of the current problem,
    /// invalidating outstanding tokens.
    pub fn clear(&mut self) {
        let url = std::mem::take(&mut self.problem_url);
        self.reset_for(url);
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.history.push(turn);
    }

    /// Drop the last turn if it is `turn`.
    pub fn rollback(&mut self, turn: &ChatTurn) -> bool {
        if self.history.last() == Some(turn) {
            self.history.pop();
            true
        } else {
            false
        }
    }

    /// Account for a successful default-path turn.
    ///
    /// Returns `true` when a recommendation cycle should fire. A firing
    /// turn resets the counter to zero and is not itself counted.
    pub fn record_success(&mut self, helpful: bool, threshold: u32) -> bool {
        if self.helpful_count >= threshold {
            self.helpful_count = 0;
            return true;
        }
        if helpful {
            self.helpful_count += 1;
        }
        false
    }
}
