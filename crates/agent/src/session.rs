//! Conversation session state
//!
//! Owned by the screen controller and passed explicitly to the orchestrator.
//! Created on screen entry, discarded on exit; never persisted or shared
//! across sessions.

use sahayak_core::{Language, Turn, TurnRole};

/// Session behavior configuration
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub language: Language,
    /// Optional cap on retained user/assistant turns; `None` is unbounded
    pub history_limit: Option<usize>,
}

/// Per-conversation state
pub struct ConversationSession {
    session_id: String,
    scheme_context: Option<String>,
    history: Vec<Turn>,
    pending_backend_request: Option<String>,
    language: Language,
    history_limit: Option<usize>,
}

impl ConversationSession {
    /// Create a fresh session with a generated id
    pub fn new(scheme_context: Option<String>, config: SessionConfig) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            scheme_context,
            history: Vec::new(),
            pending_backend_request: None,
            language: config.language,
            history_limit: config.history_limit,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn scheme_context(&self) -> Option<&str> {
        self.scheme_context.as_deref()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Ordered history, used verbatim as LLM context
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn pending_backend_request(&self) -> Option<&str> {
        self.pending_backend_request.as_deref()
    }

    pub fn set_pending_backend_request(&mut self, request: Option<String>) {
        self.pending_backend_request = request;
    }

    pub fn is_bootstrapped(&self) -> bool {
        !self.history.is_empty()
    }

    /// Seed the system instruction as the first turn
    pub fn seed_system(&mut self, instruction: impl Into<String>) {
        debug_assert!(self.history.is_empty(), "system turn must be first");
        self.history.push(Turn::system(instruction));
    }

    /// Append a standalone assistant turn (session-bootstrap greeting)
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.history.push(Turn::assistant(content));
        self.apply_retention();
    }

    /// Commit one completed turn: a user message and its assistant reply
    ///
    /// Committing both together keeps a failed leg from leaving an orphaned
    /// user turn behind.
    pub fn push_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.history.push(Turn::user(user));
        self.history.push(Turn::assistant(assistant));
        self.apply_retention();
    }

    fn apply_retention(&mut self) {
        let Some(limit) = self.history_limit else {
            return;
        };

        // The system turn is always kept; oldest exchanges drop in pairs.
        loop {
            let kept = self
                .history
                .iter()
                .filter(|t| t.role != TurnRole::System)
                .count();
            if kept <= limit {
                break;
            }
            if let Some(pos) = self.history.iter().position(|t| t.role != TurnRole::System) {
                self.history.remove(pos);
                tracing::warn!(limit, "history limit reached, dropped oldest turn");
            } else {
                break;
            }
        }
    }
}
