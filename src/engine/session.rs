use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Text supplied by the user.
    User,
    /// Text produced by the engine.
    Bot,
}

/// One entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Who produced the text.
    pub role: Role,
    /// The text as delivered.
    pub text: String,
    /// When the record was created.
    pub at: DateTime<Utc>,
}

impl TurnRecord {
    /// Record a user utterance.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    /// Record an engine reply.
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Per-conversation context, immutable within a turn.
///
/// Execution reads the previous snapshot and produces the next one through
/// [`SessionContext::advance`]; nothing is ever rolled back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Stable identifier for the conversation session.
    pub id: Uuid,
    /// Ordered turn records, oldest first.
    pub history: Vec<TurnRecord>,
    /// Name of the intent executed on the previous turn.
    pub last_intent: Option<String>,
    /// Snapshot of the environment at the end of the previous turn.
    pub last_variables: HashMap<String, String>,
}

impl SessionContext {
    /// Start a fresh session with an empty history.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            history: Vec::new(),
            last_intent: None,
            last_variables: HashMap::new(),
        }
    }

    /// Whether no intent has completed in this session yet.
    pub fn is_first_turn(&self) -> bool {
        self.last_intent.is_none()
    }

    /// The trailing `window` records of the history.
    pub fn recent_history(&self, window: usize) -> &[TurnRecord] {
        let start = self.history.len().saturating_sub(window);
        &self.history[start..]
    }

    /// Produce the next snapshot after a completed intent execution.
    ///
    /// Appends the user utterance (when the caller had one) and the reply to
    /// the history, records the executed intent name, and replaces the
    /// variable snapshot with the environment's final state.
    pub fn advance(
        &self,
        utterance: Option<&str>,
        intent_name: &str,
        response: Option<&str>,
        variables: HashMap<String, String>,
    ) -> SessionContext {
        let mut history = self.history.clone();
        if let Some(text) = utterance {
            history.push(TurnRecord::user(text));
        }
        if let Some(text) = response {
            history.push(TurnRecord::bot(text));
        }
        SessionContext {
            id: self.id,
            history,
            last_intent: Some(intent_name.to_string()),
            last_variables: variables,
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
