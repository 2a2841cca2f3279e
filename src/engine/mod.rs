//! Execution engine and public API
//!
//! This module provides the tree-walking [`Interpreter`] that executes intent
//! programs, together with the pieces it is assembled from: the variable
//! environment, session context, template interpolation, the built-in
//! function registry, the local fallback matcher, and the classifier seam.

use serde::{Deserialize, Serialize};

// Submodules
pub mod builtins;
pub mod classifier;
pub mod env;
pub mod error;
pub mod interpreter;
pub mod matcher;
pub mod session;
pub mod template;

pub use builtins::FunctionRegistry;
pub use classifier::{
    ClassifierError, ClassifyRequest, IntentCandidate, IntentClassifier, KeywordClassifier,
};
pub use env::Environment;
pub use error::{EngineError, Result};
pub use interpreter::{ConversationHost, Interpreter, StdioHost, TurnOutcome};
pub use matcher::fallback_match;
pub use session::{Role, SessionContext, TurnRecord};
pub use template::{TemplateContext, interpolate};

/// Variable names carried across turns when no explicit override is set.
///
/// The observed scripts are order/refund workflows; these are the bindings a
/// follow-up turn can legitimately pick up from the previous one.
pub const DEFAULT_CARRIED_KEYS: &[&str] = &["order_number", "order_id", "reason", "description"];

/// Configuration for the Colloquy engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reply emitted when no intent matches an utterance
    pub fallback_reply: String,

    /// Substitution for `{last_intent}` before any turn has completed
    pub last_intent_default: String,

    /// Variable names carried forward from the previous turn's bindings
    pub carried_keys: Vec<String>,

    /// Number of recent turn records handed to the classifier
    pub history_window: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fallback_reply: "Sorry, I didn't understand that.".to_string(),
            last_intent_default: "none".to_string(),
            carried_keys: DEFAULT_CARRIED_KEYS
                .iter()
                .map(|key| key.to_string())
                .collect(),
            history_window: 6,
        }
    }
}
