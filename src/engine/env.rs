use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-turn variable store mapping identifiers to string values.
///
/// Mutated only by `set` and `wait_for` actions and by the cross-turn
/// carry-over applied at the start of an execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    bindings: HashMap<String, String>,
}

impl Environment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(name.into(), value.into());
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bindings.get(name).map(String::as_str)
    }

    /// Whether `name` is bound.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Resolve a variable reference: the bound value, or the `$name`
    /// placeholder when nothing is bound. Never fails.
    pub fn resolve(&self, name: &str) -> String {
        match self.bindings.get(name) {
            Some(value) => value.clone(),
            None => format!("${name}"),
        }
    }

    /// Clone the current bindings into a plain map.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.bindings.clone()
    }

    /// Drop all bindings.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Number of bindings held.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the environment holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
