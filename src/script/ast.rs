use serde::{Deserialize, Serialize};

/// A parsed script: an ordered list of intent declarations.
///
/// Declaration order is load-bearing for the local fallback matcher, which
/// scans intents first-to-last; classifier-driven selection ignores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Intent declarations in source order.
    pub intents: Vec<Intent>,
}

impl Program {
    /// Construct a program from its intent list.
    pub fn new(intents: Vec<Intent>) -> Self {
        Self { intents }
    }

    /// Look up an intent by exact name; the first declaration wins when
    /// duplicates exist.
    pub fn find_intent(&self, name: &str) -> Option<&Intent> {
        self.intents.iter().find(|intent| intent.name == name)
    }
}

/// One named rule: trigger utterances plus an ordered action sequence.
///
/// Names are not required to be unique; duplicates are legal and only the
/// first declared with a matching name is ever selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Human-readable label used for classifier resolution.
    pub name: String,
    /// Trigger clause listing example utterances.
    pub trigger: WhenClause,
    /// Actions executed in declaration order.
    pub actions: Vec<Action>,
}

/// Trigger clause: a non-empty ordered set of literal utterance patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhenClause {
    /// Example utterances, in declaration order.
    pub patterns: Vec<String>,
}

/// One executable step within an intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Action {
    /// Emit a prompt; no state change.
    Ask {
        /// Prompt text delivered verbatim.
        message: String,
    },
    /// Suspend for external input and bind the result.
    WaitFor {
        /// Environment variable receiving the input text.
        variable: String,
    },
    /// Interpolate and emit a reply; the last one executed is the turn's
    /// primary result.
    Response {
        /// Template text with `{...}` interpolation spans.
        template: String,
    },
    /// Evaluate an expression and bind it.
    Set {
        /// Environment variable receiving the value.
        variable: String,
        /// Expression evaluated strictly left-to-right.
        expression: Expression,
    },
    /// Emit a list of choices; no state change.
    Options {
        /// Choice labels in declaration order; may be empty.
        choices: Vec<String>,
    },
}

/// An evaluable expression on the right-hand side of `set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Expression {
    /// A literal string value.
    StringLiteral(String),
    /// A variable reference (`name` or `$name`).
    Variable(String),
    /// A call into the built-in function registry.
    FunctionCall {
        /// Function name resolved against the registry at evaluation time.
        name: String,
        /// Arguments, evaluated before the call in declaration order.
        args: Vec<Expression>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_intent_returns_first_declaration_on_duplicates() {
        let make = |marker: &str| Intent {
            name: "help".to_string(),
            trigger: WhenClause {
                patterns: vec![marker.to_string()],
            },
            actions: Vec::new(),
        };
        let program = Program::new(vec![make("first"), make("second")]);
        let found = program.find_intent("help").expect("intent");
        assert_eq!(found.trigger.patterns, vec!["first".to_string()]);
    }

    #[test]
    fn serde_round_trip_preserves_order() {
        let program = Program::new(vec![
            Intent {
                name: "a".to_string(),
                trigger: WhenClause {
                    patterns: vec!["hi".to_string()],
                },
                actions: vec![
                    Action::Ask {
                        message: "?".to_string(),
                    },
                    Action::Response {
                        template: "!".to_string(),
                    },
                ],
            },
            Intent {
                name: "b".to_string(),
                trigger: WhenClause {
                    patterns: vec!["bye".to_string()],
                },
                actions: Vec::new(),
            },
        ]);

        let json = serde_json::to_string(&program).expect("serialize");
        let back: Program = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, program);
    }
}
