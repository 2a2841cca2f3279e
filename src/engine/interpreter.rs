use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

use crate::script::{Action, Expression, Intent, Program};

use super::EngineConfig;
use super::builtins::FunctionRegistry;
use super::classifier::{ClassifierError, ClassifyRequest, IntentCandidate, IntentClassifier};
use super::env::Environment;
use super::matcher;
use super::session::SessionContext;
use super::template::{TemplateContext, interpolate};

/// Host trait implemented by front-ends that drive intent execution.
///
/// The engine pushes every piece of outward text (prompts, option lists,
/// responses) through [`emit`](ConversationHost::emit), and blocks on
/// [`acquire_input`](ConversationHost::acquire_input) for each `wait_for`
/// action. Acquisition is synchronous from the engine's perspective; hosts
/// backed by asynchronous UIs return the collected text, or an empty string
/// on timeout or cancellation.
pub trait ConversationHost {
    /// Deliver one piece of outward-facing text.
    fn emit(&mut self, text: &str);

    /// Synchronously acquire user input for the named variable.
    fn acquire_input(&mut self, variable: &str) -> String;
}

/// Default host: writes to stdout, reads from stdin.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdioHost;

impl ConversationHost for StdioHost {
    fn emit(&mut self, text: &str) {
        println!("{text}");
    }

    fn acquire_input(&mut self, variable: &str) -> String {
        print!("{variable}: ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(_) => line.trim_end_matches(['\n', '\r']).to_string(),
            Err(_) => String::new(),
        }
    }
}

/// Result of executing one intent (or of a failed match).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Name of the executed intent; `None` when nothing matched.
    pub intent: Option<String>,
    /// The last response emitted during the turn, if any.
    pub response: Option<String>,
    /// Final variable bindings of the turn.
    pub bindings: HashMap<String, String>,
}

/// Tree-walking interpreter driving intent programs against a host.
///
/// One instance serves one conversation. All execution is synchronous and
/// sequential; concurrent invocation requires external locking.
pub struct Interpreter<H: ConversationHost> {
    host: H,
    config: EngineConfig,
    functions: FunctionRegistry,
    classifier: Option<Box<dyn IntentClassifier>>,
    intents: Vec<Intent>,
    candidates: Vec<IntentCandidate>,
    env: Environment,
    session: SessionContext,
}

impl<H: ConversationHost> Interpreter<H> {
    /// Create an interpreter with the default configuration and the standard
    /// built-in functions, and no classifier.
    pub fn new(host: H) -> Self {
        Self::with_config(host, EngineConfig::default())
    }

    /// Create an interpreter with an explicit configuration.
    pub fn with_config(host: H, config: EngineConfig) -> Self {
        Self {
            host,
            config,
            functions: FunctionRegistry::with_defaults(),
            classifier: None,
            intents: Vec::new(),
            candidates: Vec::new(),
            env: Environment::new(),
            session: SessionContext::new(),
        }
    }

    /// Attach an external classifier consulted before local fallback.
    pub fn set_classifier(&mut self, classifier: Box<dyn IntentClassifier>) {
        self.classifier = Some(classifier);
    }

    /// The current session snapshot.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// The loaded intents, in declaration order.
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Access the host (for inspection by embedding code).
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the function registry, so embedders can register
    /// their own operations.
    pub fn functions_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.functions
    }

    /// Load a parsed program: stores the intent list and resets the variable
    /// environment. The session context survives a reload.
    pub fn load(&mut self, program: Program) {
        self.candidates = program
            .intents
            .iter()
            .map(|intent| IntentCandidate {
                name: intent.name.clone(),
                patterns: intent.trigger.patterns.clone(),
            })
            .collect();
        self.intents = program.intents;
        self.env.clear();
        info!(intents = self.intents.len(), "program loaded");
    }

    /// Compile script source and load the resulting program in one step.
    ///
    /// Lexical and syntactic errors abort the whole load; the previously
    /// loaded program stays in place and nothing partial ever executes.
    pub fn load_source(&mut self, source: &str) -> super::Result<()> {
        let program = crate::script::parse_program(source)?;
        self.load(program);
        Ok(())
    }

    /// Ask the external classifier to identify the utterance.
    ///
    /// `Ok(None)` covers three cases: no classifier attached, the classifier
    /// answered "none", or it answered a name not present in the loaded
    /// intents. Errors are returned for the caller to apply its own policy.
    pub fn classify(&self, utterance: &str) -> Result<Option<&Intent>, ClassifierError> {
        let Some(classifier) = &self.classifier else {
            return Ok(None);
        };

        let request = ClassifyRequest {
            utterance,
            candidates: &self.candidates,
            history: self.session.recent_history(self.config.history_window),
            last_intent: self.session.last_intent.as_deref(),
            last_variables: &self.session.last_variables,
        };

        let Some(name) = classifier.identify(&request)? else {
            return Ok(None);
        };

        let resolved = self.intents.iter().find(|intent| intent.name == name);
        if resolved.is_none() {
            debug!(%name, "classifier answered an unknown intent name");
        }
        Ok(resolved)
    }

    /// Match an utterance without the classifier, scanning trigger patterns
    /// in declaration order.
    pub fn fallback_match(&self, utterance: &str) -> Option<&Intent> {
        matcher::fallback_match(&self.intents, utterance)
    }

    /// Convenience matching policy used by the shells: classifier first,
    /// silent local fallback on error or no-answer.
    pub fn match_intent(&self, utterance: &str) -> Option<Intent> {
        match self.classify(utterance) {
            Ok(Some(intent)) => return Some(intent.clone()),
            Ok(None) => {}
            Err(error) => {
                warn!(%error, "classifier failed, falling back to local matching");
            }
        }

        let matched = self.fallback_match(utterance);
        if let Some(intent) = matched {
            debug!(intent = %intent.name, "matched by local fallback");
        }
        matched.cloned()
    }

    /// Execute an intent's actions strictly in declaration order.
    ///
    /// Carries the configured allow-list of variables forward from the
    /// previous turn, then advances the session with the resulting bindings
    /// and the last emitted response.
    pub fn execute(&mut self, intent: &Intent) -> TurnOutcome {
        self.execute_turn(intent, None)
    }

    /// One full turn: match the utterance and execute the winner, or emit
    /// the configured fallback reply without touching any state.
    pub fn respond(&mut self, utterance: &str) -> TurnOutcome {
        match self.match_intent(utterance) {
            Some(intent) => self.execute_turn(&intent, Some(utterance)),
            None => {
                let reply = self.config.fallback_reply.clone();
                self.host.emit(&reply);
                TurnOutcome {
                    intent: None,
                    response: Some(reply),
                    bindings: HashMap::new(),
                }
            }
        }
    }

    fn execute_turn(&mut self, intent: &Intent, utterance: Option<&str>) -> TurnOutcome {
        self.env.clear();
        if !self.session.is_first_turn() {
            for key in &self.config.carried_keys {
                if let Some(value) = self.session.last_variables.get(key) {
                    self.env.bind(key.clone(), value.clone());
                }
            }
        }

        let mut last_response = None;
        for action in &intent.actions {
            match action {
                Action::Ask { message } => {
                    self.host.emit(message);
                }
                Action::WaitFor { variable } => {
                    let input = self.host.acquire_input(variable);
                    // Bound verbatim: no coercion, no validation, empty included.
                    self.env.bind(variable.clone(), input);
                }
                Action::Set {
                    variable,
                    expression,
                } => {
                    let value = self.eval(expression);
                    self.env.bind(variable.clone(), value);
                }
                Action::Response { template } => {
                    let text = interpolate(
                        template,
                        &TemplateContext {
                            env: &self.env,
                            functions: &self.functions,
                            last_intent: self.session.last_intent.as_deref(),
                            last_intent_default: &self.config.last_intent_default,
                        },
                    );
                    self.host.emit(&text);
                    last_response = Some(text);
                }
                Action::Options { choices } => {
                    self.host.emit("Please choose:");
                    for (index, choice) in choices.iter().enumerate() {
                        self.host.emit(&format!("  {}. {}", index + 1, choice));
                    }
                }
            }
        }

        let bindings = self.env.snapshot();
        self.session =
            self.session
                .advance(utterance, &intent.name, last_response.as_deref(), bindings.clone());
        debug!(intent = %intent.name, bindings = bindings.len(), "intent executed");

        TurnOutcome {
            intent: Some(intent.name.clone()),
            response: last_response,
            bindings,
        }
    }

    /// Evaluate an expression to its string value. Arguments evaluate
    /// strictly left-to-right, before the call; unresolved references
    /// degrade to placeholders instead of failing.
    fn eval(&self, expression: &Expression) -> String {
        match expression {
            Expression::StringLiteral(value) => value.clone(),
            Expression::Variable(name) => self.env.resolve(name),
            Expression::FunctionCall { name, args } => {
                let values: Vec<String> = args.iter().map(|arg| self.eval(arg)).collect();
                match self.functions.call(name, &values) {
                    Some(result) => result,
                    None => FunctionRegistry::synthesize(name, &values),
                }
            }
        }
    }
}
