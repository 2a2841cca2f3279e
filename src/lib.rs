//! Colloquy – a rule-based conversational intent DSL
//!
//! This crate implements a small scripting language for conversational flows:
//! - Intents pairing trigger utterances with ordered action sequences
//! - A hand-written lexer and recursive-descent parser producing a plain AST
//! - A tree-walking interpreter with per-conversation variable state,
//!   template interpolation, and a registry of simulated business functions
//! - Intent selection through an external classifier seam with a local
//!   keyword-matching fallback
//! - A thin CLI shell for loading a script and driving a conversation

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Execution engine: interpreter, matching, templates, session state
pub mod engine;
/// Compiler pipeline: tokens, lexer, AST, parser
pub mod script;

// Re-export key types for convenience
pub use engine::{EngineConfig, Interpreter, TurnOutcome};
pub use script::{Program, parse_program};

/// Current version of the Colloquy engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
