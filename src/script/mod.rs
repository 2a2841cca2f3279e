//! Compiler pipeline for the Colloquy intent DSL.
//!
//! Scripts declare intents—trigger utterances paired with ordered action
//! sequences—in a small line-oriented grammar. This module turns source text
//! into a [`Program`] in two passes: the lexer flattens the text into typed
//! tokens, and a recursive-descent parser assembles the AST. Both passes are
//! single-shot: any lexical or structural error aborts the load, so partial
//! programs are never handed to the engine.

/// Abstract syntax tree definitions for intent scripts.
pub mod ast;
/// Lexical analysis of script source text.
pub mod lexer;
/// Recursive-descent parser building programs from token streams.
pub mod parser;
/// Token categories and the keyword table.
pub mod token;

pub use ast::{Action, Expression, Intent, Program, WhenClause};
pub use lexer::{LexError, Lexer, tokenize};
pub use parser::{ParseError, Parser, parse_program};
pub use token::{Token, TokenKind};

use thiserror::Error;

/// Convenience result alias for script compilation.
pub type Result<T> = std::result::Result<T, ScriptError>;

/// Errors surfaced while compiling source text into a program.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScriptError {
    /// Lexical analysis failed.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// Parsing failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
