//! Error types for the Colloquy engine
//!
//! Compilation errors are fatal to the load operation; classifier errors are
//! recoverable and the caller decides between local fallback and propagation.

use thiserror::Error;

use crate::script::{LexError, ParseError, ScriptError};

use super::classifier::ClassifierError;

/// Top-level engine error
#[derive(Debug, Error)]
pub enum EngineError {
    /// Script compilation errors (lexing or parsing)
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// External classifier errors
    #[error("classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}

impl From<LexError> for EngineError {
    fn from(error: LexError) -> Self {
        EngineError::Script(ScriptError::Lex(error))
    }
}

impl From<ParseError> for EngineError {
    fn from(error: ParseError) -> Self {
        EngineError::Script(ScriptError::Parse(error))
    }
}

/// Result type using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
