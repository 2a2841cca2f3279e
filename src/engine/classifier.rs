use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::matcher;
use super::session::TurnRecord;

/// Errors reported by an external classifier.
///
/// Recoverable by design: the caller decides whether to retry, propagate, or
/// fall back to local matching.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// The classifier could not be reached.
    #[error("classifier transport failed: {0}")]
    Transport(String),

    /// The classifier was reached but could not produce an answer.
    #[error("classifier service failed: {0}")]
    Service(String),
}

/// One intent offered to the classifier: its name and trigger patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentCandidate {
    /// Intent name the classifier may answer with.
    pub name: String,
    /// Example utterances documenting the intent.
    pub patterns: Vec<String>,
}

/// Everything a classifier may consult for one identification.
#[derive(Debug, Clone)]
pub struct ClassifyRequest<'a> {
    /// The user utterance to identify.
    pub utterance: &'a str,
    /// Candidate intents, in declaration order.
    pub candidates: &'a [IntentCandidate],
    /// Recent conversation history, oldest first.
    pub history: &'a [TurnRecord],
    /// Intent executed on the previous turn, if any.
    pub last_intent: Option<&'a str>,
    /// Variable snapshot from the previous turn.
    pub last_variables: &'a HashMap<String, String>,
}

/// External natural-language intent recognition seam.
///
/// Implementations answer with the name of one of the offered candidates, or
/// `None` when nothing fits. Transport and service failures surface as
/// [`ClassifierError`]; the engine never retries on its own.
pub trait IntentClassifier {
    /// Identify the intent expressed by the request's utterance.
    fn identify(
        &self,
        request: &ClassifyRequest<'_>,
    ) -> Result<Option<String>, ClassifierError>;
}

/// Local classifier backed by the keyword fallback matcher.
///
/// Useful for tests and offline operation; it never fails and ignores the
/// conversation context.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl IntentClassifier for KeywordClassifier {
    fn identify(
        &self,
        request: &ClassifyRequest<'_>,
    ) -> Result<Option<String>, ClassifierError> {
        let index = matcher::best_index(
            request
                .candidates
                .iter()
                .map(|candidate| candidate.patterns.as_slice()),
            request.utterance,
        );
        Ok(index.map(|index| request.candidates[index].name.clone()))
    }
}
