use colloquy::engine::{FunctionRegistry, TemplateContext, interpolate};
use colloquy::engine::{Environment, fallback_match};
use colloquy::script::{Intent, WhenClause, parse_program};
use proptest::prelude::*;

fn intent(name: &str, patterns: &[&str]) -> Intent {
    Intent {
        name: name.to_string(),
        trigger: WhenClause {
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        },
        actions: Vec::new(),
    }
}

#[test]
fn scenario_simple_greeting_selects_and_replies() {
    let program = parse_program("intent \"A\" { when user_says \"hi\" { response \"hello\" } }")
        .expect("script parses");
    let matched = fallback_match(&program.intents, "hi").expect("matches");
    assert_eq!(matched.name, "A");
}

#[test]
fn duplicate_trigger_patterns_resolve_to_first_declaration() {
    let intents = vec![intent("A", &["help"]), intent("B", &["help"])];
    assert_eq!(
        fallback_match(&intents, "help").map(|i| i.name.as_str()),
        Some("A")
    );
}

#[test]
fn zero_overlap_yields_no_match() {
    let intents = vec![
        intent("order", &["where is my order"]),
        intent("refund", &["I want a refund"]),
    ];
    assert_eq!(fallback_match(&intents, "空山新雨后"), None);
}

proptest! {
    /// Matching twice with the same inputs always returns the same intent.
    #[test]
    fn fallback_matching_is_idempotent(utterance in "[ a-z]{0,24}") {
        let intents = vec![
            intent("greeting", &["hello there", "good morning"]),
            intent("order", &["where is my order", "order status"]),
            intent("refund", &["refund my purchase"]),
        ];
        let first = fallback_match(&intents, &utterance).map(|i| i.name.clone());
        let second = fallback_match(&intents, &utterance).map(|i| i.name.clone());
        prop_assert_eq!(first, second);
    }

    /// Interpolation is the identity on templates without brace spans.
    #[test]
    fn interpolation_is_identity_without_spans(template in "[^{}]*") {
        let env = Environment::new();
        let functions = FunctionRegistry::with_defaults();
        let ctx = TemplateContext {
            env: &env,
            functions: &functions,
            last_intent: None,
            last_intent_default: "none",
        };
        prop_assert_eq!(interpolate(&template, &ctx), template);
    }
}
