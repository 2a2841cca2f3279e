use regex::{Captures, Regex};
use std::sync::OnceLock;

use super::builtins::FunctionRegistry;
use super::env::Environment;

/// Matches one `{...}` interpolation span. No nesting: the first `}` closes
/// the span.
fn span_regex() -> &'static Regex {
    static SPANS: OnceLock<Regex> = OnceLock::new();
    SPANS.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("span pattern compiles"))
}

/// Matches a minimal embedded call: `name(arg, arg, ...)`.
fn call_regex() -> &'static Regex {
    static CALLS: OnceLock<Regex> = OnceLock::new();
    CALLS.get_or_init(|| Regex::new(r"^(\w+)\s*\((.*)\)$").expect("call pattern compiles"))
}

/// Resolution inputs for one interpolation pass.
pub struct TemplateContext<'a> {
    /// Variable bindings of the executing turn.
    pub env: &'a Environment,
    /// Built-in function registry consulted for embedded calls.
    pub functions: &'a FunctionRegistry,
    /// Intent name from the previous turn, if any.
    pub last_intent: Option<&'a str>,
    /// Substitution for `{last_intent}` before any turn has completed.
    pub last_intent_default: &'a str,
}

/// Expand the `{...}` spans of a template string.
///
/// This is a strings-level macro expander, not a typed evaluator. For each
/// span: a bound variable substitutes its value; the literal `last_intent`
/// substitutes the previous turn's intent name; `name(arg, ...)` calls a
/// registered function with minimally parsed arguments. Anything else —
/// including unknown functions and malformed spans — is left verbatim.
/// Interpolation never fails.
pub fn interpolate(template: &str, ctx: &TemplateContext<'_>) -> String {
    span_regex()
        .replace_all(template, |caps: &Captures<'_>| {
            let span = &caps[1];

            if let Some(value) = ctx.env.get(span) {
                return value.to_string();
            }

            if span == "last_intent" {
                return ctx
                    .last_intent
                    .unwrap_or(ctx.last_intent_default)
                    .to_string();
            }

            if let Some(call) = call_regex().captures(span) {
                let name = &call[1];
                if ctx.functions.contains(name) {
                    let args = parse_arguments(&call[2], ctx.env);
                    if let Some(result) = ctx.functions.call(name, &args) {
                        return result;
                    }
                }
            }

            // Unresolvable span: pass the original text through.
            caps[0].to_string()
        })
        .into_owned()
}

/// Minimal argument parsing: comma-split, whitespace-trimmed, surrounding
/// quotes stripped, bound variables substituted. No nested calls, no escaped
/// commas.
fn parse_arguments(args_text: &str, env: &Environment) -> Vec<String> {
    let args_text = args_text.trim();
    if args_text.is_empty() {
        return Vec::new();
    }

    args_text
        .split(',')
        .map(|raw| {
            let trimmed = raw.trim();
            if let Some(value) = env.get(trimmed) {
                return value.to_string();
            }
            strip_quotes(trimmed).to_string()
        })
        .collect()
}

fn strip_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}
