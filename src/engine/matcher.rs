use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::script::Intent;

/// Matches one same-script unit: a Han ideograph, or a run of ASCII letters.
fn unit_regex() -> &'static Regex {
    static UNITS: OnceLock<Regex> = OnceLock::new();
    UNITS.get_or_init(|| Regex::new(r"\p{Han}|[A-Za-z]+").expect("unit pattern compiles"))
}

/// Break text into keyword units for overlap scoring.
///
/// Ideographs count individually so short CJK utterances still overlap;
/// ASCII words count as whole units.
fn keyword_units(text: &str) -> HashSet<String> {
    unit_regex()
        .find_iter(text)
        .map(|unit| unit.as_str().to_string())
        .collect()
}

/// Classifier-independent matching over trigger-pattern sets.
///
/// Pass one scans the sets in declared order and returns the first whose
/// pattern and the lowercased utterance contain one another (either
/// direction). Pass two scores keyword overlap per pattern and keeps the
/// first set to reach the highest score; zero overlap matches nothing.
pub(crate) fn best_index<'a, I>(pattern_sets: I, utterance: &str) -> Option<usize>
where
    I: Iterator<Item = &'a [String]> + Clone,
{
    let needle = utterance.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for (index, patterns) in pattern_sets.clone().enumerate() {
        for pattern in patterns {
            let pattern = pattern.trim().to_lowercase();
            if pattern == needle || needle.contains(&pattern) || pattern.contains(&needle) {
                return Some(index);
            }
        }
    }

    let needle_units = keyword_units(&needle);
    if needle_units.is_empty() {
        return None;
    }

    let mut best: Option<(usize, usize)> = None;
    for (index, patterns) in pattern_sets.enumerate() {
        for pattern in patterns {
            let pattern_units = keyword_units(&pattern.trim().to_lowercase());
            let score = needle_units.intersection(&pattern_units).count();
            // Strictly greater, so ties keep the first declared set.
            if score > 0 && best.map(|(_, s)| score > s).unwrap_or(true) {
                best = Some((index, score));
            }
        }
    }

    best.map(|(index, _)| index)
}

/// Match an utterance against loaded intents without consulting the
/// classifier. Deterministic given declared order.
pub fn fallback_match<'a>(intents: &'a [Intent], utterance: &str) -> Option<&'a Intent> {
    best_index(
        intents.iter().map(|intent| intent.trigger.patterns.as_slice()),
        utterance,
    )
    .map(|index| &intents[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::WhenClause;

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
    fn substring_containment_matches_either_direction() {
        let intents = vec![
            intent("order", &["where is my order"]),
            intent("refund", &["refund"]),
        ];
        // Utterance contains the pattern.
        assert_eq!(
            fallback_match(&intents, "I want a refund right now").map(|i| i.name.as_str()),
            Some("refund")
        );
        // Pattern contains the utterance.
        assert_eq!(
            fallback_match(&intents, "my order").map(|i| i.name.as_str()),
            Some("order")
        );
    }

    #[test]
    fn first_declared_intent_wins_on_identical_patterns() {
        let intents = vec![intent("a", &["help"]), intent("b", &["help"])];
        assert_eq!(
            fallback_match(&intents, "help").map(|i| i.name.as_str()),
            Some("a")
        );
    }

    #[test]
    fn keyword_overlap_picks_highest_score() {
        let intents = vec![
            intent("shipping", &["how long does shipping take"]),
            intent("returns", &["how do I return an item"]),
        ];
        assert_eq!(
            fallback_match(&intents, "tell me about return of a broken item")
                .map(|i| i.name.as_str()),
            Some("returns")
        );
    }

    #[test]
    fn zero_overlap_matches_nothing() {
        let intents = vec![intent("order", &["where is my order"])];
        assert_eq!(fallback_match(&intents, "紫色"), None);
        assert_eq!(fallback_match(&intents, ""), None);
        assert_eq!(fallback_match(&intents, "12345 67890"), None);
    }

    #[test]
    fn han_ideographs_count_as_single_units() {
        let intents = vec![
            intent("order", &["查询订单"]),
            intent("refund", &["申请退款"]),
        ];
        assert_eq!(
            fallback_match(&intents, "我想退款").map(|i| i.name.as_str()),
            Some("refund")
        );
    }

    #[test]
    fn matching_is_deterministic_across_calls() {
        let intents = vec![
            intent("a", &["track my package"]),
            intent("b", &["package damaged"]),
        ];
        let first = fallback_match(&intents, "package problem").map(|i| i.name.clone());
        let second = fallback_match(&intents, "package problem").map(|i| i.name.clone());
        assert_eq!(first, second);
    }
}
