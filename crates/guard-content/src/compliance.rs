//! Read-only compliance test
//!
//! A structure-blind scan of the raw file text. It may report a file as
//! needing enforcement when a full merge would change nothing, but it never
//! reports a file as compliant while a token is absent from the text.

use crate::rules::{RuleSet, RuleToken};

/// Whether any token of `rules` is absent from `raw`, quoted or bare.
pub fn needs_enforcement(raw: &str, rules: &RuleSet) -> bool {
    rules.iter().any(|token| !token.is_present_in(raw))
}

/// Tokens of `rules` absent from `raw`, in rule-set order.
pub fn missing_tokens<'a>(raw: &str, rules: &'a RuleSet) -> Vec<&'a RuleToken> {
    rules
        .iter()
        .filter(|token| !token.is_present_in(raw))
        .collect()
}
