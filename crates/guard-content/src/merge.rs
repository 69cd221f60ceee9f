//! Idempotent rule merge
//!
//! [`ConfigMerger::merge`] adds every missing [`RuleToken`] to the tracked
//! key of each target section. Existing tokens are never removed or
//! reordered, and input that already satisfies the rule set comes back
//! byte-identical with `changed == false`.

use crate::document::ConfigDocument;
use crate::rules::{RuleSet, RuleToken};

/// Key holding the serialized ignore list.
pub const TRACKED_KEY: &str = "black_name";

/// A section the merger maintains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSection {
    pub name: String,
    /// Create the section when absent. When `false` an absent section is
    /// skipped and never counts as a change.
    pub create: bool,
}

impl TargetSection {
    pub fn always(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            create: true,
        }
    }

    pub fn if_present(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            create: false,
        }
    }
}

/// Which sections and key the merge touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePolicy {
    pub tracked_key: String,
    /// Processed in order; created sections are appended after existing ones.
    pub targets: Vec<TargetSection>,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            tracked_key: TRACKED_KEY.to_string(),
            targets: vec![
                TargetSection::always("Directory"),
                TargetSection::if_present("Common"),
            ],
        }
    }
}

/// Result of one merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Text to persist. Equal to the input when nothing changed.
    pub text: String,
    pub changed: bool,
    /// Sections that did not exist in the input.
    pub created: Vec<String>,
    /// Sections whose tracked value was extended.
    pub updated: Vec<String>,
}

/// Applies a [`RuleSet`] to filter-file text.
#[derive(Debug, Clone)]
pub struct ConfigMerger {
    rules: RuleSet,
    policy: MergePolicy,
}

impl ConfigMerger {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_policy(rules, MergePolicy::default())
    }

    pub fn with_policy(rules: RuleSet, policy: MergePolicy) -> Self {
        Self { rules, policy }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn policy(&self) -> &MergePolicy {
        &self.policy
    }

    /// Compute the repaired text for `raw`.
    pub fn merge(&self, raw: &str) -> MergeOutcome {
        let mut doc = ConfigDocument::parse(raw);
        let mut created = Vec::new();
        let mut updated = Vec::new();

        for target in &self.policy.targets {
            let section = if target.create {
                let (section, was_created) = doc.ensure_section(&target.name);
                if was_created {
                    created.push(target.name.clone());
                }
                section
            } else {
                match doc.section_mut(&target.name) {
                    Some(section) => section,
                    None => continue,
                }
            };

            let current = section.get(&self.policy.tracked_key).unwrap_or_default();
            let extended = extend_value(current, &self.rules);
            if extended != current {
                section.set(&self.policy.tracked_key, extended);
                updated.push(target.name.clone());
            }
        }

        if created.is_empty() && updated.is_empty() {
            return MergeOutcome {
                text: raw.to_string(),
                changed: false,
                created,
                updated,
            };
        }

        MergeOutcome {
            text: doc.render(),
            changed: true,
            created,
            updated,
        }
    }
}

/// Append the quoted form of every token `current` lacks.
///
/// Presence is judged against the value as it was before any appends, so
/// each missing token is added exactly once in rule-set order.
pub fn extend_value(current: &str, rules: &RuleSet) -> String {
    let missing: Vec<String> = rules
        .iter()
        .filter(|token| !token.is_present_in(current))
        .map(RuleToken::quoted)
        .collect();

    if missing.is_empty() {
        return current.to_string();
    }

    let mut value = current.to_string();
    if !value.is_empty() && !value.ends_with(", ") {
        value.push_str(", ");
    }
    value.push_str(&missing.join(", "));
    value
}
