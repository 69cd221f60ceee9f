//! Unified diff rendering for merge previews

use similar::TextDiff;

/// Render a unified diff between the current and merged text of `name`.
///
/// Returns an empty string when the texts are identical.
pub fn unified_diff(name: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }

    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&format!("a/{name}"), &format!("b/{name}"))
        .to_string()
}
