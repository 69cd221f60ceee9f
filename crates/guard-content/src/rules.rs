//! Required ignore tokens
//!
//! A [`RuleSet`] is the ordered list of patterns that must appear in the
//! tracked `black_name` value of every target section.

use std::fmt;

use crate::error::{Error, Result};

/// Ignore patterns enforced when no configuration overrides them.
///
/// `target` appears twice upstream; [`RuleSet::new`] drops the repeat.
pub const DEFAULT_IGNORE_TOKENS: &[&str] = &[
    // Common
    ".git",
    ".gitignore",
    ".idea",
    ".vscode",
    ".cache",
    "dist",
    "build",
    "out",
    "target",
    "logs",
    "log",
    // Python
    "venv",
    ".venv",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".tox",
    "*.egg-info",
    ".eggs",
    "htmlcov",
    ".coverage",
    // Node.js
    "node_modules",
    ".next",
    ".nuxt",
    ".output",
    // Go / PHP
    "vendor",
    // Swift / Xcode
    ".build",
    "DerivedData",
    ".swiftpm",
    "Pods",
    // Flutter / Dart
    ".dart_tool",
    ".flutter-plugins",
    ".flutter-plugins-dependencies",
    ".pub-cache",
    ".pub",
    // Rust
    "target",
    // Java / Kotlin
    ".gradle",
    ".mvn",
    // Ruby
    ".bundle",
    // Others
    ".sass-cache",
    ".eslintcache",
    ".DS_Store",
];

/// A single required ignore pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleToken(String);

impl RuleToken {
    /// Validate and wrap a token.
    ///
    /// Tokens are serialized inside double quotes, so they may not contain
    /// one themselves.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::EmptyToken);
        }
        if token.contains('"') {
            return Err(Error::QuotedToken { token });
        }
        Ok(Self(token))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The token in its serialized form, `"token"`.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }

    /// Whether `text` already carries this token, quoted or bare.
    ///
    /// The bare test subsumes the quoted one but both are kept so the
    /// check reads the same as the merge rule.
    pub fn is_present_in(&self, text: &str) -> bool {
        text.contains(&self.quoted()) || text.contains(self.as_str())
    }
}

impl fmt::Display for RuleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RuleToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Ordered, duplicate-free set of [`RuleToken`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    tokens: Vec<RuleToken>,
}

impl RuleSet {
    /// Build a rule set, keeping first-occurrence order and dropping repeats.
    pub fn new<I, S>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self { tokens: Vec::new() };
        set.extend(tokens)?;
        if set.tokens.is_empty() {
            return Err(Error::EmptyRuleSet);
        }
        Ok(set)
    }

    /// The built-in token list.
    pub fn defaults() -> Self {
        Self {
            tokens: dedup(DEFAULT_IGNORE_TOKENS.iter().map(|t| RuleToken(t.to_string()))),
        }
    }

    /// Append tokens not already present.
    pub fn extend<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            let token = RuleToken::new(token)?;
            if !self.tokens.contains(&token) {
                self.tokens.push(token);
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a RuleToken;
    type IntoIter = std::slice::Iter<'a, RuleToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

fn dedup(tokens: impl Iterator<Item = RuleToken>) -> Vec<RuleToken> {
    let mut out: Vec<RuleToken> = Vec::new();
    for token in tokens {
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out
}
