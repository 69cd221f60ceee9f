//! Error types for guard-content

/// Result type for guard-content operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building rule sets
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Rule token must not be empty")]
    EmptyToken,

    #[error("Rule token {token:?} contains a double quote")]
    QuotedToken { token: String },

    #[error("Rule set is empty")]
    EmptyRuleSet,
}
