//! Error types for user context resolution

/// Errors from resolving a user name to its context record.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No lookup base is configured; nothing can be resolved.
    #[error("no user context lookup location configured")]
    NotConfigured,

    /// Fetching or parsing the record failed. `kind` names the failure class
    /// for diagnostics without exposing the underlying transport error type.
    #[error("user context lookup failed for {user}: {kind}: {message}")]
    Lookup {
        user: String,
        kind: &'static str,
        message: String,
    },

    #[error("account not confirmed: {0}")]
    NotConfirmed(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),
}

/// Result alias for resolver operations.
pub type Result<T> = std::result::Result<T, Error>;
