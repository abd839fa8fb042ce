//! Error types for pool operations

/// Errors returned by `SessionPool`.
///
/// `Configuration` and `NetworkDown` come out of failure classification;
/// every other variant passes through from the resolver or backend unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("network down: {0}")]
    NetworkDown(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("account not confirmed: {0}")]
    NotConfirmed(String),

    #[error("protocol unavailable: {0}")]
    ProtocolUnavailable(String),

    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<user_context::Error> for Error {
    fn from(err: user_context::Error) -> Self {
        match err {
            user_context::Error::NotConfigured => Error::Configuration(err.to_string()),
            user_context::Error::Lookup { .. } => Error::Authentication(err.to_string()),
            user_context::Error::NotConfirmed(user) => Error::NotConfirmed(user),
            user_context::Error::AccountNotFound(user) => Error::AccountNotFound(user),
        }
    }
}

/// Result alias for pool operations.
pub type Result<T> = std::result::Result<T, Error>;
