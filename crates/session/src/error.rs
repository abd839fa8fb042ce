//! Errors raised while opening a backend session

/// Failure kinds a backend handshake can report.
///
/// The pool treats these differently: `Authentication`, `IllegalState` and
/// `InvalidArgument` always reach the caller untouched, `ProtocolUnavailable`
/// drives the WebDAV → EWS fallback, and the rest are network-or-config
/// failures subject to classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The endpoint does not speak the requested protocol (WebDAV disabled).
    #[error("protocol unavailable: {0}")]
    ProtocolUnavailable(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("illegal state: {0}")]
    IllegalState(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown host: {0}")]
    UnknownHost(String),

    #[error("network down: {0}")]
    NetworkDown(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

impl Error {
    /// Short failure class label for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ProtocolUnavailable(_) => "protocol_unavailable",
            Error::Authentication(_) => "authentication",
            Error::IllegalState(_) => "illegal_state",
            Error::InvalidArgument(_) => "invalid_argument",
            Error::UnknownHost(_) => "unknown_host",
            Error::NetworkDown(_) => "network_down",
            Error::Io(_) => "io",
            Error::Http(_) => "http",
        }
    }

    /// Detail message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::ProtocolUnavailable(m)
            | Error::Authentication(m)
            | Error::IllegalState(m)
            | Error::InvalidArgument(m)
            | Error::UnknownHost(m)
            | Error::NetworkDown(m)
            | Error::Io(m)
            | Error::Http(m) => m,
        }
    }

    /// Connectivity failures that need no further diagnostics in logs.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::UnknownHost(_) | Error::NetworkDown(_))
    }
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_and_message_split_display() {
        let err = Error::Io("connection reset".into());
        assert_eq!(err.kind(), "io");
        assert_eq!(err.message(), "connection reset");
        assert_eq!(err.to_string(), "I/O error: connection reset");
    }

    #[test]
    fn connectivity_kinds() {
        assert!(Error::UnknownHost("mail.example.com".into()).is_connectivity());
        assert!(Error::NetworkDown("no route".into()).is_connectivity());
        assert!(!Error::Http("500".into()).is_connectivity());
    }
}
