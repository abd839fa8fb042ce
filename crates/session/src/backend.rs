//! Session traits and backend selection inputs

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use user_context::UserContext;

use crate::error::Result;

/// The two interchangeable backend protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    Dav,
    Ews,
}

impl Backend {
    /// Label for logging and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Backend::Dav => "dav",
            Backend::Ews => "ews",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tri-state `enable_ews` setting.
///
/// Configured as `"true"`, `"false"` or `"auto"` (TOML booleans are accepted
/// for the first two).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EwsMode {
    /// Always open EWS sessions.
    Enabled,
    /// WebDAV only; an unavailable WebDAV endpoint is an error.
    Disabled,
    /// Try WebDAV, fall back to EWS when WebDAV is unavailable.
    #[default]
    Auto,
}

impl EwsMode {
    pub fn label(&self) -> &'static str {
        match self {
            EwsMode::Enabled => "true",
            EwsMode::Disabled => "false",
            EwsMode::Auto => "auto",
        }
    }
}

impl fmt::Display for EwsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EwsMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(EwsMode::Enabled),
            "false" => Ok(EwsMode::Disabled),
            "auto" => Ok(EwsMode::Auto),
            other => Err(format!(
                "invalid enable_ews value {other:?}, expected true, false or auto"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for EwsMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Flag(true) => Ok(EwsMode::Enabled),
            Raw::Flag(false) => Ok(EwsMode::Disabled),
            Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// An authenticated backend session.
///
/// The pool owns cached sessions; callers receive shared handles and must
/// not assume the handle they hold is the one that stays cached.
pub trait Session: fmt::Debug + Send + Sync {
    /// Protocol this session speaks.
    fn backend(&self) -> Backend;

    /// Whether the session can no longer be used and must be reopened.
    fn is_expired(&self) -> bool;
}

/// Boxed future returned by `SessionFactory::open`.
pub type SessionFuture<'a> = Pin<Box<dyn Future<Output = Result<Arc<dyn Session>>> + Send + 'a>>;

/// Opens backend sessions, performing the protocol handshake.
///
/// WebDAV handshakes must report an endpoint without WebDAV support as
/// `Error::ProtocolUnavailable` so the automatic fallback can kick in.
pub trait SessionFactory: Send + Sync {
    fn open<'a>(
        &'a self,
        backend: Backend,
        context: &'a UserContext,
        password: &'a str,
    ) -> SessionFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Settings {
        #[serde(default)]
        enable_ews: EwsMode,
    }

    #[test]
    fn parses_tri_state_strings() {
        assert_eq!("true".parse::<EwsMode>().unwrap(), EwsMode::Enabled);
        assert_eq!("FALSE".parse::<EwsMode>().unwrap(), EwsMode::Disabled);
        assert_eq!(" auto ".parse::<EwsMode>().unwrap(), EwsMode::Auto);
        assert!("sometimes".parse::<EwsMode>().is_err());
    }

    #[test]
    fn deserializes_strings_and_booleans() {
        let s: Settings = toml::from_str(r#"enable_ews = "auto""#).unwrap();
        assert_eq!(s.enable_ews, EwsMode::Auto);
        let s: Settings = toml::from_str("enable_ews = true").unwrap();
        assert_eq!(s.enable_ews, EwsMode::Enabled);
        let s: Settings = toml::from_str(r#"enable_ews = "false""#).unwrap();
        assert_eq!(s.enable_ews, EwsMode::Disabled);
        let s: Settings = toml::from_str("").unwrap();
        assert_eq!(s.enable_ews, EwsMode::Auto);
    }

    #[test]
    fn rejects_unknown_mode() {
        let result: std::result::Result<Settings, _> = toml::from_str(r#"enable_ews = "maybe""#);
        assert!(result.is_err());
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for mode in [EwsMode::Enabled, EwsMode::Disabled, EwsMode::Auto] {
            assert_eq!(mode.to_string().parse::<EwsMode>().unwrap(), mode);
        }
    }
}
