//! Endpoint failure notification state
//!
//! Tracks, per endpoint URL, whether the endpoint ever authenticated
//! successfully and whether a configuration error was already reported.
//! Together they decide how loudly a failed session open is reported:
//!
//! - a known-good endpoint that fails means the network is down
//! - a never-working endpoint is a configuration problem, reported at error
//!   level once, then at warn level until the next success clears the gate

use std::collections::HashSet;

use tracing::{error, warn};

use crate::error::Error;

/// Outcome of classifying an unexpected backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Interfaces down or endpoint previously worked.
    NetworkDown,
    /// Misconfiguration already reported once for this endpoint.
    ConfigurationRepeat,
    /// First report of a misconfigured endpoint.
    Configuration,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::NetworkDown => "network_down",
            Classification::ConfigurationRepeat => "configuration_repeat",
            Classification::Configuration => "configuration",
        }
    }
}

/// Per-endpoint `config_checked` / `error_sent` flags.
///
/// Only mutated while the pool lock is held.
#[derive(Debug, Default)]
pub struct EndpointFailureState {
    config_checked: HashSet<String>,
    error_sent: HashSet<String>,
}

impl EndpointFailureState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful session open: later failures mean the network,
    /// and the one-shot warning gate is re-armed.
    pub fn mark_success(&mut self, endpoint: &str) {
        self.config_checked.insert(endpoint.to_string());
        self.error_sent.remove(endpoint);
    }

    pub fn is_config_checked(&self, endpoint: &str) -> bool {
        self.config_checked.contains(endpoint)
    }

    pub fn is_error_sent(&self, endpoint: &str) -> bool {
        self.error_sent.contains(endpoint)
    }

    pub fn clear(&mut self) {
        self.config_checked.clear();
        self.error_sent.clear();
    }

    /// Decide how a failure for `endpoint` is reported, updating the gate.
    ///
    /// `network_up` is the liveness probe result, taken before the pool lock.
    pub fn classify(
        &mut self,
        endpoint: &str,
        network_up: bool,
        cause: &session::Error,
    ) -> (Classification, Error) {
        if !network_up || self.is_config_checked(endpoint) {
            if cause.is_connectivity() {
                warn!(endpoint, network_up, "network down");
            } else {
                warn!(endpoint, network_up, error = %cause, "network down");
            }
            return (
                Classification::NetworkDown,
                Error::NetworkDown(format!("unable to reach {endpoint}")),
            );
        }

        let message = format!(
            "could not connect to {endpoint}: {}: {}",
            cause.kind(),
            cause.message()
        );

        if self.is_error_sent(endpoint) {
            warn!(endpoint, error = %cause, "endpoint configuration error (already reported)");
            (Classification::ConfigurationRepeat, Error::NetworkDown(message))
        } else {
            self.error_sent.insert(endpoint.to_string());
            error!(endpoint, error = %cause, "endpoint configuration error");
            (Classification::Configuration, Error::Configuration(message))
        }
    }
}
