//! Session cache and acquisition
//!
//! One `tokio::sync::Mutex` guards both the session map and the endpoint
//! failure state. Critical sections are map operations only: user context
//! resolution, the network probe and the backend handshake all run outside
//! the lock. Two callers acquiring the same key concurrently may both open a
//! session; the last insertion stays cached and each caller keeps its own
//! handle.

use std::collections::HashMap;
use std::sync::Arc;

use session::{EwsMode, Session, SessionFactory, open_session};
use tokio::sync::Mutex;
use tracing::{debug, info};
use user_context::{UserContextResolver, convert_user_name};

use crate::error::{Error, Result};
use crate::failure::EndpointFailureState;
use crate::key::PoolKey;
use crate::network::NetworkProbe;

/// Pool-level settings.
#[derive(Debug, Clone, Default)]
pub struct PoolSettings {
    /// Windows domain prefixed to bare login names.
    pub default_domain: Option<String>,
    pub ews_mode: EwsMode,
}

#[derive(Default)]
struct PoolState {
    sessions: HashMap<PoolKey, Arc<dyn Session>>,
    failures: EndpointFailureState,
}

/// Cache of authenticated backend sessions.
pub struct SessionPool {
    state: Mutex<PoolState>,
    resolver: UserContextResolver,
    factory: Arc<dyn SessionFactory>,
    network: Arc<dyn NetworkProbe>,
    settings: PoolSettings,
}

impl SessionPool {
    pub fn new(
        resolver: UserContextResolver,
        factory: Arc<dyn SessionFactory>,
        network: Arc<dyn NetworkProbe>,
        settings: PoolSettings,
    ) -> Self {
        info!(
            default_domain = settings.default_domain.as_deref().unwrap_or(""),
            enable_ews = settings.ews_mode.label(),
            "session pool initialized"
        );
        Self {
            state: Mutex::new(PoolState::default()),
            resolver,
            factory,
            network,
            settings,
        }
    }

    /// Return an authenticated session for `user_name`, reusing a cached one
    /// when it has not expired.
    ///
    /// Resolver failures, authentication failures and programmer errors are
    /// returned as-is. Any other backend failure is classified as
    /// `NetworkDown` or `Configuration` (see `EndpointFailureState`).
    pub async fn acquire(&self, user_name: &str, password: &str) -> Result<Arc<dyn Session>> {
        let context = self.resolver.resolve(user_name).await?;
        let key = PoolKey::new(
            context,
            user_name,
            password,
            self.settings.default_domain.as_deref(),
        );
        self.acquire_key(key).await
    }

    /// Return `current` if it is still valid, otherwise evict it and open a
    /// new session.
    ///
    /// Classified failures keep their kind and gain a "could not reopen
    /// session" prefix. Authentication and resolver failures are returned
    /// as-is.
    pub async fn refresh(
        &self,
        current: Arc<dyn Session>,
        user_name: &str,
        password: &str,
    ) -> Result<Arc<dyn Session>> {
        if !current.is_expired() {
            return Ok(current);
        }

        debug!(user = user_name, "session expired, trying to open a new one");
        let result = self.reopen(user_name, password).await;
        if let Err(e) = &result {
            debug!(user = user_name, error = %e, "unable to reopen session");
        }
        result
    }

    /// Password cached for `user_name`, for handshakes that only carry a
    /// login name.
    pub async fn lookup_password(&self, user_name: &str) -> Option<String> {
        let full_name = convert_user_name(user_name, self.settings.default_domain.as_deref());
        let state = self.state.lock().await;
        state
            .sessions
            .keys()
            .find(|key| key.user_name() == full_name)
            .map(|key| key.password().expose().clone())
    }

    /// Drop every cached session and forget all endpoint failure state.
    ///
    /// Sessions are released silently. An acquisition already in flight may
    /// still insert its session afterwards.
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        let dropped = state.sessions.len();
        state.sessions.clear();
        state.failures.clear();
        info!(dropped, "session pool reset");
    }

    /// Number of cached sessions.
    pub async fn len(&self) -> usize {
        self.state.lock().await.sessions.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn reopen(&self, user_name: &str, password: &str) -> Result<Arc<dyn Session>> {
        let context = self.resolver.resolve(user_name).await?;
        let key = PoolKey::new(
            context,
            user_name,
            password,
            self.settings.default_domain.as_deref(),
        );
        if self.state.lock().await.sessions.remove(&key).is_some() {
            crate::metrics::record_eviction("refresh");
        }
        self.acquire_key(key).await.map_err(|e| match e {
            Error::Configuration(m) => {
                Error::Configuration(format!("could not reopen session: {m}"))
            }
            Error::NetworkDown(m) => Error::NetworkDown(format!("could not reopen session: {m}")),
            other => other,
        })
    }

    async fn acquire_key(&self, key: PoolKey) -> Result<Arc<dyn Session>> {
        let cached = {
            let mut state = self.state.lock().await;
            let existing = state.sessions.get(&key).cloned();
            match existing {
                Some(session) if session.is_expired() => {
                    debug!(user = key.user_name(), "cached session expired");
                    state.sessions.remove(&key);
                    crate::metrics::record_eviction("expired");
                    None
                }
                other => other,
            }
        };

        let session = match cached {
            Some(session) => {
                debug!(user = key.user_name(), "got session from cache");
                crate::metrics::record_cache_hit();
                session
            }
            None => {
                let opened = open_session(
                    self.factory.as_ref(),
                    self.settings.ews_mode,
                    key.context(),
                    key.password().expose(),
                )
                .await;
                match opened {
                    Ok(session) => {
                        debug!(
                            user = key.user_name(),
                            backend = session.backend().label(),
                            "opened new session"
                        );
                        crate::metrics::record_session_created(session.backend());
                        session
                    }
                    Err(e) => return Err(self.route_failure(key.endpoint_url(), e).await),
                }
            }
        };

        let endpoint = key.endpoint_url().to_string();
        let mut state = self.state.lock().await;
        state.sessions.insert(key, session.clone());
        state.failures.mark_success(&endpoint);
        Ok(session)
    }

    /// Pass known failure kinds through; classify the rest.
    async fn route_failure(&self, endpoint: &str, err: session::Error) -> Error {
        match err {
            session::Error::Authentication(m) => Error::Authentication(m),
            session::Error::IllegalState(m) => Error::IllegalState(m),
            session::Error::InvalidArgument(m) => Error::InvalidArgument(m),
            session::Error::ProtocolUnavailable(m) => Error::ProtocolUnavailable(m),
            cause => {
                let network_up = self.network.is_up();
                let (classification, err) = self
                    .state
                    .lock()
                    .await
                    .failures
                    .classify(endpoint, network_up, &cause);
                crate::metrics::record_failure(classification);
                err
            }
        }
    }
}
