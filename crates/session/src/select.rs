//! Backend selection with WebDAV → EWS fallback

use std::sync::Arc;

use tracing::debug;
use user_context::UserContext;

use crate::backend::{Backend, EwsMode, Session, SessionFactory};
use crate::error::{Error, Result};

/// Endpoint path marking an EWS-only server.
pub const EWS_ENDPOINT_SUFFIX: &str = "/ews/exchange.asmx";

/// Whether `url` points straight at an EWS endpoint (case-insensitive).
pub fn is_ews_endpoint(url: &str) -> bool {
    url.to_lowercase().ends_with(EWS_ENDPOINT_SUFFIX)
}

/// Open a session for `context`, choosing the backend per `mode`.
///
/// EWS is opened directly when forced or when the endpoint is an EWS URL.
/// Otherwise WebDAV is tried first; `ProtocolUnavailable` falls back to EWS
/// in `Auto` mode and is returned unchanged when WebDAV is forced.
pub async fn open_session(
    factory: &dyn SessionFactory,
    mode: EwsMode,
    context: &UserContext,
    password: &str,
) -> Result<Arc<dyn Session>> {
    let session = if mode == EwsMode::Enabled || is_ews_endpoint(&context.endpoint_url) {
        factory.open(Backend::Ews, context, password).await?
    } else {
        match factory.open(Backend::Dav, context, password).await {
            Ok(session) => session,
            Err(Error::ProtocolUnavailable(reason)) if mode == EwsMode::Auto => {
                debug!(
                    user = %context.identity,
                    endpoint = %context.endpoint_url,
                    reason = %reason,
                    "WebDAV unavailable, retry with EWS"
                );
                factory.open(Backend::Ews, context, password).await?
            }
            Err(e) => return Err(e),
        }
    };

    debug!(
        user = %context.identity,
        backend = session.backend().label(),
        "created new session"
    );
    Ok(session)
}
