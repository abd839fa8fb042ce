//! Pool of authenticated backend sessions
//!
//! Caches one session per (user context, normalized login, password) and
//! decides, when opening a session fails, whether the failure means the
//! network is down or the endpoint is misconfigured.
//!
//! Acquisition flow:
//! 1. Resolve the login to a `UserContext` (endpoint URL)
//! 2. Reuse the cached session unless it reports expired
//! 3. Otherwise open WebDAV or EWS via `session::open_session()` outside the lock
//! 4. Cache the session and mark the endpoint as known-good
//! 5. On unexpected failure, classify:
//!    - network probe down, or endpoint known-good → `NetworkDown` (warn)
//!    - first failure of a never-working endpoint → `Configuration` (error)
//!    - repeated failure → `NetworkDown` with the config message (warn)

pub mod error;
pub mod failure;
pub mod key;
pub mod metrics;
pub mod network;
pub mod pool;

pub use error::{Error, Result};
pub use failure::{Classification, EndpointFailureState};
pub use key::PoolKey;
pub use network::{NetworkProbe, StaticNetworkProbe, SystemNetworkProbe};
pub use pool::{PoolSettings, SessionPool};
