//! Backend session abstraction
//!
//! Defines the `Session` and `SessionFactory` traits that decouple the pool
//! from the concrete backend handshakes. Two backends exist: WebDAV and EWS.
//! Which one is opened for a user is decided by `open_session()`:
//!
//! - `EwsMode::Enabled`, or an endpoint ending in `/ews/exchange.asmx` → EWS
//! - otherwise WebDAV, falling back to EWS when the endpoint reports WebDAV
//!   as unavailable and the mode is `Auto`
//!
//! Concrete factories live outside this crate; the traits use
//! `Pin<Box<dyn Future>>` returns so they stay dyn-compatible.

pub mod backend;
pub mod error;
pub mod select;

pub use backend::{Backend, EwsMode, Session, SessionFactory, SessionFuture};
pub use error::{Error, Result};
pub use select::{EWS_ENDPOINT_SUFFIX, is_ews_endpoint, open_session};
