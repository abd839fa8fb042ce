//! Per-user context lookup
//!
//! Every gateway user maps to a `UserContext` record naming the backend
//! endpoint that serves their mailbox. Records live either on local disk
//! (`file://` lookup base) or behind an HTTP directory service, one JSON
//! document per user:
//!
//! ```text
//! {lookup base}/{url-encoded lower-cased user name}.json
//! ```
//!
//! Lookup flow:
//! 1. Caller passes the raw login name to `UserContextResolver::resolve()`
//! 2. Resolver builds the per-user locator and fetches the document
//! 3. Transport/parse failures surface as `Error::Lookup` (no raw errors leak)
//! 4. Unconfirmed accounts and missing records get their own error kinds

pub mod context;
pub mod error;
pub mod naming;
pub mod resolver;

pub use context::UserContext;
pub use error::{Error, Result};
pub use naming::convert_user_name;
pub use resolver::{UserContextResolver, user_resource};
