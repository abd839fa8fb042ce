//! User context record
//!
//! Deserialized from the per-user JSON document. The JSON field names follow
//! the directory service (`user`, `url`); the Rust names describe their role.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Directory record for one gateway user.
///
/// Equality and hashing look at `identity` only: two records with the same
/// identity but different endpoints compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(rename = "user")]
    pub identity: String,
    #[serde(default)]
    pub email: String,
    /// Backend endpoint serving this user
    #[serde(rename = "url")]
    pub endpoint_url: String,
    #[serde(default)]
    pub confirmed: bool,
    #[serde(default)]
    pub properties: HashMap<String, String>,
}

impl PartialEq for UserContext {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for UserContext {}

impl Hash for UserContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity.hash(state);
    }
}
