//! Session cache key

use common::Secret;
use user_context::{UserContext, convert_user_name};

/// Cache key for one pooled session.
///
/// Equality and hashing cover all three fields, so two passwords for the same
/// login occupy separate slots. The context part compares by identity only
/// (see `UserContext`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PoolKey {
    context: UserContext,
    user_name: String,
    password: Secret<String>,
}

impl PoolKey {
    /// Build a key, normalizing `user_name` with the default domain.
    pub fn new(
        context: UserContext,
        user_name: &str,
        password: &str,
        default_domain: Option<&str>,
    ) -> Self {
        Self {
            context,
            user_name: convert_user_name(user_name, default_domain),
            password: Secret::new(password.to_string()),
        }
    }

    pub fn context(&self) -> &UserContext {
        &self.context
    }

    /// Login name after default-domain normalization.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn password(&self) -> &Secret<String> {
        &self.password
    }

    pub fn endpoint_url(&self) -> &str {
        &self.context.endpoint_url
    }
}
