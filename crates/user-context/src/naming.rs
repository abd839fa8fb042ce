//! Login name normalization

/// Prefix `user_name` with the default Windows domain.
///
/// Applies only when a default domain is configured and the name carries no
/// domain of its own (neither `DOMAIN\user` nor `user@domain` form). Names
/// that already went through this function are returned unchanged.
pub fn convert_user_name(user_name: &str, default_domain: Option<&str>) -> String {
    match default_domain {
        Some(domain) if !user_name.contains('\\') && !user_name.contains('@') => {
            format!("{domain}\\{user_name}")
        }
        _ => user_name.to_string(),
    }
}
