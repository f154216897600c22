/// Get environment variable with STRIPE_PLANS_ prefix, falling back to unprefixed version
///
/// Checks `STRIPE_PLANS_{key}` first, then `{key}`.
///
/// ```rust,ignore
/// // Checks STRIPE_PLANS_API_VERSION first, then API_VERSION
/// let version = get_env_with_prefix("API_VERSION");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("STRIPE_PLANS_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
