/// Environment variable names consulted as configuration fallbacks.
///
/// Explicit [`crate::config::HookConfig`] values always win over these; the
/// ambient credential variables (`AWS_ACCESS_KEY_ID` and friends) are read
/// by the credential provider itself, not here.

/// AWS region, e.g. `us-east-1`.
pub const AWS_REGION_ENV: &str = "AWS_REGION";

/// Custom service endpoint, e.g. a LocalStack URL.
pub const AWS_ENDPOINT_ENV: &str = "AWS_ENDPOINT";

/// Read an environment variable, treating unset and empty as absent.
pub fn env_nonempty(key: &str) -> Option<String> {
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}
