use std::env;

/// Verification settings for the bearer credential.
///
/// Tokens are issued elsewhere; the gateway only needs the shared secret to
/// check the signature and expiry.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Clock skew tolerated when checking `exp`, in seconds.
    pub leeway: u64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            leeway: env::var("JWT_LEEWAY_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }
}
