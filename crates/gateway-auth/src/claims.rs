//! JWT claim structure carried by the bearer credential.

use serde::{Deserialize, Serialize};

/// Claims of an access token issued by the identity service.
///
/// Only `sub` and `role` are consumed by the gateway. The aliases accept the
/// `user_id` / `user_role` spelling used by older tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    #[serde(alias = "user_id")]
    pub sub: String,
    /// Raw role name, checked against [`crate::Role`] after decoding
    #[serde(alias = "user_role")]
    pub role: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    #[serde(default)]
    pub iat: usize,
}
