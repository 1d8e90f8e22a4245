//! Bearer credential verification.
//!
//! The gateway never issues tokens. It checks the HS256 signature and expiry
//! of a token issued by the identity service and turns its claims into an
//! [`Identity`]. A role outside the closed [`Role`] set fails verification,
//! so an unknown role is indistinguishable from no credential at all.
//!
//! # Example
//!
//! ```ignore
//! use gateway_auth::identity_from_token;
//! use gateway_config::JwtConfig;
//!
//! let identity = identity_from_token(token, &JwtConfig::from_env())?;
//! println!("{} acting as {}", identity.subject, identity.role);
//! ```

use jsonwebtoken::{DecodingKey, Validation, decode};

use gateway_config::JwtConfig;

use crate::claims::Claims;
use crate::identity::{Identity, Role, UnknownRole};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authorization header")]
    MissingCredential,
    #[error("Invalid authorization header format")]
    MalformedCredential,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Unrecognized role in credential")]
    UnknownRole(#[source] UnknownRole),
}

/// Verifies the token signature and expiry and returns its claims.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AuthError> {
    let mut validation = Validation::default();
    validation.leeway = jwt_config.leeway;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

/// Verifies the token and resolves it into an [`Identity`].
///
/// # Errors
///
/// - [`AuthError::InvalidToken`] for a bad signature, an expired token, or an
///   empty subject
/// - [`AuthError::UnknownRole`] when the role claim is outside the closed set
pub fn identity_from_token(token: &str, jwt_config: &JwtConfig) -> Result<Identity, AuthError> {
    let claims = verify_token(token, jwt_config)?;

    if claims.sub.trim().is_empty() {
        return Err(AuthError::InvalidToken);
    }

    let role = claims
        .role
        .parse::<Role>()
        .map_err(AuthError::UnknownRole)?;

    Ok(Identity::new(claims.sub, role))
}

/// Mints a token the way the identity service does. Test-only.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_token(subject: &str, role: &str, ttl_secs: i64, jwt_config: &JwtConfig) -> String {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: subject.to_string(),
        role: role.to_string(),
        exp: (now + ttl_secs).max(0) as usize,
        iat: now as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .unwrap_or_else(|e| panic!("failed to mint test token: {e}"))
}
