//! Authentication context extraction.
//!
//! Turns the `Authorization` header into an [`Identity`]. The header may
//! carry `Bearer <token>` or the bare token. Nothing here talks to a
//! backend; failures are always `AuthenticationError`.

use axum::http::{HeaderMap, header};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use gateway_auth::{AuthError, Identity, identity_from_token};
use gateway_config::JwtConfig;
use gateway_core::ApiError;

/// Raw token from the `Authorization` header.
pub fn credential(headers: &HeaderMap) -> Result<String, AuthError> {
    if let Some(Authorization(bearer)) = headers.typed_get::<Authorization<Bearer>>() {
        return Ok(bearer.token().to_string());
    }

    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?
        .trim();

    if value.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    // A scheme other than Bearer, or a bearer prefix with no token.
    if value.contains(char::is_whitespace) || value.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedCredential);
    }

    Ok(value.to_string())
}

pub fn auth_failure(err: AuthError) -> ApiError {
    ApiError::unauthenticated(err.to_string())
}

pub fn authenticate(headers: &HeaderMap, jwt_config: &JwtConfig) -> Result<Identity, ApiError> {
    let token = credential(headers).map_err(auth_failure)?;
    identity_from_token(&token, jwt_config).map_err(auth_failure)
}
