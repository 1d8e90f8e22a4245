//! Request-level errors and the uniform error envelope.
//!
//! Every failure a caller can observe is an [`ApiError`]: a stable
//! [`ErrorKind`], a human-readable description and an optional cause. The
//! kind alone decides the HTTP status.
//!
//! # Example
//!
//! ```ignore
//! use gateway_core::errors::ApiError;
//!
//! async fn handler() -> Result<Json<Value>, ApiError> {
//!     Err(ApiError::permission_denied("Only superadmins can create admins"))
//! }
//! ```

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed taxonomy of request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ErrorKind {
    /// Missing or unparseable credential.
    AuthenticationError,
    /// Role not in the operation's allow-list.
    PermissionDeniedError,
    /// Malformed body, query parameter or failing field rule.
    ValidationError,
    /// The backend reports the entity does not exist.
    NotFoundError,
    /// Transport failure or unexpected backend fault.
    InternalError,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            Self::AuthenticationError => StatusCode::UNAUTHORIZED,
            Self::PermissionDeniedError => StatusCode::FORBIDDEN,
            Self::ValidationError => StatusCode::BAD_REQUEST,
            Self::NotFoundError => StatusCode::NOT_FOUND,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthenticationError => "AuthenticationError",
            Self::PermissionDeniedError => "PermissionDeniedError",
            Self::ValidationError => "ValidationError",
            Self::NotFoundError => "NotFoundError",
            Self::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body returned to callers on any failure.
///
/// ```json
/// { "kind": "ValidationError", "description": "page must be a non-negative integer", "cause": "page" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub kind: ErrorKind,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {description}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub description: String,
    pub cause: Option<String>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            cause: None,
        }
    }

    pub fn unauthenticated(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::AuthenticationError, description)
    }

    pub fn permission_denied(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDeniedError, description)
    }

    pub fn validation(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, description)
    }

    pub fn not_found(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFoundError, description)
    }

    pub fn internal(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, description)
    }

    /// Attaches a short, caller-safe cause (a field name, an operation name).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            kind: self.kind,
            description: self.description.clone(),
            cause: self.cause.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.envelope())).into_response()
    }
}
