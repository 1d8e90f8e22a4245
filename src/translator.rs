//! Backend outcome to HTTP translation.
//!
//! | gRPC code           | HTTP | kind                    |
//! |---------------------|------|-------------------------|
//! | `UNAUTHENTICATED`   | 401  | `AuthenticationError`   |
//! | `PERMISSION_DENIED` | 403  | `PermissionDeniedError` |
//! | `INVALID_ARGUMENT`  | 400  | `ValidationError`       |
//! | `NOT_FOUND`         | 404  | `NotFoundError`         |
//! | anything else       | 500  | `InternalError`         |
//!
//! The backend's message is passed through verbatim. A status that was
//! produced locally by the transport (it carries a source error) is
//! reported with a fixed description so connection details stay internal.

use std::error::Error as _;

use tonic::{Code, Status};

use gateway_core::{ApiError, ErrorKind};

pub const BACKEND_UNAVAILABLE: &str = "backend service unavailable";

pub fn kind_for(code: Code) -> ErrorKind {
    match code {
        Code::Unauthenticated => ErrorKind::AuthenticationError,
        Code::PermissionDenied => ErrorKind::PermissionDeniedError,
        Code::InvalidArgument => ErrorKind::ValidationError,
        Code::NotFound => ErrorKind::NotFoundError,
        _ => ErrorKind::InternalError,
    }
}

fn default_description(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::AuthenticationError => "Unauthorized",
        ErrorKind::PermissionDeniedError => "Forbidden",
        ErrorKind::ValidationError => "Invalid request",
        ErrorKind::NotFoundError => "Not found",
        ErrorKind::InternalError => "Internal server error",
    }
}

/// Whether the status was synthesized by the local transport rather than
/// returned by the backend.
pub fn is_transport_failure(status: &Status) -> bool {
    status.source().is_some()
}

pub fn translate_status(status: &Status) -> ApiError {
    if is_transport_failure(status) {
        return ApiError::internal(BACKEND_UNAVAILABLE);
    }

    let kind = kind_for(status.code());
    let description = match status.message() {
        "" => default_description(kind).to_string(),
        message => message.to_string(),
    };

    ApiError::new(kind, description)
}
