//! # Gateway Auth
//!
//! Authentication context for the API gateway.
//!
//! - [`identity`]: the closed [`Role`] set and the per-request [`Identity`]
//! - [`claims`]: JWT claim structure of the bearer credential
//! - [`jwt`]: signature/expiry verification and identity extraction
//!
//! Token issuance is owned by the identity service. The `test-utils`
//! feature exposes [`create_token`] so tests can mint credentials.

pub mod claims;
pub mod identity;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use identity::{Identity, Role, UnknownRole};
#[cfg(any(test, feature = "test-utils"))]
pub use jwt::create_token;
pub use jwt::{AuthError, identity_from_token, verify_token};
