//! # Gateway Core
//!
//! Core types shared by every part of the API gateway.
//!
//! - [`errors`]: the request-level error type and the uniform error envelope
//! - [`operation`]: (resource, action) identifiers for exposed operations
//! - [`rules`]: pure field validation rules (email, phone, password, birth date)
//! - [`pagination`]: query parameters for listing endpoints
//!
//! # Example
//!
//! ```ignore
//! use gateway_core::{ApiError, RuleSet};
//!
//! let rules = RuleSet::default();
//! rules.email("email", "jane@example.com")?;
//! ```

pub mod errors;
pub mod operation;
pub mod pagination;
pub mod rules;

// Re-export commonly used types at crate root
pub use errors::{ApiError, ErrorEnvelope, ErrorKind};
pub use operation::{Action, Operation, ParseOperationError, Resource};
pub use pagination::{ListQuery, Page};
pub use rules::{PasswordPolicy, RuleSet, RuleViolation};
