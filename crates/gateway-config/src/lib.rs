//! # Gateway Config
//!
//! Configuration types for the API gateway.
//!
//! Every structure is loaded from environment variables with defaults
//! suitable for local development:
//!
//! - [`jwt`]: bearer credential verification
//! - [`cors`]: allowed origins
//! - [`server`]: listener addresses, timeouts, policy file
//! - [`services`]: backend service descriptors
//! - [`validation`]: field rule parameters
//!
//! # Example
//!
//! ```ignore
//! use gateway_config::{JwtConfig, ServerConfig, ServicesConfig};
//!
//! dotenvy::dotenv().ok();
//! let server = ServerConfig::from_env();
//! let services = ServicesConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod server;
pub mod services;
pub mod validation;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;
pub use services::{ServiceDescriptor, ServiceName, ServicesConfig};
pub use validation::ValidationConfig;
