//! # API Gateway
//!
//! HTTP/JSON front for a set of gRPC backends: the identity service (admins
//! and students) and the task service. Clients never reach the backends
//! directly; every request goes through one pipeline:
//!
//! ```text
//! Authorization header -> Identity -> policy check -> decode + field rules
//!     -> one backend call (with deadline) -> status translation -> JSON
//! ```
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── gateway-core/     # ApiError + envelope, operations, field rules, paging
//! ├── gateway-config/   # env-driven configuration
//! ├── gateway-auth/     # roles, claims, JWT verification
//! └── gateway-proto/    # .proto contracts and generated clients
//! src/
//! ├── registry/         # one channel per backend address, typed stubs
//! ├── policy.rs         # per-operation role allow-lists
//! ├── dispatcher.rs     # the request pipeline
//! ├── translator.rs     # gRPC status -> HTTP error
//! ├── validator.rs      # body decoding and rule composition
//! ├── middleware/       # credential extraction
//! └── modules/          # admin, student, task routes and handlers
//! ```
//!
//! ## Roles
//!
//! | Role | Admins | Students | Tasks |
//! |------|--------|----------|-------|
//! | superadmin | all | all | all |
//! | manager | all | all | none |
//! | admin | read, update, delete, password | none | all |
//! | administrator | none | all | none |
//! | student | none | read, update, password | none |
//! | user | none | none | all |
//!
//! `login`, `register` and `register-confirm` are public.
//!
//! ## Quick Start
//!
//! ```bash
//! JWT_SECRET=shared-with-identity-service
//! USER_SERVICE_HOST=localhost USER_SERVICE_PORT=9101
//! TASK_SERVICE_HOST=localhost TASK_SERVICE_PORT=9102
//! cargo run
//! ```
//!
//! Documentation is served at `/swagger-ui` and `/scalar`.

pub mod cli;
pub mod dispatcher;
pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod policy;
pub mod registry;
pub mod router;
pub mod state;
pub mod translator;
pub mod validator;

// Re-export workspace crates for convenience
pub use gateway_auth;
pub use gateway_config;
pub use gateway_core;
pub use gateway_proto;
