//! Backend service addresses.
//!
//! Each logical service the gateway talks to is described by a
//! [`ServiceDescriptor`]. Several logical services may point at the same
//! `host:port`; the registry then multiplexes them over one connection.
//!
//! # Environment Variables
//!
//! - `USER_SERVICE_HOST` / `USER_SERVICE_PORT` (default `localhost:9101`):
//!   the service hosting both admins and students
//! - `TASK_SERVICE_HOST` / `TASK_SERVICE_PORT` (default `localhost:9102`)
//! - `ADMIN_SERVICE_HOST` / `ADMIN_SERVICE_PORT`,
//!   `STUDENT_SERVICE_HOST` / `STUDENT_SERVICE_PORT`: optional overrides that
//!   split a logical service onto its own address

use std::env;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServiceName {
    Admin,
    Student,
    Task,
}

impl ServiceName {
    pub const ALL: [ServiceName; 3] = [ServiceName::Admin, ServiceName::Student, ServiceName::Task];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin_service",
            Self::Student => "student_service",
            Self::Task => "task_service",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    pub logical_name: ServiceName,
    pub host: String,
    pub port: u16,
}

impl ServiceDescriptor {
    pub fn new(logical_name: ServiceName, host: impl Into<String>, port: u16) -> Self {
        Self {
            logical_name,
            host: host.into(),
            port,
        }
    }

    /// Physical identity; descriptors sharing it share a connection.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn uri(&self) -> String {
        format!("http://{}", self.address())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicesConfig {
    pub descriptors: Vec<ServiceDescriptor>,
}

fn host_var(key: &str, fallback: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

fn port_var(key: &str, fallback: u16) -> u16 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(fallback)
}

impl ServicesConfig {
    pub fn from_env() -> Self {
        let user_host = host_var("USER_SERVICE_HOST", "localhost");
        let user_port = port_var("USER_SERVICE_PORT", 9101);
        let task_host = host_var("TASK_SERVICE_HOST", "localhost");
        let task_port = port_var("TASK_SERVICE_PORT", 9102);

        Self {
            descriptors: vec![
                ServiceDescriptor::new(
                    ServiceName::Admin,
                    host_var("ADMIN_SERVICE_HOST", &user_host),
                    port_var("ADMIN_SERVICE_PORT", user_port),
                ),
                ServiceDescriptor::new(
                    ServiceName::Student,
                    host_var("STUDENT_SERVICE_HOST", &user_host),
                    port_var("STUDENT_SERVICE_PORT", user_port),
                ),
                ServiceDescriptor::new(ServiceName::Task, task_host, task_port),
            ],
        }
    }

    pub fn get(&self, name: ServiceName) -> Option<&ServiceDescriptor> {
        self.descriptors.iter().find(|d| d.logical_name == name)
    }
}
