//! Backend service registry.
//!
//! Built once at startup from the [`ServicesConfig`]. Descriptors are grouped
//! by `host:port`; each group gets exactly one channel, and every logical
//! service in the group gets a typed stub on that channel. After startup the
//! registry is read-only and lookups never perform I/O.
//!
//! ```text
//! admin_service   ─┐
//!                  ├─> localhost:9101 (one channel)
//! student_service ─┘
//! task_service    ───> localhost:9102 (one channel)
//! ```

pub mod stubs;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tonic::transport::{Channel, Endpoint};
use tracing::info;

use gateway_config::{ServiceName, ServicesConfig};
use gateway_core::Resource;
use gateway_proto::admin_service::admin_service_client::AdminServiceClient;
use gateway_proto::student_service::student_service_client::StudentServiceClient;
use gateway_proto::task_service::task_service_client::TaskServiceClient;

pub use stubs::{AdminStub, StudentStub, TaskStub};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no descriptor configured for {0}")]
    MissingService(ServiceName),
    #[error("{0} is configured more than once")]
    DuplicateService(ServiceName),
    #[error("invalid endpoint '{address}'")]
    InvalidEndpoint {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },
    #[error("failed to connect to {address}")]
    Dial {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },
}

/// Logical service backing a resource.
pub fn service_for(resource: Resource) -> ServiceName {
    match resource {
        Resource::Admin => ServiceName::Admin,
        Resource::Student => ServiceName::Student,
        Resource::Task => ServiceName::Task,
    }
}

/// Groups logical services by physical address.
///
/// Fails when a logical service is missing or appears twice.
pub fn group_by_address(
    config: &ServicesConfig,
) -> Result<BTreeMap<String, Vec<ServiceName>>, RegistryError> {
    for name in ServiceName::ALL {
        match config
            .descriptors
            .iter()
            .filter(|d| d.logical_name == name)
            .count()
        {
            0 => return Err(RegistryError::MissingService(name)),
            1 => {}
            _ => return Err(RegistryError::DuplicateService(name)),
        }
    }

    let mut groups: BTreeMap<String, Vec<ServiceName>> = BTreeMap::new();
    for descriptor in &config.descriptors {
        groups
            .entry(descriptor.address())
            .or_default()
            .push(descriptor.logical_name);
    }

    Ok(groups)
}

#[derive(Clone)]
pub struct ServiceRegistry {
    admin: Arc<dyn AdminStub>,
    student: Arc<dyn StudentStub>,
    task: Arc<dyn TaskStub>,
    connections: usize,
}

impl ServiceRegistry {
    /// Dials one channel per distinct address and binds every logical
    /// service to it. Any dial failure aborts the whole registry.
    pub async fn connect(
        config: &ServicesConfig,
        connect_timeout: Duration,
    ) -> Result<Self, RegistryError> {
        let groups = group_by_address(config)?;

        let mut channels: BTreeMap<String, Channel> = BTreeMap::new();
        for descriptor in &config.descriptors {
            let address = descriptor.address();
            if channels.contains_key(&address) {
                continue;
            }

            let endpoint = Endpoint::from_shared(descriptor.uri())
                .map_err(|source| RegistryError::InvalidEndpoint {
                    address: address.clone(),
                    source,
                })?
                .connect_timeout(connect_timeout);

            let channel = endpoint
                .connect()
                .await
                .map_err(|source| RegistryError::Dial {
                    address: address.clone(),
                    source,
                })?;

            let names: Vec<&str> = groups
                .get(&address)
                .map(|services| services.iter().map(|s| s.as_str()).collect())
                .unwrap_or_default();
            info!(address = %address, services = ?names, "Backend channel established");
            channels.insert(address, channel);
        }

        let channel_for = |name: ServiceName| -> Result<Channel, RegistryError> {
            config
                .get(name)
                .and_then(|d| channels.get(&d.address()))
                .cloned()
                .ok_or(RegistryError::MissingService(name))
        };

        Ok(Self {
            admin: Arc::new(AdminServiceClient::new(channel_for(ServiceName::Admin)?)),
            student: Arc::new(StudentServiceClient::new(channel_for(
                ServiceName::Student,
            )?)),
            task: Arc::new(TaskServiceClient::new(channel_for(ServiceName::Task)?)),
            connections: channels.len(),
        })
    }

    /// Registry over caller-supplied stubs, with no connections of its own.
    pub fn from_stubs(
        admin: Arc<dyn AdminStub>,
        student: Arc<dyn StudentStub>,
        task: Arc<dyn TaskStub>,
    ) -> Self {
        Self {
            admin,
            student,
            task,
            connections: 0,
        }
    }

    pub fn admin(&self) -> Arc<dyn AdminStub> {
        Arc::clone(&self.admin)
    }

    pub fn student(&self) -> Arc<dyn StudentStub> {
        Arc::clone(&self.student)
    }

    pub fn task(&self) -> Arc<dyn TaskStub> {
        Arc::clone(&self.task)
    }

    /// Number of physical channels opened at startup.
    pub fn connection_count(&self) -> usize {
        self.connections
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("connections", &self.connections)
            .finish_non_exhaustive()
    }
}
