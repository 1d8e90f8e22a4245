use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use gateway_config::{
    CorsConfig, JwtConfig, ServerConfig, ServicesConfig, ValidationConfig,
};
use gateway_core::{ApiError, Operation, PasswordPolicy, RuleSet};

use crate::dispatcher::{Dispatcher, Dispatchers, PipelineContext};
use crate::policy::{PolicyError, PolicyTable};
use crate::registry::ServiceRegistry;

#[derive(Clone, Debug)]
pub struct AppState {
    pub registry: ServiceRegistry,
    pub dispatchers: Arc<Dispatchers>,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rules: Arc<RuleSet>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        registry: ServiceRegistry,
        policies: &PolicyTable,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        rules: RuleSet,
        request_timeout: Duration,
    ) -> Result<Self, PolicyError> {
        Ok(Self {
            registry,
            dispatchers: Arc::new(Dispatchers::build(policies)?),
            jwt_config,
            cors_config,
            rules: Arc::new(rules),
            request_timeout,
        })
    }

    pub fn dispatcher(&self, operation: Operation) -> Result<&Dispatcher, ApiError> {
        self.dispatchers.get(operation)
    }

    pub fn pipeline(&self) -> PipelineContext<'_> {
        PipelineContext {
            jwt_config: &self.jwt_config,
            rules: &self.rules,
            deadline: self.request_timeout,
        }
    }
}

pub fn rules_from_config(config: &ValidationConfig) -> RuleSet {
    RuleSet {
        password: PasswordPolicy {
            min_length: config.password_min_length,
            min_classes: config.password_min_classes,
        },
        phone_digits: config.phone_digits,
        max_age_years: config.max_age_years,
        today: None,
    }
}

/// Loads configuration, validates the policy table and dials every backend.
/// Any failure aborts startup.
pub async fn init_app_state(server: &ServerConfig) -> anyhow::Result<AppState> {
    let policies = PolicyTable::load(server.policy_file.as_deref())
        .context("invalid authorization policy table")?;

    let services = ServicesConfig::from_env();
    let registry = ServiceRegistry::connect(&services, server.connect_timeout)
        .await
        .context("failed to initialize backend service registry")?;

    let state = AppState::new(
        registry,
        &policies,
        JwtConfig::from_env(),
        CorsConfig::from_env(),
        rules_from_config(&ValidationConfig::from_env()),
        server.request_timeout,
    )?;

    Ok(state)
}
