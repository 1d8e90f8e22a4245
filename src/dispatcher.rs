//! Per-operation request pipeline.
//!
//! ```text
//! Received -> Authenticating -> Authorizing -> Validating -> Dispatching -> Translating
//!                                                                              |
//!                                                          Completed | Failed(kind)
//! ```
//!
//! Public operations skip the two credential stages. Any stage may stop the
//! pipeline; validation and authorization failures never reach a backend.
//! A request makes at most one backend call and is never retried.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use axum::Json;
use axum::http::HeaderMap;
use serde::Serialize;
use tonic::{Request, Response, Status};
use tracing::{debug, info, warn};

use gateway_auth::Identity;
use gateway_config::JwtConfig;
use gateway_core::{ApiError, ErrorKind, Operation, RuleSet};

use crate::metrics::{track_authorization_check, track_backend_call, track_rejection};
use crate::middleware::auth::authenticate;
use crate::policy::{OperationPolicy, PolicyError, PolicyTable};
use crate::registry::service_for;
use crate::translator::translate_status;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Received,
    Authenticating,
    Authorizing,
    Validating,
    Dispatching,
    Translating,
    Completed,
    Failed(ErrorKind),
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Authenticating => "authenticating",
            Self::Authorizing => "authorizing",
            Self::Validating => "validating",
            Self::Dispatching => "dispatching",
            Self::Translating => "translating",
            Self::Completed => "completed",
            Self::Failed(_) => "failed",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(kind) => write!(f, "failed({})", kind),
            other => f.write_str(other.as_str()),
        }
    }
}

/// What a pipeline run needs from the process: read-only and shared.
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    pub jwt_config: &'a JwtConfig,
    pub rules: &'a RuleSet,
    pub deadline: Duration,
}

struct Failure {
    stage: Stage,
    error: ApiError,
}

impl Failure {
    fn at(stage: Stage) -> impl FnOnce(ApiError) -> Failure {
        move |error| Failure { stage, error }
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    operation: Operation,
    policy: Option<OperationPolicy>,
}

impl Dispatcher {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn is_public(&self) -> bool {
        self.policy.is_none()
    }

    /// Runs the pipeline for one request.
    ///
    /// `validate` decodes and checks the input; `call` performs the single
    /// backend round trip with the deadline already attached.
    pub async fn run<Req, Resp, V, C, Fut>(
        &self,
        ctx: PipelineContext<'_>,
        headers: &HeaderMap,
        validate: V,
        call: C,
    ) -> Result<Json<Resp>, ApiError>
    where
        V: FnOnce(&RuleSet) -> Result<Req, ApiError>,
        C: FnOnce(Request<Req>) -> Fut,
        Fut: Future<Output = Result<Response<Resp>, Status>>,
        Resp: Serialize,
    {
        debug!(operation = %self.operation, stage = %Stage::Received, "Pipeline started");

        match self.pipeline(ctx, headers, validate, call).await {
            Ok(reply) => {
                debug!(operation = %self.operation, stage = %Stage::Completed, "Pipeline finished");
                Ok(Json(reply))
            }
            Err(Failure { stage, error }) => {
                let outcome = Stage::Failed(error.kind);
                match error.kind {
                    ErrorKind::InternalError => warn!(
                        operation = %self.operation,
                        stage = %stage,
                        outcome = %outcome,
                        description = %error.description,
                        "Request failed"
                    ),
                    _ => info!(
                        operation = %self.operation,
                        stage = %stage,
                        outcome = %outcome,
                        description = %error.description,
                        "Request rejected"
                    ),
                }
                track_rejection(self.operation.to_string(), stage.as_str(), error.kind.as_str());
                Err(error)
            }
        }
    }

    async fn pipeline<Req, Resp, V, C, Fut>(
        &self,
        ctx: PipelineContext<'_>,
        headers: &HeaderMap,
        validate: V,
        call: C,
    ) -> Result<Resp, Failure>
    where
        V: FnOnce(&RuleSet) -> Result<Req, ApiError>,
        C: FnOnce(Request<Req>) -> Fut,
        Fut: Future<Output = Result<Response<Resp>, Status>>,
    {
        if let Some(policy) = &self.policy {
            debug!(operation = %self.operation, stage = %Stage::Authenticating);
            let identity: Identity = authenticate(headers, ctx.jwt_config)
                .map_err(Failure::at(Stage::Authenticating))?;

            debug!(
                operation = %self.operation,
                stage = %Stage::Authorizing,
                subject = %identity.subject,
                role = %identity.role
            );
            let decision = policy.authorize(&identity);
            track_authorization_check(decision.is_ok(), identity.role.as_str());
            decision.map_err(Failure::at(Stage::Authorizing))?;
        }

        debug!(operation = %self.operation, stage = %Stage::Validating);
        let payload = validate(ctx.rules).map_err(Failure::at(Stage::Validating))?;

        debug!(operation = %self.operation, stage = %Stage::Dispatching);
        let mut request = Request::new(payload);
        request.set_timeout(ctx.deadline);

        let started = Instant::now();
        let outcome = match tokio::time::timeout(ctx.deadline, call(request)).await {
            Ok(outcome) => outcome,
            Err(_elapsed) => Err(Status::deadline_exceeded("backend call timed out")),
        };
        track_backend_call(
            service_for(self.operation.resource).as_str(),
            self.operation.action.as_str(),
            match &outcome {
                Ok(_) => "ok",
                Err(status) => code_label(status),
            },
            started.elapsed().as_secs_f64(),
        );

        debug!(operation = %self.operation, stage = %Stage::Translating);
        outcome
            .map(Response::into_inner)
            .map_err(|status| Failure {
                stage: Stage::Translating,
                error: translate_status(&status),
            })
    }
}

fn code_label(status: &Status) -> &'static str {
    use tonic::Code;

    match status.code() {
        Code::Unauthenticated => "unauthenticated",
        Code::PermissionDenied => "permission_denied",
        Code::InvalidArgument => "invalid_argument",
        Code::NotFound => "not_found",
        Code::Unavailable => "unavailable",
        Code::DeadlineExceeded => "deadline_exceeded",
        _ => "error",
    }
}

/// One dispatcher per exposed operation.
#[derive(Debug, Clone)]
pub struct Dispatchers {
    by_operation: BTreeMap<Operation, Dispatcher>,
}

impl Dispatchers {
    /// Binds every exposed operation to its policy. A protected operation
    /// without a policy is an error.
    pub fn build(policies: &PolicyTable) -> Result<Self, PolicyError> {
        let mut by_operation = BTreeMap::new();

        for operation in Operation::ALL {
            let policy = match policies.get(operation) {
                Some(policy) => Some(policy.clone()),
                None if operation.is_public() => None,
                None => return Err(PolicyError::Missing(operation)),
            };
            by_operation.insert(operation, Dispatcher { operation, policy });
        }

        Ok(Self { by_operation })
    }

    pub fn get(&self, operation: Operation) -> Result<&Dispatcher, ApiError> {
        self.by_operation.get(&operation).ok_or_else(|| {
            ApiError::internal("Operation is not available").with_cause(operation.to_string())
        })
    }

    pub fn len(&self) -> usize {
        self.by_operation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_operation.is_empty()
    }
}
