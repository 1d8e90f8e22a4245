//! Prometheus metrics for the HTTP surface and the backend calls behind it.
//!
//! Recording is a no-op until [`init_metrics`] installs a recorder, and the
//! helpers short-circuit when `OBSERVABILITY_ENABLED=false`.

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

const HTTP_DURATION: &str = "http_request_duration_seconds";
const BACKEND_DURATION: &str = "backend_call_duration_seconds";

const LATENCY_BUCKETS: [f64; 13] = [
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

static OBSERVABILITY_ENABLED: OnceLock<bool> = OnceLock::new();

/// Enabled unless `OBSERVABILITY_ENABLED` is `false` or `0`.
pub fn is_observability_enabled() -> bool {
    *OBSERVABILITY_ENABLED.get_or_init(|| {
        std::env::var("OBSERVABILITY_ENABLED")
            .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0"))
            .unwrap_or(true)
    })
}

/// Installs the global recorder and its upkeep task.
/// Returns `None` when observability is disabled.
pub fn init_metrics() -> Result<Option<PrometheusHandle>, BuildError> {
    if !is_observability_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(HTTP_DURATION.to_string()), &LATENCY_BUCKETS)?
        .set_buckets_for_metric(Matcher::Full(BACKEND_DURATION.to_string()), &LATENCY_BUCKETS)?
        .install_recorder()?;

    let upkeep = handle.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(5));
        loop {
            interval.tick().await;
            upkeep.run_upkeep();
        }
    });

    Ok(Some(handle))
}

/// Keeps `http_requests_active` balanced even when the client disconnects
/// and the handler future is dropped mid-flight.
struct InFlight;

impl InFlight {
    fn enter() -> Self {
        gauge!("http_requests_active").increment(1.0);
        Self
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        gauge!("http_requests_active").decrement(1.0);
    }
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_observability_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = match req.extensions().get::<MatchedPath>() {
        Some(matched) => matched.as_str().to_owned(),
        // Raw paths are unbounded label values.
        None => "unmatched".to_owned(),
    };

    let _in_flight = InFlight::enter();
    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
        .increment(1);
    histogram!(HTTP_DURATION, "method" => method, "path" => path).record(start.elapsed().as_secs_f64());

    response
}

/// Router for the separate metrics listener.
pub fn metrics_app(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

/// One round trip to a backend service.
pub fn track_backend_call(service: &'static str, method: &'static str, outcome: &str, duration_secs: f64) {
    if !is_observability_enabled() {
        return;
    }
    counter!("backend_calls_total", "service" => service, "method" => method, "outcome" => outcome.to_string())
        .increment(1);
    histogram!(BACKEND_DURATION, "service" => service, "method" => method).record(duration_secs);
}

/// A request stopped by the gateway itself, before or after the backend.
pub fn track_rejection(operation: String, stage: &'static str, kind: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    counter!("gateway_rejections_total", "operation" => operation, "stage" => stage, "kind" => kind)
        .increment(1);
}

pub fn track_authorization_check(allowed: bool, role: &'static str) {
    if !is_observability_enabled() {
        return;
    }
    let decision = if allowed { "allowed" } else { "denied" };
    counter!("authorization_checks_total", "role" => role, "decision" => decision).increment(1);
}
