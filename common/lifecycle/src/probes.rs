//! K8s readiness and liveness probe handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio_util::sync::CancellationToken;

/// Axum-compatible readiness probe; returns 200 while running, 503 once
/// shutdown has begun so K8s stops routing new traffic before the listener
/// closes.
#[derive(Clone)]
pub struct ReadinessHandler {
    trigger: CancellationToken,
}

impl ReadinessHandler {
    pub(crate) fn new(trigger: CancellationToken) -> Self {
        Self { trigger }
    }

    /// Returns OK or SERVICE_UNAVAILABLE based on the shutdown trigger; no I/O.
    pub async fn check(&self) -> StatusCode {
        if self.trigger.is_cancelled() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::OK
        }
    }
}

/// K8s liveness probe handler. Always returns 200: liveness means "the
/// process is reachable". Anything stronger belongs in readiness, where a
/// failing check drains traffic instead of surprise-killing the pod.
#[derive(Clone)]
pub struct LivenessHandler;

impl LivenessHandler {
    pub(crate) fn new() -> Self {
        Self
    }

    pub fn check(&self) -> LivenessStatus {
        LivenessStatus
    }
}

/// Always-healthy liveness status. Implements [`IntoResponse`] for axum.
pub struct LivenessStatus;

impl IntoResponse for LivenessStatus {
    fn into_response(self) -> Response {
        (StatusCode::OK, "ok").into_response()
    }
}
