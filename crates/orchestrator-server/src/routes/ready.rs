use axum::extract::State;
use axum::Json;
use orchestrator_core::readiness::ProbeOutcome;
use orchestrator_core::types::{ReadinessReport, ServiceStatus};
use serde_json::Value;
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// GET /ready — probe both upstreams concurrently and report the combined flag.
///
/// Each probe runs as its own task and settles into a [`ProbeOutcome`], so a
/// failing or slow upstream never short-circuits the other. Only a fault in
/// the orchestrator itself (a probe task dying, or the report failing to
/// serialize) produces the 500 `ORCH_READY_ERROR` response.
pub async fn ready(State(app): State<AppState>) -> Result<Json<Value>, AppError> {
    let timeout = app.config.ready_timeout;
    let acquire_url = app.config.acquire_ready_url();
    let predict_url = app.config.predict_ready_url();

    let acquire = tokio::spawn({
        let upstream = app.upstream.clone();
        let url = acquire_url.clone();
        async move { upstream.probe(&url, timeout).await }
    });
    let predict = tokio::spawn({
        let upstream = app.upstream.clone();
        let url = predict_url.clone();
        async move { upstream.probe(&url, timeout).await }
    });

    let (acquire, predict) = tokio::join!(acquire, predict);
    let acquire = settle(acquire)?;
    let predict = settle(predict)?;

    let report = ReadinessReport::new(
        ServiceStatus::from_outcome(acquire_url, acquire),
        ServiceStatus::from_outcome(predict_url, predict),
    );
    debug!(
        ready = report.ready,
        acquire_ok = report.services.acquire.ok,
        predict_ok = report.services.predict.ok,
        "readiness report composed"
    );

    let body = serde_json::to_value(&report).map_err(|e| AppError::Ready(e.into()))?;
    Ok(Json(body))
}

fn settle(joined: Result<ProbeOutcome, tokio::task::JoinError>) -> Result<ProbeOutcome, AppError> {
    joined.map_err(|e| AppError::Ready(anyhow::anyhow!("task join error: {e}")))
}
