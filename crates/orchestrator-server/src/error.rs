use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{json, Value};

use crate::upstream::UpstreamError;

pub const ORCH_READY_ERROR: &str = "ORCH_READY_ERROR";
pub const BAD_ACQUIRE_RESPONSE: &str = "BAD_ACQUIRE_RESPONSE";
pub const PIPELINE_ERROR: &str = "PIPELINE_ERROR";
pub const INVALID_BODY: &str = "INVALID_BODY";

const PIPELINE_ERROR_MESSAGE: &str = "Error ejecutando el pipeline";

/// Which upstream call of `/run` failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Acquire,
    Predict,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Acquire => write!(f, "acquire"),
            Stage::Predict => write!(f, "predict"),
        }
    }
}

// ---------------------------------------------------------------------------
// AppError — every failure a route handler can return
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Composing the readiness report faulted.
    #[error("{0}")]
    Ready(anyhow::Error),

    /// The acquire service answered 2xx with an unusable payload.
    #[error("{message}")]
    BadAcquire { message: String, raw: Value },

    /// An upstream call in the pipeline failed.
    #[error("{stage} step failed: {source}")]
    Pipeline {
        stage: Stage,
        #[source]
        source: UpstreamError,
    },

    /// The client's `/run` body could not be parsed.
    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    pub fn pipeline(stage: Stage, source: UpstreamError) -> Self {
        Self::Pipeline { stage, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Ready(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::BadAcquire { .. } => StatusCode::BAD_GATEWAY,
            AppError::Pipeline { source, .. } => {
                source.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Ready(err) => json!({
                "ready": false,
                "error": ORCH_READY_ERROR,
                "details": err.to_string(),
            }),
            AppError::BadAcquire { message, raw } => json!({
                "error": BAD_ACQUIRE_RESPONSE,
                "message": message,
                "acquireResp": raw,
            }),
            AppError::Pipeline { stage, source } => json!({
                "error": PIPELINE_ERROR,
                "message": PIPELINE_ERROR_MESSAGE,
                "stage": stage,
                "details": source.details(),
            }),
            AppError::BadRequest(message) => json!({
                "error": INVALID_BODY,
                "message": message,
            }),
        };
        (status, axum::Json(body)).into_response()
    }
}
