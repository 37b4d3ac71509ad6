use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::Json;
use orchestrator_core::pipeline::{acquire_request, validate_acquire};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{AppError, Stage};
use crate::state::AppState;

/// POST /run — acquire data, validate it, predict on it, return the merge.
///
/// The two upstream calls are strictly sequential. A malformed acquire
/// payload stops the run with 502 before predict is contacted; any upstream
/// failure is reported once as `PIPELINE_ERROR`.
pub async fn run_pipeline(
    State(app): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let run_body = parse_run_body(&headers, &body)?;
    let run_id = uuid::Uuid::new_v4();
    info!(%run_id, "pipeline run started");

    // 1. acquire
    let acquire_body = acquire_request(&run_body);
    let raw = app
        .upstream
        .post_json(
            &app.config.acquire_data_url(),
            &acquire_body,
            app.config.step_timeout,
        )
        .await
        .map_err(|e| {
            warn!(%run_id, stage = %Stage::Acquire, status = ?e.status(), error = %e, "pipeline step failed");
            AppError::pipeline(Stage::Acquire, e)
        })?;

    // 2. validate
    let acquired = match validate_acquire(&raw) {
        Ok(acquired) => acquired,
        Err(e) => {
            warn!(%run_id, "acquire returned an invalid payload");
            return Err(AppError::BadAcquire {
                message: e.to_string(),
                raw,
            });
        }
    };

    // 3. predict
    let prediction = app
        .upstream
        .post_json(
            &app.config.predict_endpoint_url(),
            &acquired.predict_request(),
            app.config.step_timeout,
        )
        .await
        .map_err(|e| {
            warn!(%run_id, stage = %Stage::Predict, status = ?e.status(), error = %e, "pipeline step failed");
            AppError::pipeline(Stage::Predict, e)
        })?;

    info!(%run_id, data_id = %acquired.data_id, "pipeline run completed");
    Ok(Json(acquired.merge_prediction(prediction)))
}

/// Decode the optional `/run` body. Only `application/json` bodies are read;
/// anything else, or an empty body, counts as `{}`. JSON that is malformed or
/// not an object/array is rejected.
fn parse_run_body(headers: &HeaderMap, body: &[u8]) -> Result<Value, AppError> {
    let empty = || Value::Object(Map::new());

    if !is_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(empty());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Ok(value),
        Ok(_) => Err(AppError::BadRequest(
            "request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(format!("invalid JSON body: {e}"))),
    }
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers
    }

    #[test]
    fn json_body_is_parsed() {
        let value = parse_run_body(&json_headers(), br#"{"targetDate":"2024-02-01"}"#).unwrap();
        assert_eq!(value, json!({ "targetDate": "2024-02-01" }));
    }

    #[test]
    fn empty_body_is_empty_object() {
        assert_eq!(parse_run_body(&json_headers(), b"").unwrap(), json!({}));
    }

    #[test]
    fn non_json_content_type_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert_eq!(
            parse_run_body(&headers, b"targetDate=2024").unwrap(),
            json!({})
        );
        assert_eq!(
            parse_run_body(&HeaderMap::new(), br#"{"targetDate":"x"}"#).unwrap(),
            json!({})
        );
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = parse_run_body(&json_headers(), b"{not json").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn scalar_json_is_rejected() {
        let err = parse_run_body(&json_headers(), b"\"2024-01-01\"").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
