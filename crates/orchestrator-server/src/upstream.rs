//! HTTP client for the acquire and predict services.
//!
//! Every call carries its own timeout. Non-2xx replies are turned into
//! [`UpstreamError::Status`] with the decoded body attached, so callers can
//! forward both the status code and what the upstream said.

use std::time::Duration;

use orchestrator_core::json::is_truthy;
use orchestrator_core::readiness::ProbeOutcome;
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("Request failed with status code {}", .status.as_u16())]
    Status { status: StatusCode, body: Value },

    #[error("timeout of {timeout_ms}ms exceeded")]
    Timeout { timeout_ms: u128 },

    #[error("{0}")]
    Transport(#[source] reqwest::Error),
}

impl UpstreamError {
    fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout {
                timeout_ms: timeout.as_millis(),
            }
        } else {
            UpstreamError::Transport(err)
        }
    }

    /// HTTP status of the upstream reply, when there was one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Body of the upstream's error reply, when there was one.
    pub fn body(&self) -> Option<&Value> {
        match self {
            UpstreamError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The upstream's error body if it is truthy, otherwise the error message.
    pub fn details(&self) -> Value {
        match self.body() {
            Some(body) if is_truthy(body) => body.clone(),
            _ => Value::String(self.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// UpstreamClient
// ---------------------------------------------------------------------------

/// Thin wrapper over a shared, connection-pooling `reqwest::Client`.
#[derive(Clone, Default)]
pub struct UpstreamClient {
    http: reqwest::Client,
}

impl UpstreamClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub async fn get_json(&self, url: &str, timeout: Duration) -> Result<Value, UpstreamError> {
        let request = self.http.get(url).timeout(timeout);
        Self::execute(request, timeout).await
    }

    pub async fn post_json<B>(
        &self,
        url: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<Value, UpstreamError>
    where
        B: Serialize + ?Sized,
    {
        let request = self.http.post(url).json(body).timeout(timeout);
        Self::execute(request, timeout).await
    }

    /// GET a `/ready` endpoint and settle the result into a [`ProbeOutcome`].
    pub async fn probe(&self, url: &str, timeout: Duration) -> ProbeOutcome {
        match self.get_json(url, timeout).await {
            Ok(body) => ProbeOutcome::Fulfilled { body },
            Err(err) => {
                debug!(url, error = %err, "readiness probe failed");
                ProbeOutcome::Rejected {
                    body: err.body().cloned(),
                    message: err.to_string(),
                }
            }
        }
    }

    async fn execute(
        request: reqwest::RequestBuilder,
        timeout: Duration,
    ) -> Result<Value, UpstreamError> {
        let response = request
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, timeout))?;
        let body = decode_body(&bytes);

        if status.is_success() {
            Ok(body)
        } else {
            Err(UpstreamError::Status { status, body })
        }
    }
}

/// JSON when the payload parses, otherwise the raw text as a JSON string.
/// An empty payload becomes `""`.
fn decode_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::String(String::new());
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_json_body() {
        assert_eq!(decode_body(br#"{"ready":true}"#), json!({ "ready": true }));
    }

    #[test]
    fn decode_text_body() {
        assert_eq!(decode_body(b"Service Unavailable"), json!("Service Unavailable"));
    }

    #[test]
    fn decode_empty_body() {
        assert_eq!(decode_body(b""), json!(""));
        assert_eq!(decode_body(b"  \n"), json!(""));
    }

    #[test]
    fn status_error_message_names_the_code() {
        let err = UpstreamError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: json!(""),
        };
        assert_eq!(err.to_string(), "Request failed with status code 503");
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn details_prefer_truthy_body() {
        let err = UpstreamError::Status {
            status: StatusCode::BAD_REQUEST,
            body: json!({ "error": "bad features" }),
        };
        assert_eq!(err.details(), json!({ "error": "bad features" }));
    }

    #[test]
    fn details_fall_back_to_message_for_empty_body() {
        let err = UpstreamError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!(""),
        };
        assert_eq!(err.details(), json!("Request failed with status code 500"));
    }

    #[test]
    fn timeout_has_no_status() {
        let err = UpstreamError::Timeout { timeout_ms: 20000 };
        assert_eq!(err.to_string(), "timeout of 20000ms exceeded");
        assert_eq!(err.status(), None);
        assert_eq!(err.details(), json!("timeout of 20000ms exceeded"));
    }
}
