//! Aggregation of the two upstream readiness probes into a [`ReadinessReport`].

use serde_json::Value;

use crate::json::{field_is_truthy, is_truthy};
use crate::types::{ReadinessReport, ServiceStatus, Services};

/// Settled result of one probe. Rejections are values, never errors, so one
/// failing upstream cannot disturb the other branch of the join.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Fulfilled {
        body: Value,
    },
    Rejected {
        /// Body of the upstream's error response, if it sent one.
        body: Option<Value>,
        message: String,
    },
}

impl ServiceStatus {
    pub fn from_outcome(url: impl Into<String>, outcome: ProbeOutcome) -> Self {
        let url = url.into();
        match outcome {
            ProbeOutcome::Fulfilled { body } => Self {
                url,
                ok: true,
                ready: field_is_truthy(&body, "ready"),
                details: body,
            },
            ProbeOutcome::Rejected { body, message } => Self {
                url,
                ok: false,
                ready: false,
                details: rejection_details(body, message),
            },
        }
    }
}

/// Error body if truthy, else the error message, else `"error"`.
fn rejection_details(body: Option<Value>, message: String) -> Value {
    match body {
        Some(body) if is_truthy(&body) => body,
        _ if !message.is_empty() => Value::String(message),
        _ => Value::String("error".to_string()),
    }
}

impl ReadinessReport {
    pub fn new(acquire: ServiceStatus, predict: ServiceStatus) -> Self {
        Self {
            ready: acquire.ready && predict.ready,
            services: Services { acquire, predict },
        }
    }
}
