use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Number of features the acquire service must return and predict expects.
pub const FEATURE_COUNT: usize = 7;
/// Value of `meta.source` on every predict request.
pub const PREDICT_SOURCE: &str = "orchestrator";
/// Service name reported by `/health`.
pub const SERVICE_NAME: &str = "orchestrator";

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: &'static str,
}

impl HealthStatus {
    pub const OK: Self = Self {
        status: "ok",
        service: SERVICE_NAME,
    };
}

// ---------------------------------------------------------------------------
// Readiness
// ---------------------------------------------------------------------------

/// Outcome of probing one upstream `/ready` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub url: String,
    /// The HTTP call itself succeeded (2xx, no transport error or timeout).
    pub ok: bool,
    /// Truthiness of the upstream's own `ready` flag; false when `ok` is false.
    pub ready: bool,
    pub details: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Services {
    pub acquire: ServiceStatus,
    pub predict: ServiceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessReport {
    pub ready: bool,
    pub services: Services,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Body sent to the acquire service's `/data` endpoint. Serializes to `{}`
/// when no target date was requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<Value>,
}

/// A validated acquire payload. Features keep their original JSON number
/// representation so they are echoed back exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireResult {
    pub data_id: String,
    pub features: Vec<Number>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictMeta {
    pub feature_count: usize,
    pub data_id: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<Number>,
    pub meta: PredictMeta,
}
