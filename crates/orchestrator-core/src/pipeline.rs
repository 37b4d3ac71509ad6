//! Pure rules for the two-step `/run` pipeline: build the acquire request,
//! gate the acquire response, derive the predict request, and merge the final
//! response. No I/O happens here.

use serde_json::{Map, Value};

use crate::error::{OrchestratorError, Result};
use crate::json::{is_truthy, merge_top_level};
use crate::types::{
    AcquireRequest, AcquireResult, PredictMeta, PredictRequest, FEATURE_COUNT, PREDICT_SOURCE,
};

/// Build the `/data` request from the client's `/run` body. `targetDate` is
/// forwarded verbatim only when truthy.
pub fn acquire_request(run_body: &Value) -> AcquireRequest {
    let target_date = run_body
        .get("targetDate")
        .filter(|v| is_truthy(v))
        .cloned();
    AcquireRequest { target_date }
}

/// Check that an acquire payload carries a non-empty string `dataId` and
/// exactly [`FEATURE_COUNT`] numeric features.
pub fn validate_acquire(raw: &Value) -> Result<AcquireResult> {
    let data_id = match raw.get("dataId") {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => return Err(OrchestratorError::BadAcquireResponse),
    };

    let features = match raw.get("features") {
        Some(Value::Array(items)) if items.len() == FEATURE_COUNT => items
            .iter()
            .map(|item| match item {
                Value::Number(n) => Some(n.clone()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(OrchestratorError::BadAcquireResponse)?,
        _ => return Err(OrchestratorError::BadAcquireResponse),
    };

    Ok(AcquireResult { data_id, features })
}

impl AcquireResult {
    pub fn predict_request(&self) -> PredictRequest {
        PredictRequest {
            features: self.features.clone(),
            meta: PredictMeta {
                feature_count: FEATURE_COUNT,
                data_id: self.data_id.clone(),
                source: PREDICT_SOURCE.to_string(),
            },
        }
    }

    /// `{ dataId, features, ...prediction }`; prediction keys win on collision.
    pub fn merge_prediction(self, prediction: Value) -> Value {
        let mut out = Map::new();
        out.insert("dataId".to_string(), Value::String(self.data_id));
        out.insert(
            "features".to_string(),
            Value::Array(self.features.into_iter().map(Value::Number).collect()),
        );
        merge_top_level(&mut out, prediction);
        Value::Object(out)
    }
}
