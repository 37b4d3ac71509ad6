//! Loose JSON predicates shared by the readiness and pipeline rules.
//!
//! Upstream services are not under our control, so flags such as `ready` or
//! `targetDate` are judged by truthiness rather than strict typing: `null`,
//! `false`, `0`, and `""` are falsy, everything else (including empty arrays
//! and objects) is truthy.

use serde_json::{Map, Value};

pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Truthiness of `value[field]`; missing fields and non-object values are falsy.
pub fn field_is_truthy(value: &Value, field: &str) -> bool {
    value.get(field).is_some_and(is_truthy)
}

/// Shallow-merge the top-level fields of `overlay` onto `base`. Later keys win.
/// A non-object overlay contributes nothing.
pub fn merge_top_level(base: &mut Map<String, Value>, overlay: Value) {
    if let Value::Object(fields) = overlay {
        for (key, value) in fields {
            base.insert(key, value);
        }
    }
}
