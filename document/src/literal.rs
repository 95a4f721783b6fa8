//! Literal conversion between attribute values and JSON.

use ontic_core::{ModelError, ModelResult, Value};
use serde_json::Value as JsonValue;

pub(crate) fn literal_to_json(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        // Non-finite floats have no JSON form and become null
        Value::Float(f) => JsonValue::from(*f),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Null | Value::Entity(_) | Value::List(_) => JsonValue::Null,
    }
}

pub(crate) fn json_to_literal(json: &JsonValue) -> ModelResult<Value> {
    match json {
        JsonValue::Null => Ok(Value::Null),
        JsonValue::Bool(b) => Ok(Value::Bool(*b)),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Ok(Value::Int(i)),
            None => n
                .as_f64()
                .map(Value::Float)
                .ok_or_else(|| ModelError::malformed(format!("unrepresentable number {}", n))),
        },
        JsonValue::String(s) => Ok(Value::String(s.clone())),
        JsonValue::Array(_) | JsonValue::Object(_) => {
            Err(ModelError::malformed("expected a literal"))
        }
    }
}
