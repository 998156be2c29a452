//! Pluggable payload encoding.
//!
//! # Design
//! A `Byter` converts between wire bytes and `serde_json::Value`. Routing
//! through `Value` keeps the trait object safe, so a client can hold any
//! byter behind `Arc<dyn Byter>` while callers still encode and decode their
//! own `Serialize`/`DeserializeOwned` types via `encode_value` and
//! `decode_value`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::CallConfig;
use crate::error::CodecError;

/// Encoder/decoder pair for request and response bodies.
pub trait Byter: Send + Sync {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Decode `bytes`. `config` carries per-call decode options such as the
    /// reference template.
    fn decode(&self, bytes: &[u8], config: &CallConfig) -> Result<Value, CodecError>;
}

/// JSON byter, the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonByter;

impl Byter for JsonByter {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn decode(&self, bytes: &[u8], config: &CallConfig) -> Result<Value, CodecError> {
        let decoded: Value = serde_json::from_slice(bytes)?;
        Ok(match config.reference() {
            Some(template) => overlay(template, decoded),
            None => decoded,
        })
    }
}

/// Lay `decoded` over `template`: object fields present in `decoded` win,
/// the rest keep the template's values. Non-objects replace the template.
pub fn overlay(template: &Value, decoded: Value) -> Value {
    match (template, decoded) {
        (Value::Object(base), Value::Object(fields)) => {
            let mut merged = base.clone();
            for (key, value) in fields {
                let value = match base.get(&key) {
                    Some(inner) => overlay(inner, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            Value::Object(merged)
        }
        (_, decoded) => decoded,
    }
}

/// Serialize any payload into the byter's intermediate form.
pub fn encode_value<P: Serialize + ?Sized>(payload: &P) -> Result<Value, CodecError> {
    Ok(serde_json::to_value(payload)?)
}

/// Convert the byter's intermediate form into the caller's type.
pub fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, CodecError> {
    Ok(serde_json::from_value(value)?)
}
