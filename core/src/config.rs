//! Per-call option maps and their typed view.
//!
//! The surrounding framework passes options as untyped key/value maps. A call
//! may receive several; they are merged in order with later maps winning, and
//! the result is read through `CallConfig`.

use serde_json::Value;

use crate::http::{DEFAULT_CONTENT_TYPE, DEFAULT_METHOD};

/// Untyped option map as passed around by the framework.
pub type ConfigMap = serde_json::Map<String, Value>;

pub const KEY_METHOD: &str = "HttpMethod";
pub const KEY_CONTENT_TYPE: &str = "HttpContentType";
pub const KEY_RETURN_TYPE: &str = "HttpReturnType";
pub const KEY_REFERENCE_OBJ: &str = "HttpReferenceObj";

/// Merge `maps` left to right; on key collision the later map wins.
pub fn merge_configs<'a, I>(maps: I) -> ConfigMap
where
    I: IntoIterator<Item = &'a ConfigMap>,
{
    let mut merged = ConfigMap::new();
    for map in maps {
        for (key, value) in map {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Shape of the value a call hands back to its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnType {
    /// Body decoded by the byter.
    #[default]
    Object,
    /// Raw body bytes.
    Bytes,
    /// The whole response: status, headers and body.
    Response,
}

impl ReturnType {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OBJECT" => Some(ReturnType::Object),
            "BYTES" => Some(ReturnType::Bytes),
            "RESPONSE" => Some(ReturnType::Response),
            _ => None,
        }
    }
}

/// Typed, read-only view over a merged option map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallConfig {
    map: ConfigMap,
}

impl CallConfig {
    pub fn new(map: ConfigMap) -> Self {
        Self { map }
    }

    /// Merge `maps` in order and wrap the result.
    pub fn merged<'a, I>(maps: I) -> Self
    where
        I: IntoIterator<Item = &'a ConfigMap>,
    {
        Self::new(merge_configs(maps))
    }

    /// Non-empty string stored under `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.map
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Configured HTTP method, taken verbatim; `POST` when unset.
    pub fn method(&self) -> String {
        self.get_str(KEY_METHOD).unwrap_or(DEFAULT_METHOD).to_string()
    }

    /// Configured content type; `application/json` when unset.
    pub fn content_type(&self) -> &str {
        self.get_str(KEY_CONTENT_TYPE).unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Unknown values fall back to `ReturnType::Object`.
    pub fn return_type(&self) -> ReturnType {
        self.get_str(KEY_RETURN_TYPE)
            .and_then(ReturnType::parse)
            .unwrap_or_default()
    }

    /// Template the decoded body is laid over, if any.
    pub fn reference(&self) -> Option<&Value> {
        self.map.get(KEY_REFERENCE_OBJ).filter(|v| !v.is_null())
    }
}
