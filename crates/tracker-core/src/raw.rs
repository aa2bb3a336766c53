//! Total accessors over loosely-typed tracker payloads.
//!
//! The tracker returns JSON whose fields may be strings, numbers, embedded
//! objects or absent altogether. [`RawRecord`] wraps the payload and every
//! read goes through an accessor that yields `None` on absence or type
//! mismatch instead of failing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRecord(Value);

impl RawRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        field(&self.0, key)
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        str_field(&self.0, key)
    }

    pub fn i64(&self, key: &str) -> Option<i64> {
        int_field(&self.0, key)
    }

    pub fn object(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| v.is_object())
    }

    pub fn array(&self, key: &str) -> &[Value] {
        array_field(&self.0, key)
    }

    /// Replace or insert a top-level field. No-op when the payload is not an
    /// object.
    pub fn set(&mut self, key: &str, value: Value) {
        if let Value::Object(map) = &mut self.0 {
            map.insert(key.to_string(), value);
        }
    }
}

impl From<Value> for RawRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

// ---------------------------------------------------------------------------
// Free accessors over any Value
// ---------------------------------------------------------------------------

pub fn field<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.as_object()?.get(key).filter(|v| !v.is_null())
}

/// Non-empty string field. Whitespace-only strings count as absent.
pub fn str_field<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    field(v, key)?.as_str().filter(|s| !s.trim().is_empty())
}

/// Integer field, accepting JSON numbers (including integral floats) and
/// numeric strings.
pub fn int_field(v: &Value, key: &str) -> Option<i64> {
    as_int(field(v, key)?)
}

pub fn as_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn array_field<'a>(v: &'a Value, key: &str) -> &'a [Value] {
    field(v, key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// First non-empty string among `keys`.
pub fn first_str<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| str_field(v, k))
}

/// Display name of an embedded object: `display_name`, then `name`.
pub fn display_name(v: &Value) -> Option<&str> {
    first_str(v, &["display_name", "name"])
}
