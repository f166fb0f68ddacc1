//! Absent-tolerant view over the JSON envelopes returned by Nike+.
//!
//! The service's payloads vary by device and app version (activities logged
//! before the GPS app carry no `gps` or `tags` data, for example), so every
//! read goes through [`Field`], which treats a missing key, a `null`, and a
//! lookup on a non-object all the same way: as absent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{NikePlusError, Result};

/// A decoded JSON object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Decode a response body, failing if it is not a JSON object
    pub fn try_parse(body: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(body)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NikePlusError::invalid_response(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Decode a response body, substituting an empty record when it cannot be decoded.
    ///
    /// With `debug` set the decode failure is logged; otherwise it is silent.
    pub fn parse(body: &str, debug: bool) -> Self {
        match Self::try_parse(body) {
            Ok(record) => record,
            Err(e) => {
                if debug {
                    tracing::warn!(error = %e, bytes = body.len(), "[ERROR] could not decode response body");
                }
                Self::default()
            }
        }
    }

    /// Wrap an already decoded value. Anything other than an object yields an empty record.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Field<'_> {
        Field::new(self.0.get(key))
    }

    /// Look up a nested field by dotted path, e.g. `"serviceResponse.header.success"`
    pub fn path(&self, dotted: &str) -> Field<'_> {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        parts.fold(self.get(first), |field, key| field.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The underlying JSON object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// A possibly-absent JSON value borrowed from a [`Record`].
///
/// Chained lookups on an absent field stay absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field<'a>(Option<&'a Value>);

impl<'a> Field<'a> {
    fn new(value: Option<&'a Value>) -> Self {
        Self(value.filter(|v| !v.is_null()))
    }

    /// Look up a key on this field, if it is an object
    pub fn get(self, key: &str) -> Field<'a> {
        Field::new(self.0.and_then(|v| v.get(key)))
    }

    /// Look up an element on this field, if it is an array
    pub fn index(self, i: usize) -> Field<'a> {
        Field::new(self.0.and_then(|v| v.get(i)))
    }

    pub fn is_absent(self) -> bool {
        self.0.is_none()
    }

    pub fn is_present(self) -> bool {
        self.0.is_some()
    }

    pub fn value(self) -> Option<&'a Value> {
        self.0
    }

    pub fn as_str(self) -> Option<&'a str> {
        self.0.and_then(Value::as_str)
    }

    pub fn as_f64(self) -> Option<f64> {
        self.0.and_then(Value::as_f64)
    }

    pub fn as_i64(self) -> Option<i64> {
        self.0.and_then(Value::as_i64)
    }

    /// Integer value; floats are truncated toward zero
    pub fn as_u64(self) -> Option<u64> {
        let value = self.0?;
        value.as_u64().or_else(|| {
            value
                .as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        })
    }

    pub fn as_bool(self) -> Option<bool> {
        self.0.and_then(Value::as_bool)
    }

    pub fn as_array(self) -> Option<&'a [Value]> {
        self.0.and_then(Value::as_array).map(Vec::as_slice)
    }

    pub fn as_map(self) -> Option<&'a Map<String, Value>> {
        self.0.and_then(Value::as_object)
    }

    /// Identifiers arrive as strings from some endpoints and as numbers from others
    pub fn to_id_string(self) -> Option<String> {
        match self.0? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Elements of this field as fields; empty unless it is an array
    pub fn iter(self) -> impl Iterator<Item = Field<'a>> {
        self.as_array()
            .unwrap_or_default()
            .iter()
            .map(|v| Field::new(Some(v)))
    }

    /// Copy this field out as a record; absent or non-object values give `None`
    pub fn to_record(self) -> Option<Record> {
        self.as_map().cloned().map(Record)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
