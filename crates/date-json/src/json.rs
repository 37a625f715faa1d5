//! Bridging wire values to and from `serde_json`.
//!
//! [`to_json`] follows `JSON.stringify` rules for values JSON cannot hold:
//! undefined and function entries vanish from objects and turn into `null`
//! inside arrays, and non-finite numbers are written as `null`. An object
//! that would be left holding nothing but `$date` after those drops is
//! refused, since it would read back as a date.

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::decoder::decode;
use crate::encoder::encode;
use crate::error::{DecodeError, EncodeError, Path};
use crate::shape::{date_marker_candidate, DATE_KEY};
use crate::value::{RichValue, ValueKind, WireValue};

/// Largest integer an `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("a top-level {kind} has no JSON representation")]
    NotSerializable { kind: ValueKind },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<Value> for WireValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => WireValue::Null,
            Value::Bool(b) => WireValue::Bool(b),
            Value::Number(n) => WireValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => WireValue::Str(s),
            Value::Array(arr) => WireValue::Array(arr.into_iter().map(WireValue::from).collect()),
            Value::Object(obj) => {
                WireValue::Object(obj.into_iter().map(|(k, v)| (k, WireValue::from(v))).collect())
            }
        }
    }
}

impl From<&Value> for WireValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => WireValue::Null,
            Value::Bool(b) => WireValue::Bool(*b),
            Value::Number(n) => WireValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => WireValue::Str(s.clone()),
            Value::Array(arr) => WireValue::Array(arr.iter().map(WireValue::from).collect()),
            Value::Object(obj) => WireValue::Object(
                obj.iter()
                    .map(|(k, v)| (k.clone(), WireValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// Converts a wire tree into a `serde_json::Value`.
///
/// Fails when the root itself is undefined or a function, or when dropping
/// function entries would turn an ordinary object into a `$date` marker.
pub fn to_json(value: &WireValue) -> Result<Value, JsonError> {
    match value {
        WireValue::Undefined | WireValue::Function(_) => Err(JsonError::NotSerializable {
            kind: value.kind(),
        }),
        _ => Ok(write_json(value)?),
    }
}

fn write_json(value: &WireValue) -> Result<Value, EncodeError> {
    let out = match value {
        // Only reachable inside arrays; objects filter these out first.
        WireValue::Undefined | WireValue::Function(_) | WireValue::Null => Value::Null,
        WireValue::Bool(b) => Value::Bool(*b),
        WireValue::Number(n) => json_number(*n),
        WireValue::Str(s) => Value::String(s.clone()),
        WireValue::Array(arr) => Value::Array(
            arr.iter()
                .enumerate()
                .map(|(i, item)| write_json(item).map_err(|e| e.at(i.to_string())))
                .collect::<Result<_, _>>()?,
        ),
        WireValue::Object(obj) => {
            let mut out = Map::with_capacity(obj.len());
            for (key, val) in obj {
                if matches!(val, WireValue::Undefined | WireValue::Function(_)) {
                    continue;
                }
                out.insert(key.clone(), write_json(val).map_err(|e| e.at(key.as_str()))?);
            }
            let bare_marker = out.len() == 1 && out.contains_key(DATE_KEY);
            if bare_marker && date_marker_candidate(obj).is_none() {
                return Err(EncodeError::AmbiguousDateMarker { path: Path::root() });
            }
            Value::Object(out)
        }
    };
    Ok(out)
}

fn json_number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(Value::Null, Value::Number)
    }
}

/// Encodes a rich tree straight to a `serde_json::Value`.
pub fn to_value(value: &RichValue) -> Result<Value, JsonError> {
    to_json(&encode(value)?)
}

/// Decodes a `serde_json::Value` into a rich tree.
pub fn from_value(value: &Value) -> Result<RichValue, JsonError> {
    Ok(decode(&WireValue::from(value))?)
}

/// Encodes and serializes to a JSON string.
///
/// # Examples
///
/// ```
/// use date_json::{json, DateInstant, RichValue};
///
/// let value = RichValue::object([("at", RichValue::from(DateInstant::from_millis(5).unwrap()))]);
/// assert_eq!(json::to_string(&value).unwrap(), r#"{"at":{"$date":5}}"#);
/// ```
pub fn to_string(value: &RichValue) -> Result<String, JsonError> {
    Ok(serde_json::to_string(&to_value(value)?)?)
}

/// Parses a JSON string and decodes it.
pub fn from_str(s: &str) -> Result<RichValue, JsonError> {
    let parsed: Value = serde_json::from_str(s)?;
    Ok(decode(&WireValue::from(parsed))?)
}

impl Serialize for WireValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_json(self).map_err(S::Error::custom)?.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for WireValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(WireValue::from)
    }
}

impl Serialize for RichValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_value(self).map_err(S::Error::custom)?.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RichValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireValue::deserialize(deserializer)?;
        decode(&wire).map_err(D::Error::custom)
    }
}
