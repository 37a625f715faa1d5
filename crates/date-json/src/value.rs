//! The two value domains: [`RichValue`] (may hold [`DateInstant`]s) and
//! [`WireValue`] (JSON-shaped, dates appear as `{"$date": <ms>}` markers).

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;

/// Largest absolute epoch offset, in milliseconds, that names a valid instant
/// (100,000,000 days either side of 1970-01-01T00:00:00Z).
pub const MAX_EPOCH_MILLIS: i64 = 8_640_000_000_000_000;

/// An instant in time with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateInstant(i64);

impl DateInstant {
    pub const UNIX_EPOCH: DateInstant = DateInstant(0);

    /// Returns `None` when `ms` is outside `±MAX_EPOCH_MILLIS`.
    pub fn from_millis(ms: i64) -> Option<Self> {
        if ms.unsigned_abs() <= MAX_EPOCH_MILLIS as u64 {
            Some(Self(ms))
        } else {
            None
        }
    }

    /// Builds an instant from a floating-point millisecond count.
    ///
    /// Non-finite and out-of-range values are rejected. Fractional
    /// milliseconds are truncated toward zero.
    pub fn from_millis_f64(ms: f64) -> Option<Self> {
        if !ms.is_finite() || ms.abs() > MAX_EPOCH_MILLIS as f64 {
            return None;
        }
        Some(Self(ms.trunc() as i64))
    }

    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }

    /// Milliseconds since the Unix epoch. Negative before 1970.
    pub fn epoch_millis(self) -> i64 {
        self.0
    }

    /// `None` for instants beyond the calendar range chrono supports.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
    }
}

impl From<DateTime<Utc>> for DateInstant {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis())
    }
}

impl fmt::Display for DateInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

type CallableFn = dyn Fn(&[RichValue]) -> RichValue + Send + Sync;

/// An opaque, shareable function value.
///
/// Callables ride along in memory but have no wire representation. Two
/// handles are equal only when they share the same allocation.
#[derive(Clone)]
pub struct Callable(Arc<CallableFn>);

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[RichValue]) -> RichValue + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, args: &[RichValue]) -> RichValue {
        (self.0)(args)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable(..)")
    }
}

/// Runtime shape of a value, used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Date,
    Array,
    Object,
    Function,
    Binary,
    RegExp,
    BigInt,
    Symbol,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Date => "date",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Function => "function",
            ValueKind::Binary => "binary",
            ValueKind::RegExp => "regexp",
            ValueKind::BigInt => "bigint",
            ValueKind::Symbol => "symbol",
        };
        f.write_str(name)
    }
}

/// In-memory value tree whose leaves may be date instants.
///
/// `Undefined` stands for an absent value: inside an `Object` it is the same
/// as the key not being there at all; inside an `Array` it still occupies
/// its slot. `Binary`, `RegExp`, `BigInt` and `Symbol` have no JSON form and
/// are rejected by the encoder.
#[derive(Debug, Clone, PartialEq)]
pub enum RichValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Date(DateInstant),
    Array(Vec<RichValue>),
    Object(IndexMap<String, RichValue>),
    Function(Callable),
    Binary(Vec<u8>),
    RegExp { source: String, flags: String },
    BigInt(i128),
    Symbol(Option<String>),
}

impl RichValue {
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, RichValue)>,
    {
        RichValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            RichValue::Undefined => ValueKind::Undefined,
            RichValue::Null => ValueKind::Null,
            RichValue::Bool(_) => ValueKind::Boolean,
            RichValue::Number(_) => ValueKind::Number,
            RichValue::Str(_) => ValueKind::String,
            RichValue::Date(_) => ValueKind::Date,
            RichValue::Array(_) => ValueKind::Array,
            RichValue::Object(_) => ValueKind::Object,
            RichValue::Function(_) => ValueKind::Function,
            RichValue::Binary(_) => ValueKind::Binary,
            RichValue::RegExp { .. } => ValueKind::RegExp,
            RichValue::BigInt(_) => ValueKind::BigInt,
            RichValue::Symbol(_) => ValueKind::Symbol,
        }
    }

    pub fn as_date(&self) -> Option<DateInstant> {
        match self {
            RichValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Looks up a present key of an object. Undefined entries read as missing.
    pub fn get(&self, key: &str) -> Option<&RichValue> {
        match self {
            RichValue::Object(map) => map.get(key).filter(|v| !v.is_absent()),
            _ => None,
        }
    }
}

/// JSON-shaped value tree. Dates appear as `{"$date": <epoch ms>}` objects.
///
/// `Function` only exists because the encoder hands callables back
/// untouched; it is not part of the wire format.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    Str(String),
    Array(Vec<WireValue>),
    Object(IndexMap<String, WireValue>),
    Function(Callable),
}

impl WireValue {
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, WireValue)>,
    {
        WireValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            WireValue::Undefined => ValueKind::Undefined,
            WireValue::Null => ValueKind::Null,
            WireValue::Bool(_) => ValueKind::Boolean,
            WireValue::Number(_) => ValueKind::Number,
            WireValue::Str(_) => ValueKind::String,
            WireValue::Array(_) => ValueKind::Array,
            WireValue::Object(_) => ValueKind::Object,
            WireValue::Function(_) => ValueKind::Function,
        }
    }

    pub fn get(&self, key: &str) -> Option<&WireValue> {
        match self {
            WireValue::Object(map) => map.get(key).filter(|v| !v.is_absent()),
            _ => None,
        }
    }
}

/// Values that have an "absent" member (`undefined`).
pub trait MaybeAbsent {
    fn is_absent(&self) -> bool;
}

impl MaybeAbsent for RichValue {
    fn is_absent(&self) -> bool {
        matches!(self, RichValue::Undefined)
    }
}

impl MaybeAbsent for WireValue {
    fn is_absent(&self) -> bool {
        matches!(self, WireValue::Undefined)
    }
}

macro_rules! impl_from_primitives {
    ($value:ident) => {
        impl From<bool> for $value {
            fn from(b: bool) -> Self {
                $value::Bool(b)
            }
        }

        impl From<f64> for $value {
            fn from(n: f64) -> Self {
                $value::Number(n)
            }
        }

        impl From<i32> for $value {
            fn from(n: i32) -> Self {
                $value::Number(f64::from(n))
            }
        }

        impl From<&str> for $value {
            fn from(s: &str) -> Self {
                $value::Str(s.to_owned())
            }
        }

        impl From<String> for $value {
            fn from(s: String) -> Self {
                $value::Str(s)
            }
        }

        impl From<Vec<$value>> for $value {
            fn from(items: Vec<$value>) -> Self {
                $value::Array(items)
            }
        }

        impl From<IndexMap<String, $value>> for $value {
            fn from(map: IndexMap<String, $value>) -> Self {
                $value::Object(map)
            }
        }

        impl From<Callable> for $value {
            fn from(f: Callable) -> Self {
                $value::Function(f)
            }
        }
    };
}

impl_from_primitives!(RichValue);
impl_from_primitives!(WireValue);

impl From<DateInstant> for RichValue {
    fn from(d: DateInstant) -> Self {
        RichValue::Date(d)
    }
}

impl From<DateTime<Utc>> for RichValue {
    fn from(dt: DateTime<Utc>) -> Self {
        RichValue::Date(dt.into())
    }
}
