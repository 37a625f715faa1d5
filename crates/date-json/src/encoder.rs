//! [`RichValue`] → [`WireValue`].
//!
//! Date instants become `{"$date": <epoch ms>}` objects; everything else is
//! copied structurally. Objects that already look like a marker are refused
//! because the decoder could not tell them apart from real dates.

use indexmap::IndexMap;

use crate::error::{EncodeError, Path};
use crate::shape::{date_marker_candidate, present_entries, DATE_KEY, DEFAULT_MAX_DEPTH};
use crate::value::{DateInstant, RichValue, WireValue};

/// Options controlling encoding.
#[derive(Debug, Clone)]
pub struct EncoderOptions {
    /// Maximum number of nested arrays/objects.
    pub max_depth: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Encoder {
    pub options: EncoderOptions,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EncoderOptions) -> Self {
        Self { options }
    }

    pub fn encode(&self, value: &RichValue) -> Result<WireValue, EncodeError> {
        tracing::trace!(kind = %value.kind(), "encoding value");
        self.write_any(value, 0).inspect_err(|err| {
            tracing::debug!(path = %err.path(), error = %err, "encode rejected");
        })
    }

    // Order matters: the ambiguity check must see objects before anything
    // else gets a chance to copy them.
    fn write_any(&self, value: &RichValue, depth: usize) -> Result<WireValue, EncodeError> {
        match value {
            RichValue::Null => Ok(WireValue::Null),
            RichValue::Object(map) if date_marker_candidate(map).is_some() => {
                Err(EncodeError::AmbiguousDateMarker { path: Path::root() })
            }
            RichValue::Date(date) => Ok(date_marker(*date)),
            RichValue::Bool(b) => Ok(WireValue::Bool(*b)),
            RichValue::Number(n) => Ok(WireValue::Number(*n)),
            RichValue::Str(s) => Ok(WireValue::Str(s.clone())),
            RichValue::Undefined => Ok(WireValue::Undefined),
            RichValue::Array(items) => self.write_arr(items, depth),
            RichValue::Function(f) => Ok(WireValue::Function(f.clone())),
            RichValue::Object(map) => self.write_obj(map, depth),
            RichValue::Binary(_)
            | RichValue::RegExp { .. }
            | RichValue::BigInt(_)
            | RichValue::Symbol(_) => Err(EncodeError::UnsupportedValueKind {
                kind: value.kind(),
                path: Path::root(),
            }),
        }
    }

    fn write_arr(&self, items: &[RichValue], depth: usize) -> Result<WireValue, EncodeError> {
        self.check_depth(depth)?;
        let out = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.write_any(item, depth + 1).map_err(|e| e.at(i.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WireValue::Array(out))
    }

    fn write_obj(
        &self,
        map: &IndexMap<String, RichValue>,
        depth: usize,
    ) -> Result<WireValue, EncodeError> {
        self.check_depth(depth)?;
        let out = present_entries(map)
            .map(|(key, val)| {
                let encoded = self.write_any(val, depth + 1).map_err(|e| e.at(key.as_str()))?;
                Ok((key.clone(), encoded))
            })
            .collect::<Result<IndexMap<_, _>, EncodeError>>()?;
        Ok(WireValue::Object(out))
    }

    fn check_depth(&self, depth: usize) -> Result<(), EncodeError> {
        if depth >= self.options.max_depth {
            return Err(EncodeError::DepthLimitExceeded {
                max_depth: self.options.max_depth,
                path: Path::root(),
            });
        }
        Ok(())
    }
}

/// `{"$date": <epoch ms>}`. The millisecond range fits an `f64` exactly.
pub fn date_marker(date: DateInstant) -> WireValue {
    let mut map = IndexMap::with_capacity(1);
    map.insert(
        DATE_KEY.to_string(),
        WireValue::Number(date.epoch_millis() as f64),
    );
    WireValue::Object(map)
}

/// Encodes with default options.
pub fn encode(value: &RichValue) -> Result<WireValue, EncodeError> {
    Encoder::new().encode(value)
}
