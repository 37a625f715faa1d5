//! [`WireValue`] → [`RichValue`].
//!
//! Objects of the exact shape `{"$date": <number>}` are turned back into
//! [`DateInstant`]s. Any other object is copied key by key.

use indexmap::IndexMap;

use crate::error::{DecodeError, Path};
use crate::shape::{date_marker_candidate, present_entries, DATE_KEY, DEFAULT_MAX_DEPTH};
use crate::value::{DateInstant, RichValue, WireValue};

/// Options controlling decoding.
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Maximum number of nested arrays/objects.
    pub max_depth: usize,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Decoder {
    pub options: DecoderOptions,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self { options }
    }

    pub fn decode(&self, value: &WireValue) -> Result<RichValue, DecodeError> {
        tracing::trace!(kind = %value.kind(), "decoding value");
        self.read_any(value, 0).inspect_err(|err| {
            tracing::debug!(path = %err.path(), error = %err, "decode rejected");
        })
    }

    fn read_any(&self, value: &WireValue, depth: usize) -> Result<RichValue, DecodeError> {
        match value {
            WireValue::Null => Ok(RichValue::Null),
            WireValue::Undefined => Ok(RichValue::Undefined),
            WireValue::Array(items) => self.read_arr(items, depth),
            WireValue::Object(map) => match date_marker_candidate(map) {
                Some(ms) => read_date(ms).map_err(|e| e.at(DATE_KEY)),
                None => self.read_obj(map, depth),
            },
            WireValue::Bool(b) => Ok(RichValue::Bool(*b)),
            WireValue::Number(n) => Ok(RichValue::Number(*n)),
            WireValue::Str(s) => Ok(RichValue::Str(s.clone())),
            WireValue::Function(_) => Err(DecodeError::UnsupportedValueKind {
                kind: value.kind(),
                path: Path::root(),
            }),
        }
    }

    fn read_arr(&self, items: &[WireValue], depth: usize) -> Result<RichValue, DecodeError> {
        self.check_depth(depth)?;
        let out = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.read_any(item, depth + 1).map_err(|e| e.at(i.to_string())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RichValue::Array(out))
    }

    fn read_obj(
        &self,
        map: &IndexMap<String, WireValue>,
        depth: usize,
    ) -> Result<RichValue, DecodeError> {
        self.check_depth(depth)?;
        let out = present_entries(map)
            .map(|(key, val)| {
                let decoded = self.read_any(val, depth + 1).map_err(|e| e.at(key.as_str()))?;
                Ok((key.clone(), decoded))
            })
            .collect::<Result<IndexMap<_, _>, DecodeError>>()?;
        Ok(RichValue::Object(out))
    }

    fn check_depth(&self, depth: usize) -> Result<(), DecodeError> {
        if depth >= self.options.max_depth {
            return Err(DecodeError::DepthLimitExceeded {
                max_depth: self.options.max_depth,
                path: Path::root(),
            });
        }
        Ok(())
    }
}

fn read_date(ms: &WireValue) -> Result<RichValue, DecodeError> {
    let instant = match ms {
        WireValue::Number(n) => DateInstant::from_millis_f64(*n),
        _ => None,
    };
    instant.map(RichValue::Date).ok_or_else(|| DecodeError::InvalidDateValue {
        found: describe(ms),
        path: Path::root(),
    })
}

fn describe(value: &WireValue) -> String {
    match value {
        WireValue::Number(n) => n.to_string(),
        WireValue::Str(s) => format!("{s:?}"),
        WireValue::Bool(b) => b.to_string(),
        other => other.kind().to_string(),
    }
}

/// Decodes with default options.
pub fn decode(value: &WireValue) -> Result<RichValue, DecodeError> {
    Decoder::new().decode(value)
}
