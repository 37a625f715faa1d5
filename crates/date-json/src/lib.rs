//! Lossless conversion between value trees that hold dates and plain
//! JSON-shaped trees.
//!
//! A [`RichValue`] may contain [`DateInstant`]s. [`encode`] replaces each one
//! with a `{"$date": <epoch ms>}` object, producing a [`WireValue`] that any
//! JSON serializer can write. [`decode`] reverses the mapping.
//!
//! # Example
//!
//! ```
//! use date_json::{decode, encode, DateInstant, RichValue, WireValue};
//!
//! let value = RichValue::object([(
//!     "events",
//!     RichValue::Array(vec![RichValue::object([
//!         ("at", RichValue::from(DateInstant::from_millis(5).unwrap())),
//!         ("tag", RichValue::from("x")),
//!     ])]),
//! )]);
//!
//! let wire = encode(&value).unwrap();
//! assert_eq!(
//!     wire,
//!     WireValue::object([(
//!         "events",
//!         WireValue::Array(vec![WireValue::object([
//!             ("at", WireValue::object([("$date", WireValue::from(5))])),
//!             ("tag", WireValue::from("x")),
//!         ])]),
//!     )])
//! );
//! assert_eq!(decode(&wire).unwrap(), value);
//! ```
//!
//! Objects that already have the `{"$date": ...}` shape before encoding are
//! rejected with [`EncodeError::AmbiguousDateMarker`]; there is no escaping.

pub mod decoder;
pub mod encoder;
pub mod equal;
pub mod error;
pub mod json;
pub mod shape;
pub mod value;

pub use decoder::{decode, Decoder, DecoderOptions};
pub use encoder::{date_marker, encode, Encoder, EncoderOptions};
pub use equal::{deep_equal, deep_equal_wire};
pub use error::{DecodeError, EncodeError, Path};
pub use json::JsonError;
pub use shape::{DATE_KEY, DEFAULT_MAX_DEPTH};
pub use value::{Callable, DateInstant, MaybeAbsent, RichValue, ValueKind, WireValue, MAX_EPOCH_MILLIS};
