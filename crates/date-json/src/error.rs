//! Error types for encoding and decoding.

use std::fmt;

use thiserror::Error;

use crate::value::ValueKind;

/// Location of a node inside a value tree, rendered as a JSON Pointer
/// (RFC 6901). The root is the empty pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<String>);

impl Path {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn steps(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn prepend(&mut self, step: String) {
        self.0.insert(0, step);
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.0 {
            f.write_str("/")?;
            if step.contains(['~', '/']) {
                f.write_str(&step.replace('~', "~0").replace('/', "~1"))?;
            } else {
                f.write_str(step)?;
            }
        }
        Ok(())
    }
}

/// Errors raised while turning a [`RichValue`](crate::RichValue) into a
/// [`WireValue`](crate::WireValue).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EncodeError {
    #[error("unsupported value kind `{kind}` at \"{path}\"")]
    UnsupportedValueKind { kind: ValueKind, path: Path },
    /// An object already has the `{"$date": ...}` shape before encoding.
    #[error("object at \"{path}\" is indistinguishable from a $date marker")]
    AmbiguousDateMarker { path: Path },
    #[error("nesting deeper than {max_depth} at \"{path}\"")]
    DepthLimitExceeded { max_depth: usize, path: Path },
}

impl EncodeError {
    pub fn path(&self) -> &Path {
        match self {
            EncodeError::UnsupportedValueKind { path, .. }
            | EncodeError::AmbiguousDateMarker { path }
            | EncodeError::DepthLimitExceeded { path, .. } => path,
        }
    }

    pub(crate) fn at(mut self, step: impl Into<String>) -> Self {
        match &mut self {
            EncodeError::UnsupportedValueKind { path, .. }
            | EncodeError::AmbiguousDateMarker { path }
            | EncodeError::DepthLimitExceeded { path, .. } => path.prepend(step.into()),
        }
        self
    }
}

/// Errors raised while turning a [`WireValue`](crate::WireValue) back into a
/// [`RichValue`](crate::RichValue).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("unsupported value kind `{kind}` at \"{path}\"")]
    UnsupportedValueKind { kind: ValueKind, path: Path },
    /// A `{"$date": ...}` marker whose value is not a finite, in-range number.
    #[error("invalid $date value {found} at \"{path}\"")]
    InvalidDateValue { found: String, path: Path },
    #[error("nesting deeper than {max_depth} at \"{path}\"")]
    DepthLimitExceeded { max_depth: usize, path: Path },
}

impl DecodeError {
    pub fn path(&self) -> &Path {
        match self {
            DecodeError::UnsupportedValueKind { path, .. }
            | DecodeError::InvalidDateValue { path, .. }
            | DecodeError::DepthLimitExceeded { path, .. } => path,
        }
    }

    pub(crate) fn at(mut self, step: impl Into<String>) -> Self {
        match &mut self {
            DecodeError::UnsupportedValueKind { path, .. }
            | DecodeError::InvalidDateValue { path, .. }
            | DecodeError::DepthLimitExceeded { path, .. } => path.prepend(step.into()),
        }
        self
    }
}
