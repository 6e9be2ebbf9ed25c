//! Errors raised while resolving, decoding or encoding.
//!
//! Every failure is a [`JsonError`]: an [`ErrorKind`] plus the [`JsonPath`]
//! active when it happened. Only [`ErrorKind::CircularReference`] and
//! [`ErrorKind::UnresolvableType`] are fatal (see [`JsonError::is_fatal`]);
//! callers may inspect and handle every other kind.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::error::Error;
use core::fmt;

use thiserror::Error;

use crate::path::JsonPath;

/// Boxed error returned by user-registered mappings.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

// -----------------------------------------------------------------------------
// ErrorKind

/// What went wrong.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No resolution step applies to the type.
    #[error("cannot resolve a codec for `{type_name}`: {reason}")]
    UnresolvableType {
        type_name: String,
        reason: Cow<'static, str>,
    },
    /// The JSON value does not fit the target type.
    #[error("cannot decode {found} as `{type_name}`: {reason}")]
    DecodeMismatch {
        type_name: String,
        found: String,
        reason: Cow<'static, str>,
    },
    /// Required properties are absent; lists all of them.
    #[error("`{type_name}` is missing required properties: {}", .properties.join(", "))]
    MissingRequiredProperty {
        type_name: String,
        properties: Vec<String>,
    },
    /// Properties that are not part of the type, while extras are not allowed.
    #[error("`{type_name}` does not accept properties: {}", .properties.join(", "))]
    UnknownProperty {
        type_name: String,
        properties: Vec<String>,
    },
    /// A set received the same element twice.
    #[error("duplicate element at index {index} for set `{type_name}`")]
    DuplicateSetElement { type_name: String, index: usize },
    /// A polymorphic family has no variant for this tag.
    #[error("unknown discriminator value `{value}` for `{type_name}` (expected one of: {})", .known.join(", "))]
    UnknownDiscriminatorValue {
        type_name: String,
        value: String,
        known: Vec<String>,
    },
    /// The value graph reaches an object that is already being encoded.
    #[error("circular reference while encoding `{type_name}`")]
    CircularReference { type_name: String },
    /// A user-registered mapping failed.
    #[error("custom mapping for `{type_name}` failed: {source}")]
    CustomMappingFailure {
        type_name: String,
        #[source]
        source: Arc<dyn Error + Send + Sync + 'static>,
    },
    /// Several constructors or factories match the same input.
    #[error("ambiguous construction of `{type_name}`: {reason}")]
    AmbiguousConstructorOrFactory {
        type_name: String,
        reason: Cow<'static, str>,
    },
    /// The value has no JSON representation.
    #[error("cannot encode `{type_name}`: {reason}")]
    Unencodable {
        type_name: String,
        reason: Cow<'static, str>,
    },
}

// -----------------------------------------------------------------------------
// JsonError

/// An [`ErrorKind`] located at a [`JsonPath`].
///
/// # Examples
///
/// ```
/// use vc_json::{Json, JsonValue, ErrorKind};
///
/// let json = Json::default();
/// let err = json.decode::<Vec<u8>>(&JsonValue::Array(vec![
///     JsonValue::Int(1),
///     JsonValue::Int(300),
/// ])).unwrap_err();
///
/// assert!(matches!(err.kind(), ErrorKind::DecodeMismatch { .. }));
/// assert_eq!(err.path().to_string(), "/1");
/// ```
#[derive(Debug, Clone)]
pub struct JsonError {
    kind: Box<ErrorKind>,
    path: JsonPath,
}

impl JsonError {
    #[inline]
    pub fn new(kind: ErrorKind, path: JsonPath) -> Self {
        Self {
            kind: Box::new(kind),
            path,
        }
    }

    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[inline]
    pub fn path(&self) -> &JsonPath {
        &self.path
    }

    /// Returns `true` for errors no layer should try to recover from.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(
            *self.kind,
            ErrorKind::CircularReference { .. } | ErrorKind::UnresolvableType { .. }
        )
    }

    /// The error located at `path`, unless it already carries a deeper one.
    #[inline]
    pub(crate) fn at(mut self, path: JsonPath) -> Self {
        if self.path.len() < path.len() {
            self.path = path;
        }
        self
    }

    pub(crate) fn unresolvable(type_name: impl Into<String>, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::new(
            ErrorKind::UnresolvableType {
                type_name: type_name.into(),
                reason: reason.into(),
            },
            JsonPath::root(),
        )
    }

    pub(crate) fn ambiguous(type_name: impl Into<String>, reason: impl Into<Cow<'static, str>>) -> Self {
        Self::new(
            ErrorKind::AmbiguousConstructorOrFactory {
                type_name: type_name.into(),
                reason: reason.into(),
            },
            JsonPath::root(),
        )
    }
}

impl fmt::Display for JsonError {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.kind, self.path)
    }
}

impl Error for JsonError {
    #[inline]
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.kind.source()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn display_names_every_missing_property() {
        let err = JsonError::new(
            ErrorKind::MissingRequiredProperty {
                type_name: "Person".into(),
                properties: vec!["name".into(), "age".into()],
            },
            JsonPath::root().child(0_usize),
        );
        assert_eq!(
            err.to_string(),
            "`Person` is missing required properties: name, age (at /0)"
        );
        assert!(!err.is_fatal());
    }

    #[test]
    fn custom_failure_keeps_source() {
        let cause: BoxError = "bad uuid".into();
        let err = JsonError::new(
            ErrorKind::CustomMappingFailure {
                type_name: "Id".into(),
                source: Arc::from(cause),
            },
            JsonPath::root(),
        );
        assert_eq!(err.source().unwrap().to_string(), "bad uuid");
    }

    #[test]
    fn fatal_kinds() {
        assert!(JsonError::unresolvable("Opaque", "no codec").is_fatal());
        let circular = JsonError::new(
            ErrorKind::CircularReference {
                type_name: "Node".into(),
            },
            JsonPath::root(),
        );
        assert!(circular.is_fatal());
    }
}
