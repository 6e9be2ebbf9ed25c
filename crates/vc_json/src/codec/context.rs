use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::engine::Json;
use crate::error::{ErrorKind, JsonError};
use crate::info::ScalarOptions;
use crate::path::{JsonPath, PathContext, PathToken};
use crate::value::JsonValue;

/// Longest rendering of an offending value inside an error message.
const VALUE_PREVIEW: usize = 40;

// -----------------------------------------------------------------------------
// DecodeContext

/// Per-call state of one decode traversal.
pub struct DecodeContext<'a> {
    json: &'a Json,
    path: PathContext,
}

impl<'a> DecodeContext<'a> {
    #[inline]
    pub(crate) fn new(json: &'a Json) -> Self {
        Self {
            json,
            path: PathContext::new(),
        }
    }

    #[inline]
    pub fn json(&self) -> &'a Json {
        self.json
    }

    #[inline]
    pub fn path(&self) -> JsonPath {
        self.path.snapshot()
    }

    /// Runs `f` one level deeper.
    #[inline]
    pub fn scoped<R>(&mut self, token: impl Into<PathToken>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(token);
        let result = f(self);
        self.path.pop();
        result
    }

    /// An error of `kind` at the current path.
    #[inline]
    pub fn error(&self, kind: ErrorKind) -> JsonError {
        JsonError::new(kind, self.path.snapshot())
    }

    /// `value` cannot become a `type_name`.
    pub fn mismatch(
        &self,
        type_name: impl Into<String>,
        value: &JsonValue,
        reason: impl Into<Cow<'static, str>>,
    ) -> JsonError {
        self.error(ErrorKind::DecodeMismatch {
            type_name: type_name.into(),
            found: value.truncated(VALUE_PREVIEW),
            reason: reason.into(),
        })
    }
}

// -----------------------------------------------------------------------------
// EncodeContext

/// Per-call state of one encode traversal.
///
/// Besides the path, it tracks the pointees currently being encoded so that
/// a value graph reaching one of them again is reported instead of looping.
pub struct EncodeContext<'a> {
    json: &'a Json,
    path: PathContext,
    in_flight: Vec<(usize, TypeId)>,
}

impl<'a> EncodeContext<'a> {
    #[inline]
    pub(crate) fn new(json: &'a Json) -> Self {
        Self {
            json,
            path: PathContext::new(),
            in_flight: Vec::new(),
        }
    }

    #[inline]
    pub fn json(&self) -> &'a Json {
        self.json
    }

    #[inline]
    pub fn path(&self) -> JsonPath {
        self.path.snapshot()
    }

    #[inline]
    pub fn scalar_options(&self) -> ScalarOptions {
        self.json.config().scalar_options()
    }

    #[inline]
    pub fn scoped<R>(&mut self, token: impl Into<PathToken>, f: impl FnOnce(&mut Self) -> R) -> R {
        self.path.push(token);
        let result = f(self);
        self.path.pop();
        result
    }

    #[inline]
    pub fn error(&self, kind: ErrorKind) -> JsonError {
        JsonError::new(kind, self.path.snapshot())
    }

    /// `type_name` has no JSON form.
    pub fn unencodable(&self, type_name: impl Into<String>, reason: impl Into<Cow<'static, str>>) -> JsonError {
        self.error(ErrorKind::Unencodable {
            type_name: type_name.into(),
            reason: reason.into(),
        })
    }

    /// Runs `f` with `value` marked as being encoded.
    ///
    /// Fails with [`ErrorKind::CircularReference`] if it already is. The mark
    /// is removed afterwards, so values shared without a cycle encode fine.
    /// Zero-sized values have no identity and are never marked.
    pub fn guarded(
        &mut self,
        value: &dyn Any,
        type_name: impl FnOnce() -> String,
        f: impl FnOnce(&mut Self) -> Result<JsonValue, JsonError>,
    ) -> Result<JsonValue, JsonError> {
        if size_of_val(value) == 0 {
            return f(self);
        }
        let identity = (value as *const dyn Any as *const () as usize, value.type_id());
        if self.in_flight.contains(&identity) {
            return Err(self.error(ErrorKind::CircularReference {
                type_name: type_name(),
            }));
        }
        self.in_flight.push(identity);
        let result = f(self);
        self.in_flight.pop();
        result
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn guard_reports_reentry_and_releases_after() {
        let json = Json::default();
        let mut cx = EncodeContext::new(&json);
        let shared = 5_u32;

        let nested = cx.guarded(&shared, || "u32".to_string(), |cx| {
            cx.scoped("next", |cx| {
                cx.guarded(&shared, || "u32".to_string(), |_| Ok(JsonValue::Null))
            })
        });
        let err = nested.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::CircularReference { .. }));
        assert_eq!(err.path().to_string(), "/next");

        let again = cx.guarded(&shared, || "u32".to_string(), |_| Ok(JsonValue::Int(1)));
        assert_eq!(again.unwrap(), JsonValue::Int(1));
    }

    #[test]
    fn mismatch_truncates_the_value() {
        let json = Json::default();
        let mut cx = DecodeContext::new(&json);
        let long = JsonValue::from("x".repeat(100).as_str());
        let err = cx.scoped(2_usize, |cx| cx.mismatch("u8", &long, "expected a number"));
        match err.kind() {
            ErrorKind::DecodeMismatch { found, .. } => assert!(found.len() < 60),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(err.path().to_string(), "/2");
    }
}
