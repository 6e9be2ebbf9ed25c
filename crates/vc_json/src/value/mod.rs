//! The JSON value tree.
//!
//! [`JsonValue`] is the only input of decoding and the only output of
//! encoding. Numbers keep the variant they were produced with (`Int`, `Long`
//! or `Decimal`) but compare by value, see [`JsonValue::numeric_cmp`].

// -----------------------------------------------------------------------------
// Modules

mod decimal;
mod object;
mod render;
mod serde;

// -----------------------------------------------------------------------------
// Exports

pub use decimal::{Decimal, ParseDecimalError};
pub use object::{DuplicateKey, JsonObject};
pub use render::{Chars, Tokens};

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use crate::path::{JsonPath, PathToken};

// -----------------------------------------------------------------------------
// JsonKind

/// The variant of a [`JsonValue`], without its payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum JsonKind {
    Null,
    Bool,
    String,
    Int,
    Long,
    Decimal,
    Array,
    Object,
}

impl JsonKind {
    /// The three numeric kinds.
    pub const NUMBERS: &'static [JsonKind] = &[JsonKind::Int, JsonKind::Long, JsonKind::Decimal];

    #[inline]
    pub const fn is_number(self) -> bool {
        matches!(self, Self::Int | Self::Long | Self::Decimal)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::String => "string",
            Self::Int => "int",
            Self::Long => "long",
            Self::Decimal => "decimal",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// -----------------------------------------------------------------------------
// JsonValue

/// An immutable JSON value.
///
/// `Int` holds values that fit 32 bits, `Long` values that fit 64 bits and
/// `Decimal` everything else (fractions, exponents, big integers).
///
/// Equality is value-based across the numeric variants:
///
/// ```
/// use vc_json::{JsonValue, Decimal};
///
/// let a = JsonValue::Int(5);
/// let b = JsonValue::Decimal("5.0".parse().unwrap());
/// assert_eq!(a, b);
/// assert_ne!(a.kind(), b.kind());
/// ```
#[derive(Clone, Debug, Default)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    String(String),
    Int(i32),
    Long(i64),
    Decimal(Decimal),
    Array(Vec<JsonValue>),
    Object(JsonObject),
}

impl JsonValue {
    /// Returns the variant of this value.
    pub const fn kind(&self) -> JsonKind {
        match self {
            Self::Null => JsonKind::Null,
            Self::Bool(_) => JsonKind::Bool,
            Self::String(_) => JsonKind::String,
            Self::Int(_) => JsonKind::Int,
            Self::Long(_) => JsonKind::Long,
            Self::Decimal(_) => JsonKind::Decimal,
            Self::Array(_) => JsonKind::Array,
            Self::Object(_) => JsonKind::Object,
        }
    }

    /// The narrowest numeric variant holding `value`.
    #[inline]
    pub fn from_i64(value: i64) -> Self {
        match i32::try_from(value) {
            Ok(v) => Self::Int(v),
            Err(_) => Self::Long(value),
        }
    }

    /// The narrowest numeric variant holding `value`.
    #[inline]
    pub fn from_u64(value: u64) -> Self {
        match i64::try_from(value) {
            Ok(v) => Self::from_i64(v),
            Err(_) => Self::Decimal(Decimal::from(value)),
        }
    }

    /// The narrowest numeric variant holding `value`.
    #[inline]
    pub fn from_i128(value: i128) -> Self {
        match i64::try_from(value) {
            Ok(v) => Self::from_i64(v),
            Err(_) => Self::Decimal(Decimal::from(value)),
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    pub const fn is_number(&self) -> bool {
        self.kind().is_number()
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Integral numbers that fit `i128`, whatever their variant.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(*v as i128),
            Self::Long(v) => Some(*v as i128),
            Self::Decimal(d) => d.to_i128(),
            _ => None,
        }
    }

    /// Any numeric variant as a [`Decimal`].
    pub fn as_decimal(&self) -> Option<Cow<'_, Decimal>> {
        match self {
            Self::Int(v) => Some(Cow::Owned(Decimal::from(*v))),
            Self::Long(v) => Some(Cow::Owned(Decimal::from(*v))),
            Self::Decimal(d) => Some(Cow::Borrowed(d)),
            _ => None,
        }
    }

    /// Value-based ordering between numeric variants.
    ///
    /// Returns `None` unless both values are numbers.
    pub fn numeric_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Int(_) | Self::Long(_), Self::Int(_) | Self::Long(_)) => {
                Some(self.as_i128()?.cmp(&other.as_i128()?))
            }
            _ => Some(self.as_decimal()?.as_ref().cmp(other.as_decimal()?.as_ref())),
        }
    }

    /// Looks up a value by path; key tokens address array elements when numeric.
    pub fn pointer(&self, path: &JsonPath) -> Option<&JsonValue> {
        let mut current = self;
        for token in path.tokens() {
            current = match (current, token) {
                (Self::Object(object), PathToken::Key(key)) => object.get(key)?,
                (Self::Array(items), PathToken::Index(index)) => items.get(*index)?,
                (Self::Array(items), PathToken::Key(key)) => {
                    if key.len() > 1 && key.starts_with('0') {
                        return None;
                    }
                    items.get(key.parse::<usize>().ok()?)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Compact rendering cut after roughly `limit` characters.
    ///
    /// Used where a value is shown to a human, e.g. in error messages.
    pub fn truncated(&self, limit: usize) -> String {
        let mut out = String::new();
        for token in self.tokens() {
            if out.len() + token.len() > limit {
                let room = limit.saturating_sub(out.len());
                let cut = (0..=room).rev().find(|&i| token.is_char_boundary(i)).unwrap_or(0);
                out.push_str(&token[..cut]);
                out.push_str("...");
                return out;
            }
            out.push_str(&token);
        }
        out
    }
}

impl PartialEq for JsonValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            (a, b) if a.is_number() && b.is_number() => a.numeric_cmp(b) == Some(Ordering::Equal),
            _ => false,
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

impl From<bool> for JsonValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for JsonValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<i64> for JsonValue {
    #[inline]
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<Decimal> for JsonValue {
    #[inline]
    fn from(value: Decimal) -> Self {
        Self::Decimal(value)
    }
}

impl From<String> for JsonValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for JsonValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.into())
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    #[inline]
    fn from(value: Vec<JsonValue>) -> Self {
        Self::Array(value)
    }
}

impl From<JsonObject> for JsonValue {
    #[inline]
    fn from(value: JsonObject) -> Self {
        Self::Object(value)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn dec(text: &str) -> JsonValue {
        JsonValue::Decimal(text.parse().unwrap())
    }

    #[test]
    fn numeric_variants_compare_by_value() {
        assert_eq!(JsonValue::Int(5), dec("5.0"));
        assert_eq!(JsonValue::Long(5), JsonValue::Int(5));
        assert_ne!(JsonValue::Int(5), dec("5.5"));
        assert_eq!(JsonValue::Int(2).numeric_cmp(&dec("2.5")), Some(Ordering::Less));
        assert_eq!(JsonValue::Long(i64::MAX).numeric_cmp(&JsonValue::Int(0)), Some(Ordering::Greater));
        assert_eq!(JsonValue::Int(1).numeric_cmp(&JsonValue::from("1")), None);
    }

    #[test]
    fn narrowest_variants() {
        assert_eq!(JsonValue::from_i64(7).kind(), JsonKind::Int);
        assert_eq!(JsonValue::from_i64(i64::MIN).kind(), JsonKind::Long);
        assert_eq!(JsonValue::from_u64(u64::MAX).kind(), JsonKind::Decimal);
        assert_eq!(JsonValue::from_i128(-3).kind(), JsonKind::Int);
    }

    #[test]
    fn pointer_lookup() {
        let mut meta = JsonObject::new();
        meta.insert("kind", JsonValue::from("Const")).unwrap();
        let mut root = JsonObject::new();
        root.insert("meta", JsonValue::Object(meta)).unwrap();
        root.insert("items", JsonValue::Array(vec![JsonValue::Int(1), JsonValue::Int(2)])).unwrap();
        let root = JsonValue::Object(root);

        let kind = JsonPath::parse("/meta/kind").unwrap();
        assert_eq!(root.pointer(&kind), Some(&JsonValue::from("Const")));
        let second = JsonPath::parse("/items/1").unwrap();
        assert_eq!(root.pointer(&second), Some(&JsonValue::Int(2)));
        let leading_zero = JsonPath::parse("/items/01").unwrap();
        assert_eq!(root.pointer(&leading_zero), None);
        assert_eq!(root.pointer(&JsonPath::root()), Some(&root));
    }

    #[test]
    fn truncated_display() {
        let value = JsonValue::Array((0..100).map(JsonValue::Int).collect());
        let text = value.truncated(12);
        assert!(text.ends_with("..."));
        assert!(text.len() <= 15);
        assert_eq!(JsonValue::Int(3).truncated(12), "3");
    }
}
