use alloc::boxed::Box;
use core::any::Any;

use crate::impls::{decode_signed, decode_unsigned, fits_integer};
use crate::info::{BuildError, Type, impl_type_fn};
use crate::value::JsonValue;

/// Decodes a leaf value.
pub type ScalarDecodeFn = fn(&JsonValue) -> Result<Box<dyn Any>, BuildError>;

/// Encodes a leaf value.
pub type ScalarEncodeFn = fn(&dyn Any, ScalarOptions) -> Result<JsonValue, BuildError>;

/// Switches that change how scalars are written.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScalarOptions {
    /// Write 128-bit integers and decimals as JSON strings.
    pub big_numbers_as_strings: bool,
}

/// What a scalar type represents, used when matching single-argument constructors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarClass {
    /// [`JsonValue`] itself.
    Json,
    Text,
    Character,
    Boolean,
    Integer { bits: u8, signed: bool },
    Float { bits: u8 },
    BigInteger,
    BigDecimal,
    Temporal,
}

impl ScalarClass {
    /// Whether a value of this JSON variant can be decoded into this class.
    ///
    /// Integers only accept numbers without a fractional part that fit the width.
    /// Arbitrary-precision classes also accept numeric strings.
    pub fn accepts(self, value: &JsonValue) -> bool {
        match self {
            Self::Json => true,
            Self::Text | Self::Temporal => matches!(value, JsonValue::String(_)),
            Self::Character => value.as_str().is_some_and(|s| s.chars().count() == 1),
            Self::Boolean => matches!(value, JsonValue::Bool(_)),
            Self::Integer { bits, signed } => fits_integer(value, bits, signed),
            Self::Float { .. } => value.is_number(),
            Self::BigDecimal => match value {
                JsonValue::String(text) => text.parse::<crate::value::Decimal>().is_ok(),
                other => other.is_number(),
            },
            Self::BigInteger => {
                decode_signed(value, 128, true).is_ok() || decode_unsigned(value, 128, true).is_ok()
            }
        }
    }
}

/// A leaf type with built-in conversions.
#[derive(Clone, Debug)]
pub struct ScalarInfo {
    ty: Type,
    class: ScalarClass,
    decode: ScalarDecodeFn,
    encode: ScalarEncodeFn,
}

impl ScalarInfo {
    impl_type_fn!(ty);

    #[inline]
    pub fn new<T: Any>(class: ScalarClass, decode: ScalarDecodeFn, encode: ScalarEncodeFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            class,
            decode,
            encode,
        }
    }

    #[inline]
    pub const fn class(&self) -> ScalarClass {
        self.class
    }

    #[inline]
    pub const fn decode_fn(&self) -> ScalarDecodeFn {
        self.decode
    }

    #[inline]
    pub const fn encode_fn(&self) -> ScalarEncodeFn {
        self.encode
    }
}

#[cfg(test)]
mod tests {
    use super::ScalarClass;
    use crate::value::JsonValue;

    #[test]
    fn integer_acceptance_checks_width_and_fraction() {
        let byte = ScalarClass::Integer { bits: 8, signed: false };
        assert!(byte.accepts(&JsonValue::Int(255)));
        assert!(!byte.accepts(&JsonValue::Int(256)));
        assert!(!byte.accepts(&JsonValue::Int(-1)));
        assert!(byte.accepts(&JsonValue::Decimal("2.0".parse().unwrap())));
        assert!(!byte.accepts(&JsonValue::Decimal("2.5".parse().unwrap())));
        assert!(!byte.accepts(&JsonValue::from("2")));
    }

    #[test]
    fn other_classes() {
        assert!(ScalarClass::Character.accepts(&JsonValue::from("x")));
        assert!(!ScalarClass::Character.accepts(&JsonValue::from("xy")));
        assert!(ScalarClass::Float { bits: 64 }.accepts(&JsonValue::Int(1)));
        assert!(!ScalarClass::BigInteger.accepts(&JsonValue::Decimal("0.5".parse().unwrap())));
        assert!(ScalarClass::BigInteger.accepts(&JsonValue::from("340282366920938463463374607431768211455")));
        assert!(!ScalarClass::BigDecimal.accepts(&JsonValue::from("abc")));
        assert!(ScalarClass::Json.accepts(&JsonValue::Null));
    }
}
