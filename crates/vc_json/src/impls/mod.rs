//! Built-in [`Typed`](crate::info::Typed) implementations.
//!
//! ## Implemented Menu
//!
//! - native:
//!     - `bool`, `char`, `i8`-`i128`, `u8`-`u128`, `isize`, `usize`, `f32`, `f64`
//!     - `[T; N]`, `(A, B)`, `(A, B, C)`
//! - core:
//!     - `NonZeroU32`, `NonZeroU64`, `NonZeroUsize`
//!     - `Option<T>`, `RefCell<T>`
//!     - `core::time::Duration`, as ISO-8601 `PT…S`
//! - alloc:
//!     - `String`, `Box<str>`, `Arc<str>`, `Cow<'static, str>`
//!     - `Vec<T>`, `VecDeque<T>`, `LinkedList<T>`, `Box<[T]>`
//!     - `BTreeMap<K, V>`, `BTreeSet<T>`
//!     - `Box<T>`, `Rc<T>`, `Arc<T>`
//! - std:
//!     - `HashMap<K, V, S>`, `HashSet<T, S>`
//! - indexmap:
//!     - `IndexMap<K, V, S>`, `IndexSet<T, S>`
//! - vc_json:
//!     - `JsonValue`, `Decimal`
//! - time: ("temporal" feature)
//!     - `OffsetDateTime` as RFC 3339, `Date` as `YYYY-MM-DD`

// -----------------------------------------------------------------------------
// Modules

mod alloc;
mod cell;
mod core;
mod indexmap;
mod native;
mod std;
mod value;

#[cfg(feature = "temporal")]
mod temporal;

use ::alloc::borrow::Cow;
use ::alloc::boxed::Box;
use ::alloc::format;
use ::alloc::string::ToString;
use ::alloc::vec::Vec;
use ::core::any::{Any, type_name};

use crate::info::glue::unbox;
use crate::info::{BuildError, CollectError, ScalarOptions};
use crate::value::{Decimal, JsonValue};

// -----------------------------------------------------------------------------
// Helpers

/// Borrows the concrete value behind `value`.
#[inline]
pub(crate) fn cast<T: Any>(value: &dyn Any) -> Result<&T, BuildError> {
    value
        .downcast_ref::<T>()
        .ok_or_else(|| Cow::Owned(format!("expected a value of type `{}`", type_name::<T>())))
}

fn integral_decimal(value: &JsonValue) -> Result<Cow<'_, Decimal>, BuildError> {
    let decimal = match value {
        JsonValue::String(text) => Cow::Owned(
            text.parse::<Decimal>()
                .map_err(|_| Cow::Borrowed("expected a number"))?,
        ),
        other => other.as_decimal().ok_or(Cow::Borrowed("expected a number"))?,
    };
    if !decimal.is_integral() {
        return Err(Cow::Borrowed("the number has a fractional part"));
    }
    Ok(decimal)
}

/// Reads a signed integer of `bits` width.
///
/// Strings are only accepted when `from_text` is set (128-bit targets,
/// which may be written as strings).
pub(crate) fn decode_signed(value: &JsonValue, bits: u8, from_text: bool) -> Result<i128, BuildError> {
    let number = match value {
        JsonValue::Int(v) => *v as i128,
        JsonValue::Long(v) => *v as i128,
        JsonValue::Decimal(_) => integral_decimal(value)?
            .to_i128()
            .ok_or_else(|| out_of_range(bits))?,
        JsonValue::String(_) if from_text => integral_decimal(value)?
            .to_i128()
            .ok_or_else(|| out_of_range(bits))?,
        _ => return Err(Cow::Borrowed("expected a number")),
    };
    let (min, max) = if bits >= 128 {
        (i128::MIN, i128::MAX)
    } else {
        (-(1_i128 << (bits - 1)), (1_i128 << (bits - 1)) - 1)
    };
    if number < min || number > max {
        return Err(out_of_range(bits));
    }
    Ok(number)
}

/// Reads an unsigned integer of `bits` width; negative values fail.
pub(crate) fn decode_unsigned(value: &JsonValue, bits: u8, from_text: bool) -> Result<u128, BuildError> {
    let number = match value {
        JsonValue::Int(v) if *v < 0 => return Err(negative()),
        JsonValue::Long(v) if *v < 0 => return Err(negative()),
        JsonValue::Int(v) => *v as u128,
        JsonValue::Long(v) => *v as u128,
        JsonValue::Decimal(_) => unsigned_decimal(value, bits)?,
        JsonValue::String(_) if from_text => unsigned_decimal(value, bits)?,
        _ => return Err(Cow::Borrowed("expected a number")),
    };
    if bits < 128 && number > (1_u128 << bits) - 1 {
        return Err(out_of_range(bits));
    }
    Ok(number)
}

fn unsigned_decimal(value: &JsonValue, bits: u8) -> Result<u128, BuildError> {
    let decimal = integral_decimal(value)?;
    if decimal.is_negative() {
        return Err(negative());
    }
    decimal.to_u128().ok_or_else(|| out_of_range(bits))
}

#[inline]
fn negative() -> BuildError {
    Cow::Borrowed("negative value for an unsigned type")
}

#[inline]
fn out_of_range(bits: u8) -> BuildError {
    Cow::Owned(format!("the number does not fit in {bits} bits"))
}

/// Whether `value` is an integral number that fits the given width.
pub(crate) fn fits_integer(value: &JsonValue, bits: u8, signed: bool) -> bool {
    if signed {
        decode_signed(value, bits, false).is_ok()
    } else {
        decode_unsigned(value, bits, false).is_ok()
    }
}

/// Reads any number as `f64`.
pub(crate) fn decode_float(value: &JsonValue) -> Result<f64, BuildError> {
    match value {
        JsonValue::Int(v) => Ok(*v as f64),
        JsonValue::Long(v) => Ok(*v as f64),
        JsonValue::Decimal(d) => Ok(d.to_f64()),
        _ => Err(Cow::Borrowed("expected a number")),
    }
}

/// Writes a float; non-finite values have no JSON form.
pub(crate) fn encode_float(value: f64) -> Result<JsonValue, BuildError> {
    Decimal::from_f64(value)
        .map(JsonValue::Decimal)
        .ok_or_else(|| Cow::Owned(format!("`{value}` is not a finite number")))
}

/// Writes an arbitrary-precision number, as text when requested.
pub(crate) fn encode_big(value: Decimal, options: ScalarOptions) -> JsonValue {
    if options.big_numbers_as_strings {
        JsonValue::String(value.to_string())
    } else {
        match value.to_i128() {
            Some(small) if i64::try_from(small).is_ok() => JsonValue::from_i128(small),
            _ => JsonValue::Decimal(value),
        }
    }
}

/// Inserts decoded elements one by one; `insert` returns `false` for a duplicate.
pub(crate) fn collect_set<T: Any, S: Default>(
    items: Vec<Box<dyn Any>>,
    mut insert: impl FnMut(&mut S, T) -> bool,
) -> Result<S, CollectError> {
    let mut set = S::default();
    for (index, item) in items.into_iter().enumerate() {
        let item = unbox::<T>(item).map_err(CollectError::Invalid)?;
        if !insert(&mut set, item) {
            return Err(CollectError::Duplicate(index));
        }
    }
    Ok(set)
}

/// Inserts decoded entries one by one; `insert` returns `false` for a duplicate key.
pub(crate) fn collect_map<K: Any, V: Any, M: Default>(
    entries: Vec<(Box<dyn Any>, Box<dyn Any>)>,
    mut insert: impl FnMut(&mut M, K, V) -> bool,
) -> Result<M, CollectError> {
    let mut map = M::default();
    for (index, (key, value)) in entries.into_iter().enumerate() {
        let key = unbox::<K>(key).map_err(CollectError::Invalid)?;
        let value = unbox::<V>(value).map_err(CollectError::Invalid)?;
        if !insert(&mut map, key, value) {
            return Err(CollectError::Duplicate(index));
        }
    }
    Ok(map)
}

macro_rules! impl_scalar {
    ($ty:ty, $class:expr, $decode:expr, $encode:expr $(,)?) => {
        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::info::NonGenericTypeInfoCell =
                    $crate::info::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Scalar($crate::info::ScalarInfo::new::<Self>(
                        $class, $decode, $encode,
                    ))
                })
            }
        }
    };
}

pub(crate) use impl_scalar;

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn decimal(text: &str) -> JsonValue {
        JsonValue::Decimal(text.parse().unwrap())
    }

    #[test]
    fn signed_widths() {
        assert_eq!(decode_signed(&JsonValue::Int(-128), 8, false), Ok(-128));
        assert!(decode_signed(&JsonValue::Int(128), 8, false).is_err());
        assert_eq!(decode_signed(&JsonValue::Long(i64::MIN), 64, false), Ok(i64::MIN as i128));
        assert_eq!(decode_signed(&decimal("3.000"), 16, false), Ok(3));
        assert!(decode_signed(&decimal("3.5"), 16, false).is_err());
        assert!(decode_signed(&JsonValue::from("3"), 16, false).is_err());
        assert_eq!(decode_signed(&JsonValue::from("3"), 128, true), Ok(3));
    }

    #[test]
    fn unsigned_rejects_negative() {
        let err = decode_unsigned(&JsonValue::Int(-1), 32, false).unwrap_err();
        assert!(err.contains("negative"));
        assert!(decode_unsigned(&decimal("-2"), 64, false).is_err());
        assert_eq!(
            decode_unsigned(&decimal("18446744073709551615"), 64, false),
            Ok(u64::MAX as u128)
        );
        assert!(decode_unsigned(&decimal("18446744073709551616"), 64, false).is_err());
    }

    #[test]
    fn big_numbers() {
        let big = Decimal::from(u128::MAX);
        assert_eq!(
            encode_big(big.clone(), ScalarOptions { big_numbers_as_strings: true }),
            JsonValue::from(u128::MAX.to_string().as_str())
        );
        assert_eq!(encode_big(big.clone(), ScalarOptions::default()), JsonValue::Decimal(big));
        assert_eq!(encode_big(Decimal::from(7), ScalarOptions::default()).kind(), crate::JsonKind::Int);
    }

    #[test]
    fn floats() {
        assert!(encode_float(f64::NAN).is_err());
        assert_eq!(decode_float(&encode_float(0.25).unwrap()), Ok(0.25));
    }
}
