use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;

use crate::impls::{cast, decode_float, decode_signed, decode_unsigned, encode_big, encode_float};
use crate::impls::impl_scalar;
use crate::info::ScalarClass;
use crate::value::{Decimal, JsonValue};

impl_scalar!(
    bool,
    ScalarClass::Boolean,
    |value| match value {
        JsonValue::Bool(b) => Ok(Box::new(*b)),
        _ => Err(Cow::Borrowed("expected a boolean")),
    },
    |value, _| Ok(JsonValue::Bool(*cast::<bool>(value)?)),
);

impl_scalar!(
    char,
    ScalarClass::Character,
    |value| {
        let text = value.as_str().ok_or(Cow::Borrowed("expected a string"))?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(Box::new(ch)),
            _ => Err(Cow::Borrowed("expected exactly one character")),
        }
    },
    |value, _| Ok(JsonValue::String(String::from(*cast::<char>(value)?))),
);

macro_rules! impl_signed {
    ($($ty:ident),*) => {$(
        impl_scalar!(
            $ty,
            ScalarClass::Integer { bits: $ty::BITS as u8, signed: true },
            |value| Ok(Box::new(decode_signed(value, $ty::BITS as u8, false)? as $ty)),
            |value, _| Ok(JsonValue::from_i128(*cast::<$ty>(value)? as i128)),
        );
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ident),*) => {$(
        impl_scalar!(
            $ty,
            ScalarClass::Integer { bits: $ty::BITS as u8, signed: false },
            |value| Ok(Box::new(decode_unsigned(value, $ty::BITS as u8, false)? as $ty)),
            |value, _| Ok(JsonValue::from_u64(*cast::<$ty>(value)? as u64)),
        );
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl_scalar!(
    i128,
    ScalarClass::BigInteger,
    |value| Ok(Box::new(decode_signed(value, 128, true)?)),
    |value, options| Ok(encode_big(Decimal::from(*cast::<i128>(value)?), options)),
);

impl_scalar!(
    u128,
    ScalarClass::BigInteger,
    |value| Ok(Box::new(decode_unsigned(value, 128, true)?)),
    |value, options| Ok(encode_big(Decimal::from(*cast::<u128>(value)?), options)),
);

impl_scalar!(
    f32,
    ScalarClass::Float { bits: 32 },
    |value| Ok(Box::new(decode_float(value)? as f32)),
    |value, _| {
        let value = *cast::<f32>(value)?;
        Decimal::from_f32(value)
            .map(JsonValue::Decimal)
            .ok_or_else(|| Cow::Owned(alloc::format!("`{value}` is not a finite number")))
    },
);

impl_scalar!(
    f64,
    ScalarClass::Float { bits: 64 },
    |value| Ok(Box::new(decode_float(value)?)),
    |value, _| encode_float(*cast::<f64>(value)?),
);

#[cfg(test)]
mod tests {
    use crate::info::{ScalarInfo, Typed};
    use crate::info::ScalarOptions;
    use crate::value::JsonValue;

    fn scalar<T: Typed>() -> &'static ScalarInfo {
        T::type_info().as_scalar().unwrap()
    }

    #[test]
    fn unsigned_64_promotes_past_long() {
        let info = scalar::<u64>();
        let encoded = (info.encode_fn())(&u64::MAX, ScalarOptions::default()).unwrap();
        assert!(matches!(encoded, JsonValue::Decimal(_)));
        let decoded = (info.decode_fn())(&encoded).unwrap();
        assert_eq!(decoded.downcast_ref::<u64>(), Some(&u64::MAX));
    }

    #[test]
    fn u32_uses_long_above_i32() {
        let info = scalar::<u32>();
        let encoded = (info.encode_fn())(&u32::MAX, ScalarOptions::default()).unwrap();
        assert!(matches!(encoded, JsonValue::Long(4294967295)));
    }

    #[test]
    fn narrowing_fails() {
        let info = scalar::<i8>();
        assert!((info.decode_fn())(&JsonValue::Int(200)).is_err());
        let info = scalar::<u16>();
        assert!((info.decode_fn())(&JsonValue::Int(-1)).is_err());
    }

    #[test]
    fn char_needs_one_character() {
        let info = scalar::<char>();
        assert!((info.decode_fn())(&JsonValue::from("ab")).is_err());
        let ok = (info.decode_fn())(&JsonValue::from("é")).unwrap();
        assert_eq!(ok.downcast_ref::<char>(), Some(&'é'));
    }

    #[test]
    fn big_integers_as_strings() {
        let info = scalar::<i128>();
        let options = ScalarOptions { big_numbers_as_strings: true };
        let encoded = (info.encode_fn())(&i128::MIN, options).unwrap();
        assert_eq!(encoded, JsonValue::from(i128::MIN.to_string().as_str()));
        let decoded = (info.decode_fn())(&encoded).unwrap();
        assert_eq!(decoded.downcast_ref::<i128>(), Some(&i128::MIN));
    }
}
