//! The value tree types themselves.

use ::alloc::borrow::Cow;
use ::alloc::boxed::Box;
use ::alloc::string::ToString;

use crate::impls::{cast, impl_scalar};
use crate::info::ScalarClass;
use crate::value::{Decimal, JsonValue};

impl_scalar!(
    JsonValue,
    ScalarClass::Json,
    |value| Ok(Box::new(value.clone())),
    |value, _| Ok(cast::<JsonValue>(value)?.clone()),
);

impl_scalar!(
    Decimal,
    ScalarClass::BigDecimal,
    |value| {
        let decimal = match value {
            JsonValue::String(text) => text
                .parse::<Decimal>()
                .map_err(|err| Cow::Owned(err.to_string()))?,
            other => other
                .as_decimal()
                .ok_or(Cow::Borrowed("expected a number"))?
                .into_owned(),
        };
        Ok(Box::new(decimal))
    },
    |value, options| {
        let decimal = cast::<Decimal>(value)?;
        Ok(if options.big_numbers_as_strings {
            JsonValue::String(decimal.as_str().to_string())
        } else {
            JsonValue::Decimal(decimal.clone())
        })
    },
);

#[cfg(test)]
mod tests {
    use crate::info::{ScalarOptions, Typed};
    use crate::value::{Decimal, JsonValue};

    #[test]
    fn decimal_from_number_or_text() {
        let info = Decimal::type_info().as_scalar().unwrap();
        let from_text = (info.decode_fn())(&JsonValue::from("12.50")).unwrap();
        let from_int = (info.decode_fn())(&JsonValue::Int(3)).unwrap();
        assert_eq!(from_text.downcast_ref::<Decimal>().unwrap().as_str(), "12.50");
        assert_eq!(from_int.downcast_ref::<Decimal>(), Some(&Decimal::from(3)));
        assert!((info.decode_fn())(&JsonValue::Bool(true)).is_err());

        let d: Decimal = "0.1".parse().unwrap();
        let text = (info.encode_fn())(&d, ScalarOptions { big_numbers_as_strings: true }).unwrap();
        assert_eq!(text, JsonValue::from("0.1"));
    }
}
