//! `time` types: `OffsetDateTime` as RFC 3339, `Date` as `YYYY-MM-DD`.

use ::alloc::borrow::Cow;
use ::alloc::boxed::Box;
use ::alloc::string::ToString;

use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::impls::{cast, impl_scalar};
use crate::info::{BuildError, ScalarClass};
use crate::value::JsonValue;

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

#[inline]
fn text(value: &JsonValue) -> Result<&str, BuildError> {
    value.as_str().ok_or(Cow::Borrowed("expected a string"))
}

#[inline]
fn failed(err: impl ToString) -> BuildError {
    Cow::Owned(err.to_string())
}

impl_scalar!(
    OffsetDateTime,
    ScalarClass::Temporal,
    |value| Ok(Box::new(OffsetDateTime::parse(text(value)?, &Rfc3339).map_err(failed)?)),
    |value, _| {
        let formatted = cast::<OffsetDateTime>(value)?.format(&Rfc3339).map_err(failed)?;
        Ok(JsonValue::String(formatted))
    },
);

impl_scalar!(
    Date,
    ScalarClass::Temporal,
    |value| Ok(Box::new(Date::parse(text(value)?, DATE_FORMAT).map_err(failed)?)),
    |value, _| {
        let formatted = cast::<Date>(value)?.format(DATE_FORMAT).map_err(failed)?;
        Ok(JsonValue::String(formatted))
    },
);

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};
    use time::{Date, OffsetDateTime};

    use crate::info::{ScalarOptions, Typed};
    use crate::value::JsonValue;

    #[test]
    fn date_text() {
        let info = Date::type_info().as_scalar().unwrap();
        let decoded = (info.decode_fn())(&JsonValue::from("2024-02-29")).unwrap();
        assert_eq!(decoded.downcast_ref::<Date>(), Some(&date!(2024 - 02 - 29)));
        assert!((info.decode_fn())(&JsonValue::from("2023-02-29")).is_err());
    }

    #[test]
    fn offset_date_time_text() {
        let info = OffsetDateTime::type_info().as_scalar().unwrap();
        let moment = datetime!(2021-03-04 05:06:07 UTC);
        let encoded = (info.encode_fn())(&moment, ScalarOptions::default()).unwrap();
        assert_eq!(encoded, JsonValue::from("2021-03-04T05:06:07Z"));
    }
}
