use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::sync::Arc;

use crate::impls::{cast, impl_scalar};
use crate::info::{BuildError, ScalarClass};
use crate::value::JsonValue;

#[inline]
fn text(value: &JsonValue) -> Result<&str, BuildError> {
    value.as_str().ok_or(Cow::Borrowed("expected a string"))
}

impl_scalar!(
    String,
    ScalarClass::Text,
    |value| Ok(Box::new(String::from(text(value)?))),
    |value, _| Ok(JsonValue::String(cast::<String>(value)?.clone())),
);

impl_scalar!(
    Box<str>,
    ScalarClass::Text,
    |value| Ok(Box::new(Box::<str>::from(text(value)?))),
    |value, _| Ok(JsonValue::String(cast::<Box<str>>(value)?.to_string())),
);

impl_scalar!(
    Arc<str>,
    ScalarClass::Text,
    |value| Ok(Box::new(Arc::<str>::from(text(value)?))),
    |value, _| Ok(JsonValue::String(cast::<Arc<str>>(value)?.to_string())),
);

impl_scalar!(
    Cow<'static, str>,
    ScalarClass::Text,
    |value| Ok(Box::new(Cow::<'static, str>::Owned(String::from(text(value)?)))),
    |value, _| Ok(JsonValue::String(cast::<Cow<'static, str>>(value)?.to_string())),
);
