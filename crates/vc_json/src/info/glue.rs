//! Small conversions shared by `#[derive(Typed)]` output and hand-written
//! [`Typed`](crate::info::Typed) implementations.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use core::any::{Any, type_name};
use core::fmt::Display;

use crate::info::BuildError;
use crate::value::JsonValue;

#[inline]
fn type_mismatch<T>() -> BuildError {
    Cow::Owned(format!("expected a value of type `{}`", type_name::<T>()))
}

#[inline]
pub fn boxed<T: Any>(value: T) -> Box<dyn Any> {
    Box::new(value)
}

/// Takes a decoded value back out of its box.
#[inline]
pub fn unbox<T: Any>(value: Box<dyn Any>) -> Result<T, BuildError> {
    value.downcast::<T>().map(|value| *value).map_err(|_| type_mismatch::<T>())
}

#[inline]
pub fn downcast_ref<T: Any>(value: &dyn Any) -> Option<&T> {
    value.downcast_ref::<T>()
}

#[inline]
pub fn downcast_mut<T: Any>(value: &mut dyn Any) -> Result<&mut T, BuildError> {
    value.downcast_mut::<T>().ok_or_else(type_mismatch::<T>)
}

/// Pops the next constructor argument.
#[inline]
pub fn next_arg<T: Any>(args: &mut impl Iterator<Item = Box<dyn Any>>) -> Result<T, BuildError> {
    match args.next() {
        Some(arg) => unbox(arg),
        None => Err(Cow::Borrowed("too few constructor arguments")),
    }
}

/// Adapts the result of a user factory function.
#[inline]
pub fn factory_result<T: Any, E: Display>(result: Result<T, E>) -> Result<Box<dyn Any>, BuildError> {
    match result {
        Ok(value) => Ok(Box::new(value)),
        Err(err) => Err(Cow::Owned(format!("{err}"))),
    }
}

/// Adapts a user to-JSON function.
#[inline]
pub fn render_with<T: Any>(value: &dyn Any, render: fn(&T) -> JsonValue) -> Result<JsonValue, BuildError> {
    value.downcast_ref::<T>().map(render).ok_or_else(type_mismatch::<T>)
}

#[inline]
pub fn default_of<T: Default + Any>() -> Box<dyn Any> {
    Box::new(T::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec;

    #[test]
    fn arguments_are_taken_in_order() {
        let mut args = vec![boxed(1_u8), boxed(String::from("x"))].into_iter();
        assert_eq!(next_arg::<u8>(&mut args), Ok(1));
        assert_eq!(
            next_arg::<u8>(&mut args).unwrap_err(),
            "expected a value of type `u8`"
        );
        assert_eq!(next_arg::<u8>(&mut args).unwrap_err(), "too few constructor arguments");
    }

    #[test]
    fn factory_errors_become_text() {
        let failed = factory_result::<u8, _>(Err("bad digit"));
        assert_eq!(failed.unwrap_err(), "bad digit");
        let ok = factory_result::<u8, &str>(Ok(4)).unwrap();
        assert_eq!(ok.downcast_ref::<u8>(), Some(&4));
    }
}
