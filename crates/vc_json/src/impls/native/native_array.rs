use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::info::glue::unbox;
use crate::info::{ArrayInfo, BuildError, GenericTypeInfoCell, Generics};
use crate::info::{TypeInfo, TypeParamInfo, TypeRef, Typed};

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Array(
                ArrayInfo::new::<Self>(TypeRef::param(0), N, build_array::<T, N>, array_items::<T, N>)
                    .with_generics(Generics::new().with(TypeParamInfo::new::<T>("T"))),
            )
        })
    }
}

fn build_array<T: Any, const N: usize>(items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, BuildError> {
    let items = items.into_iter().map(unbox::<T>).collect::<Result<Vec<T>, _>>()?;
    let array: [T; N] = items
        .try_into()
        .map_err(|items: Vec<T>| Cow::Owned(alloc::format!("expected {N} items, found {}", items.len())))?;
    Ok(Box::new(array))
}

fn array_items<T: Any, const N: usize>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    let array = value.downcast_ref::<[T; N]>()?;
    Some(array.iter().map(|item| item as &dyn Any).collect())
}
