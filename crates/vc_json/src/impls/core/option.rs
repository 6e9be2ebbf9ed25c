use alloc::boxed::Box;
use core::any::Any;

use crate::info::glue::unbox;
use crate::info::{BuildError, GenericTypeInfoCell, Generics, OptionalInfo, TypeDescriptor};
use crate::info::{TypeInfo, TypeParamInfo, TypeRef, Typed};

impl<T: Typed> Typed for Option<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Optional(
                OptionalInfo::new::<Self>(TypeRef::param(0), wrap_some::<T>, none::<T>, get::<T>)
                    .with_generics(Generics::new().with(TypeParamInfo::new::<T>("T"))),
            )
        })
    }

    /// `T?`, unless `T` is already nullable.
    fn descriptor() -> TypeDescriptor {
        let inner = T::descriptor();
        if inner.is_nullable() {
            TypeDescriptor::nominal::<Self>()
        } else {
            inner.into_nullable(Self::type_info)
        }
    }
}

fn wrap_some<T: Any>(value: Box<dyn Any>) -> Result<Box<dyn Any>, BuildError> {
    Ok(Box::new(Some(unbox::<T>(value)?)))
}

fn none<T: Any>() -> Box<dyn Any> {
    Box::new(None::<T>)
}

fn get<T: Any>(value: &dyn Any) -> Option<Option<&dyn Any>> {
    let option = value.downcast_ref::<Option<T>>()?;
    Some(option.as_ref().map(|inner| inner as &dyn Any))
}

#[cfg(test)]
mod tests {
    use crate::info::{TypeDescriptor, Typed};

    #[test]
    fn plumbing() {
        let info = Option::<u8>::type_info().as_optional().unwrap();
        let some = info.wrap_some(Box::new(3_u8)).unwrap();
        assert_eq!(some.downcast_ref::<Option<u8>>(), Some(&Some(3)));
        assert_eq!(info.none().downcast_ref::<Option<u8>>(), Some(&None));
        assert!(info.get(&Some(1_u8)).unwrap().is_some());
        assert!(info.get(&None::<u8>).unwrap().is_none());
        assert!(info.get(&1_u16).is_none());
    }

    #[test]
    fn nullable_descriptor_points_back_to_the_option() {
        let descriptor = TypeDescriptor::of::<Option<String>>();
        assert!(descriptor.ty().is::<String>());
        assert!(descriptor.optional_info().unwrap().is::<Option<String>>());
    }
}
