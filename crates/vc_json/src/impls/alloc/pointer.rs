use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::sync::Arc;
use core::any::Any;

use crate::error::JsonError;
use crate::info::glue::unbox;
use crate::info::{BuildError, GenericTypeInfoCell, Generics, PointerInfo};
use crate::info::{TypeInfo, TypeParamInfo, TypeRef, Typed};
use crate::value::JsonValue;

/// Owning pointers that are encoded as their pointee.
macro_rules! impl_pointer {
    ($ptr:ident, $wrap:ident, $visit:ident) => {
        impl<T: Typed> Typed for $ptr<T> {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::Pointer(
                        PointerInfo::new::<Self>(TypeRef::param(0), $wrap::<T>, $visit::<T>)
                            .with_generics(Generics::new().with(TypeParamInfo::new::<T>("T"))),
                    )
                })
            }
        }

        fn $wrap<T: Any>(value: Box<dyn Any>) -> Result<Box<dyn Any>, BuildError> {
            Ok(Box::new($ptr::new(unbox::<T>(value)?)))
        }

        fn $visit<T: Any>(
            value: &dyn Any,
            f: &mut dyn FnMut(&dyn Any) -> Result<JsonValue, JsonError>,
        ) -> Option<Result<JsonValue, JsonError>> {
            let pointer = value.downcast_ref::<$ptr<T>>()?;
            Some(f(&**pointer))
        }
    };
}

impl_pointer!(Box, wrap_box, visit_box);
impl_pointer!(Rc, wrap_rc, visit_rc);
impl_pointer!(Arc, wrap_arc, visit_arc);

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::any::Any;

    use crate::info::Typed;
    use crate::value::JsonValue;

    #[test]
    fn visit_reaches_the_shared_pointee() {
        let info = Rc::<u8>::type_info().as_pointer().unwrap();
        let shared = Rc::new(7_u8);
        let mut seen = 0;
        let result = (info.visit_fn())(&shared, &mut |inner: &dyn Any| {
            seen = *inner.downcast_ref::<u8>().unwrap();
            assert!(core::ptr::eq(inner.downcast_ref::<u8>().unwrap(), &*shared));
            Ok(JsonValue::Null)
        });
        assert!(result.unwrap().is_ok());
        assert_eq!(seen, 7);

        let wrapped = (info.wrap_fn())(Box::new(9_u8)).unwrap();
        assert_eq!(**wrapped.downcast_ref::<Rc<u8>>().unwrap(), 9);
    }
}
