//! `RefCell<T>`, encoded through a shared borrow of its content.

use ::alloc::boxed::Box;
use ::alloc::string::ToString;
use ::core::any::{Any, type_name};
use ::core::cell::RefCell;

use crate::error::{ErrorKind, JsonError};
use crate::info::glue::unbox;
use crate::info::{BuildError, GenericTypeInfoCell, Generics, PointerInfo};
use crate::info::{TypeInfo, TypeParamInfo, TypeRef, Typed};
use crate::path::JsonPath;
use crate::value::JsonValue;

impl<T: Typed> Typed for RefCell<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Pointer(
                PointerInfo::new::<Self>(TypeRef::param(0), wrap::<T>, visit::<T>)
                    .with_generics(Generics::new().with(TypeParamInfo::new::<T>("T"))),
            )
        })
    }
}

fn wrap<T: Any>(value: Box<dyn Any>) -> Result<Box<dyn Any>, BuildError> {
    Ok(Box::new(RefCell::new(unbox::<T>(value)?)))
}

fn visit<T: Any>(
    value: &dyn Any,
    f: &mut dyn FnMut(&dyn Any) -> Result<JsonValue, JsonError>,
) -> Option<Result<JsonValue, JsonError>> {
    let cell = value.downcast_ref::<RefCell<T>>()?;
    let Ok(inner) = cell.try_borrow() else {
        return Some(Err(JsonError::new(
            ErrorKind::Unencodable {
                type_name: type_name::<RefCell<T>>().to_string(),
                reason: "the cell is mutably borrowed".into(),
            },
            JsonPath::root(),
        )));
    };
    Some(f(&*inner))
}

#[cfg(test)]
mod tests {
    use core::cell::RefCell;

    use crate::error::ErrorKind;
    use crate::info::Typed;
    use crate::value::JsonValue;

    #[test]
    fn mutably_borrowed_cell_is_unencodable() {
        let info = RefCell::<u8>::type_info().as_pointer().unwrap();
        let cell = RefCell::new(1_u8);
        let guard = cell.borrow_mut();
        let result = (info.visit_fn())(&cell, &mut |_| Ok(JsonValue::Null)).unwrap();
        assert!(matches!(result.unwrap_err().kind(), ErrorKind::Unencodable { .. }));
        drop(guard);
        assert!((info.visit_fn())(&cell, &mut |_| Ok(JsonValue::Null)).unwrap().is_ok());
    }
}
