use alloc::boxed::Box;
use alloc::collections::{LinkedList, VecDeque};
use alloc::vec::Vec;
use core::any::Any;

use crate::info::glue::unbox;
use crate::info::{BuildError, GenericTypeInfoCell, Generics, ListInfo};
use crate::info::{TypeInfo, TypeParamInfo, TypeRef, Typed};

/// Sequences that are built from and read as an iterator of `T`.
macro_rules! impl_list {
    ($ty:ty, $build:ident, $items:ident) => {
        impl<T: Typed> Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
                CELL.get_or_insert::<Self>(|| {
                    TypeInfo::List(
                        ListInfo::new::<Self>(TypeRef::param(0), $build::<T>, $items::<T>)
                            .with_generics(Generics::new().with(TypeParamInfo::new::<T>("T"))),
                    )
                })
            }
        }

        fn $build<T: Any>(items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, BuildError> {
            let items = items.into_iter().map(unbox::<T>).collect::<Result<$ty, _>>()?;
            Ok(Box::new(items))
        }

        fn $items<T: Any>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
            let list = value.downcast_ref::<$ty>()?;
            Some(list.iter().map(|item| item as &dyn Any).collect())
        }
    };
}

impl_list!(Vec<T>, build_vec, vec_items);
impl_list!(VecDeque<T>, build_vec_deque, vec_deque_items);
impl_list!(LinkedList<T>, build_linked_list, linked_list_items);
impl_list!(Box<[T]>, build_boxed_slice, boxed_slice_items);

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::VecDeque;
    use alloc::vec;
    use core::any::Any;

    use crate::info::Typed;

    #[test]
    fn build_and_read_back() {
        let info = VecDeque::<u8>::type_info().as_list().unwrap();
        let built = (info.build_fn())(vec![Box::new(1_u8) as Box<dyn Any>, Box::new(2_u8)]).unwrap();
        let deque = built.downcast_ref::<VecDeque<u8>>().unwrap();
        assert_eq!(deque, &VecDeque::from([1, 2]));
        assert_eq!((info.items_fn())(deque).unwrap().len(), 2);
    }

    #[test]
    fn wrong_element_type() {
        let info = Vec::<u8>::type_info().as_list().unwrap();
        assert!((info.build_fn())(vec![Box::new("x") as Box<dyn Any>]).is_err());
    }
}
