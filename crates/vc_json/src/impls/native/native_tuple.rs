use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;

use crate::info::glue::next_arg;
use crate::info::{BuildError, GenericTypeInfoCell, Generics, TupleInfo};
use crate::info::{TypeInfo, TypeParamInfo, TypeRef, Typed};

impl<A: Typed, B: Typed> Typed for (A, B) {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Tuple(
                TupleInfo::new::<Self>(
                    &[TypeRef::param(0), TypeRef::param(1)],
                    build_pair::<A, B>,
                    pair_items::<A, B>,
                )
                .with_generics(
                    Generics::new()
                        .with(TypeParamInfo::new::<A>("A"))
                        .with(TypeParamInfo::new::<B>("B")),
                ),
            )
        })
    }
}

fn build_pair<A: Any, B: Any>(args: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, BuildError> {
    let mut args = args.into_iter();
    let a = next_arg::<A>(&mut args)?;
    let b = next_arg::<B>(&mut args)?;
    Ok(Box::new((a, b)))
}

fn pair_items<A: Any, B: Any>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    let (a, b) = value.downcast_ref::<(A, B)>()?;
    Some(vec![a as &dyn Any, b as &dyn Any])
}

impl<A: Typed, B: Typed, C: Typed> Typed for (A, B, C) {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Tuple(
                TupleInfo::new::<Self>(
                    &[TypeRef::param(0), TypeRef::param(1), TypeRef::param(2)],
                    build_triple::<A, B, C>,
                    triple_items::<A, B, C>,
                )
                .with_generics(
                    Generics::new()
                        .with(TypeParamInfo::new::<A>("A"))
                        .with(TypeParamInfo::new::<B>("B"))
                        .with(TypeParamInfo::new::<C>("C")),
                ),
            )
        })
    }
}

fn build_triple<A: Any, B: Any, C: Any>(args: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, BuildError> {
    let mut args = args.into_iter();
    let a = next_arg::<A>(&mut args)?;
    let b = next_arg::<B>(&mut args)?;
    let c = next_arg::<C>(&mut args)?;
    Ok(Box::new((a, b, c)))
}

fn triple_items<A: Any, B: Any, C: Any>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    let (a, b, c) = value.downcast_ref::<(A, B, C)>()?;
    Some(vec![a as &dyn Any, b as &dyn Any, c as &dyn Any])
}
