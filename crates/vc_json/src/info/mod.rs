//! Type introspection: what the engine knows about a type.
//!
//! Every convertible type implements [`Typed`], which hands out a static
//! [`TypeInfo`] describing the type's kind and structure: fields and
//! constructors of records, members of closed families, element types of
//! containers. The engine never inspects values any other way.
//!
//! Types mentioned inside a declaration are [`TypeRef`]s, resolved against
//! the enclosing [`TypeDescriptor`] so that generic parameters pick up the
//! concrete arguments of the instantiation being converted.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod cell;
mod containers;
mod descriptor;
mod enums;
mod generics;
mod hooks;
mod object;
mod scalar;
mod ty;
mod type_info;
mod typed;

pub mod glue;

// -----------------------------------------------------------------------------
// Exports

pub use attributes::{AllowExtra, CustomAttributes, Ignore, IncludeAll, IncludeNull, Rename};
pub use cell::{GenericTypeInfoCell, NonGenericTypeInfoCell};
pub use containers::{ArrayInfo, ListInfo, MapInfo, OptionalInfo, PointerInfo, SetInfo, TupleInfo};
pub use containers::{CollectEntriesFn, CollectError, CollectFn, EntriesFn, OptionGetFn, VisitFn};
pub use descriptor::{TypeArg, TypeDescriptor, TypeRef, Variance};
pub use enums::{EnumInfo, FamilyInfo, FamilyVariant, SplitFn, UnitVariant};
pub use generics::{Generics, TypeParamInfo};
pub use hooks::{Factory, FactoryFn, ToJsonFn, TypeHooks};
pub use object::{ConstructorInfo, FieldInfo, ParamInfo, StructInfo, StructKind};
pub use object::{DelegatingInfo, ForeignConstruction, ForeignInfo, SingletonInfo};
pub use scalar::{ScalarClass, ScalarDecodeFn, ScalarEncodeFn, ScalarInfo, ScalarOptions};
pub use ty::Type;
pub use type_info::{OpaqueInfo, TypeInfo, TypeKind};
pub use typed::Typed;

pub(crate) use attributes::impl_custom_attributes_fn;
pub(crate) use generics::impl_generic_fn;

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

// -----------------------------------------------------------------------------
// Function shapes

/// Message of a failed construction or conversion.
pub type BuildError = Cow<'static, str>;

/// Borrows a property of a value.
pub type Getter = for<'a> fn(&'a dyn Any) -> Option<&'a dyn Any>;

/// Assigns a property of a constructed value.
pub type Setter = fn(&mut dyn Any, Box<dyn Any>) -> Result<(), BuildError>;

/// Builds a value from positional arguments.
pub type BuildFn = fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, BuildError>;

/// Builds a value from exactly one other value.
pub type WrapFn = fn(Box<dyn Any>) -> Result<Box<dyn Any>, BuildError>;

/// Borrows the elements of a value in order.
pub type ItemsFn = for<'a> fn(&'a dyn Any) -> Option<Vec<&'a dyn Any>>;

/// Produces a fresh value.
pub type DefaultFn = fn() -> Box<dyn Any>;

// -----------------------------------------------------------------------------
// Auxiliary macro

macro_rules! impl_type_fn {
    ($field:ident) => {
        #[inline]
        pub const fn ty(&self) -> &$crate::info::Type {
            &self.$field
        }

        $crate::info::impl_type_fn!();
    };
    () => {
        #[inline]
        pub const fn type_path(&self) -> &'static str {
            self.ty().path()
        }

        #[inline]
        pub const fn type_id(&self) -> ::core::any::TypeId {
            self.ty().id()
        }

        #[inline]
        pub fn is<T: ::core::any::Any>(&self) -> bool {
            self.ty().is::<T>()
        }
    };
}

pub(crate) use impl_type_fn;
