use core::fmt;

use crate::info::{ArrayInfo, ListInfo, MapInfo, OptionalInfo, PointerInfo, SetInfo, TupleInfo};
use crate::info::{CustomAttributes, Generics, Type, TypeHooks};
use crate::info::{DelegatingInfo, ForeignInfo, SingletonInfo, StructInfo};
use crate::info::{EnumInfo, FamilyInfo, ScalarInfo};

// -----------------------------------------------------------------------------
// TypeKind

/// The kind of a [`TypeInfo`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Scalar,
    Opaque,
    Enum,
    Array,
    List,
    Set,
    Map,
    Tuple,
    Optional,
    Pointer,
    Family,
    Delegating,
    Singleton,
    Foreign,
    Struct,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scalar => "Scalar",
            Self::Opaque => "Opaque",
            Self::Enum => "Enum",
            Self::Array => "Array",
            Self::List => "List",
            Self::Set => "Set",
            Self::Map => "Map",
            Self::Tuple => "Tuple",
            Self::Optional => "Optional",
            Self::Pointer => "Pointer",
            Self::Family => "Family",
            Self::Delegating => "Delegating",
            Self::Singleton => "Singleton",
            Self::Foreign => "Foreign",
            Self::Struct => "Struct",
        };
        f.pad(name)
    }
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static introspection data of a type, as queried by the engine.
///
/// Obtained through [`Typed::type_info`](crate::info::Typed::type_info); the
/// `as_*` accessors give the kind-specific data such as the fields of a
/// [`StructInfo`] or the members of a [`FamilyInfo`].
///
/// # Examples
///
/// ```
/// use vc_json::info::{Typed, TypeKind};
///
/// assert_eq!(u8::type_info().kind(), TypeKind::Scalar);
/// assert_eq!(Vec::<u8>::type_info().kind(), TypeKind::List);
/// assert!(Vec::<u8>::type_info().as_list().is_some());
/// ```
#[derive(Debug, Clone)]
pub enum TypeInfo {
    Scalar(ScalarInfo),
    Opaque(OpaqueInfo),
    Enum(EnumInfo),
    Array(ArrayInfo),
    List(ListInfo),
    Set(SetInfo),
    Map(MapInfo),
    Tuple(TupleInfo),
    Optional(OptionalInfo),
    Pointer(PointerInfo),
    Family(FamilyInfo),
    Delegating(DelegatingInfo),
    Singleton(SingletonInfo),
    Foreign(ForeignInfo),
    Struct(StructInfo),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $info:ident) => {
        #[inline]
        pub const fn $name(&self) -> Option<&$info> {
            match self {
                Self::$kind(info) => Some(info),
                _ => None,
            }
        }
    };
}

impl TypeInfo {
    impl_cast_method!(as_scalar: Scalar => ScalarInfo);
    impl_cast_method!(as_opaque: Opaque => OpaqueInfo);
    impl_cast_method!(as_enum: Enum => EnumInfo);
    impl_cast_method!(as_array: Array => ArrayInfo);
    impl_cast_method!(as_list: List => ListInfo);
    impl_cast_method!(as_set: Set => SetInfo);
    impl_cast_method!(as_map: Map => MapInfo);
    impl_cast_method!(as_tuple: Tuple => TupleInfo);
    impl_cast_method!(as_optional: Optional => OptionalInfo);
    impl_cast_method!(as_pointer: Pointer => PointerInfo);
    impl_cast_method!(as_family: Family => FamilyInfo);
    impl_cast_method!(as_delegating: Delegating => DelegatingInfo);
    impl_cast_method!(as_singleton: Singleton => SingletonInfo);
    impl_cast_method!(as_foreign: Foreign => ForeignInfo);
    impl_cast_method!(as_struct: Struct => StructInfo);

    pub const fn ty(&self) -> &Type {
        match self {
            Self::Scalar(info) => info.ty(),
            Self::Opaque(info) => info.ty(),
            Self::Enum(info) => info.ty(),
            Self::Array(info) => info.ty(),
            Self::List(info) => info.ty(),
            Self::Set(info) => info.ty(),
            Self::Map(info) => info.ty(),
            Self::Tuple(info) => info.ty(),
            Self::Optional(info) => info.ty(),
            Self::Pointer(info) => info.ty(),
            Self::Family(info) => info.ty(),
            Self::Delegating(info) => info.ty(),
            Self::Singleton(info) => info.ty(),
            Self::Foreign(info) => info.ty(),
            Self::Struct(info) => info.ty(),
        }
    }

    crate::info::impl_type_fn!();

    pub const fn kind(&self) -> TypeKind {
        match self {
            Self::Scalar(_) => TypeKind::Scalar,
            Self::Opaque(_) => TypeKind::Opaque,
            Self::Enum(_) => TypeKind::Enum,
            Self::Array(_) => TypeKind::Array,
            Self::List(_) => TypeKind::List,
            Self::Set(_) => TypeKind::Set,
            Self::Map(_) => TypeKind::Map,
            Self::Tuple(_) => TypeKind::Tuple,
            Self::Optional(_) => TypeKind::Optional,
            Self::Pointer(_) => TypeKind::Pointer,
            Self::Family(_) => TypeKind::Family,
            Self::Delegating(_) => TypeKind::Delegating,
            Self::Singleton(_) => TypeKind::Singleton,
            Self::Foreign(_) => TypeKind::Foreign,
            Self::Struct(_) => TypeKind::Struct,
        }
    }

    /// Declared type parameters; empty for scalars and singletons.
    pub fn generics(&self) -> &Generics {
        match self {
            Self::Opaque(info) => info.generics(),
            Self::Enum(info) => info.generics(),
            Self::Array(info) => info.generics(),
            Self::List(info) => info.generics(),
            Self::Set(info) => info.generics(),
            Self::Map(info) => info.generics(),
            Self::Tuple(info) => info.generics(),
            Self::Optional(info) => info.generics(),
            Self::Pointer(info) => info.generics(),
            Self::Family(info) => info.generics(),
            Self::Delegating(info) => info.generics(),
            Self::Foreign(info) => info.generics(),
            Self::Struct(info) => info.generics(),
            Self::Scalar(_) | Self::Singleton(_) => Generics::EMPTY,
        }
    }

    /// Annotations on the type itself; built-in containers have none.
    pub fn custom_attributes(&self) -> &CustomAttributes {
        match self {
            Self::Opaque(info) => info.custom_attributes(),
            Self::Enum(info) => info.custom_attributes(),
            Self::Family(info) => info.custom_attributes(),
            Self::Delegating(info) => info.custom_attributes(),
            Self::Singleton(info) => info.custom_attributes(),
            Self::Foreign(info) => info.custom_attributes(),
            Self::Struct(info) => info.custom_attributes(),
            _ => CustomAttributes::EMPTY,
        }
    }

    pub fn hooks(&self) -> &TypeHooks {
        match self {
            Self::Opaque(info) => info.hooks(),
            Self::Enum(info) => info.hooks(),
            Self::Family(info) => info.hooks(),
            Self::Delegating(info) => info.hooks(),
            Self::Singleton(info) => info.hooks(),
            Self::Foreign(info) => info.hooks(),
            Self::Struct(info) => info.hooks(),
            _ => TypeHooks::EMPTY,
        }
    }
}

// -----------------------------------------------------------------------------
// OpaqueInfo

/// A type with no structure the engine can use.
///
/// It is only convertible through a registered mapping or its own hooks.
#[derive(Clone, Debug)]
pub struct OpaqueInfo {
    ty: Type,
    generics: Generics,
    custom_attributes: Option<alloc::sync::Arc<CustomAttributes>>,
    hooks: TypeHooks,
}

impl OpaqueInfo {
    crate::info::impl_type_fn!(ty);
    crate::info::impl_generic_fn!(generics);
    crate::info::impl_custom_attributes_fn!(custom_attributes);

    #[inline]
    pub fn new<T: core::any::Any>() -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            custom_attributes: None,
            hooks: TypeHooks::new(),
        }
    }

    #[inline]
    pub fn with_hooks(mut self, hooks: TypeHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[inline]
    pub const fn hooks(&self) -> &TypeHooks {
        &self.hooks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::Typed;
    use alloc::string::ToString;

    #[test]
    fn kinds_of_builtins() {
        assert_eq!(u8::type_info().kind(), TypeKind::Scalar);
        assert_eq!(<[u8; 2]>::type_info().kind(), TypeKind::Array);
        assert_eq!(<(u8, bool)>::type_info().kind(), TypeKind::Tuple);
        assert_eq!(<Option<Option<u8>>>::type_info().kind(), TypeKind::Optional);
        assert_eq!(TypeKind::Family.to_string(), "Family");
    }

    #[test]
    fn containers_have_no_annotations() {
        let info = <Vec<u8>>::type_info();
        assert!(info.custom_attributes().is_empty());
        assert!(info.hooks().is_empty());
        assert_eq!(info.generics().len(), 1);
    }
}
