use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::Any;

use crate::info::{CustomAttributes, Generics, Type, TypeHooks, TypeRef, WrapFn};
use crate::info::{impl_custom_attributes_fn, impl_generic_fn, impl_type_fn};

// -----------------------------------------------------------------------------
// EnumInfo

/// A variant of a field-less enum.
#[derive(Clone, Debug)]
pub struct UnitVariant {
    name: &'static str,
    custom_attributes: Option<Arc<CustomAttributes>>,
}

impl UnitVariant {
    impl_custom_attributes_fn!(custom_attributes);

    #[inline]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            custom_attributes: None,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// An enumeration whose variants carry no data, written as the variant name.
#[derive(Clone, Debug)]
pub struct EnumInfo {
    ty: Type,
    generics: Generics,
    custom_attributes: Option<Arc<CustomAttributes>>,
    hooks: TypeHooks,
    variants: Box<[UnitVariant]>,
    from_index: fn(usize) -> Option<Box<dyn Any>>,
    index_of: fn(&dyn Any) -> Option<usize>,
}

impl EnumInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);
    impl_custom_attributes_fn!(custom_attributes);

    pub fn new<T: Any>(
        variants: &[UnitVariant],
        from_index: fn(usize) -> Option<Box<dyn Any>>,
        index_of: fn(&dyn Any) -> Option<usize>,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            custom_attributes: None,
            hooks: TypeHooks::new(),
            variants: variants.into(),
            from_index,
            index_of,
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

    #[inline]
    pub fn variants(&self) -> &[UnitVariant] {
        &self.variants
    }

    /// The value of the variant at `index`.
    #[inline]
    pub fn instantiate(&self, index: usize) -> Option<Box<dyn Any>> {
        (self.from_index)(index)
    }

    /// The variant index of `value`, `None` if it is not of this type.
    #[inline]
    pub fn index_of(&self, value: &dyn Any) -> Option<usize> {
        (self.index_of)(value)
    }
}

// -----------------------------------------------------------------------------
// FamilyInfo

/// Splits a family value into its variant index and payload.
pub type SplitFn = for<'a> fn(&'a dyn Any) -> Option<(usize, &'a dyn Any)>;

/// One member of a closed polymorphic family.
#[derive(Clone, Debug)]
pub struct FamilyVariant {
    name: &'static str,
    custom_attributes: Option<Arc<CustomAttributes>>,
    payload: TypeRef,
    wrap: WrapFn,
}

impl FamilyVariant {
    impl_custom_attributes_fn!(custom_attributes);

    #[inline]
    pub const fn new(name: &'static str, payload: TypeRef, wrap: WrapFn) -> Self {
        Self {
            name,
            custom_attributes: None,
            payload,
            wrap,
        }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The concrete type carried by this member.
    #[inline]
    pub const fn payload(&self) -> TypeRef {
        self.payload
    }

    #[inline]
    pub const fn wrap_fn(&self) -> WrapFn {
        self.wrap
    }
}

/// A type with a fixed, known set of members, each carrying one payload.
///
/// Derived from enums whose variants all hold exactly one unnamed field.
/// The JSON form is the payload's object with a discriminator property
/// naming the member.
#[derive(Clone, Debug)]
pub struct FamilyInfo {
    ty: Type,
    generics: Generics,
    custom_attributes: Option<Arc<CustomAttributes>>,
    hooks: TypeHooks,
    variants: Box<[FamilyVariant]>,
    split: SplitFn,
}

impl FamilyInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);
    impl_custom_attributes_fn!(custom_attributes);

    pub fn new<T: Any>(variants: &[FamilyVariant], split: SplitFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            custom_attributes: None,
            hooks: TypeHooks::new(),
            variants: variants.into(),
            split,
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

    #[inline]
    pub fn variants(&self) -> &[FamilyVariant] {
        &self.variants
    }

    #[inline]
    pub fn split<'a>(&self, value: &'a dyn Any) -> Option<(usize, &'a dyn Any)> {
        (self.split)(value)
    }
}
