use alloc::vec::Vec;

use crate::info::{TypeDescriptor, Typed, Variance};

// -----------------------------------------------------------------------------
// TypeParamInfo

/// A declared type parameter: its name, the argument it is instantiated with,
/// and an optional upper bound used when a descriptor leaves it unbound.
#[derive(Clone, Debug)]
pub struct TypeParamInfo {
    name: &'static str,
    ty: fn() -> TypeDescriptor,
    bound: Option<fn() -> TypeDescriptor>,
    variance: Variance,
}

impl TypeParamInfo {
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            ty: T::descriptor,
            bound: None,
            variance: Variance::Invariant,
        }
    }

    #[inline]
    pub fn with_bound<B: Typed>(mut self) -> Self {
        self.bound = Some(B::descriptor);
        self
    }

    #[inline]
    pub const fn with_variance(mut self, variance: Variance) -> Self {
        self.variance = variance;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The argument this parameter is instantiated with.
    #[inline]
    pub fn descriptor(&self) -> TypeDescriptor {
        (self.ty)()
    }

    #[inline]
    pub fn bound(&self) -> Option<TypeDescriptor> {
        self.bound.map(|f| f())
    }

    #[inline]
    pub const fn variance(&self) -> Variance {
        self.variance
    }
}

// -----------------------------------------------------------------------------
// Generics

/// The ordered type parameters of a type.
#[derive(Clone, Debug, Default)]
pub struct Generics(Vec<TypeParamInfo>);

impl Generics {
    pub(crate) const EMPTY: &'static Self = &Self::new();

    #[inline]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Appends a parameter.
    pub fn with(mut self, param: TypeParamInfo) -> Self {
        self.0.push(param);
        self
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&TypeParamInfo> {
        self.0.get(index)
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|param| param.name == name)
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, TypeParamInfo> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// -----------------------------------------------------------------------------
// Auxiliary macro

macro_rules! impl_generic_fn {
    ($field:ident) => {
        #[inline]
        pub fn generics(&self) -> &$crate::info::Generics {
            &self.$field
        }

        #[inline]
        pub fn with_generics(mut self, generics: $crate::info::Generics) -> Self {
            self.$field = generics;
            self
        }
    };
}

pub(crate) use impl_generic_fn;
