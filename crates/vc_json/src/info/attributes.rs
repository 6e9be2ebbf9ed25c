//! Annotations attached to types, fields and variants.
//!
//! [`CustomAttributes`] stores arbitrary values keyed by their type. Which
//! attribute types mean "rename", "ignore" and so on is decided by the
//! [`JsonConfig`](crate::JsonConfig), not here; the types below are the ones
//! every configuration recognizes out of the box.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::hash::TypeIdMap;

// -----------------------------------------------------------------------------
// CustomAttributes

/// A set of annotation values, at most one per type.
///
/// # Examples
///
/// ```
/// use vc_json::info::{CustomAttributes, Rename};
///
/// let attrs = CustomAttributes::new().with_attribute(Rename::new("id"));
/// assert_eq!(attrs.get::<Rename>().unwrap().name(), "id");
/// ```
#[derive(Default)]
pub struct CustomAttributes {
    attributes: TypeIdMap<Box<dyn Any + Send + Sync>>,
}

impl CustomAttributes {
    pub(crate) const EMPTY: &'static Self = &Self::new();

    #[inline]
    pub const fn new() -> Self {
        Self {
            attributes: TypeIdMap::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            attributes: TypeIdMap::with_capacity(capacity),
        }
    }

    /// Adds an attribute, replacing one of the same type.
    #[inline]
    pub fn with_attribute<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.attributes.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    #[inline]
    pub fn contains<T: Any>(&self) -> bool {
        self.attributes.contains(&TypeId::of::<T>())
    }

    #[inline]
    pub fn contains_by_id(&self, id: TypeId) -> bool {
        self.attributes.contains(&id)
    }

    #[inline]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.get_by_id(TypeId::of::<T>())?.downcast_ref()
    }

    #[inline]
    pub fn get_by_id(&self, id: TypeId) -> Option<&dyn Any> {
        self.attributes.get(&id).map(|value| &**value as &dyn Any)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl core::fmt::Debug for CustomAttributes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.attributes.iter().map(|(id, _)| id)).finish()
    }
}

// -----------------------------------------------------------------------------
// Built-in annotations

/// Use another name on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rename(Cow<'static, str>);

impl Rename {
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Never read or write this field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ignore;

/// Write this field even when it is `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncludeNull;

/// Write every field of this type, including `None` ones.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IncludeAll;

/// Accept and skip unknown properties when decoding this type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllowExtra;

// -----------------------------------------------------------------------------
// Auxiliary macro

macro_rules! impl_custom_attributes_fn {
    ($field:ident) => {
        #[inline]
        pub fn custom_attributes(&self) -> &$crate::info::CustomAttributes {
            match &self.$field {
                Some(ptr) => &**ptr,
                None => $crate::info::CustomAttributes::EMPTY,
            }
        }

        #[inline]
        pub fn with_custom_attributes(self, attributes: $crate::info::CustomAttributes) -> Self {
            Self {
                $field: if attributes.is_empty() {
                    None
                } else {
                    Some(::alloc::sync::Arc::new(attributes))
                },
                ..self
            }
        }

        #[inline]
        pub fn get_attribute<T: ::core::any::Any>(&self) -> Option<&T> {
            self.custom_attributes().get::<T>()
        }

        #[inline]
        pub fn has_attribute<T: ::core::any::Any>(&self) -> bool {
            self.custom_attributes().contains::<T>()
        }
    };
}

pub(crate) use impl_custom_attributes_fn;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_value_per_type() {
        let attrs = CustomAttributes::new()
            .with_attribute(Rename::new("a"))
            .with_attribute(Ignore)
            .with_attribute(Rename::new("b"));
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get::<Rename>().map(Rename::name), Some("b"));
        assert!(attrs.contains::<Ignore>());
        assert!(!attrs.contains::<AllowExtra>());
        assert!(CustomAttributes::EMPTY.is_empty());
    }
}
