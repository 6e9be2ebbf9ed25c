//! Containers for static storage of type information.
//!
//! ## NonGenericTypeInfoCell
//!
//! For non generic types. Internally an [`OnceLock`], almost no additional expense.
//!
//! ## GenericTypeInfoCell
//!
//! For generic types the `static CELL` inside `type_info` is shared by every
//! instantiation, so the cell stores one [`TypeInfo`] per [`TypeId`] behind an
//! [`RwLock`].

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use crate::hash::TypeIdMap;
use crate::info::TypeInfo;

/// Static storage of a non-generic type's [`TypeInfo`].
pub struct NonGenericTypeInfoCell(OnceLock<TypeInfo>);

impl NonGenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns the stored info, initializing it with `f` on first access.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &TypeInfo
    where
        F: FnOnce() -> TypeInfo,
    {
        self.0.get_or_init(f)
    }
}

/// Static storage of a generic type's [`TypeInfo`], one entry per instantiation.
///
/// ```
/// use vc_json::info::{Typed, TypeInfo, GenericTypeInfoCell, OpaqueInfo};
///
/// struct Marker<T>(T);
///
/// impl<T: Typed> Typed for Marker<T> {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
///         CELL.get_or_insert::<Self>(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(Marker::<u8>::type_info().ty().is::<Marker<u8>>());
/// assert!(Marker::<u16>::type_info().ty().is::<Marker<u16>>());
/// ```
pub struct GenericTypeInfoCell(RwLock<TypeIdMap<&'static TypeInfo>>);

impl GenericTypeInfoCell {
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the info stored for `G`, generating it with `f` if absent.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    #[inline(never)]
    fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> TypeInfo) -> &TypeInfo {
        match self.get_by_type_id(type_id) {
            Some(info) => info,
            // The lock is not held while `f` runs: building an info may
            // query other instantiations stored in this same cell.
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: TypeInfo) -> &'static TypeInfo {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}
