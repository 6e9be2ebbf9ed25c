//! Built-in generic containers: arrays, lists, sets, maps, tuples, options
//! and smart pointers.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;

use crate::error::JsonError;
use crate::info::{BuildError, BuildFn, DefaultFn, Generics, ItemsFn, Type, TypeRef, Typed, WrapFn};
use crate::info::{impl_generic_fn, impl_type_fn};
use crate::value::JsonValue;

/// Why collecting decoded elements failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// The element at this position equals an earlier one.
    Duplicate(usize),
    /// An element had an unexpected runtime type.
    Invalid(BuildError),
}

/// Collects decoded elements into a container.
pub type CollectFn = fn(Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, CollectError>;

/// Collects decoded key/value pairs into a map.
pub type CollectEntriesFn = fn(Vec<(Box<dyn Any>, Box<dyn Any>)>) -> Result<Box<dyn Any>, CollectError>;

/// Borrows the entries of a map.
pub type EntriesFn = for<'a> fn(&'a dyn Any) -> Option<Vec<(&'a dyn Any, &'a dyn Any)>>;

/// Borrows the content of an option: `None` on type mismatch, `Some(None)` for an empty option.
pub type OptionGetFn = for<'a> fn(&'a dyn Any) -> Option<Option<&'a dyn Any>>;

/// Runs a closure on the pointee; `None` if it cannot be accessed.
pub type VisitFn = fn(
    &dyn Any,
    &mut dyn FnMut(&dyn Any) -> Result<JsonValue, JsonError>,
) -> Option<Result<JsonValue, JsonError>>;

// -----------------------------------------------------------------------------
// ArrayInfo

/// A fixed-size array `[T; N]`.
#[derive(Clone, Debug)]
pub struct ArrayInfo {
    ty: Type,
    generics: Generics,
    item: TypeRef,
    len: usize,
    build: BuildFn,
    items: ItemsFn,
}

impl ArrayInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);

    #[inline]
    pub fn new<T: Any>(item: TypeRef, len: usize, build: BuildFn, items: ItemsFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            item,
            len,
            build,
            items,
        }
    }

    #[inline]
    pub const fn item(&self) -> TypeRef {
        self.item
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn build_fn(&self) -> BuildFn {
        self.build
    }

    #[inline]
    pub const fn items_fn(&self) -> ItemsFn {
        self.items
    }
}

// -----------------------------------------------------------------------------
// ListInfo

/// An ordered sequence (`Vec`, `VecDeque`, `LinkedList`, `Box<[T]>`).
#[derive(Clone, Debug)]
pub struct ListInfo {
    ty: Type,
    generics: Generics,
    item: TypeRef,
    build: BuildFn,
    items: ItemsFn,
}

impl ListInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);

    #[inline]
    pub fn new<T: Any>(item: TypeRef, build: BuildFn, items: ItemsFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            item,
            build,
            items,
        }
    }

    #[inline]
    pub const fn item(&self) -> TypeRef {
        self.item
    }

    #[inline]
    pub const fn build_fn(&self) -> BuildFn {
        self.build
    }

    #[inline]
    pub const fn items_fn(&self) -> ItemsFn {
        self.items
    }
}

// -----------------------------------------------------------------------------
// SetInfo

/// A set; collecting rejects duplicate elements.
#[derive(Clone, Debug)]
pub struct SetInfo {
    ty: Type,
    generics: Generics,
    item: TypeRef,
    ordered: bool,
    collect: CollectFn,
    items: ItemsFn,
}

impl SetInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);

    #[inline]
    pub fn new<T: Any>(item: TypeRef, ordered: bool, collect: CollectFn, items: ItemsFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            item,
            ordered,
            collect,
            items,
        }
    }

    #[inline]
    pub const fn item(&self) -> TypeRef {
        self.item
    }

    /// `true` for sorted or insertion-ordered sets.
    #[inline]
    pub const fn is_ordered(&self) -> bool {
        self.ordered
    }

    #[inline]
    pub const fn collect_fn(&self) -> CollectFn {
        self.collect
    }

    #[inline]
    pub const fn items_fn(&self) -> ItemsFn {
        self.items
    }
}

// -----------------------------------------------------------------------------
// MapInfo

/// A key/value map, encoded as a JSON object.
#[derive(Clone, Debug)]
pub struct MapInfo {
    ty: Type,
    generics: Generics,
    key: TypeRef,
    value: TypeRef,
    ordered: bool,
    collect: CollectEntriesFn,
    entries: EntriesFn,
}

impl MapInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);

    #[inline]
    pub fn new<T: Any>(
        key: TypeRef,
        value: TypeRef,
        ordered: bool,
        collect: CollectEntriesFn,
        entries: EntriesFn,
    ) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            key,
            value,
            ordered,
            collect,
            entries,
        }
    }

    #[inline]
    pub const fn key(&self) -> TypeRef {
        self.key
    }

    #[inline]
    pub const fn value(&self) -> TypeRef {
        self.value
    }

    #[inline]
    pub const fn is_ordered(&self) -> bool {
        self.ordered
    }

    #[inline]
    pub const fn collect_fn(&self) -> CollectEntriesFn {
        self.collect
    }

    #[inline]
    pub const fn entries_fn(&self) -> EntriesFn {
        self.entries
    }
}

// -----------------------------------------------------------------------------
// TupleInfo

/// A pair or triple.
#[derive(Clone, Debug)]
pub struct TupleInfo {
    ty: Type,
    generics: Generics,
    items: Box<[TypeRef]>,
    build: BuildFn,
    get: ItemsFn,
}

impl TupleInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);

    #[inline]
    pub fn new<T: Any>(items: &[TypeRef], build: BuildFn, get: ItemsFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            items: items.into(),
            build,
            get,
        }
    }

    #[inline]
    pub fn items(&self) -> &[TypeRef] {
        &self.items
    }

    #[inline]
    pub const fn build_fn(&self) -> BuildFn {
        self.build
    }

    #[inline]
    pub const fn get_fn(&self) -> ItemsFn {
        self.get
    }
}

// -----------------------------------------------------------------------------
// OptionalInfo

/// `Option<T>`.
///
/// Used directly only when `T` is itself nullable (`Option<Option<U>>`);
/// otherwise the option is folded into the descriptor's nullable flag and
/// this info supplies the `Some`/`None` plumbing.
#[derive(Clone, Debug)]
pub struct OptionalInfo {
    ty: Type,
    generics: Generics,
    inner: TypeRef,
    some: WrapFn,
    none: DefaultFn,
    get: OptionGetFn,
}

impl OptionalInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);

    #[inline]
    pub fn new<T: Any>(inner: TypeRef, some: WrapFn, none: DefaultFn, get: OptionGetFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            inner,
            some,
            none,
            get,
        }
    }

    #[inline]
    pub const fn inner(&self) -> TypeRef {
        self.inner
    }

    #[inline]
    pub fn wrap_some(&self, value: Box<dyn Any>) -> Result<Box<dyn Any>, BuildError> {
        (self.some)(value)
    }

    #[inline]
    pub fn none(&self) -> Box<dyn Any> {
        (self.none)()
    }

    #[inline]
    pub fn get<'a>(&self, value: &'a dyn Any) -> Option<Option<&'a dyn Any>> {
        (self.get)(value)
    }
}

// -----------------------------------------------------------------------------
// PointerInfo

/// A transparent owner of one value: `Box`, `Rc`, `Arc`, `RefCell`.
#[derive(Clone, Debug)]
pub struct PointerInfo {
    ty: Type,
    generics: Generics,
    inner: TypeRef,
    wrap: WrapFn,
    visit: VisitFn,
}

impl PointerInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);

    #[inline]
    pub fn new<T: Typed>(inner: TypeRef, wrap: WrapFn, visit: VisitFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            inner,
            wrap,
            visit,
        }
    }

    #[inline]
    pub const fn inner(&self) -> TypeRef {
        self.inner
    }

    #[inline]
    pub const fn wrap_fn(&self) -> WrapFn {
        self.wrap
    }

    #[inline]
    pub const fn visit_fn(&self) -> VisitFn {
        self.visit
    }
}
