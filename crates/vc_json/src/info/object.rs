//! Record-like types: structs, delegating wrappers, singletons and foreign types.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::Any;

use crate::info::{BuildError, BuildFn, CustomAttributes, DefaultFn, Generics, Getter, Setter};
use crate::info::{Type, TypeHooks, TypeRef, WrapFn};
use crate::info::{impl_custom_attributes_fn, impl_generic_fn, impl_type_fn};

// -----------------------------------------------------------------------------
// FieldInfo

/// A declared, readable property.
///
/// `set` is present for properties that may be assigned after construction.
#[derive(Clone, Debug)]
pub struct FieldInfo {
    name: &'static str,
    ty: TypeRef,
    custom_attributes: Option<Arc<CustomAttributes>>,
    get: Getter,
    set: Option<Setter>,
}

impl FieldInfo {
    impl_custom_attributes_fn!(custom_attributes);

    #[inline]
    pub const fn new(name: &'static str, ty: TypeRef, get: Getter) -> Self {
        Self {
            name,
            ty,
            custom_attributes: None,
            get,
            set: None,
        }
    }

    #[inline]
    pub const fn with_setter(mut self, set: Setter) -> Self {
        self.set = Some(set);
        self
    }

    /// The declared name, before any rename.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub fn get<'a>(&self, owner: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.get)(owner)
    }

    #[inline]
    pub const fn getter(&self) -> Getter {
        self.get
    }

    #[inline]
    pub const fn setter(&self) -> Option<Setter> {
        self.set
    }
}

// -----------------------------------------------------------------------------
// ConstructorInfo

/// One parameter of a [`ConstructorInfo`].
///
/// The name matches a field's declared name when the parameter initializes
/// that field, so the field's rename applies to it.
#[derive(Clone, Debug)]
pub struct ParamInfo {
    name: &'static str,
    ty: TypeRef,
    default: Option<DefaultFn>,
}

impl ParamInfo {
    #[inline]
    pub const fn new(name: &'static str, ty: TypeRef) -> Self {
        Self {
            name,
            ty,
            default: None,
        }
    }

    /// The value used when the property is absent.
    #[inline]
    pub const fn with_default(mut self, default: DefaultFn) -> Self {
        self.default = Some(default);
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn ty(&self) -> TypeRef {
        self.ty
    }

    #[inline]
    pub const fn default_fn(&self) -> Option<DefaultFn> {
        self.default
    }
}

/// A public constructor: an ordered parameter list and the function
/// that receives the decoded arguments in that order.
#[derive(Clone, Debug)]
pub struct ConstructorInfo {
    params: Box<[ParamInfo]>,
    build: BuildFn,
}

impl ConstructorInfo {
    #[inline]
    pub fn new(params: &[ParamInfo], build: BuildFn) -> Self {
        Self {
            params: params.into(),
            build,
        }
    }

    #[inline]
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    #[inline]
    pub fn build(&self, args: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, BuildError> {
        (self.build)(args)
    }

    #[inline]
    pub const fn build_fn(&self) -> BuildFn {
        self.build
    }
}

// -----------------------------------------------------------------------------
// StructInfo

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructKind {
    /// `struct A { x: T }`
    Named,
    /// `struct A(T, U)`; fields are named `"0"`, `"1"`, ...
    Tuple,
}

/// A user-declared record.
///
/// A tuple struct with exactly one field is transparent: it is written as
/// its field and read through its single-argument constructor.
#[derive(Clone, Debug)]
pub struct StructInfo {
    ty: Type,
    generics: Generics,
    kind: StructKind,
    custom_attributes: Option<Arc<CustomAttributes>>,
    hooks: TypeHooks,
    fields: Box<[FieldInfo]>,
    constructors: Box<[ConstructorInfo]>,
}

impl StructInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);
    impl_custom_attributes_fn!(custom_attributes);

    pub fn new<T: Any>(kind: StructKind, fields: &[FieldInfo]) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            kind,
            custom_attributes: None,
            hooks: TypeHooks::new(),
            fields: fields.into(),
            constructors: Box::new([]),
        }
    }

    /// Appends a constructor; declaration order is the order tried.
    pub fn with_constructor(mut self, constructor: ConstructorInfo) -> Self {
        let mut constructors = Vec::from(self.constructors);
        constructors.push(constructor);
        self.constructors = constructors.into_boxed_slice();
        self
    }

    #[inline]
    pub fn with_hooks(mut self, hooks: TypeHooks) -> Self {
        self.hooks = hooks;
        self
    }

    #[inline]
    pub const fn kind(&self) -> StructKind {
        self.kind
    }

    #[inline]
    pub const fn hooks(&self) -> &TypeHooks {
        &self.hooks
    }

    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[inline]
    pub fn constructors(&self) -> &[ConstructorInfo] {
        &self.constructors
    }

    #[inline]
    pub fn is_transparent(&self) -> bool {
        self.kind == StructKind::Tuple && self.fields.len() == 1
    }
}

// -----------------------------------------------------------------------------
// DelegatingInfo

/// A type that wraps a map and exposes it as its own content.
#[derive(Clone, Debug)]
pub struct DelegatingInfo {
    ty: Type,
    generics: Generics,
    custom_attributes: Option<Arc<CustomAttributes>>,
    hooks: TypeHooks,
    target: TypeRef,
    wrap: WrapFn,
    unwrap: Getter,
}

impl DelegatingInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);
    impl_custom_attributes_fn!(custom_attributes);

    #[inline]
    pub fn new<T: Any>(target: TypeRef, wrap: WrapFn, unwrap: Getter) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            custom_attributes: None,
            hooks: TypeHooks::new(),
            target,
            wrap,
            unwrap,
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

    /// The wrapped map type.
    #[inline]
    pub const fn target(&self) -> TypeRef {
        self.target
    }

    #[inline]
    pub const fn wrap_fn(&self) -> WrapFn {
        self.wrap
    }

    #[inline]
    pub const fn unwrap_fn(&self) -> Getter {
        self.unwrap
    }
}

// -----------------------------------------------------------------------------
// SingletonInfo

/// A type with exactly one value, such as a unit struct.
#[derive(Clone, Debug)]
pub struct SingletonInfo {
    ty: Type,
    custom_attributes: Option<Arc<CustomAttributes>>,
    hooks: TypeHooks,
    instance: DefaultFn,
}

impl SingletonInfo {
    impl_type_fn!(ty);
    impl_custom_attributes_fn!(custom_attributes);

    #[inline]
    pub fn new<T: Any>(instance: DefaultFn) -> Self {
        Self {
            ty: Type::of::<T>(),
            custom_attributes: None,
            hooks: TypeHooks::new(),
            instance,
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
    pub fn instance(&self) -> Box<dyn Any> {
        (self.instance)()
    }
}

// -----------------------------------------------------------------------------
// ForeignInfo

/// How a [`ForeignInfo`] type is built.
#[derive(Clone, Debug)]
pub enum ForeignConstruction {
    /// A no-argument constructor followed by one setter per present property.
    Setters(DefaultFn),
    /// A single-argument constructor around a primitive value.
    Wrapper {
        param: TypeRef,
        build: WrapFn,
        unwrap: Getter,
    },
    /// A constructor with named parameters.
    Constructor(ConstructorInfo),
}

/// A hand-described type from outside the derive model, typically a
/// third-party type that cannot implement the derive itself.
///
/// # Examples
///
/// ```
/// use vc_json::info::{FieldInfo, ForeignConstruction, ForeignInfo, TypeInfo, TypeRef};
/// use vc_json::info::{NonGenericTypeInfoCell, Typed};
/// use vc_json::__macro_exports::{downcast_mut, downcast_ref, unbox};
///
/// #[derive(Default)]
/// struct Settings { depth: u8 }
///
/// impl Typed for Settings {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| {
///             let depth = FieldInfo::new("depth", TypeRef::of::<u8>(), |v| {
///                 downcast_ref::<Settings>(v).map(|s| &s.depth as &dyn core::any::Any)
///             })
///             .with_setter(|v, arg| {
///                 let settings = downcast_mut::<Settings>(v)?;
///                 settings.depth = unbox(arg)?;
///                 Ok(())
///             });
///             TypeInfo::Foreign(ForeignInfo::new::<Self>(
///                 &[depth],
///                 ForeignConstruction::Setters(|| Box::new(Settings::default())),
///             ))
///         })
///     }
/// }
///
/// use vc_json::{Json, JsonObject, JsonValue};
///
/// let input = JsonObject::from_entries([("depth".to_owned(), JsonValue::Int(3))]).unwrap();
/// let value: Settings = Json::default().decode(&JsonValue::Object(input)).unwrap();
/// assert_eq!(value.depth, 3);
/// ```
#[derive(Clone, Debug)]
pub struct ForeignInfo {
    ty: Type,
    generics: Generics,
    custom_attributes: Option<Arc<CustomAttributes>>,
    hooks: TypeHooks,
    properties: Box<[FieldInfo]>,
    construction: ForeignConstruction,
}

impl ForeignInfo {
    impl_type_fn!(ty);
    impl_generic_fn!(generics);
    impl_custom_attributes_fn!(custom_attributes);

    pub fn new<T: Any>(properties: &[FieldInfo], construction: ForeignConstruction) -> Self {
        Self {
            ty: Type::of::<T>(),
            generics: Generics::new(),
            custom_attributes: None,
            hooks: TypeHooks::new(),
            properties: properties.into(),
            construction,
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
    pub fn properties(&self) -> &[FieldInfo] {
        &self.properties
    }

    #[inline]
    pub const fn construction(&self) -> &ForeignConstruction {
        &self.construction
    }
}
