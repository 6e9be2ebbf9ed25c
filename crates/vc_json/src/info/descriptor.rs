//! Type descriptors: the resolution and cache key of the engine.

use alloc::boxed::Box;
use alloc::format;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

use crate::error::JsonError;
use crate::info::{Type, TypeInfo, Typed};

// -----------------------------------------------------------------------------
// Variance

/// Declared variance of a generic argument.
///
/// Carried for identity only; resolution never widens or narrows by it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

// -----------------------------------------------------------------------------
// TypeArg

/// One generic argument of a descriptor. `ty == None` is an unbound (`*`) argument.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct TypeArg {
    ty: Option<TypeDescriptor>,
    variance: Variance,
}

impl TypeArg {
    #[inline]
    pub const fn new(ty: TypeDescriptor, variance: Variance) -> Self {
        Self {
            ty: Some(ty),
            variance,
        }
    }

    /// An argument with no type.
    #[inline]
    pub const fn star() -> Self {
        Self {
            ty: None,
            variance: Variance::Invariant,
        }
    }

    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self::new(T::descriptor(), Variance::Invariant)
    }

    #[inline]
    pub const fn ty(&self) -> Option<&TypeDescriptor> {
        self.ty.as_ref()
    }

    #[inline]
    pub const fn variance(&self) -> Variance {
        self.variance
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

struct Inner {
    ty: Type,
    args: Box<[TypeArg]>,
    nullable: bool,
    info: fn() -> &'static TypeInfo,
    optional: Option<fn() -> &'static TypeInfo>,
}

/// A normalized, possibly generic, possibly nullable type.
///
/// Two descriptors are equal when their nominal type, their nullability and
/// all of their arguments (recursively) are equal. `Option<T>` is not a type
/// of its own here: it is `T` with the nullable flag set, unless `T` is itself
/// nullable, in which case the option stays a nominal wrapper.
///
/// Cloning is cheap.
///
/// # Examples
///
/// ```
/// use vc_json::TypeDescriptor;
///
/// let plain = TypeDescriptor::of::<Vec<i32>>();
/// let nullable = TypeDescriptor::of::<Option<Vec<i32>>>();
///
/// assert!(nullable.is_nullable());
/// assert_ne!(plain, nullable);
/// assert_eq!(plain, nullable.non_null());
/// assert_eq!(nullable.to_string(), "Vec<i32>?");
/// ```
#[derive(Clone)]
pub struct TypeDescriptor(Arc<Inner>);

impl TypeDescriptor {
    /// The descriptor `T` reports for itself.
    #[inline]
    pub fn of<T: Typed>() -> Self {
        T::descriptor()
    }

    /// `T` with the arguments listed by its [`Generics`](crate::info::Generics),
    /// ignoring any nullability rule of `T`.
    pub fn nominal<T: Typed>() -> Self {
        let args = T::type_info()
            .generics()
            .iter()
            .map(|param| TypeArg::new(param.descriptor(), param.variance()))
            .collect();
        Self(Arc::new(Inner {
            ty: Type::of::<T>(),
            args,
            nullable: false,
            info: T::type_info,
            optional: None,
        }))
    }

    /// The nullable form of this descriptor; `optional` describes `Option<Self>`.
    ///
    /// Returns `self` unchanged if it is already nullable.
    pub fn into_nullable(self, optional: fn() -> &'static TypeInfo) -> Self {
        if self.0.nullable {
            return self;
        }
        Self(Arc::new(Inner {
            ty: self.0.ty,
            args: self.0.args.clone(),
            nullable: true,
            info: self.0.info,
            optional: Some(optional),
        }))
    }

    /// The same type without the nullable flag.
    pub fn non_null(&self) -> Self {
        if !self.0.nullable {
            return self.clone();
        }
        Self(Arc::new(Inner {
            ty: self.0.ty,
            args: self.0.args.clone(),
            nullable: false,
            info: self.0.info,
            optional: None,
        }))
    }

    /// The same type with its arguments replaced.
    pub fn with_args(&self, args: impl IntoIterator<Item = TypeArg>) -> Self {
        Self(Arc::new(Inner {
            ty: self.0.ty,
            args: args.into_iter().collect(),
            nullable: self.0.nullable,
            info: self.0.info,
            optional: self.0.optional,
        }))
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.0.ty
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.0.ty.id()
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.0.ty.path()
    }

    #[inline]
    pub fn is_nullable(&self) -> bool {
        self.0.nullable
    }

    #[inline]
    pub fn args(&self) -> &[TypeArg] {
        &self.0.args
    }

    /// The bound argument at `index`, if any.
    #[inline]
    pub fn arg(&self, index: usize) -> Option<&TypeDescriptor> {
        self.0.args.get(index)?.ty()
    }

    /// Introspection data of the (non-null) type.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.0.info)()
    }

    /// Introspection data of the `Option` wrapping this type, for nullable descriptors.
    #[inline]
    pub fn optional_info(&self) -> Option<&'static TypeInfo> {
        self.0.optional.map(|f| f())
    }

    /// `true` if no argument, at any depth, is unbound.
    pub fn is_fully_bound(&self) -> bool {
        self.0
            .args
            .iter()
            .all(|arg| arg.ty().is_some_and(TypeDescriptor::is_fully_bound))
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
            || (self.0.ty == other.0.ty
                && self.0.nullable == other.0.nullable
                && self.0.args == other.0.args)
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.ty.hash(state);
        self.0.nullable.hash(state);
        self.0.args.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_fully_bound() {
            f.write_str(&self.0.ty.short_name())?;
        } else {
            f.write_str(self.0.ty.ident())?;
            f.write_str("<")?;
            for (index, arg) in self.0.args.iter().enumerate() {
                if index > 0 {
                    f.write_str(", ")?;
                }
                match arg.ty() {
                    Some(ty) => write!(f, "{ty}")?,
                    None => f.write_str("*")?,
                }
            }
            f.write_str(">")?;
        }
        if self.0.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TypeDescriptor {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDescriptor({self})")
    }
}

// -----------------------------------------------------------------------------
// TypeRef

/// A type as written inside another type's declaration.
///
/// `Param(i)` refers to the declaring type's `i`-th type parameter and is
/// substituted against the enclosing descriptor at resolution time.
#[derive(Clone, Copy, Debug)]
pub enum TypeRef {
    Concrete(fn() -> TypeDescriptor),
    Param(usize),
}

impl TypeRef {
    #[inline]
    pub fn of<T: Typed>() -> Self {
        Self::Concrete(T::descriptor)
    }

    #[inline]
    pub const fn param(index: usize) -> Self {
        Self::Param(index)
    }

    /// Resolves against `owner`: its argument at the parameter's position,
    /// else the parameter's declared bound.
    ///
    /// Fails with "insufficient type information" when neither exists.
    pub fn resolve(&self, owner: &TypeDescriptor) -> Result<TypeDescriptor, JsonError> {
        let index = match self {
            Self::Concrete(f) => return Ok(f()),
            Self::Param(index) => *index,
        };
        if let Some(arg) = owner.arg(index) {
            return Ok(arg.clone());
        }
        let generics = owner.type_info().generics();
        let Some(param) = generics.get(index) else {
            return Err(JsonError::unresolvable(
                format!("{owner}"),
                format!("insufficient type information: `{owner}` has no type parameter #{index}"),
            ));
        };
        param.bound().ok_or_else(|| {
            JsonError::unresolvable(
                format!("{owner}"),
                format!(
                    "insufficient type information: type parameter `{}` is unbound and has no bound",
                    param.name()
                ),
            )
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use alloc::vec;

    #[test]
    fn equality_covers_nullability_and_args() {
        let a = TypeDescriptor::of::<Vec<i32>>();
        let b = TypeDescriptor::of::<Vec<i64>>();
        assert_ne!(a, b);
        assert_eq!(a, TypeDescriptor::of::<Vec<i32>>());
        assert_ne!(a, TypeDescriptor::of::<Option<Vec<i32>>>());
    }

    #[test]
    fn nested_option_keeps_a_wrapper() {
        let once = TypeDescriptor::of::<Option<u8>>();
        let twice = TypeDescriptor::of::<Option<Option<u8>>>();
        assert!(once.is_nullable());
        assert!(!twice.is_nullable());
        assert!(twice.ty().is::<Option<Option<u8>>>());
        assert_eq!(twice.arg(0), Some(&once));
    }

    #[test]
    fn display() {
        assert_eq!(TypeDescriptor::of::<BTreeMap<String, u8>>().to_string(), "BTreeMap<String, u8>");
        let star = TypeDescriptor::of::<Vec<u8>>().with_args([TypeArg::star()]);
        assert_eq!(star.to_string(), "Vec<*>");
        assert!(!star.is_fully_bound());
    }

    #[test]
    fn substitution_uses_argument_then_fails_without_bound() {
        let owner = TypeDescriptor::of::<Vec<String>>();
        let item = TypeRef::param(0).resolve(&owner).unwrap();
        assert_eq!(item, TypeDescriptor::of::<String>());

        let star = owner.with_args(vec![TypeArg::star()]);
        let err = TypeRef::param(0).resolve(&star).unwrap_err();
        match err.kind() {
            ErrorKind::UnresolvableType { reason, .. } => {
                assert!(reason.contains("insufficient type information"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("Vec<*>"));
    }
}
