use core::any::Any;

use crate::info::{TypeDescriptor, TypeInfo};

/// A type that can describe itself to the engine.
///
/// Usually derived with `#[derive(Typed)]`. Manual implementations store the
/// [`TypeInfo`] in a [`NonGenericTypeInfoCell`] or [`GenericTypeInfoCell`].
///
/// # Examples
///
/// ```
/// use vc_json::info::{Typed, TypeInfo, NonGenericTypeInfoCell, OpaqueInfo};
///
/// struct Token;
///
/// impl Typed for Token {
///     fn type_info() -> &'static TypeInfo {
///         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
///         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
///     }
/// }
///
/// assert!(Token::type_info().ty().is::<Token>());
/// ```
///
/// [`NonGenericTypeInfoCell`]: crate::info::NonGenericTypeInfoCell
/// [`GenericTypeInfoCell`]: crate::info::GenericTypeInfoCell
pub trait Typed: Any + Sized {
    /// The static introspection data of this type.
    fn type_info() -> &'static TypeInfo;

    /// The descriptor used to resolve this type.
    ///
    /// Only `Option` overrides the default.
    #[inline]
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::nominal::<Self>()
    }
}
