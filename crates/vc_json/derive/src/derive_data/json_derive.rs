use syn::{Data, DeriveInput, Fields};

use super::{JsonEnum, JsonMeta, JsonStruct, TypeAttributes};

/// The shape a derived type takes.
pub(crate) enum JsonDerive<'a> {
    /// A struct with fields; `Struct`, or `Delegating` with `delegate`.
    Struct(JsonStruct<'a>),
    /// A struct without fields.
    Singleton(JsonMeta<'a>),
    /// A unit-only enum.
    Enum(JsonEnum<'a>),
    /// An enum of single-field variants.
    Family(JsonEnum<'a>),
    /// `#[json(opaque)]`
    Opaque(JsonMeta<'a>),
}

impl<'a> JsonDerive<'a> {
    pub fn from_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;
        let opaque = attrs.opaque.is_some();
        let meta = JsonMeta::new(ast, attrs)?;

        if opaque {
            return Ok(Self::Opaque(meta));
        }

        match &ast.data {
            Data::Struct(data) => {
                if let Some(span) = meta.attrs().delegate
                    && matches!(data.fields, Fields::Unit)
                {
                    return Err(syn::Error::new(span, "`delegate` requires exactly one field"));
                }
                if data.fields.is_empty() {
                    if let Some(ctor) = meta.attrs().constructors.first() {
                        return Err(syn::Error::new_spanned(
                            &ctor.path,
                            "a struct without fields has no constructor parameters",
                        ));
                    }
                    return Ok(Self::Singleton(meta));
                }
                Ok(Self::Struct(JsonStruct::new(meta, &data.fields)?))
            }
            Data::Enum(data) => {
                if data.variants.is_empty() {
                    return Err(syn::Error::new_spanned(
                        &ast.ident,
                        "`Typed` cannot be derived for an enum without variants",
                    ));
                }
                if let Some(span) = meta.attrs().delegate {
                    return Err(syn::Error::new(span, "`delegate` only applies to structs"));
                }
                if let Some(ctor) = meta.attrs().constructors.first() {
                    return Err(syn::Error::new_spanned(&ctor.path, "`constructor` only applies to structs"));
                }
                let info = JsonEnum::new(meta, &data.variants)?;
                if info.is_family() {
                    Ok(Self::Family(info))
                } else {
                    Ok(Self::Enum(info))
                }
            }
            Data::Union(data) => Err(syn::Error::new_spanned(
                data.union_token,
                "`Typed` cannot be derived for unions",
            )),
        }
    }

    #[inline]
    pub fn meta(&self) -> &JsonMeta<'a> {
        match self {
            Self::Struct(info) => &info.meta,
            Self::Enum(info) | Self::Family(info) => &info.meta,
            Self::Singleton(meta) | Self::Opaque(meta) => meta,
        }
    }
}
