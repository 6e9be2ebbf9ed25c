use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Field, Fields, Member, Type};

use super::{FieldAttributes, FieldDefault, JsonMeta};

// -----------------------------------------------------------------------------
// JsonField

/// A field of a derived struct.
pub(crate) struct JsonField<'a> {
    pub data: &'a Field,
    pub attrs: FieldAttributes,
    /// `self.x` or `self.0`.
    pub member: Member,
    /// The declared name, `"0"`, `"1"`, ... for tuple fields.
    pub name: String,
}

impl<'a> JsonField<'a> {
    fn new(data: &'a Field, index: usize) -> syn::Result<Self> {
        let attrs = FieldAttributes::parse_attrs(&data.attrs)?;
        let (member, name) = match &data.ident {
            Some(ident) => (Member::Named(ident.clone()), ident.unraw().to_string()),
            None => (Member::Unnamed(index.into()), index.to_string()),
        };
        Ok(Self {
            data,
            attrs,
            member,
            name,
        })
    }

    #[inline]
    pub fn ty(&self) -> &'a Type {
        &self.data.ty
    }

    /// The `FieldInfo` construction expression.
    pub fn to_info_tokens(&self, meta: &JsonMeta) -> TokenStream {
        let vc_json_path = meta.vc_json_path();
        let info_ = crate::path::info_(vc_json_path);
        let glue_ = crate::path::glue_(vc_json_path);

        let name = &self.name;
        let member = &self.member;
        let ty = self.ty();
        let type_ref = meta.type_ref(ty);

        let with_setter = if self.attrs.ignore.is_some() {
            TokenStream::new()
        } else {
            quote! {
                .with_setter(|owner, value| {
                    #glue_::downcast_mut::<Self>(owner)?.#member = #glue_::unbox::<#ty>(value)?;
                    ::core::result::Result::Ok(())
                })
            }
        };
        let with_custom_attributes = self.attrs.custom_attributes.get_expression_with(vc_json_path);

        quote! {
            #info_::FieldInfo::new(#name, #type_ref, |owner| {
                #glue_::downcast_ref::<Self>(owner).map(|owner| &owner.#member as &dyn ::core::any::Any)
            })
            #with_setter
            #with_custom_attributes
        }
    }

    /// The `ParamInfo` construction expression for this field.
    ///
    /// Ignored fields always get a default, through `Default` unless the
    /// field names its own.
    pub fn to_param_tokens(&self, meta: &JsonMeta) -> TokenStream {
        let vc_json_path = meta.vc_json_path();
        let info_ = crate::path::info_(vc_json_path);
        let glue_ = crate::path::glue_(vc_json_path);

        let name = &self.name;
        let ty = self.ty();
        let type_ref = meta.type_ref(ty);

        let with_default = match (&self.attrs.default, self.attrs.ignore) {
            (Some(FieldDefault::Path(path)), _) => quote! {
                .with_default(|| #glue_::boxed::<#ty>(#path()))
            },
            (Some(FieldDefault::Trait), _) | (None, Some(_)) => quote! {
                .with_default(#glue_::default_of::<#ty>)
            },
            (None, None) => TokenStream::new(),
        };

        quote! {
            #info_::ParamInfo::new(#name, #type_ref) #with_default
        }
    }
}

// -----------------------------------------------------------------------------
// JsonStruct

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum JsonStructKind {
    Named,
    Tuple,
}

/// A struct with at least one field.
pub(crate) struct JsonStruct<'a> {
    pub meta: JsonMeta<'a>,
    pub kind: JsonStructKind,
    pub fields: Vec<JsonField<'a>>,
}

impl<'a> JsonStruct<'a> {
    pub fn new(meta: JsonMeta<'a>, fields: &'a Fields) -> syn::Result<Self> {
        let kind = match fields {
            Fields::Named(_) => JsonStructKind::Named,
            _ => JsonStructKind::Tuple,
        };
        let fields = fields
            .iter()
            .enumerate()
            .map(|(index, field)| JsonField::new(field, index))
            .collect::<syn::Result<Vec<_>>>()?;

        let this = Self { meta, kind, fields };
        this.validity()?;
        Ok(this)
    }

    fn validity(&self) -> syn::Result<()> {
        let attrs = self.meta.attrs();
        if let Some(span) = attrs.delegate
            && self.fields.len() != 1
        {
            return Err(syn::Error::new(span, "`delegate` requires exactly one field"));
        }
        for ctor in &attrs.constructors {
            if let Some(missing) = ctor.fields.iter().find(|name| self.field(&name.value()).is_none()) {
                return Err(syn::Error::new(
                    missing.span(),
                    format!("no field named `{}`", missing.value()),
                ));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&JsonField<'a>> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// `Self { a: next_arg(..)?, b: next_arg(..)? }`, taking arguments in
    /// declaration order.
    pub fn primary_build_tokens(&self) -> TokenStream {
        let glue_ = crate::path::glue_(self.meta.vc_json_path());
        let inits = self.fields.iter().map(|field| {
            let member = &field.member;
            let ty = field.ty();
            quote!(#member: #glue_::next_arg::<#ty>(&mut args)?)
        });
        quote! {
            |args| {
                let mut args = args.into_iter();
                ::core::result::Result::Ok(#glue_::boxed::<Self>(Self { #(#inits),* }))
            }
        }
    }

    /// Every `ConstructorInfo`: the primary one over all fields, then the
    /// declared ones in order.
    pub fn constructors_tokens(&self) -> Vec<TokenStream> {
        let vc_json_path = self.meta.vc_json_path();
        let info_ = crate::path::info_(vc_json_path);
        let glue_ = crate::path::glue_(vc_json_path);

        let params = self.fields.iter().map(|field| field.to_param_tokens(&self.meta));
        let build = self.primary_build_tokens();
        let mut ctors = vec![quote! {
            #info_::ConstructorInfo::new(&[#(#params),*], #build)
        }];

        for ctor in &self.meta.attrs().constructors {
            let fields: Vec<&JsonField> = ctor
                .fields
                .iter()
                .filter_map(|name| self.field(&name.value()))
                .collect();
            let params = fields.iter().map(|field| field.to_param_tokens(&self.meta));
            let args = fields.iter().map(|field| {
                let ty = field.ty();
                quote!(#glue_::next_arg::<#ty>(&mut args)?)
            });
            let path = &ctor.path;
            ctors.push(quote! {
                #info_::ConstructorInfo::new(&[#(#params),*], |args| {
                    let mut args = args.into_iter();
                    ::core::result::Result::Ok(#glue_::boxed::<Self>(#path(#(#args),*)))
                })
            });
        }
        ctors
    }
}
