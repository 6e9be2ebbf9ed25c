use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, GenericParam, Ident, Type, WhereClause};

use super::TypeAttributes;

/// Data shared by every kind of derived type.
pub(crate) struct JsonMeta<'a> {
    ast: &'a DeriveInput,
    attrs: TypeAttributes,
    vc_json_path: syn::Path,
    type_params: Vec<&'a Ident>,
}

impl<'a> JsonMeta<'a> {
    pub fn new(ast: &'a DeriveInput, attrs: TypeAttributes) -> syn::Result<Self> {
        let mut type_params = Vec::new();
        for param in &ast.generics.params {
            match param {
                GenericParam::Type(param) => type_params.push(&param.ident),
                GenericParam::Lifetime(param) => {
                    return Err(syn::Error::new_spanned(
                        param,
                        "`Typed` types are `'static`; lifetime parameters are not supported",
                    ));
                }
                GenericParam::Const(param) => {
                    return Err(syn::Error::new_spanned(param, "const parameters are not supported"));
                }
            }
        }

        Ok(Self {
            ast,
            attrs,
            vc_json_path: crate::path::vc_json(),
            type_params,
        })
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn vc_json_path(&self) -> &syn::Path {
        &self.vc_json_path
    }

    #[inline]
    pub fn real_ident(&self) -> &'a Ident {
        &self.ast.ident
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.type_params.is_empty()
    }

    /// `TypeRef::param(i)` when `ty` is exactly the `i`-th type parameter,
    /// `TypeRef::of::<ty>()` otherwise.
    pub fn type_ref(&self, ty: &Type) -> TokenStream {
        let info_ = crate::path::info_(&self.vc_json_path);
        if let Type::Path(path) = ty
            && path.qself.is_none()
            && let Some(ident) = path.path.get_ident()
            && let Some(index) = self.type_params.iter().position(|param| *param == ident)
        {
            return quote!(#info_::TypeRef::param(#index));
        }
        quote!(#info_::TypeRef::of::<#ty>())
    }

    /// `.with_generics(...)`, empty for non-generic types.
    pub fn with_generics_expression(&self) -> TokenStream {
        if !self.is_generic() {
            return TokenStream::new();
        }
        let info_ = crate::path::info_(&self.vc_json_path);
        let params = self.type_params.iter().map(|ident| {
            let name = ident.to_string();
            quote!(.with(#info_::TypeParamInfo::new::<#ident>(#name)))
        });
        quote! {
            .with_generics(#info_::Generics::new() #(#params)*)
        }
    }

    /// `.with_custom_attributes(...)` for the type's own attributes.
    #[inline]
    pub fn with_custom_attributes_expression(&self) -> TokenStream {
        self.attrs.custom_attributes.get_expression_with(&self.vc_json_path)
    }

    /// `.with_hooks(...)`, empty when the type declares none.
    pub fn with_hooks_expression(&self) -> TokenStream {
        if !self.attrs.has_hooks() {
            return TokenStream::new();
        }
        let vc_json_path = &self.vc_json_path;
        let info_ = crate::path::info_(vc_json_path);
        let glue_ = crate::path::glue_(vc_json_path);

        let factories = self.attrs.factories.iter().map(|factory| {
            let accepts = crate::path::json_kinds_(vc_json_path, factory.kind);
            let path = &factory.path;
            quote! {
                .with_factory(#info_::Factory::new(#accepts, |value| {
                    #glue_::factory_result(#path(value))
                }))
            }
        });
        let to_json = self.attrs.to_json.as_ref().map(|path| {
            quote! {
                .with_to_json(|value| #glue_::render_with::<Self>(value, #path))
            }
        });

        quote! {
            .with_hooks(#info_::TypeHooks::new() #(#factories)* #to_json)
        }
    }

    /// `(impl_generics, ty_generics, where_clause)` with a `Typed` bound on
    /// every type parameter.
    pub fn split_generics(&self) -> (TokenStream, TokenStream, TokenStream) {
        let generics = &self.ast.generics;
        let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

        let typed_ = crate::path::typed_(&self.vc_json_path);
        let mut where_clause = where_clause.cloned().unwrap_or_else(|| WhereClause {
            where_token: Default::default(),
            predicates: Default::default(),
        });
        for ident in &self.type_params {
            where_clause.predicates.push(syn::parse_quote!(#ident: #typed_));
        }

        let where_tokens = if where_clause.predicates.is_empty() {
            TokenStream::new()
        } else {
            quote!(#where_clause)
        };
        (quote!(#impl_generics), quote!(#ty_generics), where_tokens)
    }
}
