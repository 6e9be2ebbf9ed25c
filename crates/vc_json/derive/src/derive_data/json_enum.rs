use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Fields, Type, Variant};

use super::{FieldAttributes, JsonMeta};

/// A variant of a derived enum: a unit variant, or a one-field tuple
/// variant carrying a family member.
pub(crate) struct JsonVariant<'a> {
    pub data: &'a Variant,
    pub attrs: FieldAttributes,
    pub payload: Option<&'a Type>,
}

impl<'a> JsonVariant<'a> {
    fn new(data: &'a Variant) -> syn::Result<Self> {
        let attrs = FieldAttributes::parse_variant_attrs(&data.attrs, data.span())?;
        let payload = match &data.fields {
            Fields::Unit => None,
            Fields::Unnamed(fields) if fields.unnamed.len() == 1 => fields.unnamed.first().map(|field| &field.ty),
            _ => {
                return Err(syn::Error::new_spanned(
                    &data.fields,
                    "variants must be unit variants or carry exactly one unnamed field",
                ));
            }
        };
        Ok(Self { data, attrs, payload })
    }

    #[inline]
    pub fn name(&self) -> String {
        self.data.ident.unraw().to_string()
    }
}

/// An enumeration of unit variants, or a closed family of payload variants.
pub(crate) struct JsonEnum<'a> {
    pub meta: JsonMeta<'a>,
    pub variants: Vec<JsonVariant<'a>>,
}

impl<'a> JsonEnum<'a> {
    pub fn new(meta: JsonMeta<'a>, variants: impl IntoIterator<Item = &'a Variant>) -> syn::Result<Self> {
        let variants = variants
            .into_iter()
            .map(JsonVariant::new)
            .collect::<syn::Result<Vec<_>>>()?;

        let units = variants.iter().filter(|variant| variant.payload.is_none()).count();
        if units != 0 && units != variants.len() {
            let payload = variants.iter().find(|variant| variant.payload.is_some());
            return Err(syn::Error::new(
                payload.map_or_else(proc_macro2::Span::call_site, |variant| variant.data.span()),
                "an enum must have only unit variants or only single-field variants",
            ));
        }
        Ok(Self { meta, variants })
    }

    /// Whether every variant carries a payload.
    #[inline]
    pub fn is_family(&self) -> bool {
        self.variants.iter().all(|variant| variant.payload.is_some())
    }

    /// The `TypeInfo::Enum(...)` expression.
    pub fn to_enum_info_tokens(&self) -> TokenStream {
        let meta = &self.meta;
        let vc_json_path = meta.vc_json_path();
        let info_ = crate::path::info_(vc_json_path);
        let glue_ = crate::path::glue_(vc_json_path);

        let variants = self.variants.iter().map(|variant| {
            let name = variant.name();
            let with_custom_attributes = variant.attrs.custom_attributes.get_expression_with(vc_json_path);
            quote!(#info_::UnitVariant::new(#name) #with_custom_attributes)
        });
        let from_index = self.variants.iter().enumerate().map(|(index, variant)| {
            let ident = &variant.data.ident;
            quote!(#index => ::core::option::Option::Some(#glue_::boxed::<Self>(Self::#ident)))
        });
        let index_of = self.variants.iter().enumerate().map(|(index, variant)| {
            let ident = &variant.data.ident;
            quote!(Self::#ident => #index)
        });

        let with_hooks = meta.with_hooks_expression();
        let with_generics = meta.with_generics_expression();
        let with_custom_attributes = meta.with_custom_attributes_expression();

        quote! {
            #info_::TypeInfo::Enum(
                #info_::EnumInfo::new::<Self>(
                    &[#(#variants),*],
                    |index| match index {
                        #(#from_index,)*
                        _ => ::core::option::Option::None,
                    },
                    |value| #glue_::downcast_ref::<Self>(value).map(|value| match value {
                        #(#index_of,)*
                    }),
                )
                #with_hooks
                #with_generics
                #with_custom_attributes
            )
        }
    }

    /// The `TypeInfo::Family(...)` expression.
    pub fn to_family_info_tokens(&self) -> TokenStream {
        let meta = &self.meta;
        let vc_json_path = meta.vc_json_path();
        let info_ = crate::path::info_(vc_json_path);
        let glue_ = crate::path::glue_(vc_json_path);

        let members = self.variants.iter().filter_map(|variant| {
            let payload = variant.payload?;
            let ident = &variant.data.ident;
            let name = variant.name();
            let type_ref = meta.type_ref(payload);
            let with_custom_attributes = variant.attrs.custom_attributes.get_expression_with(vc_json_path);
            Some(quote! {
                #info_::FamilyVariant::new(#name, #type_ref, |payload| {
                    ::core::result::Result::Ok(#glue_::boxed::<Self>(Self::#ident(#glue_::unbox::<#payload>(payload)?)))
                })
                #with_custom_attributes
            })
        });
        let split = self.variants.iter().enumerate().map(|(index, variant)| {
            let ident = &variant.data.ident;
            quote!(Self::#ident(payload) => (#index, payload as &dyn ::core::any::Any))
        });

        let with_hooks = meta.with_hooks_expression();
        let with_generics = meta.with_generics_expression();
        let with_custom_attributes = meta.with_custom_attributes_expression();

        quote! {
            #info_::TypeInfo::Family(
                #info_::FamilyInfo::new::<Self>(
                    &[#(#members),*],
                    |value| #glue_::downcast_ref::<Self>(value).map(|value| match value {
                        #(#split,)*
                    }),
                )
                #with_hooks
                #with_generics
                #with_custom_attributes
            )
        }
    }
}
