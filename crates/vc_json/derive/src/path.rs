//! Paths into `vc_json` used by generated code, kept in one place so that
//! a change in the crate layout touches only this module.

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::FactoryKind;

/// Get the correct access path to the `vc_json` crate.
///
/// 1. For crates that depend on `vc_json`, `::vc_json` is returned.
/// 2. For crates that depend on `vc_bind`, `::vc_bind::json` is returned.
/// 3. For other situations, `::vc_json` is returned, but this may be incorrect.
///
/// This reads the caller's `Cargo.toml`, so it is called once per derive
/// and the result is passed around.
pub(crate) fn vc_json() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_json"))
}

#[inline(always)]
pub(crate) fn info_(vc_json_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_json_path::info
    }
}

#[inline(always)]
pub(crate) fn glue_(vc_json_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_json_path::__macro_exports
    }
}

#[inline(always)]
pub(crate) fn typed_(vc_json_path: &syn::Path) -> TokenStream {
    quote! {
        #vc_json_path::info::Typed
    }
}

/// A `&'static [JsonKind]` expression.
pub(crate) fn json_kinds_(vc_json_path: &syn::Path, kind: FactoryKind) -> TokenStream {
    match kind {
        FactoryKind::Number => quote! {
            #vc_json_path::JsonKind::NUMBERS
        },
        FactoryKind::Single(name) => {
            let variant = syn::Ident::new(name, proc_macro2::Span::call_site());
            quote! {
                &[#vc_json_path::JsonKind::#variant]
            }
        }
    }
}
