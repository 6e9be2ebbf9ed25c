use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::JsonMeta;

/// Generate implementation code for `Typed`.
///
/// `type_info_tokens` builds the `TypeInfo`; it runs once per
/// instantiation, inside the type's info cell.
pub(crate) fn impl_trait_typed(meta: &JsonMeta, type_info_tokens: TokenStream) -> TokenStream {
    let vc_json_path = meta.vc_json_path();
    let info_ = crate::path::info_(vc_json_path);
    let typed_ = crate::path::typed_(vc_json_path);

    let inner_cell_tokens = if meta.is_generic() {
        quote! {
            static CELL: #info_::GenericTypeInfoCell = #info_::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| {
                #type_info_tokens
            })
        }
    } else {
        quote! {
            static CELL: #info_::NonGenericTypeInfoCell = #info_::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                #type_info_tokens
            })
        }
    };

    let real_ident = meta.real_ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #typed_ for #real_ident #ty_generics #where_clause {
            fn type_info() -> &'static #info_::TypeInfo {
                #inner_cell_tokens
            }
        }
    }
}
