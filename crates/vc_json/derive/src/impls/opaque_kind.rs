use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::JsonMeta;

/// `TypeInfo::Opaque`: only the type's hooks, or a registered mapping,
/// can convert it.
pub(crate) fn opaque_info_tokens(meta: &JsonMeta) -> TokenStream {
    let info_ = crate::path::info_(meta.vc_json_path());
    let with_hooks = meta.with_hooks_expression();
    let with_generics = meta.with_generics_expression();
    let with_custom_attributes = meta.with_custom_attributes_expression();

    quote! {
        #info_::TypeInfo::Opaque(
            #info_::OpaqueInfo::new::<Self>()
                #with_hooks
                #with_generics
                #with_custom_attributes
        )
    }
}
