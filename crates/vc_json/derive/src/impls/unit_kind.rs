use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::JsonMeta;

/// `TypeInfo::Singleton` for structs without fields.
pub(crate) fn singleton_info_tokens(meta: &JsonMeta) -> TokenStream {
    let vc_json_path = meta.vc_json_path();
    let info_ = crate::path::info_(vc_json_path);
    let glue_ = crate::path::glue_(vc_json_path);

    let with_hooks = meta.with_hooks_expression();
    let with_custom_attributes = meta.with_custom_attributes_expression();

    quote! {
        #info_::TypeInfo::Singleton(
            #info_::SingletonInfo::new::<Self>(|| #glue_::boxed::<Self>(Self {}))
                #with_hooks
                #with_custom_attributes
        )
    }
}
