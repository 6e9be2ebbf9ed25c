use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{JsonStruct, JsonStructKind};

/// `TypeInfo::Struct`, or `TypeInfo::Delegating` for `#[json(delegate)]`.
pub(crate) fn struct_info_tokens(info: &JsonStruct) -> TokenStream {
    if info.meta.attrs().delegate.is_some() {
        return delegating_info_tokens(info);
    }

    let meta = &info.meta;
    let info_ = crate::path::info_(meta.vc_json_path());

    let kind = match info.kind {
        JsonStructKind::Named => quote!(#info_::StructKind::Named),
        JsonStructKind::Tuple => quote!(#info_::StructKind::Tuple),
    };
    let fields = info.fields.iter().map(|field| field.to_info_tokens(meta));
    let constructors = info.constructors_tokens();

    let with_hooks = meta.with_hooks_expression();
    let with_generics = meta.with_generics_expression();
    let with_custom_attributes = meta.with_custom_attributes_expression();

    quote! {
        #info_::TypeInfo::Struct(
            #info_::StructInfo::new::<Self>(#kind, &[#(#fields),*])
                #(.with_constructor(#constructors))*
                #with_hooks
                #with_generics
                #with_custom_attributes
        )
    }
}

fn delegating_info_tokens(info: &JsonStruct) -> TokenStream {
    let meta = &info.meta;
    let vc_json_path = meta.vc_json_path();
    let info_ = crate::path::info_(vc_json_path);
    let glue_ = crate::path::glue_(vc_json_path);

    // `validity` guarantees exactly one field.
    let Some(field) = info.fields.first() else {
        return TokenStream::new();
    };
    let member = &field.member;
    let ty = field.ty();
    let type_ref = meta.type_ref(ty);

    let with_hooks = meta.with_hooks_expression();
    let with_generics = meta.with_generics_expression();
    let with_custom_attributes = meta.with_custom_attributes_expression();

    quote! {
        #info_::TypeInfo::Delegating(
            #info_::DelegatingInfo::new::<Self>(
                #type_ref,
                |inner| ::core::result::Result::Ok(#glue_::boxed::<Self>(Self {
                    #member: #glue_::unbox::<#ty>(inner)?,
                })),
                |owner| #glue_::downcast_ref::<Self>(owner).map(|owner| &owner.#member as &dyn ::core::any::Any),
            )
            #with_hooks
            #with_generics
            #with_custom_attributes
        )
    }
}
