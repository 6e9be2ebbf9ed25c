use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, LitStr, Token, parse::ParseStream};

/// Annotations understood by the engine's default configuration.
#[derive(Debug)]
pub(crate) enum BuiltinAttribute {
    Rename(LitStr),
    Ignore,
    IncludeNull,
    IncludeAll,
    AllowExtra,
}

/// A container for custom attribute expressions.
///
/// This corresponds to `vc_json::info::CustomAttributes`.
#[derive(Default, Debug)]
pub(crate) struct CustomAttributes {
    builtins: Vec<BuiltinAttribute>,
    attributes: Vec<Expr>,
}

impl CustomAttributes {
    #[inline]
    pub fn push_builtin(&mut self, value: BuiltinAttribute) {
        self.builtins.push(value);
    }

    /// Parse `@` attribute.
    ///
    /// Examples:
    /// - `#[json(@Foo)]`
    /// - `#[json(@Bar::baz("qux"))]`
    pub fn parse_inner_stream(&mut self, input: ParseStream) -> syn::Result<()> {
        input.parse::<Token![@]>()?;
        self.attributes.push(input.parse()?);
        Ok(())
    }

    /// If there is no attribute, this function will return an empty token stream.
    ///
    /// Otherwise, it will return content similar to this:
    ///
    /// ```ignore
    /// .with_custom_attributes(
    ///     _path_::CustomAttributes::with_capacity(n)
    ///         (.with_attribute( ... ))*
    /// )
    /// ```
    pub fn get_expression_with(&self, vc_json_path: &syn::Path) -> TokenStream {
        if self.builtins.is_empty() && self.attributes.is_empty() {
            return TokenStream::new();
        }

        let capacity = self.builtins.len() + self.attributes.len();
        let info_ = crate::path::info_(vc_json_path);

        let builtins = self.builtins.iter().map(|builtin| match builtin {
            BuiltinAttribute::Rename(name) => quote!(.with_attribute(#info_::Rename::new(#name))),
            BuiltinAttribute::Ignore => quote!(.with_attribute(#info_::Ignore)),
            BuiltinAttribute::IncludeNull => quote!(.with_attribute(#info_::IncludeNull)),
            BuiltinAttribute::IncludeAll => quote!(.with_attribute(#info_::IncludeAll)),
            BuiltinAttribute::AllowExtra => quote!(.with_attribute(#info_::AllowExtra)),
        });
        let customs = self.attributes.iter().map(|value| {
            quote! {
                .with_attribute(#value)
            }
        });

        quote! {
            .with_custom_attributes(
                #info_::CustomAttributes::with_capacity(#capacity)
                    #(#builtins)*
                    #(#customs)*
            )
        }
    }
}
