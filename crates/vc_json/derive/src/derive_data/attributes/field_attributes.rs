use proc_macro2::Span;
use syn::{Attribute, Ident, LitStr, Path, Token, parse::ParseStream};

use super::type_attributes::set_flag;
use super::{BuiltinAttribute, CustomAttributes};
use crate::JSON_ATTRIBUTE_NAME;

/// Where an absent property's value comes from.
#[derive(Debug)]
pub(crate) enum FieldDefault {
    /// `#[json(default)]`, through `Default::default`.
    Trait,
    /// `#[json(default = path)]`, a function returning the field type.
    Path(Path),
}

/// Attributes on a field or an enum variant.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub ignore: Option<Span>,
    pub include_null: Option<Span>,
    pub default: Option<FieldDefault>,
    pub custom_attributes: CustomAttributes,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(JSON_ATTRIBUTE_NAME) {
                attr.parse_args_with(|input: ParseStream| this.parse_stream(input))?;
            }
        }
        if let Some(name) = &this.rename {
            this.custom_attributes.push_builtin(BuiltinAttribute::Rename(name.clone()));
        }
        if this.ignore.is_some() {
            this.custom_attributes.push_builtin(BuiltinAttribute::Ignore);
        }
        if this.include_null.is_some() {
            this.custom_attributes.push_builtin(BuiltinAttribute::IncludeNull);
        }
        Ok(this)
    }

    /// Variants only take `rename` and custom attributes.
    pub fn parse_variant_attrs(attrs: &[Attribute], span: Span) -> syn::Result<Self> {
        let this = Self::parse_attrs(attrs)?;
        if this.ignore.is_some() || this.include_null.is_some() || this.default.is_some() {
            return Err(syn::Error::new(
                span,
                "variants only accept `rename = \"...\"` and `@` attributes",
            ));
        }
        Ok(this)
    }

    fn parse_stream(&mut self, input: ParseStream) -> syn::Result<()> {
        while !input.is_empty() {
            if input.peek(Token![@]) {
                self.custom_attributes.parse_inner_stream(input)?;
            } else {
                let ident: Ident = input.parse()?;
                self.parse_item(&ident, input)?;
            }
            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }
        Ok(())
    }

    fn parse_item(&mut self, ident: &Ident, input: ParseStream) -> syn::Result<()> {
        let span = ident.span();
        match ident.to_string().as_str() {
            "rename" => {
                if self.rename.is_some() {
                    return Err(syn::Error::new(span, "duplicate `rename`"));
                }
                input.parse::<Token![=]>()?;
                self.rename = Some(input.parse()?);
                Ok(())
            }
            "ignore" => set_flag(&mut self.ignore, span, ident),
            "include_null" => set_flag(&mut self.include_null, span, ident),
            "default" => {
                if self.default.is_some() {
                    return Err(syn::Error::new(span, "duplicate `default`"));
                }
                self.default = if input.peek(Token![=]) {
                    input.parse::<Token![=]>()?;
                    Some(FieldDefault::Path(input.parse()?))
                } else {
                    Some(FieldDefault::Trait)
                };
                Ok(())
            }
            _ => Err(syn::Error::new(
                span,
                format!("unknown field attribute `{ident}` in `#[{JSON_ATTRIBUTE_NAME}(...)]`"),
            )),
        }
    }
}
