use proc_macro2::Span;
use syn::{Attribute, Ident, LitStr, Path, Token, parenthesized, parse::ParseStream};

use super::{BuiltinAttribute, CustomAttributes};
use crate::JSON_ATTRIBUTE_NAME;

/// The JSON variants a declared factory accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FactoryKind {
    /// One `JsonKind` variant, by name.
    Single(&'static str),
    /// `Int`, `Long` and `Decimal`.
    Number,
}

impl FactoryKind {
    const KINDS: [&'static str; 8] = ["Null", "Bool", "String", "Int", "Long", "Decimal", "Array", "Object"];

    fn parse(ident: &Ident) -> syn::Result<Self> {
        if ident == "Number" {
            return Ok(Self::Number);
        }
        Self::KINDS
            .iter()
            .find(|kind| ident == *kind)
            .map(|kind| Self::Single(*kind))
            .ok_or_else(|| {
                syn::Error::new(
                    ident.span(),
                    "expected one of `Null`, `Bool`, `String`, `Int`, `Long`, `Decimal`, `Array`, `Object`, `Number`",
                )
            })
    }
}

/// `factory(Kind, path)`
#[derive(Debug)]
pub(crate) struct FactoryAttribute {
    pub kind: FactoryKind,
    pub path: Path,
}

/// `constructor(path, "field", ...)`
#[derive(Debug)]
pub(crate) struct ConstructorAttribute {
    pub path: Path,
    pub fields: Vec<LitStr>,
}

/// Attributes on the type itself.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    pub allow_extra: Option<Span>,
    pub include_all: Option<Span>,
    pub delegate: Option<Span>,
    pub opaque: Option<Span>,
    pub factories: Vec<FactoryAttribute>,
    pub to_json: Option<Path>,
    pub constructors: Vec<ConstructorAttribute>,
    pub custom_attributes: CustomAttributes,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs {
            if attr.path().is_ident(JSON_ATTRIBUTE_NAME) {
                attr.parse_args_with(|input: ParseStream| this.parse_stream(input))?;
            }
        }
        if this.allow_extra.is_some() {
            this.custom_attributes.push_builtin(BuiltinAttribute::AllowExtra);
        }
        if this.include_all.is_some() {
            this.custom_attributes.push_builtin(BuiltinAttribute::IncludeAll);
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
            "allow_extra" => set_flag(&mut self.allow_extra, span, ident),
            "include_all" => set_flag(&mut self.include_all, span, ident),
            "delegate" => set_flag(&mut self.delegate, span, ident),
            "opaque" => set_flag(&mut self.opaque, span, ident),
            "to_json" => {
                if self.to_json.is_some() {
                    return Err(syn::Error::new(span, "duplicate `to_json`"));
                }
                input.parse::<Token![=]>()?;
                self.to_json = Some(input.parse()?);
                Ok(())
            }
            "factory" => {
                let content;
                parenthesized!(content in input);
                let kind = FactoryKind::parse(&content.parse()?)?;
                content.parse::<Token![,]>()?;
                let path = content.parse()?;
                if !content.is_empty() {
                    return Err(content.error("expected `factory(Kind, path)`"));
                }
                self.factories.push(FactoryAttribute { kind, path });
                Ok(())
            }
            "constructor" => {
                let content;
                parenthesized!(content in input);
                let path = content.parse()?;
                let mut fields = Vec::new();
                while !content.is_empty() {
                    content.parse::<Token![,]>()?;
                    if content.is_empty() {
                        break;
                    }
                    fields.push(content.parse()?);
                }
                self.constructors.push(ConstructorAttribute { path, fields });
                Ok(())
            }
            _ => Err(syn::Error::new(
                span,
                format!("unknown type attribute `{ident}` in `#[{JSON_ATTRIBUTE_NAME}(...)]`"),
            )),
        }
    }

    /// Whether the type declares its own factories or to-JSON function.
    #[inline]
    pub fn has_hooks(&self) -> bool {
        !self.factories.is_empty() || self.to_json.is_some()
    }
}

pub(super) fn set_flag(flag: &mut Option<Span>, span: Span, ident: &Ident) -> syn::Result<()> {
    if flag.is_some() {
        return Err(syn::Error::new(span, format!("duplicate `{ident}`")));
    }
    *flag = Some(span);
    Ok(())
}
