//! `#[derive(Typed)]` for `vc_json`.
//!
//! See [`Typed`] for the supported shapes and the `json` attribute namespace.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static JSON_ATTRIBUTE_NAME: &str = "json";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Type Description Derivation
///
/// `#[derive(Typed)]` implements `vc_json::info::Typed`, describing the type
/// to the JSON engine. What the description looks like depends on the shape:
///
/// | Shape                                   | Description                          |
/// |-----------------------------------------|--------------------------------------|
/// | `struct A { x: X, y: Y }`               | record with fields `x` and `y`       |
/// | `struct A(X, Y);`                       | record with fields `"0"` and `"1"`   |
/// | `struct A(X);`                          | transparent, written as its field    |
/// | `struct A;`                             | singleton, written as `{}`           |
/// | `enum E { A, B }`                       | enumeration, written as `"A"`/`"B"`  |
/// | `enum E { A(A), B(B) }`                 | closed family dispatched on a tag    |
///
/// Records get one constructor taking every field in declaration order, and
/// a setter per field, so that properties the constructor does not consume
/// can still be assigned.
///
/// Every type parameter must implement `Typed`. A field whose type is exactly
/// a type parameter is resolved against the concrete instantiation.
///
/// ## Type Attributes
///
/// ```rust, ignore
/// #[derive(Typed)]
/// #[json(allow_extra, include_all)]
/// #[json(factory(String, Celsius::parse), factory(Number, Celsius::from_number))]
/// #[json(to_json = Celsius::render)]
/// #[json(constructor(Celsius::new, "degrees"))]
/// #[json(@MyAnnotation)]
/// struct Celsius { degrees: f64 }
/// ```
///
/// - `allow_extra`: unknown properties are skipped instead of rejected.
/// - `include_all`: `None` fields are written as `null`.
/// - `delegate`: a single-field struct that reads and writes as its field,
///   usually a map.
/// - `opaque`: no structure is exposed; only hooks or a registered mapping
///   convert the type.
/// - `factory(Kind, path)`: `path: fn(&JsonValue) -> Result<Self, E>` with
///   `E: Display`, tried for JSON values of `Kind` (a `JsonKind` variant, or
///   `Number` for any number).
/// - `to_json = path`: `path: fn(&Self) -> JsonValue`.
/// - `constructor(path, "field", ...)`: an additional constructor taking the
///   named fields, in that order. Constructors are tried in declaration
///   order, the derived one first.
/// - `@expr`: a custom annotation, stored as-is.
///
/// ## Field Attributes
///
/// - `rename = "name"`: the property name on the wire.
/// - `ignore`: never read or written; the field is built with `Default`
///   (or its `default = path`).
/// - `include_null`: written as `null` when `None`.
/// - `default` / `default = path`: the value used when the property is absent.
/// - `@expr`: a custom annotation.
///
/// ## Variant Attributes
///
/// - `rename = "name"`: the enumeration name or family tag on the wire.
/// - `@expr`: a custom annotation.
#[proc_macro_derive(Typed, attributes(json))]
pub fn derive_typed(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let derive = match derive_data::JsonDerive::from_input(&ast) {
        Ok(derive) => derive,
        Err(err) => return err.into_compile_error().into(),
    };

    let type_info_tokens = match &derive {
        derive_data::JsonDerive::Struct(info) => impls::struct_info_tokens(info),
        derive_data::JsonDerive::Singleton(meta) => impls::singleton_info_tokens(meta),
        derive_data::JsonDerive::Enum(info) => info.to_enum_info_tokens(),
        derive_data::JsonDerive::Family(info) => info.to_family_info_tokens(),
        derive_data::JsonDerive::Opaque(meta) => impls::opaque_info_tokens(meta),
    };

    impls::impl_trait_typed(derive.meta(), type_info_tokens).into()
}
