//! Provide some tools for parsing `#[json(...)]` attributes.

// -----------------------------------------------------------------------------
// Modules

mod custom_attributes;
mod field_attributes;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

use custom_attributes::BuiltinAttribute;

pub(crate) use custom_attributes::CustomAttributes;
pub(crate) use field_attributes::{FieldAttributes, FieldDefault};
pub(crate) use type_attributes::{FactoryKind, TypeAttributes};
