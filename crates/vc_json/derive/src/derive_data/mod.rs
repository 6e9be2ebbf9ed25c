//! Provide some tools for parsing the derive input.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod json_derive;
mod json_enum;
mod json_meta;
mod json_struct;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::FactoryKind;

use attributes::{FieldAttributes, FieldDefault, TypeAttributes};

pub(crate) use json_derive::JsonDerive;
pub(crate) use json_enum::JsonEnum;
pub(crate) use json_meta::JsonMeta;
pub(crate) use json_struct::{JsonStruct, JsonStructKind};
