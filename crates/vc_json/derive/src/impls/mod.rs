//! Code generation for each shape of derived type.

// -----------------------------------------------------------------------------
// Modules

mod opaque_kind;
mod struct_kind;
mod trait_typed;
mod unit_kind;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use opaque_kind::opaque_info_tokens;
pub(crate) use struct_kind::struct_info_tokens;
pub(crate) use trait_typed::impl_trait_typed;
pub(crate) use unit_kind::singleton_info_tokens;
