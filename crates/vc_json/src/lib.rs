#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;
extern crate self as vc_json;

// -----------------------------------------------------------------------------
// Modules

pub mod codec;
pub mod config;
pub mod engine;
pub mod error;
pub mod hash;
pub mod impls;
pub mod info;
pub mod path;
pub mod value;

// -----------------------------------------------------------------------------
// Exports

pub use codec::{Codec, Strategy};
pub use config::JsonConfig;
pub use engine::{Json, WriteError};
pub use error::{ErrorKind, JsonError};
pub use info::{TypeDescriptor, Typed};
pub use path::JsonPath;
pub use value::{Decimal, JsonKind, JsonObject, JsonValue};

pub mod derive {
    //! `#[derive(Typed)]` and its `json` attribute namespace.
    pub use vc_json_derive::Typed;
}

/// Items used by code generated from `#[derive(Typed)]`.
#[doc(hidden)]
pub mod __macro_exports {
    pub use crate::info::glue::*;
}
