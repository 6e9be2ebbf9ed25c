#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use vc_json as json;

pub use vc_json::derive;
pub use vc_json::{Json, JsonConfig, JsonError, JsonValue};
