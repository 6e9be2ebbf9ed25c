use alloc::boxed::Box;
use alloc::string::String;
use core::any::Any;

use crate::codec::{CodecImpl, DecodeContext, EncodeContext};
use crate::error::JsonError;
use crate::info::ScalarInfo;
use crate::value::JsonValue;

/// Leaf values with built-in conversions.
pub(crate) struct ScalarCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static ScalarInfo,
}

impl CodecImpl for ScalarCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        (self.info.decode_fn())(value).map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        (self.info.encode_fn())(value, cx.scalar_options())
            .map_err(|reason| cx.unencodable(self.type_name.as_str(), reason))
    }
}
