//! The engine handle.
//!
//! A [`Json`] owns one [`JsonConfig`] and the codecs resolved under it.
//! Codecs are resolved on first use and cached per [`TypeDescriptor`]; the
//! cache only ever grows, and an entry, once published, is never replaced.

// -----------------------------------------------------------------------------
// Modules

mod resolve;

use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::{Any, type_name};
use core::fmt;
use std::io;
use std::sync::{PoisonError, RwLock};

use log::trace;
use thiserror::Error;

use crate::codec::{Codec, DecodeContext, EncodeContext};
use crate::config::JsonConfig;
use crate::error::{ErrorKind, JsonError};
use crate::hash::HashMap;
use crate::info::{TypeDescriptor, Typed};
use crate::path::JsonPath;
use crate::value::JsonValue;
use resolve::Resolver;

// -----------------------------------------------------------------------------
// WriteError

/// Failure of [`Json::encode_to_writer`].
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Encode(#[from] JsonError),
    #[error("failed to write JSON text: {0}")]
    Io(#[from] io::Error),
}

// -----------------------------------------------------------------------------
// Json

/// A configured engine.
///
/// Shareable across threads; every call keeps its own traversal state, and
/// only the codec cache is shared.
///
/// # Resolution order
///
/// For each descriptor, the first rule that applies wins:
///
/// 1. a mapping registered with [`JsonConfig::register_decoder`] (or
///    `register_encoder` when encoding);
/// 2. factories (decode) or the to-JSON function (encode) declared by the type;
/// 3. the structural codec for the type's kind: scalars, enumerations,
///    arrays and other containers, families, single-argument constructors,
///    delegating types, singletons, foreign types and finally records.
///
/// # Examples
///
/// ```
/// use vc_json::{Json, JsonValue, Strategy};
///
/// let json = Json::default();
/// let value: Vec<u64> = json.decode(&JsonValue::Array(vec![JsonValue::from_u64(u64::MAX)])).unwrap();
/// assert_eq!(value, [u64::MAX]);
/// assert_eq!(json.encode_to_string(&value).unwrap(), "[18446744073709551615]");
///
/// let codec = json.resolve(&vc_json::TypeDescriptor::of::<Vec<u64>>()).unwrap();
/// assert_eq!(codec.strategy(), Strategy::Sequence);
/// ```
pub struct Json {
    config: Arc<JsonConfig>,
    cache: RwLock<HashMap<TypeDescriptor, Arc<Codec>>>,
}

impl Default for Json {
    /// An engine over [`JsonConfig::default`].
    #[inline]
    fn default() -> Self {
        Self::new(JsonConfig::default())
    }
}

impl fmt::Debug for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Json")
            .field("config", &self.config)
            .field("cached", &self.cached_len())
            .finish()
    }
}

impl Json {
    #[inline]
    pub fn new(config: impl Into<Arc<JsonConfig>>) -> Self {
        Self {
            config: config.into(),
            cache: RwLock::new(HashMap::default()),
        }
    }

    #[inline]
    pub fn config(&self) -> &JsonConfig {
        &self.config
    }

    /// The codec for `descriptor`, resolving it if it is not cached yet.
    ///
    /// Fails with [`ErrorKind::UnresolvableType`] when no rule applies to
    /// the descriptor or to one of the types it is built from.
    pub fn resolve(&self, descriptor: &TypeDescriptor) -> Result<Arc<Codec>, JsonError> {
        if let Some(codec) = self.cached(descriptor) {
            trace!("codec cache hit for `{descriptor}`");
            return Ok(codec);
        }
        Resolver::new(self).resolve(descriptor)
    }

    /// Number of cached codecs.
    pub fn cached_len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub(crate) fn cached(&self, descriptor: &TypeDescriptor) -> Option<Arc<Codec>> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(descriptor)
            .cloned()
    }

    /// Publishes `codec`, returning the entry that ends up cached.
    ///
    /// A codec for a descriptor with unbound arguments is never cached.
    pub(crate) fn publish(&self, codec: Arc<Codec>) -> Arc<Codec> {
        if !codec.descriptor().is_fully_bound() {
            return codec;
        }
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(codec.descriptor().clone())
            .or_insert(codec)
            .clone()
    }

    // -------------------------------------------------------------------------
    // Decode

    /// Decodes a `T`.
    pub fn decode<T: Typed>(&self, value: &JsonValue) -> Result<T, JsonError> {
        let decoded = self.decode_as(value, &T::descriptor())?;
        match decoded.downcast::<T>() {
            Ok(decoded) => Ok(*decoded),
            Err(_) => Err(JsonError::new(
                ErrorKind::DecodeMismatch {
                    type_name: String::from(type_name::<T>()),
                    found: value.truncated(40),
                    reason: "the resolved codec produced a different type".into(),
                },
                JsonPath::root(),
            )),
        }
    }

    /// Decodes a value of the type `descriptor` describes.
    pub fn decode_as(&self, value: &JsonValue, descriptor: &TypeDescriptor) -> Result<Box<dyn Any>, JsonError> {
        let codec = self.resolve(descriptor)?;
        codec.decode_in(value, &mut DecodeContext::new(self))
    }

    // -------------------------------------------------------------------------
    // Encode

    /// Encodes `value` as a `T`.
    #[inline]
    pub fn encode<T: Typed>(&self, value: &T) -> Result<JsonValue, JsonError> {
        self.encode_as(value, &T::descriptor())
    }

    /// Encodes `value` through the codec of `descriptor`.
    pub fn encode_as(&self, value: &dyn Any, descriptor: &TypeDescriptor) -> Result<JsonValue, JsonError> {
        let codec = self.resolve(descriptor)?;
        codec.encode_in(value, &mut EncodeContext::new(self))
    }

    /// Encodes `value` and renders it as compact JSON text.
    #[inline]
    pub fn encode_to_string<T: Typed>(&self, value: &T) -> Result<String, JsonError> {
        self.encode(value).map(|encoded| encoded.to_json_string())
    }

    /// Encodes `value` and streams its compact rendering into `writer`.
    ///
    /// The bytes written are the same as [`Json::encode_to_string`]'s.
    pub fn encode_to_writer<T: Typed, W: io::Write>(&self, value: &T, writer: W) -> Result<(), WriteError> {
        let encoded = self.encode(value)?;
        encoded.write_to(writer)?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Strategy;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn resolution_is_cached() {
        let json = Json::default();
        let descriptor = TypeDescriptor::of::<Vec<Option<u8>>>();
        let first = json.resolve(&descriptor).unwrap();
        let cached = json.cached_len();
        let second = json.resolve(&descriptor).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(json.cached_len(), cached);
        assert_eq!(first.strategy(), Strategy::Sequence);
    }

    #[test]
    fn writer_and_string_agree() {
        let json = Json::default();
        let value = vec![Some(1_i64), None, Some(i64::MIN)];
        let mut buffer = Vec::new();
        json.encode_to_writer(&value, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), json.encode_to_string(&value).unwrap());
    }

    #[test]
    fn decode_as_returns_the_described_type() {
        let json = Json::default();
        let decoded = json
            .decode_as(&JsonValue::from("text"), &TypeDescriptor::of::<String>())
            .unwrap();
        assert_eq!(decoded.downcast_ref::<String>().map(String::as_str), Some("text"));
    }
}
