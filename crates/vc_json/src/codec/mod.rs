//! Resolved codecs.
//!
//! A [`Codec`] is what resolution produces for one [`TypeDescriptor`]: the
//! explicit mappings registered for it, the hooks the type declares, and a
//! structural codec chosen by the resolution cascade. Codecs keep no
//! per-call state; everything a traversal needs lives in its
//! [`DecodeContext`] or [`EncodeContext`].

// -----------------------------------------------------------------------------
// Modules

mod containers;
mod context;
mod enums;
mod object;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use context::{DecodeContext, EncodeContext};

pub(crate) use containers::{ArrayCodec, ListCodec, MapCodec, NullableCodec};
pub(crate) use containers::{OptionWrapperCodec, PointerCodec, SetCodec, TupleCodec};
pub(crate) use enums::{EnumCodec, FamilyCodec, FamilyMember};
pub(crate) use object::{Accepts, Creation, CtorSlot, FieldSlot, ObjectCodec, ParamSlot};
pub(crate) use object::{SingleArg, SingletonCodec, WrapBuild, WrapperCodec};
pub(crate) use scalar::ScalarCodec;

use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString;
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;
use std::sync::OnceLock;

use crate::config::{DecodeFn, EncodeFn};
use crate::engine::Json;
use crate::error::{BoxError, ErrorKind, JsonError};
use crate::info::{Factory, ToJsonFn, TypeDescriptor};
use crate::path::JsonPath;
use crate::value::JsonValue;

// -----------------------------------------------------------------------------
// Strategy

/// Which rule of the resolution cascade produced a codec.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Strategy {
    /// An explicit mapping from the configuration.
    Mapping,
    /// A from-JSON factory declared by the type.
    Factory,
    /// A to-JSON function declared by the type.
    ToJson,
    /// `Option<T>` folded into a nullable descriptor.
    Nullable,
    Scalar,
    Enum,
    Array,
    Sequence,
    Set,
    Map,
    Tuple,
    /// `Option<Option<T>>`.
    OptionWrapper,
    Pointer,
    Family,
    SingleArgConstructor,
    Delegating,
    Singleton,
    Foreign,
    Object,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mapping => "explicit mapping",
            Self::Factory => "factory",
            Self::ToJson => "to-JSON function",
            Self::Nullable => "nullable",
            Self::Scalar => "scalar",
            Self::Enum => "enumeration",
            Self::Array => "array",
            Self::Sequence => "sequence",
            Self::Set => "set",
            Self::Map => "map",
            Self::Tuple => "tuple",
            Self::OptionWrapper => "option wrapper",
            Self::Pointer => "pointer",
            Self::Family => "polymorphic family",
            Self::SingleArgConstructor => "single-argument constructor",
            Self::Delegating => "delegating",
            Self::Singleton => "singleton",
            Self::Foreign => "foreign type",
            Self::Object => "object",
        })
    }
}

// -----------------------------------------------------------------------------
// CodecImpl

/// A structural codec for one kind of type.
pub(crate) trait CodecImpl: Send + Sync {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError>;

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError>;
}

// -----------------------------------------------------------------------------
// Codec

/// The resolved conversion of one [`TypeDescriptor`].
///
/// Decoding tries, in order: the explicit decode mapping, the type's
/// factories accepting the input's JSON variant, then the structural codec.
/// Encoding tries the explicit encode mapping, the type's to-JSON function,
/// then the structural codec.
pub struct Codec {
    descriptor: TypeDescriptor,
    decode_strategy: Strategy,
    encode_strategy: Strategy,
    decoder: Option<DecodeFn>,
    encoder: Option<EncodeFn>,
    factories: Vec<Factory>,
    to_json: Option<ToJsonFn>,
    base: Result<(Strategy, Box<dyn CodecImpl>), JsonError>,
}

impl Codec {
    /// Assembles a codec; fails when neither direction has any way to convert.
    pub(crate) fn assemble(
        descriptor: TypeDescriptor,
        decoder: Option<DecodeFn>,
        encoder: Option<EncodeFn>,
        factories: Vec<Factory>,
        to_json: Option<ToJsonFn>,
        base: Result<(Strategy, Box<dyn CodecImpl>), JsonError>,
    ) -> Result<Self, JsonError> {
        let base_strategy = base.as_ref().ok().map(|(strategy, _)| *strategy);

        let decode_strategy = if decoder.is_some() {
            Some(Strategy::Mapping)
        } else if !factories.is_empty() {
            Some(Strategy::Factory)
        } else {
            base_strategy
        };
        let encode_strategy = if encoder.is_some() {
            Some(Strategy::Mapping)
        } else if to_json.is_some() {
            Some(Strategy::ToJson)
        } else {
            base_strategy
        };

        let (decode_strategy, encode_strategy) = match (decode_strategy, encode_strategy) {
            (None, None) => return Err(base.err().unwrap_or_else(|| unresolvable(&descriptor))),
            (Some(d), Some(e)) => (d, e),
            (Some(d), None) => (d, d),
            (None, Some(e)) => (e, e),
        };

        Ok(Self {
            descriptor,
            decode_strategy,
            encode_strategy,
            decoder,
            encoder,
            factories,
            to_json,
            base,
        })
    }

    #[inline]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// The rule used to decode.
    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.decode_strategy
    }

    /// The rule used to encode.
    #[inline]
    pub fn encode_strategy(&self) -> Strategy {
        self.encode_strategy
    }

    /// Whether encoding goes through an explicit mapping.
    #[inline]
    pub fn has_encode_mapping(&self) -> bool {
        self.encoder.is_some()
    }

    pub(crate) fn decode_in(
        &self,
        value: &JsonValue,
        cx: &mut DecodeContext<'_>,
    ) -> Result<Box<dyn Any>, JsonError> {
        if let Some(decoder) = &self.decoder {
            return decoder(value).map_err(|err| custom_failure(&self.descriptor, err, cx.path()));
        }

        let kind = value.kind();
        if let Some(factory) = self.factories.iter().find(|factory| factory.accepts(kind)) {
            return factory
                .create(value)
                .map_err(|reason| cx.mismatch(self.descriptor.to_string(), value, reason));
        }

        match &self.base {
            Ok((_, base)) => base.decode(value, cx).map_err(|err| err.at(cx.path())),
            Err(_) if !self.factories.is_empty() => {
                let accepted = self
                    .factories
                    .iter()
                    .flat_map(Factory::accepted_kinds)
                    .map(|kind| kind.as_str())
                    .collect::<Vec<_>>();
                Err(cx.mismatch(
                    self.descriptor.to_string(),
                    value,
                    format!("no factory accepts a {}; expected one of: {}", kind.as_str(), accepted.join(", ")),
                ))
            }
            Err(err) => Err(err.clone().at(cx.path())),
        }
    }

    pub(crate) fn encode_in(
        &self,
        value: &dyn Any,
        cx: &mut EncodeContext<'_>,
    ) -> Result<JsonValue, JsonError> {
        if let Some(encoder) = &self.encoder {
            return encoder(value).map_err(|err| custom_failure(&self.descriptor, err, cx.path()));
        }
        if let Some(to_json) = self.to_json {
            return to_json(value).map_err(|reason| cx.unencodable(self.descriptor.to_string(), reason));
        }
        match &self.base {
            Ok((_, base)) => base.encode(value, cx).map_err(|err| err.at(cx.path())),
            Err(err) => Err(err.clone().at(cx.path())),
        }
    }
}

impl fmt::Debug for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("descriptor", &self.descriptor)
            .field("decode", &self.decode_strategy)
            .field("encode", &self.encode_strategy)
            .finish_non_exhaustive()
    }
}

fn unresolvable(descriptor: &TypeDescriptor) -> JsonError {
    JsonError::unresolvable(descriptor.to_string(), "no resolution rule applies")
}

fn custom_failure(descriptor: &TypeDescriptor, err: BoxError, path: JsonPath) -> JsonError {
    JsonError::new(
        ErrorKind::CustomMappingFailure {
            type_name: descriptor.to_string(),
            source: Arc::from(err),
        },
        path,
    )
}

// -----------------------------------------------------------------------------
// CodecRef

/// A sub-codec captured at resolution time.
///
/// `Deferred` stands for a descriptor that was still being resolved higher
/// on the stack (a recursive type). Its slot is filled once that resolution
/// completes; if the codec has since been dropped, it is resolved again.
#[derive(Clone)]
pub(crate) enum CodecRef {
    Ready(Arc<Codec>),
    Deferred {
        slot: Arc<OnceLock<Weak<Codec>>>,
        descriptor: TypeDescriptor,
    },
}

impl CodecRef {
    pub fn get(&self, json: &Json) -> Result<Arc<Codec>, JsonError> {
        match self {
            Self::Ready(codec) => Ok(codec.clone()),
            Self::Deferred { slot, descriptor } => match slot.get().and_then(Weak::upgrade) {
                Some(codec) => Ok(codec),
                None => json.resolve(descriptor),
            },
        }
    }

    #[inline]
    pub fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        match self {
            Self::Ready(codec) => codec.decode_in(value, cx),
            Self::Deferred { .. } => {
                let codec = self.get(cx.json()).map_err(|err| err.at(cx.path()))?;
                codec.decode_in(value, cx)
            }
        }
    }

    #[inline]
    pub fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        match self {
            Self::Ready(codec) => codec.encode_in(value, cx),
            Self::Deferred { .. } => {
                let codec = self.get(cx.json()).map_err(|err| err.at(cx.path()))?;
                codec.encode_in(value, cx)
            }
        }
    }

    /// See [`Codec::has_encode_mapping`].
    pub fn has_encode_mapping(&self, json: &Json) -> bool {
        self.get(json).is_ok_and(|codec| codec.has_encode_mapping())
    }
}
