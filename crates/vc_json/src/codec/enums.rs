use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;

use crate::codec::{CodecImpl, CodecRef, DecodeContext, EncodeContext};
use crate::config::{DiscriminatorLocation, EncodeFn};
use crate::error::{ErrorKind, JsonError};
use crate::info::{EnumInfo, FamilyInfo, WrapFn};
use crate::value::{JsonObject, JsonValue};

// -----------------------------------------------------------------------------
// EnumCodec

/// Unit-only enums, written as the variant's wire name.
pub(crate) struct EnumCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static EnumInfo,
    /// Wire name per variant index.
    pub(crate) names: Vec<Box<str>>,
}

impl CodecImpl for EnumCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let Some(text) = value.as_str() else {
            return Err(cx.mismatch(self.type_name.as_str(), value, "expected a string"));
        };
        self.names
            .iter()
            .position(|name| **name == *text)
            .and_then(|index| self.info.instantiate(index))
            .ok_or_else(|| {
                cx.mismatch(
                    self.type_name.as_str(),
                    value,
                    format!("unknown variant, expected one of: {}", self.names.join(", ")),
                )
            })
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        self.info
            .index_of(value)
            .and_then(|index| self.names.get(index))
            .map(|name| JsonValue::String(name.to_string()))
            .ok_or_else(|| cx.unencodable(self.type_name.as_str(), "not a value of this enumeration"))
    }
}

// -----------------------------------------------------------------------------
// FamilyCodec

/// One dispatchable member of a family.
pub(crate) struct FamilyMember {
    pub(crate) tag: Box<str>,
    pub(crate) index: usize,
    pub(crate) payload: CodecRef,
    pub(crate) wrap: WrapFn,
}

/// Closed polymorphic families, dispatched on a discriminator.
///
/// With a property location the discriminator is written as the first
/// property, followed by the payload's own properties; a payload property
/// with the same name is dropped.
pub(crate) struct FamilyCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static FamilyInfo,
    pub(crate) location: DiscriminatorLocation,
    pub(crate) members: Vec<FamilyMember>,
    /// Mapping registered for the family itself.
    pub(crate) encoder: Option<EncodeFn>,
}

impl FamilyCodec {
    fn known_tags(&self) -> Vec<String> {
        self.members.iter().map(|member| member.tag.to_string()).collect()
    }
}

impl CodecImpl for FamilyCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let Some(object) = value.as_object() else {
            return Err(cx.mismatch(self.type_name.as_str(), value, "expected an object"));
        };

        let tag = match &self.location {
            DiscriminatorLocation::Property(name) => object.get(name),
            DiscriminatorLocation::Path(path) => value.pointer(path),
        };
        let Some(tag) = tag else {
            return Err(cx.error(ErrorKind::MissingRequiredProperty {
                type_name: self.type_name.clone(),
                properties: vec![self.location.to_string()],
            }));
        };
        let Some(text) = tag.as_str() else {
            return Err(cx.mismatch(
                self.type_name.as_str(),
                tag,
                format!("the discriminator `{}` must be a string", self.location),
            ));
        };
        let Some(member) = self.members.iter().find(|member| *member.tag == *text) else {
            return Err(cx.error(ErrorKind::UnknownDiscriminatorValue {
                type_name: self.type_name.clone(),
                value: text.to_string(),
                known: self.known_tags(),
            }));
        };

        let payload = match &self.location {
            DiscriminatorLocation::Property(name) => member.payload.decode(&JsonValue::Object(object.without(name)), cx)?,
            DiscriminatorLocation::Path(_) => member.payload.decode(value, cx)?,
        };
        (member.wrap)(payload).map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        let Some((index, payload)) = self.info.split(value) else {
            return Err(cx.unencodable(self.type_name.as_str(), "not a value of this family"));
        };
        let member = self.members.iter().find(|member| member.index == index);
        let payload_mapped = member.is_some_and(|member| member.payload.has_encode_mapping(cx.json()));
        if !payload_mapped && let Some(encoder) = &self.encoder {
            return encoder(value).map_err(|err| {
                cx.error(ErrorKind::CustomMappingFailure {
                    type_name: self.type_name.clone(),
                    source: err.into(),
                })
            });
        }

        let Some(member) = member else {
            let variant = self.info.variants().get(index).map_or("?", |variant| variant.name());
            return Err(cx.unencodable(
                self.type_name.as_str(),
                format!("variant `{variant}` has no registered tag"),
            ));
        };

        let encoded = member.payload.encode(payload, cx)?;
        let DiscriminatorLocation::Property(name) = &self.location else {
            return Ok(encoded);
        };
        let fields = match encoded {
            JsonValue::Object(fields) => fields,
            // A payload mapping decides the wire form; only objects can carry the tag.
            other if payload_mapped => return Ok(other),
            _ => {
                return Err(cx.unencodable(
                    self.type_name.as_str(),
                    format!("variant `{}` is not written as an object", member.tag),
                ));
            }
        };

        let mut object = JsonObject::with_capacity(fields.len() + 1);
        let tagged = core::iter::once((name.to_string(), JsonValue::String(member.tag.to_string())));
        let rest = fields.into_entries().into_iter().filter(|(key, _)| key != name);
        for (key, field) in tagged.chain(rest) {
            object
                .insert(key, field)
                .map_err(|dup| cx.unencodable(self.type_name.as_str(), format!("duplicate property `{}`", dup.0)))?;
        }
        Ok(JsonValue::Object(object))
    }
}
