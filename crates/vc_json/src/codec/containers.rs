use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::any::Any;

use crate::codec::{CodecImpl, CodecRef, DecodeContext, EncodeContext};
use crate::config::EncodeFn;
use crate::error::{ErrorKind, JsonError};
use crate::info::{ArrayInfo, CollectError, ListInfo, MapInfo, OptionalInfo};
use crate::info::{PointerInfo, SetInfo, TupleInfo};
use crate::value::{Decimal, JsonObject, JsonValue};

// -----------------------------------------------------------------------------
// Helpers

fn expect_array<'v>(
    type_name: &str,
    value: &'v JsonValue,
    cx: &DecodeContext<'_>,
) -> Result<&'v [JsonValue], JsonError> {
    value
        .as_array()
        .ok_or_else(|| cx.mismatch(type_name, value, "expected an array"))
}

fn decode_items(
    item: &CodecRef,
    values: &[JsonValue],
    cx: &mut DecodeContext<'_>,
) -> Result<Vec<Box<dyn Any>>, JsonError> {
    let mut items = Vec::with_capacity(values.len());
    for (index, value) in values.iter().enumerate() {
        items.push(cx.scoped(index, |cx| item.decode(value, cx))?);
    }
    Ok(items)
}

fn encode_items(
    item: &CodecRef,
    values: Vec<&dyn Any>,
    cx: &mut EncodeContext<'_>,
) -> Result<JsonValue, JsonError> {
    let mut items = Vec::with_capacity(values.len());
    for (index, value) in values.into_iter().enumerate() {
        items.push(cx.scoped(index, |cx| item.encode(value, cx))?);
    }
    Ok(JsonValue::Array(items))
}

#[inline]
fn foreign_value(type_name: &str, cx: &EncodeContext<'_>) -> JsonError {
    cx.unencodable(type_name, "the value is not of the resolved type")
}

// -----------------------------------------------------------------------------
// ArrayCodec

/// `[T; N]`: a JSON array of exactly `N` elements.
pub(crate) struct ArrayCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static ArrayInfo,
    pub(crate) item: CodecRef,
}

impl CodecImpl for ArrayCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let values = expect_array(&self.type_name, value, cx)?;
        if values.len() != self.info.len() {
            return Err(cx.mismatch(
                self.type_name.as_str(),
                value,
                format!("expected {} elements, found {}", self.info.len(), values.len()),
            ));
        }
        let items = decode_items(&self.item, values, cx)?;
        (self.info.build_fn())(items).map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        let items = (self.info.items_fn())(value).ok_or_else(|| foreign_value(&self.type_name, cx))?;
        encode_items(&self.item, items, cx)
    }
}

// -----------------------------------------------------------------------------
// ListCodec

/// Growable sequences.
pub(crate) struct ListCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static ListInfo,
    pub(crate) item: CodecRef,
}

impl CodecImpl for ListCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let values = expect_array(&self.type_name, value, cx)?;
        let items = decode_items(&self.item, values, cx)?;
        (self.info.build_fn())(items).map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        let items = (self.info.items_fn())(value).ok_or_else(|| foreign_value(&self.type_name, cx))?;
        encode_items(&self.item, items, cx)
    }
}

// -----------------------------------------------------------------------------
// SetCodec

/// Sets; a repeated element fails with its position.
pub(crate) struct SetCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static SetInfo,
    pub(crate) item: CodecRef,
}

impl CodecImpl for SetCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let values = expect_array(&self.type_name, value, cx)?;
        let items = decode_items(&self.item, values, cx)?;
        (self.info.collect_fn())(items).map_err(|err| match err {
            CollectError::Duplicate(index) => cx.scoped(index, |cx| {
                cx.error(ErrorKind::DuplicateSetElement {
                    type_name: self.type_name.clone(),
                    index,
                })
            }),
            CollectError::Invalid(reason) => cx.mismatch(self.type_name.as_str(), value, reason),
        })
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        let items = (self.info.items_fn())(value).ok_or_else(|| foreign_value(&self.type_name, cx))?;
        encode_items(&self.item, items, cx)
    }
}

// -----------------------------------------------------------------------------
// MapCodec

/// Maps, written as JSON objects keyed by the encoded key's text.
///
/// Keys are decoded from their text first; if the key type rejects a
/// string, the text is read again as a number or boolean.
pub(crate) struct MapCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static MapInfo,
    pub(crate) key: CodecRef,
    pub(crate) value: CodecRef,
}

impl MapCodec {
    fn decode_key(&self, key: &str, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let err = match self.key.decode(&JsonValue::String(key.to_string()), cx) {
            Ok(decoded) => return Ok(decoded),
            Err(err) => err,
        };
        if !matches!(err.kind(), ErrorKind::DecodeMismatch { .. }) {
            return Err(err);
        }
        match reparse_key(key) {
            Some(reparsed) => self.key.decode(&reparsed, cx).map_err(|_| err),
            None => Err(err),
        }
    }
}

fn reparse_key(key: &str) -> Option<JsonValue> {
    match key {
        "true" => Some(JsonValue::Bool(true)),
        "false" => Some(JsonValue::Bool(false)),
        _ => {
            let number = key.parse::<Decimal>().ok()?;
            match number.to_i128().map(i64::try_from) {
                Some(Ok(small)) => Some(JsonValue::from_i64(small)),
                _ => Some(JsonValue::Decimal(number)),
            }
        }
    }
}

fn key_text(key: JsonValue) -> Result<String, JsonValue> {
    match key {
        JsonValue::String(text) => Ok(text),
        JsonValue::Bool(flag) => Ok(flag.to_string()),
        JsonValue::Int(number) => Ok(number.to_string()),
        JsonValue::Long(number) => Ok(number.to_string()),
        JsonValue::Decimal(number) => Ok(number.as_str().to_string()),
        other => Err(other),
    }
}

impl CodecImpl for MapCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let Some(object) = value.as_object() else {
            return Err(cx.mismatch(self.type_name.as_str(), value, "expected an object"));
        };
        let mut entries = Vec::with_capacity(object.len());
        let mut keys = Vec::with_capacity(object.len());
        for (key, entry) in object.iter() {
            let decoded = cx.scoped(key.as_str(), |cx| -> Result<_, JsonError> {
                let decoded_key = self.decode_key(key, cx)?;
                let decoded_value = self.value.decode(entry, cx)?;
                Ok((decoded_key, decoded_value))
            })?;
            entries.push(decoded);
            keys.push(key.as_str());
        }
        (self.info.collect_fn())(entries).map_err(|err| match err {
            CollectError::Duplicate(index) => {
                let key = keys.get(index).copied().unwrap_or_default();
                cx.scoped(key, |cx| cx.mismatch(self.type_name.as_str(), value, "the key repeats an earlier one"))
            }
            CollectError::Invalid(reason) => cx.mismatch(self.type_name.as_str(), value, reason),
        })
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        let entries = (self.info.entries_fn())(value).ok_or_else(|| foreign_value(&self.type_name, cx))?;
        let mut object = JsonObject::with_capacity(entries.len());
        for (key, entry) in entries {
            let key = match key_text(self.key.encode(key, cx)?) {
                Ok(text) => text,
                Err(other) => {
                    return Err(cx.unencodable(
                        self.type_name.as_str(),
                        format!("a map key must be written as a string, number or boolean, not {}", other.kind().as_str()),
                    ));
                }
            };
            let encoded = cx.scoped(key.as_str(), |cx| self.value.encode(entry, cx))?;
            object
                .insert(key, encoded)
                .map_err(|dup| cx.unencodable(self.type_name.as_str(), format!("two keys are written as `{}`", dup.0)))?;
        }
        Ok(JsonValue::Object(object))
    }
}

// -----------------------------------------------------------------------------
// TupleCodec

const TUPLE_NAMES: [&str; 3] = ["first", "second", "third"];

/// Pairs and triples: written as arrays, read from arrays or from
/// `{"first", "second"[, "third"]}` objects.
pub(crate) struct TupleCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static TupleInfo,
    pub(crate) items: Vec<CodecRef>,
}

impl CodecImpl for TupleCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let arity = self.items.len();
        let mut decoded = Vec::with_capacity(arity);
        match value {
            JsonValue::Array(values) => {
                if values.len() != arity {
                    return Err(cx.mismatch(
                        self.type_name.as_str(),
                        value,
                        format!("expected {arity} elements, found {}", values.len()),
                    ));
                }
                for (index, (item, value)) in self.items.iter().zip(values).enumerate() {
                    decoded.push(cx.scoped(index, |cx| item.decode(value, cx))?);
                }
            }
            JsonValue::Object(object) => {
                let names = &TUPLE_NAMES[..arity.min(TUPLE_NAMES.len())];
                let missing = names
                    .iter()
                    .filter(|name| !object.contains_key(name))
                    .map(|name| name.to_string())
                    .collect::<Vec<_>>();
                if !missing.is_empty() {
                    return Err(cx.error(ErrorKind::MissingRequiredProperty {
                        type_name: self.type_name.clone(),
                        properties: missing,
                    }));
                }
                if !cx.json().config().allow_extra() {
                    let extra = object
                        .keys()
                        .filter(|key| !names.contains(key))
                        .map(ToString::to_string)
                        .collect::<Vec<_>>();
                    if !extra.is_empty() {
                        return Err(cx.error(ErrorKind::UnknownProperty {
                            type_name: self.type_name.clone(),
                            properties: extra,
                        }));
                    }
                }
                for (item, name) in self.items.iter().zip(names) {
                    let property = object.get(name).unwrap_or(&JsonValue::Null);
                    decoded.push(cx.scoped(*name, |cx| item.decode(property, cx))?);
                }
            }
            _ => {
                return Err(cx.mismatch(self.type_name.as_str(), value, "expected an array or an object"));
            }
        }
        (self.info.build_fn())(decoded).map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        let parts = (self.info.get_fn())(value).ok_or_else(|| foreign_value(&self.type_name, cx))?;
        let mut items = Vec::with_capacity(parts.len());
        for (index, (item, part)) in self.items.iter().zip(parts).enumerate() {
            items.push(cx.scoped(index, |cx| item.encode(part, cx))?);
        }
        Ok(JsonValue::Array(items))
    }
}

// -----------------------------------------------------------------------------
// NullableCodec

/// `Option<T>` under a nullable descriptor: `null` is `None`, anything else
/// is `Some` of the inner codec's result.
///
/// `Some` is written by `T`'s own mapping if it has one, else by the mapping
/// registered for the option, else by the inner codec.
pub(crate) struct NullableCodec {
    pub(crate) type_name: String,
    pub(crate) option: &'static OptionalInfo,
    pub(crate) inner: CodecRef,
    pub(crate) encoder: Option<EncodeFn>,
}

impl NullableCodec {
    fn encode_mapped(&self, encoder: &EncodeFn, value: &dyn Any, cx: &EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        encoder(value).map_err(|err| {
            cx.error(ErrorKind::CustomMappingFailure {
                type_name: self.type_name.clone(),
                source: err.into(),
            })
        })
    }
}

impl CodecImpl for NullableCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        if value.is_null() {
            return Ok(self.option.none());
        }
        let inner = self.inner.decode(value, cx)?;
        self.option
            .wrap_some(inner)
            .map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        match self.option.get(value) {
            None => Err(foreign_value(&self.type_name, cx)),
            Some(None) => match &self.encoder {
                Some(encoder) => self.encode_mapped(encoder, value, cx),
                None => Ok(JsonValue::Null),
            },
            Some(Some(inner)) => match &self.encoder {
                Some(encoder) if !self.inner.has_encode_mapping(cx.json()) => {
                    self.encode_mapped(encoder, value, cx)
                }
                _ => self.inner.encode(inner, cx),
            },
        }
    }
}

// -----------------------------------------------------------------------------
// OptionWrapperCodec

/// `Option<Option<T>>`: the outer option around a nullable inner one.
pub(crate) struct OptionWrapperCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static OptionalInfo,
    pub(crate) inner: CodecRef,
}

impl CodecImpl for OptionWrapperCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        if value.is_null() {
            return Ok(self.info.none());
        }
        let inner = self.inner.decode(value, cx)?;
        self.info
            .wrap_some(inner)
            .map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        match self.info.get(value) {
            None => Err(foreign_value(&self.type_name, cx)),
            Some(None) => Ok(JsonValue::Null),
            Some(Some(inner)) => self.inner.encode(inner, cx),
        }
    }
}

// -----------------------------------------------------------------------------
// PointerCodec

/// Owning and shared pointers, written as their pointee.
///
/// The pointee is marked in flight while it is encoded, which turns a
/// reference cycle into [`ErrorKind::CircularReference`].
pub(crate) struct PointerCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static PointerInfo,
    pub(crate) inner: CodecRef,
}

impl CodecImpl for PointerCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let inner = self.inner.decode(value, cx)?;
        (self.info.wrap_fn())(inner).map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        let visited = {
            let mut visit = |pointee: &dyn Any| {
                cx.guarded(pointee, || self.type_name.clone(), |cx| self.inner.encode(pointee, cx))
            };
            (self.info.visit_fn())(value, &mut visit)
        };
        visited.unwrap_or_else(|| Err(foreign_value(&self.type_name, cx)))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_reparsed_as_numbers_or_booleans() {
        assert_eq!(reparse_key("12"), Some(JsonValue::Int(12)));
        assert_eq!(reparse_key("-9000000000").map(|v| v.kind()), Some(crate::JsonKind::Long));
        assert_eq!(reparse_key("1.5").map(|v| v.kind()), Some(crate::JsonKind::Decimal));
        assert_eq!(reparse_key("true"), Some(JsonValue::Bool(true)));
        assert_eq!(reparse_key("abc"), None);
    }

    #[test]
    fn key_text_of_scalars() {
        assert_eq!(key_text(JsonValue::Int(3)).unwrap(), "3");
        assert_eq!(key_text(JsonValue::Bool(false)).unwrap(), "false");
        assert!(key_text(JsonValue::Array(Vec::new())).is_err());
    }
}
