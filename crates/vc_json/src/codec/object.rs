use alloc::boxed::Box;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;

use crate::codec::{CodecImpl, CodecRef, DecodeContext, EncodeContext};
use crate::error::{ErrorKind, JsonError};
use crate::info::{BuildFn, DefaultFn, FieldInfo, Getter, OptionalInfo, ScalarClass};
use crate::info::{SingletonInfo, WrapFn};
use crate::value::{JsonObject, JsonValue};

// -----------------------------------------------------------------------------
// Slots

/// A readable, non-ignored property as it appears on the wire.
pub(crate) struct FieldSlot {
    pub(crate) wire: Box<str>,
    pub(crate) include_null: bool,
    pub(crate) codec: CodecRef,
    pub(crate) info: FieldInfo,
}

/// A constructor parameter as it appears on the wire.
pub(crate) struct ParamSlot {
    pub(crate) wire: Box<str>,
    /// `None` when the property is ignored; the parameter then always
    /// takes its fallback.
    pub(crate) codec: Option<CodecRef>,
    pub(crate) default: Option<DefaultFn>,
    /// Set when the parameter is nullable; absence then means `None`.
    pub(crate) none: Option<&'static OptionalInfo>,
}

impl ParamSlot {
    /// The argument used when the property is absent, if any.
    fn fallback(&self) -> Option<Box<dyn Any>> {
        match (self.default, self.none) {
            (Some(default), _) => Some(default()),
            (None, Some(option)) => Some(option.none()),
            (None, None) => None,
        }
    }

    #[inline]
    fn is_required(&self) -> bool {
        self.default.is_none() && self.none.is_none()
    }

    #[inline]
    fn reads(&self, key: &str) -> bool {
        self.codec.is_some() && *self.wire == *key
    }

    /// Whether the constructor can be called without this parameter.
    #[inline]
    fn satisfied_by(&self, present: &[&str]) -> bool {
        !self.is_required() || (self.codec.is_some() && present.contains(&&*self.wire))
    }
}

pub(crate) struct CtorSlot {
    pub(crate) params: Vec<ParamSlot>,
    pub(crate) build: BuildFn,
}

impl CtorSlot {
    #[inline]
    fn reads(&self, key: &str) -> bool {
        self.params.iter().any(|param| param.reads(key))
    }
}

/// How an object codec produces a fresh value.
pub(crate) enum Creation {
    /// Candidate constructors in declaration order.
    Constructors(Vec<CtorSlot>),
    /// A no-argument constructor followed by setters.
    Default(DefaultFn),
}

/// The JSON input a single-argument constructor takes.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Accepts {
    Scalar(ScalarClass),
    Array,
}

impl Accepts {
    fn matches(self, value: &JsonValue) -> bool {
        match self {
            Self::Scalar(class) => class.accepts(value),
            Self::Array => value.as_array().is_some(),
        }
    }
}

/// A single-argument constructor usable on non-object input.
pub(crate) struct SingleArg {
    pub(crate) accepts: Accepts,
    pub(crate) param: CodecRef,
    pub(crate) build: BuildFn,
}

// -----------------------------------------------------------------------------
// ObjectCodec

/// Records, written as JSON objects.
///
/// Decoding picks a constructor, then assigns the remaining present
/// properties through setters. Encoding reads every field in declaration
/// order. Wire names, ignore flags and sub-codecs are fixed when the codec
/// is resolved.
pub(crate) struct ObjectCodec {
    pub(crate) type_name: String,
    pub(crate) fields: Vec<FieldSlot>,
    /// Wire names of ignored properties; skipped when present.
    pub(crate) ignored: Vec<Box<str>>,
    pub(crate) creation: Creation,
    pub(crate) allow_extra: bool,
    pub(crate) include_all: bool,
    pub(crate) single_args: Vec<SingleArg>,
}

impl ObjectCodec {
    fn constructors(&self) -> &[CtorSlot] {
        match &self.creation {
            Creation::Constructors(ctors) => ctors,
            Creation::Default(_) => &[],
        }
    }

    fn is_ignored(&self, key: &str) -> bool {
        self.ignored.iter().any(|name| **name == *key)
    }

    fn is_known(&self, key: &str) -> bool {
        self.fields.iter().any(|field| *field.wire == *key)
            || self.constructors().iter().any(|ctor| ctor.reads(key))
    }

    fn is_settable(&self, key: &str) -> bool {
        self.fields
            .iter()
            .any(|field| *field.wire == *key && field.info.setter().is_some())
    }

    fn decode_single(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let mut matching = self.single_args.iter().filter(|arg| arg.accepts.matches(value));
        let Some(arg) = matching.next() else {
            return Err(cx.mismatch(self.type_name.as_str(), value, "expected an object"));
        };
        if matching.next().is_some() {
            return Err(cx.error(ErrorKind::AmbiguousConstructorOrFactory {
                type_name: self.type_name.clone(),
                reason: format!("several single-argument constructors accept a {}", value.kind().as_str()).into(),
            }));
        }
        let param = arg.param.decode(value, cx)?;
        (arg.build)(vec![param]).map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    /// Picks the constructor for the present properties.
    fn choose<'c>(
        &self,
        ctors: &'c [CtorSlot],
        present: &[&str],
        value: &JsonValue,
        cx: &DecodeContext<'_>,
    ) -> Result<&'c CtorSlot, JsonError> {
        if let [only] = ctors {
            let missing = only
                .params
                .iter()
                .filter(|param| !param.satisfied_by(present))
                .map(|param| param.wire.to_string())
                .collect::<Vec<_>>();
            if !missing.is_empty() {
                return Err(cx.error(ErrorKind::MissingRequiredProperty {
                    type_name: self.type_name.clone(),
                    properties: missing,
                }));
            }
            return Ok(only);
        }

        let fits = |ctor: &CtorSlot| {
            ctor.params.iter().all(|param| param.satisfied_by(present))
                && present
                    .iter()
                    .filter(|key| self.is_known(key))
                    .all(|key| ctor.reads(key) || self.is_settable(key))
        };
        if let Some(ctor) = ctors.iter().find(|ctor| fits(ctor)) {
            return Ok(ctor);
        }

        let unmatched = present
            .iter()
            .filter(|key| !ctors.iter().any(|ctor| ctor.reads(key)))
            .copied()
            .collect::<Vec<_>>();
        let listed = if unmatched.is_empty() { present } else { &unmatched[..] };
        Err(cx.mismatch(
            self.type_name.as_str(),
            value,
            format!("no constructor matches the properties: {}", listed.join(", ")),
        ))
    }

    fn construct(
        &self,
        ctor: &CtorSlot,
        object: &JsonObject,
        value: &JsonValue,
        cx: &mut DecodeContext<'_>,
    ) -> Result<Box<dyn Any>, JsonError> {
        let mut args = Vec::with_capacity(ctor.params.len());
        for param in &ctor.params {
            let present = param.codec.as_ref().zip(object.get(&param.wire));
            let arg = match present {
                Some((codec, property)) => cx.scoped(&*param.wire, |cx| codec.decode(property, cx))?,
                None => param.fallback().ok_or_else(|| {
                    cx.error(ErrorKind::MissingRequiredProperty {
                        type_name: self.type_name.clone(),
                        properties: vec![param.wire.to_string()],
                    })
                })?,
            };
            args.push(arg);
        }
        (ctor.build)(args).map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    /// Assigns every present field the constructor did not consume.
    fn assign(
        &self,
        target: &mut dyn Any,
        consumed: Option<&CtorSlot>,
        object: &JsonObject,
        value: &JsonValue,
        cx: &mut DecodeContext<'_>,
    ) -> Result<(), JsonError> {
        for field in &self.fields {
            if consumed.is_some_and(|ctor| ctor.reads(&field.wire)) {
                continue;
            }
            let Some(property) = object.get(&field.wire) else {
                continue;
            };
            let Some(setter) = field.info.setter() else {
                return Err(cx.scoped(&*field.wire, |cx| {
                    cx.mismatch(self.type_name.as_str(), value, "the property cannot be assigned")
                }));
            };
            cx.scoped(&*field.wire, |cx| -> Result<(), JsonError> {
                let decoded = field.codec.decode(property, cx)?;
                setter(target, decoded).map_err(|reason| cx.mismatch(self.type_name.as_str(), property, reason))
            })?;
        }
        Ok(())
    }
}

impl CodecImpl for ObjectCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let Some(object) = value.as_object() else {
            return self.decode_single(value, cx);
        };

        if !self.allow_extra {
            let unknown = object
                .keys()
                .filter(|key| !self.is_known(key) && !self.is_ignored(key))
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                return Err(cx.error(ErrorKind::UnknownProperty {
                    type_name: self.type_name.clone(),
                    properties: unknown,
                }));
            }
        }

        match &self.creation {
            Creation::Constructors(ctors) => {
                let present = object.keys().filter(|key| self.is_known(key)).collect::<Vec<_>>();
                let ctor = self.choose(ctors, &present, value, cx)?;
                let mut target = self.construct(ctor, object, value, cx)?;
                self.assign(target.as_mut(), Some(ctor), object, value, cx)?;
                Ok(target)
            }
            Creation::Default(default) => {
                let mut target = default();
                self.assign(target.as_mut(), None, object, value, cx)?;
                Ok(target)
            }
        }
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        let include_nulls = self.include_all || cx.json().config().include_nulls();
        let mut object = JsonObject::with_capacity(self.fields.len());
        for field in &self.fields {
            let Some(property) = field.info.get(value) else {
                return Err(cx.unencodable(
                    self.type_name.as_str(),
                    format!("property `{}` cannot be read", field.info.name()),
                ));
            };
            let encoded = cx.scoped(&*field.wire, |cx| field.codec.encode(property, cx))?;
            if encoded.is_null() && !include_nulls && !field.include_null {
                continue;
            }
            object
                .insert(field.wire.to_string(), encoded)
                .map_err(|dup| cx.unencodable(self.type_name.as_str(), format!("duplicate property `{}`", dup.0)))?;
        }
        Ok(JsonValue::Object(object))
    }
}

// -----------------------------------------------------------------------------
// WrapperCodec

/// How a [`WrapperCodec`] rebuilds its value.
pub(crate) enum WrapBuild {
    One(WrapFn),
    /// A single-parameter constructor.
    Args(BuildFn),
}

/// Types written as the one value they wrap: transparent structs,
/// delegating types and foreign wrappers.
pub(crate) struct WrapperCodec {
    pub(crate) type_name: String,
    pub(crate) inner: CodecRef,
    pub(crate) build: WrapBuild,
    pub(crate) unwrap: Getter,
}

impl CodecImpl for WrapperCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        let inner = self.inner.decode(value, cx)?;
        let built = match self.build {
            WrapBuild::One(wrap) => wrap(inner),
            WrapBuild::Args(build) => build(vec![inner]),
        };
        built.map_err(|reason| cx.mismatch(self.type_name.as_str(), value, reason))
    }

    fn encode(&self, value: &dyn Any, cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        let Some(inner) = (self.unwrap)(value) else {
            return Err(cx.unencodable(self.type_name.as_str(), "the wrapped value cannot be read"));
        };
        self.inner.encode(inner, cx)
    }
}

// -----------------------------------------------------------------------------
// SingletonCodec

/// Types with exactly one value, written as `{}`.
///
/// Any input yields the instance, but an object input still has its
/// properties checked against the (empty) property set.
pub(crate) struct SingletonCodec {
    pub(crate) type_name: String,
    pub(crate) info: &'static SingletonInfo,
    pub(crate) allow_extra: bool,
}

impl CodecImpl for SingletonCodec {
    fn decode(&self, value: &JsonValue, cx: &mut DecodeContext<'_>) -> Result<Box<dyn Any>, JsonError> {
        if let Some(object) = value.as_object()
            && !self.allow_extra
            && !object.is_empty()
        {
            return Err(cx.error(ErrorKind::UnknownProperty {
                type_name: self.type_name.clone(),
                properties: object.keys().map(ToString::to_string).collect(),
            }));
        }
        Ok(self.info.instance())
    }

    fn encode(&self, _value: &dyn Any, _cx: &mut EncodeContext<'_>) -> Result<JsonValue, JsonError> {
        Ok(JsonValue::Object(JsonObject::new()))
    }
}
