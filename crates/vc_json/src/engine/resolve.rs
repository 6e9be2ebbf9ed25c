use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString;
use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use std::sync::OnceLock;

use log::trace;

use crate::codec::{Accepts, ArrayCodec, Codec, CodecImpl, CodecRef, Creation, CtorSlot, EnumCodec};
use crate::codec::{FamilyCodec, FamilyMember, FieldSlot, ListCodec, MapCodec, NullableCodec};
use crate::codec::{ObjectCodec, OptionWrapperCodec, ParamSlot, PointerCodec, ScalarCodec, SetCodec};
use crate::codec::{SingleArg, SingletonCodec, Strategy, TupleCodec, WrapBuild, WrapperCodec};
use crate::config::{DiscriminatorLocation, EncodeFn, JsonConfig};
use crate::engine::Json;
use crate::error::JsonError;
use crate::info::{ConstructorInfo, CustomAttributes, FamilyInfo, FieldInfo, ForeignConstruction};
use crate::info::{ForeignInfo, StructInfo, TypeDescriptor, TypeHooks, TypeInfo, TypeRef};

type Base = Result<(Strategy, Box<dyn CodecImpl>), JsonError>;

/// One resolution: the descriptors being resolved on the current stack,
/// each with the slot its finished codec will be published to.
pub(super) struct Resolver<'a> {
    json: &'a Json,
    in_flight: Vec<(TypeDescriptor, Arc<OnceLock<Weak<Codec>>>)>,
}

impl<'a> Resolver<'a> {
    #[inline]
    pub(super) fn new(json: &'a Json) -> Self {
        Self {
            json,
            in_flight: Vec::new(),
        }
    }

    #[inline]
    fn config(&self) -> &'a JsonConfig {
        self.json.config()
    }

    pub(super) fn resolve(&mut self, descriptor: &TypeDescriptor) -> Result<Arc<Codec>, JsonError> {
        let slot = Arc::new(OnceLock::new());
        self.in_flight.push((descriptor.clone(), slot.clone()));
        let built = self.build(descriptor);
        self.in_flight.pop();

        let codec = self.json.publish(Arc::new(built?));
        trace!(
            "resolved `{descriptor}`: decode by {}, encode by {}",
            codec.strategy(),
            codec.encode_strategy(),
        );
        // Fails only if the slot was already set, which cannot happen.
        let _ = slot.set(Arc::downgrade(&codec));
        Ok(codec)
    }

    /// The codec of a type nested in the one being resolved.
    fn codec_ref(&mut self, descriptor: &TypeDescriptor) -> Result<CodecRef, JsonError> {
        if let Some((_, slot)) = self.in_flight.iter().find(|(pending, _)| pending == descriptor) {
            trace!("`{descriptor}` is recursive, deferring its codec");
            return Ok(CodecRef::Deferred {
                slot: slot.clone(),
                descriptor: descriptor.clone(),
            });
        }
        if let Some(codec) = self.json.cached(descriptor) {
            return Ok(CodecRef::Ready(codec));
        }
        self.resolve(descriptor).map(CodecRef::Ready)
    }

    #[inline]
    fn nested(&mut self, ty: TypeRef, owner: &TypeDescriptor) -> Result<CodecRef, JsonError> {
        let descriptor = ty.resolve(owner)?;
        self.codec_ref(&descriptor)
    }

    // -------------------------------------------------------------------------
    // Cascade

    fn build(&mut self, descriptor: &TypeDescriptor) -> Result<Codec, JsonError> {
        let config = self.config();
        let decoder = config.decoder(descriptor).cloned();
        let encoder = config.encoder(descriptor).cloned();

        if descriptor.is_nullable() {
            let base = self.nullable(descriptor, encoder);
            return Codec::assemble(descriptor.clone(), decoder, None, Vec::new(), None, base);
        }

        let info = descriptor.type_info();
        let hooks = info.hooks();
        if decoder.is_none() {
            check_factories(descriptor, hooks)?;
        }

        // A family's encoder only applies to variants without a mapping of
        // their own, so the family codec consults it instead of the codec.
        let (encoder, family_encoder) = match info {
            TypeInfo::Family(_) => (None, encoder),
            _ => (encoder, None),
        };

        let needs_base = decoder.is_none() || (encoder.is_none() && hooks.to_json().is_none());
        let base = if needs_base {
            self.base(descriptor, info, family_encoder.as_ref())
        } else {
            Err(JsonError::unresolvable(descriptor.to_string(), "converted by explicit mappings only"))
        };
        Codec::assemble(
            descriptor.clone(),
            decoder,
            encoder,
            hooks.factories().to_vec(),
            hooks.to_json(),
            base,
        )
    }

    fn nullable(&mut self, descriptor: &TypeDescriptor, encoder: Option<EncodeFn>) -> Base {
        let Some(option) = descriptor.optional_info().and_then(TypeInfo::as_optional) else {
            return Err(JsonError::unresolvable(
                descriptor.to_string(),
                "a nullable descriptor must describe its `Option`",
            ));
        };
        let inner = self.codec_ref(&descriptor.non_null())?;
        let codec = NullableCodec {
            type_name: descriptor.to_string(),
            option,
            inner,
            encoder,
        };
        Ok((Strategy::Nullable, boxed(codec)))
    }

    fn base(&mut self, descriptor: &TypeDescriptor, info: &'static TypeInfo, encoder: Option<&EncodeFn>) -> Base {
        let type_name = descriptor.to_string();
        let config = self.config();
        Ok(match info {
            TypeInfo::Scalar(info) => (Strategy::Scalar, boxed(ScalarCodec { type_name, info })),
            TypeInfo::Enum(info) => {
                let names = info
                    .variants()
                    .iter()
                    .map(|variant| wire_name(config, variant.custom_attributes(), variant.name()))
                    .collect();
                (Strategy::Enum, boxed(EnumCodec { type_name, info, names }))
            }
            TypeInfo::Array(info) => {
                let item = self.nested(info.item(), descriptor)?;
                (Strategy::Array, boxed(ArrayCodec { type_name, info, item }))
            }
            TypeInfo::List(info) => {
                let item = self.nested(info.item(), descriptor)?;
                (Strategy::Sequence, boxed(ListCodec { type_name, info, item }))
            }
            TypeInfo::Set(info) => {
                let item = self.nested(info.item(), descriptor)?;
                (Strategy::Set, boxed(SetCodec { type_name, info, item }))
            }
            TypeInfo::Map(info) => {
                let key = self.nested(info.key(), descriptor)?;
                let value = self.nested(info.value(), descriptor)?;
                (Strategy::Map, boxed(MapCodec { type_name, info, key, value }))
            }
            TypeInfo::Tuple(info) => {
                let items = info
                    .items()
                    .iter()
                    .map(|item| self.nested(*item, descriptor))
                    .collect::<Result<Vec<_>, _>>()?;
                (Strategy::Tuple, boxed(TupleCodec { type_name, info, items }))
            }
            TypeInfo::Optional(info) => {
                let inner = self.nested(info.inner(), descriptor)?;
                (Strategy::OptionWrapper, boxed(OptionWrapperCodec { type_name, info, inner }))
            }
            TypeInfo::Pointer(info) => {
                let inner = self.nested(info.inner(), descriptor)?;
                (Strategy::Pointer, boxed(PointerCodec { type_name, info, inner }))
            }
            TypeInfo::Family(info) => {
                let codec = self.family(descriptor, info, encoder)?;
                (Strategy::Family, boxed(codec))
            }
            TypeInfo::Struct(info) => return self.record(descriptor, info),
            TypeInfo::Delegating(info) => {
                let inner = self.nested(info.target(), descriptor)?;
                let codec = WrapperCodec {
                    type_name,
                    inner,
                    build: WrapBuild::One(info.wrap_fn()),
                    unwrap: info.unwrap_fn(),
                };
                (Strategy::Delegating, boxed(codec))
            }
            TypeInfo::Singleton(info) => {
                let allow_extra = config.allows_extra(info.custom_attributes());
                (Strategy::Singleton, boxed(SingletonCodec { type_name, info, allow_extra }))
            }
            TypeInfo::Foreign(info) => (Strategy::Foreign, self.foreign(descriptor, info)?),
            TypeInfo::Opaque(_) => {
                return Err(JsonError::unresolvable(
                    type_name,
                    "the type exposes no structure; register a mapping or declare a factory",
                ));
            }
        })
    }

    /// Step 6: members come from the registered family mapping if there is
    /// one, else from every declared variant under its wire name.
    fn family(
        &mut self,
        descriptor: &TypeDescriptor,
        info: &'static FamilyInfo,
        encoder: Option<&EncodeFn>,
    ) -> Result<FamilyCodec, JsonError> {
        let config = self.config();
        let mapping = config.family(descriptor);

        let mut tagged: Vec<(Box<str>, usize, TypeDescriptor)> = Vec::new();
        match mapping {
            Some(mapping) => {
                for (tag, payload) in mapping.variants() {
                    let mut candidates = info.variants().iter().enumerate().filter_map(|(index, variant)| {
                        let declared = variant.payload().resolve(descriptor).ok()?;
                        (declared == *payload).then_some((index, declared))
                    });
                    let Some((index, declared)) = candidates.next() else {
                        return Err(JsonError::unresolvable(
                            descriptor.to_string(),
                            format!("`{payload}` registered under tag `{tag}` is not a member of the family"),
                        ));
                    };
                    tagged.push((Box::from(&**tag), index, declared));
                }
            }
            None => {
                for (index, variant) in info.variants().iter().enumerate() {
                    let tag = wire_name(config, variant.custom_attributes(), variant.name());
                    tagged.push((tag, index, variant.payload().resolve(descriptor)?));
                }
            }
        }

        let mut members = Vec::with_capacity(tagged.len());
        for (tag, index, payload) in tagged {
            if members.iter().any(|member: &FamilyMember| member.tag == tag) {
                return Err(JsonError::ambiguous(
                    descriptor.to_string(),
                    format!("two members of the family are tagged `{tag}`"),
                ));
            }
            let Some(variant) = info.variants().get(index) else {
                continue;
            };
            members.push(FamilyMember {
                tag,
                index,
                payload: self.codec_ref(&payload)?,
                wrap: variant.wrap_fn(),
            });
        }

        let location = mapping
            .and_then(|mapping| mapping.location().cloned())
            .unwrap_or_else(|| DiscriminatorLocation::Property(Cow::Owned(config.discriminator().to_string())));
        Ok(FamilyCodec {
            type_name: descriptor.to_string(),
            info,
            location,
            members,
            encoder: encoder.cloned(),
        })
    }

    /// Steps 7 and 11 for declared records.
    fn record(&mut self, descriptor: &TypeDescriptor, info: &'static StructInfo) -> Base {
        let type_name = descriptor.to_string();

        if info.is_transparent() {
            let (Some(field), Some(ctor)) = (
                info.fields().first(),
                info.constructors().iter().find(|ctor| ctor.params().len() == 1),
            ) else {
                return Err(JsonError::unresolvable(
                    type_name,
                    "a single-field tuple struct needs a single-argument constructor",
                ));
            };
            let codec = WrapperCodec {
                type_name,
                inner: self.nested(field.ty(), descriptor)?,
                build: WrapBuild::Args(ctor.build_fn()),
                unwrap: field.getter(),
            };
            return Ok((Strategy::SingleArgConstructor, boxed(codec)));
        }

        if info.constructors().is_empty() {
            return Err(JsonError::unresolvable(type_name, "the type declares no constructor"));
        }
        let (fields, ignored) = self.fields(descriptor, info.fields())?;
        let mut ctors = Vec::with_capacity(info.constructors().len());
        for ctor in info.constructors() {
            ctors.push(self.constructor(descriptor, ctor, info.fields())?);
        }
        let single_args = single_args(info.constructors(), &ctors, descriptor);

        let config = self.config();
        let attributes = info.custom_attributes();
        let codec = ObjectCodec {
            type_name,
            fields,
            ignored,
            creation: Creation::Constructors(ctors),
            allow_extra: config.allows_extra(attributes),
            include_all: config.is_include_all(attributes),
            single_args,
        };
        Ok((Strategy::Object, boxed(codec)))
    }

    /// Step 10.
    fn foreign(&mut self, descriptor: &TypeDescriptor, info: &'static ForeignInfo) -> Result<Box<dyn CodecImpl>, JsonError> {
        let type_name = descriptor.to_string();
        let creation = match info.construction() {
            ForeignConstruction::Wrapper { param, build, unwrap } => {
                let codec = WrapperCodec {
                    type_name,
                    inner: self.nested(*param, descriptor)?,
                    build: WrapBuild::One(*build),
                    unwrap: *unwrap,
                };
                return Ok(boxed(codec));
            }
            ForeignConstruction::Setters(default) => Creation::Default(*default),
            ForeignConstruction::Constructor(ctor) => {
                Creation::Constructors(alloc::vec![self.constructor(descriptor, ctor, info.properties())?])
            }
        };

        let (fields, ignored) = self.fields(descriptor, info.properties())?;
        let config = self.config();
        let attributes = info.custom_attributes();
        Ok(boxed(ObjectCodec {
            type_name,
            fields,
            ignored,
            creation,
            allow_extra: config.allows_extra(attributes),
            include_all: config.is_include_all(attributes),
            single_args: Vec::new(),
        }))
    }

    // -------------------------------------------------------------------------
    // Properties

    /// Field slots of the non-ignored fields, and the wire names of the
    /// ignored ones. Ignored fields are never resolved.
    fn fields(
        &mut self,
        owner: &TypeDescriptor,
        fields: &[FieldInfo],
    ) -> Result<(Vec<FieldSlot>, Vec<Box<str>>), JsonError> {
        let config = self.config();
        let mut slots = Vec::with_capacity(fields.len());
        let mut ignored = Vec::new();
        for field in fields {
            let attributes = field.custom_attributes();
            let wire = wire_name(config, attributes, field.name());
            if config.is_ignored(attributes) {
                ignored.push(wire);
                continue;
            }
            slots.push(FieldSlot {
                wire,
                include_null: config.is_include_null(attributes),
                codec: self.nested(field.ty(), owner)?,
                info: field.clone(),
            });
        }
        Ok((slots, ignored))
    }

    /// A constructor whose parameters take the rename and ignore flags of
    /// the fields they initialize.
    fn constructor(
        &mut self,
        owner: &TypeDescriptor,
        ctor: &ConstructorInfo,
        fields: &[FieldInfo],
    ) -> Result<CtorSlot, JsonError> {
        let config = self.config();
        let mut params = Vec::with_capacity(ctor.params().len());
        for param in ctor.params() {
            let attributes = fields
                .iter()
                .find(|field| field.name() == param.name())
                .map_or(CustomAttributes::EMPTY, FieldInfo::custom_attributes);
            let descriptor = param.ty().resolve(owner)?;
            let codec = if config.is_ignored(attributes) {
                None
            } else {
                Some(self.codec_ref(&descriptor)?)
            };
            params.push(ParamSlot {
                wire: wire_name(config, attributes, param.name()),
                codec,
                default: param.default_fn(),
                none: descriptor.optional_info().and_then(TypeInfo::as_optional),
            });
        }
        Ok(CtorSlot {
            params,
            build: ctor.build_fn(),
        })
    }
}

// -----------------------------------------------------------------------------
// Helpers

#[inline]
fn boxed(codec: impl CodecImpl + 'static) -> Box<dyn CodecImpl> {
    Box::new(codec)
}

fn wire_name(config: &JsonConfig, attributes: &CustomAttributes, declared: &str) -> Box<str> {
    Box::from(config.wire_name(attributes).unwrap_or(declared))
}

/// Two factories accepting the same JSON variant make decoding ambiguous.
fn check_factories(descriptor: &TypeDescriptor, hooks: &TypeHooks) -> Result<(), JsonError> {
    let factories = hooks.factories();
    for (index, factory) in factories.iter().enumerate() {
        let earlier = &factories[..index];
        if let Some(kind) = factory
            .accepted_kinds()
            .iter()
            .find(|kind| earlier.iter().any(|other| other.accepts(**kind)))
        {
            return Err(JsonError::ambiguous(
                descriptor.to_string(),
                format!("several factories accept a {}", kind.as_str()),
            ));
        }
    }
    Ok(())
}

/// Single-parameter constructors usable on scalar or array input.
fn single_args(infos: &[ConstructorInfo], slots: &[CtorSlot], owner: &TypeDescriptor) -> Vec<SingleArg> {
    infos
        .iter()
        .zip(slots)
        .filter_map(|(info, slot)| {
            let ([param], [param_slot]) = (info.params(), &slot.params[..]) else {
                return None;
            };
            let descriptor = param.ty().resolve(owner).ok()?;
            if descriptor.is_nullable() {
                return None;
            }
            let accepts = match descriptor.type_info() {
                TypeInfo::Scalar(scalar) => Accepts::Scalar(scalar.class()),
                TypeInfo::List(_) | TypeInfo::Array(_) | TypeInfo::Set(_) => Accepts::Array,
                _ => return None,
            };
            Some(SingleArg {
                accepts,
                param: param_slot.codec.clone()?,
                build: info.build_fn(),
            })
        })
        .collect()
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::info::{Factory, OpaqueInfo};
    use crate::info::{NonGenericTypeInfoCell, Typed};
    use crate::value::{JsonKind, JsonValue};
    use crate::{JsonConfig, JsonObject};

    struct Token;

    impl Typed for Token {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
        }
    }

    struct Twice;

    fn make_twice(_: &JsonValue) -> Result<Box<dyn core::any::Any>, crate::info::BuildError> {
        Ok(Box::new(Twice))
    }

    impl Typed for Twice {
        fn type_info() -> &'static TypeInfo {
            static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                let hooks = TypeHooks::new()
                    .with_factory(Factory::new(&[JsonKind::String], make_twice))
                    .with_factory(Factory::new(&[JsonKind::Int, JsonKind::String], make_twice));
                TypeInfo::Opaque(OpaqueInfo::new::<Self>().with_hooks(hooks))
            })
        }
    }

    #[test]
    fn opaque_types_are_unresolvable() {
        let err = Json::default().resolve(&TypeDescriptor::of::<Token>()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnresolvableType { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn containers_of_unresolvable_types_fail() {
        let err = Json::default()
            .resolve(&TypeDescriptor::of::<Vec<Option<Token>>>())
            .unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnresolvableType { .. }));
    }

    #[test]
    fn overlapping_factories_are_ambiguous() {
        let err = Json::default().resolve(&TypeDescriptor::of::<Twice>()).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::AmbiguousConstructorOrFactory { .. }));
    }

    #[test]
    fn a_decoder_mapping_resolves_an_opaque_type() {
        let mut config = JsonConfig::new();
        config.register_decoder(|_: &JsonValue| Ok::<_, core::convert::Infallible>(Token));
        let json = Json::new(config);

        let codec = json.resolve(&TypeDescriptor::of::<Token>()).unwrap();
        assert_eq!(codec.strategy(), Strategy::Mapping);
        assert!(json.decode::<Token>(&JsonValue::Object(JsonObject::new())).is_ok());

        let err = json.encode(&Token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnresolvableType { .. }));
    }

    #[test]
    fn nullable_codecs_are_cached_apart() {
        let json = Json::default();
        let plain = json.resolve(&TypeDescriptor::of::<u8>()).unwrap();
        let nullable = json.resolve(&TypeDescriptor::of::<Option<u8>>()).unwrap();
        assert_eq!(plain.strategy(), Strategy::Scalar);
        assert_eq!(nullable.strategy(), Strategy::Nullable);
        assert!(!Arc::ptr_eq(&plain, &nullable));
    }
}
