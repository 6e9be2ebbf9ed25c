//! The configuration registry.
//!
//! A [`JsonConfig`] holds everything that changes how types resolve without
//! touching the types themselves: explicit mappings, polymorphic families,
//! the annotation types recognized for renaming and property policies, and
//! a few global switches.
//!
//! A configuration is built once and then handed to a [`Json`](crate::Json)
//! engine, which resolves codecs against it.

// -----------------------------------------------------------------------------
// Modules

mod family;
mod recognize;

// -----------------------------------------------------------------------------
// Exports

pub use family::{DiscriminatorLocation, FamilyMapping};
pub use recognize::{RenameBy, RenameSource};

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use log::debug;

use crate::error::BoxError;
use crate::hash::HashMap;
use crate::info::{AllowExtra, CustomAttributes, Ignore, IncludeAll, IncludeNull, Rename};
use crate::info::{ScalarOptions, TypeDescriptor, Typed};
use crate::value::JsonValue;
use recognize::{MarkerSet, RenameSources};

/// An explicit decode mapping.
pub type DecodeFn = Arc<dyn Fn(&JsonValue) -> Result<Box<dyn Any>, BoxError> + Send + Sync>;

/// An explicit encode mapping.
pub type EncodeFn = Arc<dyn Fn(&dyn Any) -> Result<JsonValue, BoxError> + Send + Sync>;

const DEFAULT_DISCRIMINATOR: &str = "class";

// -----------------------------------------------------------------------------
// JsonConfig

/// Mappings, recognized annotations and switches used by one engine.
///
/// Registration methods take `&mut self` and return it, so a configuration
/// reads as a chain. Registering a mapping for a descriptor that already has
/// one replaces it.
///
/// # Examples
///
/// ```
/// use vc_json::{Json, JsonConfig, JsonValue};
/// use vc_json::error::BoxError;
///
/// #[derive(Debug, PartialEq)]
/// struct Celsius(f64);
///
/// # use vc_json::info::{Typed, TypeInfo, NonGenericTypeInfoCell, OpaqueInfo};
/// # impl Typed for Celsius {
/// #     fn type_info() -> &'static TypeInfo {
/// #         static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
/// #         CELL.get_or_init(|| TypeInfo::Opaque(OpaqueInfo::new::<Self>()))
/// #     }
/// # }
/// let mut config = JsonConfig::new();
/// config
///     .register_decoder(|value: &JsonValue| -> Result<Celsius, BoxError> {
///         let text = value.as_str().ok_or("expected a string")?;
///         Ok(Celsius(text.trim_end_matches('C').parse()?))
///     })
///     .register_encoder(|value: &Celsius| {
///         Ok::<_, std::convert::Infallible>(JsonValue::from(format!("{}C", value.0)))
///     });
///
/// let json = Json::new(config);
/// let value: Celsius = json.decode(&JsonValue::from("21.5C")).unwrap();
/// assert_eq!(value, Celsius(21.5));
/// assert_eq!(json.encode(&value).unwrap(), JsonValue::from("21.5C"));
/// ```
#[derive(Clone)]
pub struct JsonConfig {
    decoders: HashMap<TypeDescriptor, DecodeFn>,
    encoders: HashMap<TypeDescriptor, EncodeFn>,
    families: HashMap<TypeDescriptor, FamilyMapping>,
    rename: RenameSources,
    ignore: MarkerSet,
    include_null: MarkerSet,
    include_all: MarkerSet,
    allow_extra_markers: MarkerSet,
    allow_extra: Option<bool>,
    include_nulls: Option<bool>,
    big_numbers_as_strings: Option<bool>,
    discriminator: Option<Cow<'static, str>>,
}

impl Default for JsonConfig {
    /// See [`JsonConfig::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl JsonConfig {
    /// A configuration with no mappings, recognizing the built-in annotations
    /// ([`Rename`], [`Ignore`], [`IncludeNull`], [`IncludeAll`], [`AllowExtra`]).
    pub fn new() -> Self {
        let mut rename = RenameSources::default();
        rename.insert(TypeId::of::<Rename>(), Arc::new(RenameBy::new(Rename::name)));
        Self {
            decoders: HashMap::default(),
            encoders: HashMap::default(),
            families: HashMap::default(),
            rename,
            ignore: MarkerSet::of::<Ignore>(),
            include_null: MarkerSet::of::<IncludeNull>(),
            include_all: MarkerSet::of::<IncludeAll>(),
            allow_extra_markers: MarkerSet::of::<AllowExtra>(),
            allow_extra: None,
            include_nulls: None,
            big_numbers_as_strings: None,
            discriminator: None,
        }
    }

    // -------------------------------------------------------------------------
    // Mappings

    /// Decodes `T` with `f` instead of resolving it structurally.
    ///
    /// For `T = Option<U>` the mapping is registered for the nullable
    /// descriptor `U?` and also receives `null`.
    pub fn register_decoder<T, E>(
        &mut self,
        f: impl Fn(&JsonValue) -> Result<T, E> + Send + Sync + 'static,
    ) -> &mut Self
    where
        T: Typed,
        E: Into<BoxError>,
    {
        self.register_decoder_as(
            T::descriptor(),
            Arc::new(move |value: &JsonValue| match f(value) {
                Ok(value) => Ok(Box::new(value) as Box<dyn Any>),
                Err(err) => Err(err.into()),
            }),
        )
    }

    /// Registers a decode mapping for `descriptor`.
    ///
    /// The function must return a value of the descriptor's type.
    pub fn register_decoder_as(&mut self, descriptor: TypeDescriptor, f: DecodeFn) -> &mut Self {
        debug!("registered decoder for `{descriptor}`");
        self.decoders.insert(descriptor, f);
        self
    }

    /// Encodes `T` with `f` instead of resolving it structurally.
    pub fn register_encoder<T, E>(
        &mut self,
        f: impl Fn(&T) -> Result<JsonValue, E> + Send + Sync + 'static,
    ) -> &mut Self
    where
        T: Typed,
        E: Into<BoxError>,
    {
        self.register_encoder_as(
            T::descriptor(),
            Arc::new(move |value: &dyn Any| match value.downcast_ref::<T>() {
                Some(value) => f(value).map_err(Into::into),
                None => Err(alloc::format!("expected a value of type `{}`", core::any::type_name::<T>()).into()),
            }),
        )
    }

    /// Registers an encode mapping for `descriptor`.
    pub fn register_encoder_as(&mut self, descriptor: TypeDescriptor, f: EncodeFn) -> &mut Self {
        debug!("registered encoder for `{descriptor}`");
        self.encoders.insert(descriptor, f);
        self
    }

    /// Replaces the derived tags of family `T`.
    pub fn register_family<T: Typed>(&mut self, mapping: FamilyMapping) -> &mut Self {
        let descriptor = T::descriptor().non_null();
        debug!(
            "registered {} tag(s) for family `{descriptor}`",
            mapping.variants().len()
        );
        self.families.insert(descriptor, mapping);
        self
    }

    #[inline]
    pub fn decoder(&self, descriptor: &TypeDescriptor) -> Option<&DecodeFn> {
        self.decoders.get(descriptor)
    }

    #[inline]
    pub fn encoder(&self, descriptor: &TypeDescriptor) -> Option<&EncodeFn> {
        self.encoders.get(descriptor)
    }

    #[inline]
    pub fn family(&self, descriptor: &TypeDescriptor) -> Option<&FamilyMapping> {
        self.families.get(descriptor)
    }

    // -------------------------------------------------------------------------
    // Annotations

    /// Recognizes annotation `A` as a rename, reading the name with `extract`.
    ///
    /// When several rename annotations are present, the one recognized first wins.
    pub fn recognize_rename<A: Any + Send + Sync>(&mut self, extract: fn(&A) -> &str) -> &mut Self {
        debug!("recognizing `{}` as rename", core::any::type_name::<A>());
        self.rename
            .insert(TypeId::of::<A>(), Arc::new(RenameBy::new(extract)));
        self
    }

    /// Recognizes annotation `A` as "never read or write this field".
    pub fn recognize_ignore<A: Any>(&mut self) -> &mut Self {
        debug!("recognizing `{}` as ignore", core::any::type_name::<A>());
        self.ignore.insert(TypeId::of::<A>());
        self
    }

    /// Recognizes annotation `A` as "write this field even when null".
    pub fn recognize_include_null<A: Any>(&mut self) -> &mut Self {
        debug!("recognizing `{}` as include-null", core::any::type_name::<A>());
        self.include_null.insert(TypeId::of::<A>());
        self
    }

    /// Recognizes annotation `A` as "write every field of this type".
    pub fn recognize_include_all<A: Any>(&mut self) -> &mut Self {
        debug!("recognizing `{}` as include-all", core::any::type_name::<A>());
        self.include_all.insert(TypeId::of::<A>());
        self
    }

    /// Recognizes annotation `A` as "skip unknown properties of this type".
    pub fn recognize_allow_extra<A: Any>(&mut self) -> &mut Self {
        debug!("recognizing `{}` as allow-extra", core::any::type_name::<A>());
        self.allow_extra_markers.insert(TypeId::of::<A>());
        self
    }

    /// The wire name declared by a recognized rename annotation.
    #[inline]
    pub fn wire_name<'a>(&self, attributes: &'a CustomAttributes) -> Option<&'a str> {
        self.rename.wire_name(attributes)
    }

    #[inline]
    pub fn is_ignored(&self, attributes: &CustomAttributes) -> bool {
        self.ignore.matches(attributes)
    }

    #[inline]
    pub fn is_include_null(&self, attributes: &CustomAttributes) -> bool {
        self.include_null.matches(attributes)
    }

    #[inline]
    pub fn is_include_all(&self, attributes: &CustomAttributes) -> bool {
        self.include_all.matches(attributes)
    }

    /// Whether unknown properties are skipped for a type with these annotations.
    #[inline]
    pub fn allows_extra(&self, attributes: &CustomAttributes) -> bool {
        self.allow_extra() || self.allow_extra_markers.matches(attributes)
    }

    // -------------------------------------------------------------------------
    // Switches

    /// Skip unknown properties on every type. Off by default.
    #[inline]
    pub fn set_allow_extra(&mut self, allow: bool) -> &mut Self {
        self.allow_extra = Some(allow);
        self
    }

    /// Write `null` fields on every type. Off by default.
    #[inline]
    pub fn set_include_nulls(&mut self, include: bool) -> &mut Self {
        self.include_nulls = Some(include);
        self
    }

    /// Write 128-bit integers and decimals as JSON strings. Off by default.
    #[inline]
    pub fn set_big_numbers_as_strings(&mut self, enabled: bool) -> &mut Self {
        self.big_numbers_as_strings = Some(enabled);
        self
    }

    /// The default discriminator property of polymorphic families, `"class"` unless set.
    #[inline]
    pub fn set_discriminator(&mut self, name: impl Into<Cow<'static, str>>) -> &mut Self {
        self.discriminator = Some(name.into());
        self
    }

    #[inline]
    pub fn allow_extra(&self) -> bool {
        self.allow_extra.unwrap_or(false)
    }

    #[inline]
    pub fn include_nulls(&self) -> bool {
        self.include_nulls.unwrap_or(false)
    }

    #[inline]
    pub fn big_numbers_as_strings(&self) -> bool {
        self.big_numbers_as_strings.unwrap_or(false)
    }

    #[inline]
    pub fn discriminator(&self) -> &str {
        self.discriminator.as_deref().unwrap_or(DEFAULT_DISCRIMINATOR)
    }

    #[inline]
    pub(crate) fn scalar_options(&self) -> ScalarOptions {
        ScalarOptions {
            big_numbers_as_strings: self.big_numbers_as_strings(),
        }
    }

    // -------------------------------------------------------------------------
    // Merge

    /// Combines `other` into `self`.
    ///
    /// Mappings and recognized annotations are unioned, keeping the entries of
    /// `self` on collision. Switches that `other` sets explicitly override.
    pub fn merge(&mut self, other: &JsonConfig) -> &mut Self {
        fn union<V: Clone>(into: &mut HashMap<TypeDescriptor, V>, from: &HashMap<TypeDescriptor, V>) {
            for (key, value) in from {
                into.entry(key.clone()).or_insert_with(|| value.clone());
            }
        }

        union(&mut self.decoders, &other.decoders);
        union(&mut self.encoders, &other.encoders);
        union(&mut self.families, &other.families);
        self.rename.union(&other.rename);
        self.ignore.union(&other.ignore);
        self.include_null.union(&other.include_null);
        self.include_all.union(&other.include_all);
        self.allow_extra_markers.union(&other.allow_extra_markers);

        if other.allow_extra.is_some() {
            self.allow_extra = other.allow_extra;
        }
        if other.include_nulls.is_some() {
            self.include_nulls = other.include_nulls;
        }
        if other.big_numbers_as_strings.is_some() {
            self.big_numbers_as_strings = other.big_numbers_as_strings;
        }
        if other.discriminator.is_some() {
            self.discriminator.clone_from(&other.discriminator);
        }

        debug!(
            "merged config: {} decoder(s), {} encoder(s), {} famil(ies)",
            self.decoders.len(),
            self.encoders.len(),
            self.families.len()
        );
        self
    }
}

impl fmt::Debug for JsonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonConfig")
            .field("decoders", &self.decoders.len())
            .field("encoders", &self.encoders.len())
            .field("families", &self.families.keys().collect::<Vec<_>>())
            .field("rename", &self.rename.len())
            .field("ignore", &self.ignore)
            .field("include_null", &self.include_null)
            .field("include_all", &self.include_all)
            .field("allow_extra_markers", &self.allow_extra_markers)
            .field("allow_extra", &self.allow_extra())
            .field("include_nulls", &self.include_nulls())
            .field("big_numbers_as_strings", &self.big_numbers_as_strings())
            .field("discriminator", &self.discriminator())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;

    struct Label(&'static str);

    #[test]
    fn defaults() {
        let config = JsonConfig::new();
        assert!(!config.allow_extra());
        assert!(!config.include_nulls());
        assert!(!config.big_numbers_as_strings());
        assert_eq!(config.discriminator(), "class");

        let attrs = CustomAttributes::new()
            .with_attribute(Rename::new("id"))
            .with_attribute(Ignore);
        assert_eq!(config.wire_name(&attrs), Some("id"));
        assert!(config.is_ignored(&attrs));
        assert!(!config.is_include_null(&attrs));
    }

    #[test]
    fn custom_annotations() {
        let mut config = JsonConfig::new();
        config.recognize_rename::<Label>(|label| label.0).recognize_allow_extra::<Label>();

        let attrs = CustomAttributes::new().with_attribute(Label("wire"));
        assert_eq!(config.wire_name(&attrs), Some("wire"));
        assert!(config.allows_extra(&attrs));
        assert!(!config.allows_extra(&CustomAttributes::new()));
    }

    #[test]
    fn merge_keeps_existing_mappings_and_takes_set_switches() {
        let mut base = JsonConfig::new();
        base.register_decoder(|_: &JsonValue| Ok::<_, BoxError>(String::from("base")))
            .set_include_nulls(true);

        let mut other = JsonConfig::new();
        other
            .register_decoder(|_: &JsonValue| Ok::<_, BoxError>(String::from("other")))
            .register_decoder(|_: &JsonValue| Ok::<_, BoxError>(1_u8))
            .set_discriminator("type")
            .set_allow_extra(true);

        base.merge(&other);

        let string = base.decoder(&TypeDescriptor::of::<String>()).unwrap();
        let decoded = string(&JsonValue::Null).unwrap();
        assert_eq!(decoded.downcast_ref::<String>().unwrap(), "base");
        assert!(base.decoder(&TypeDescriptor::of::<u8>()).is_some());
        assert_eq!(base.discriminator(), "type");
        assert!(base.allow_extra());
        assert!(base.include_nulls());
    }

    #[test]
    fn reregistration_replaces() {
        let mut config = JsonConfig::new();
        config
            .register_encoder(|_: &u8| Ok::<_, BoxError>(JsonValue::from("first")))
            .register_encoder(|_: &u8| Ok::<_, BoxError>(JsonValue::from("second")));
        let encode = config.encoder(&TypeDescriptor::of::<u8>()).unwrap();
        assert_eq!(encode(&1_u8).unwrap(), JsonValue::from("second"));
    }
}
