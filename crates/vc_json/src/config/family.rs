use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt;

use crate::info::{TypeDescriptor, Typed};
use crate::path::JsonPath;

// -----------------------------------------------------------------------------
// DiscriminatorLocation

/// Where the tag of a polymorphic value is read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiscriminatorLocation {
    /// A top-level property of the object. Written first on encode.
    Property(Cow<'static, str>),
    /// A path inside the document. Never written on encode: the payload
    /// is expected to carry it.
    Path(JsonPath),
}

impl fmt::Display for DiscriminatorLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => f.write_str(name),
            Self::Path(path) => write!(f, "{path}"),
        }
    }
}

// -----------------------------------------------------------------------------
// FamilyMapping

/// The tags of a closed polymorphic family, registered on a
/// [`JsonConfig`](crate::JsonConfig).
///
/// A registered mapping replaces the tags derived from the family's
/// declaration: only the listed variants can be decoded or encoded.
///
/// # Examples
///
/// ```
/// use vc_json::config::FamilyMapping;
///
/// let mapping = FamilyMapping::new()
///     .property("type")
///     .variant::<u8>("small")
///     .variant::<u64>("large");
///
/// assert_eq!(mapping.variants().len(), 2);
/// assert_eq!(mapping.location().unwrap().to_string(), "type");
/// ```
#[derive(Clone, Debug, Default)]
pub struct FamilyMapping {
    location: Option<DiscriminatorLocation>,
    variants: Vec<(Cow<'static, str>, TypeDescriptor)>,
}

impl FamilyMapping {
    /// An empty mapping reading the tag from the configured default property.
    #[inline]
    pub const fn new() -> Self {
        Self {
            location: None,
            variants: Vec::new(),
        }
    }

    /// Reads the tag from a top-level property.
    #[inline]
    pub fn property(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.location = Some(DiscriminatorLocation::Property(name.into()));
        self
    }

    /// Reads the tag from a document path.
    #[inline]
    pub fn path(mut self, path: JsonPath) -> Self {
        self.location = Some(DiscriminatorLocation::Path(path));
        self
    }

    /// Maps `tag` to the variant carrying a `P`.
    #[inline]
    pub fn variant<P: Typed>(self, tag: impl Into<Cow<'static, str>>) -> Self {
        self.variant_as(tag, P::descriptor())
    }

    /// Maps `tag` to the variant carrying `payload`.
    pub fn variant_as(mut self, tag: impl Into<Cow<'static, str>>, payload: TypeDescriptor) -> Self {
        let tag = tag.into();
        self.variants.retain(|(existing, _)| *existing != tag);
        self.variants.push((tag, payload));
        self
    }

    /// `None` when the configured default property applies.
    #[inline]
    pub fn location(&self) -> Option<&DiscriminatorLocation> {
        self.location.as_ref()
    }

    #[inline]
    pub fn variants(&self) -> &[(Cow<'static, str>, TypeDescriptor)] {
        &self.variants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_tag_replaces_earlier() {
        let mapping = FamilyMapping::new().variant::<u8>("a").variant::<u16>("a");
        assert_eq!(mapping.variants().len(), 1);
        assert_eq!(mapping.variants()[0].1, TypeDescriptor::of::<u16>());
        assert!(mapping.location().is_none());
    }

    #[test]
    fn path_location() {
        let mapping = FamilyMapping::new().path(JsonPath::parse("/meta/kind").unwrap());
        assert_eq!(mapping.location().unwrap().to_string(), "/meta/kind");
    }
}
