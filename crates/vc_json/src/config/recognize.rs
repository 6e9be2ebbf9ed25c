use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use crate::hash::HashSet;
use crate::info::CustomAttributes;

// -----------------------------------------------------------------------------
// Rename sources

/// Reads a wire name out of one annotation type.
pub trait RenameSource: Send + Sync + 'static {
    fn wire_name<'a>(&self, attributes: &'a CustomAttributes) -> Option<&'a str>;
}

/// A [`RenameSource`] backed by an accessor on annotation `A`.
pub struct RenameBy<A> {
    extract: fn(&A) -> &str,
}

impl<A> RenameBy<A> {
    #[inline]
    pub const fn new(extract: fn(&A) -> &str) -> Self {
        Self { extract }
    }
}

impl<A: Any + Send + Sync> RenameSource for RenameBy<A> {
    #[inline]
    fn wire_name<'a>(&self, attributes: &'a CustomAttributes) -> Option<&'a str> {
        attributes.get::<A>().map(self.extract)
    }
}

/// Rename annotations, in registration order.
#[derive(Clone, Default)]
pub(crate) struct RenameSources(Vec<(TypeId, Arc<dyn RenameSource>)>);

impl RenameSources {
    /// Registers a source; one per annotation type, the latest wins.
    pub fn insert(&mut self, id: TypeId, source: Arc<dyn RenameSource>) {
        match self.0.iter_mut().find(|(existing, _)| *existing == id) {
            Some(slot) => slot.1 = source,
            None => self.0.push((id, source)),
        }
    }

    /// Adds the sources of `other` for annotation types not known here.
    pub fn union(&mut self, other: &Self) {
        for (id, source) in &other.0 {
            if !self.contains(*id) {
                self.0.push((*id, source.clone()));
            }
        }
    }

    #[inline]
    pub fn contains(&self, id: TypeId) -> bool {
        self.0.iter().any(|(existing, _)| *existing == id)
    }

    /// The first wire name found, in registration order.
    pub fn wire_name<'a>(&self, attributes: &'a CustomAttributes) -> Option<&'a str> {
        if attributes.is_empty() {
            return None;
        }
        self.0
            .iter()
            .find_map(|(_, source)| source.wire_name(attributes))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// -----------------------------------------------------------------------------
// Marker sets

/// Annotation types that switch a behavior on by their mere presence.
#[derive(Clone, Default)]
pub(crate) struct MarkerSet(HashSet<TypeId>);

impl MarkerSet {
    #[inline]
    pub fn of<A: Any>() -> Self {
        let mut set = Self::default();
        set.insert(TypeId::of::<A>());
        set
    }

    #[inline]
    pub fn insert(&mut self, id: TypeId) -> bool {
        self.0.insert(id)
    }

    #[inline]
    pub fn union(&mut self, other: &Self) {
        self.0.extend(other.0.iter().copied());
    }

    /// Whether `attributes` holds any of the recognized annotations.
    pub fn matches(&self, attributes: &CustomAttributes) -> bool {
        !attributes.is_empty() && self.0.iter().any(|id| attributes.contains_by_id(*id))
    }
}

impl fmt::Debug for MarkerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} annotation(s)", self.0.len())
    }
}
