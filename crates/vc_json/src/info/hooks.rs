use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::info::BuildError;
use crate::value::{JsonKind, JsonValue};

/// Builds a value from JSON, inside the type itself.
pub type FactoryFn = fn(&JsonValue) -> Result<Box<dyn Any>, BuildError>;

/// Renders a value as JSON, inside the type itself.
pub type ToJsonFn = fn(&dyn Any) -> Result<JsonValue, BuildError>;

// -----------------------------------------------------------------------------
// Factory

/// A from-JSON constructor, candidate only for the JSON variants it accepts.
#[derive(Clone, Copy)]
pub struct Factory {
    accepts: &'static [JsonKind],
    create: FactoryFn,
}

impl Factory {
    #[inline]
    pub const fn new(accepts: &'static [JsonKind], create: FactoryFn) -> Self {
        Self { accepts, create }
    }

    #[inline]
    pub const fn accepted_kinds(&self) -> &'static [JsonKind] {
        self.accepts
    }

    #[inline]
    pub fn accepts(&self, kind: JsonKind) -> bool {
        self.accepts.contains(&kind)
    }

    #[inline]
    pub fn create(&self, value: &JsonValue) -> Result<Box<dyn Any>, BuildError> {
        (self.create)(value)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("accepts", &self.accepts)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// TypeHooks

/// Conversions a type declares for itself.
#[derive(Clone, Debug, Default)]
pub struct TypeHooks {
    factories: Vec<Factory>,
    to_json: Option<ToJsonFn>,
}

impl TypeHooks {
    pub(crate) const EMPTY: &'static Self = &Self::new();

    #[inline]
    pub const fn new() -> Self {
        Self {
            factories: Vec::new(),
            to_json: None,
        }
    }

    pub fn with_factory(mut self, factory: Factory) -> Self {
        self.factories.push(factory);
        self
    }

    #[inline]
    pub fn with_to_json(mut self, to_json: ToJsonFn) -> Self {
        self.to_json = Some(to_json);
        self
    }

    #[inline]
    pub fn factories(&self) -> &[Factory] {
        &self.factories
    }

    #[inline]
    pub const fn to_json(&self) -> Option<ToJsonFn> {
        self.to_json
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty() && self.to_json.is_none()
    }
}
