//! Insertion-ordered maps and sets: `IndexMap` and `IndexSet`.

use ::alloc::boxed::Box;
use ::alloc::vec::Vec;
use ::core::any::Any;
use ::core::hash::{BuildHasher, Hash};
use ::indexmap::{IndexMap, IndexSet};

use crate::impls::{collect_map, collect_set};
use crate::info::{CollectError, GenericTypeInfoCell, Generics, MapInfo, SetInfo};
use crate::info::{TypeInfo, TypeParamInfo, TypeRef, Typed};

impl<T, S> Typed for IndexSet<T, S>
where
    T: Typed + Eq + Hash,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Set(
                SetInfo::new::<Self>(TypeRef::param(0), true, collect_index_set::<T, S>, index_set_items::<T, S>)
                    .with_generics(Generics::new().with(TypeParamInfo::new::<T>("T"))),
            )
        })
    }
}

fn collect_index_set<T, S>(items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, CollectError>
where
    T: Any + Eq + Hash,
    S: BuildHasher + Default + 'static,
{
    let set = collect_set::<T, IndexSet<T, S>>(items, |set, item| set.insert(item))?;
    Ok(Box::new(set))
}

fn index_set_items<T: Any, S: 'static>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    let set = value.downcast_ref::<IndexSet<T, S>>()?;
    Some(set.iter().map(|item| item as &dyn Any).collect())
}

impl<K, V, S> Typed for IndexMap<K, V, S>
where
    K: Typed + Eq + Hash,
    V: Typed,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Map(
                MapInfo::new::<Self>(
                    TypeRef::param(0),
                    TypeRef::param(1),
                    true,
                    collect_index_map::<K, V, S>,
                    index_map_entries::<K, V, S>,
                )
                .with_generics(
                    Generics::new()
                        .with(TypeParamInfo::new::<K>("K"))
                        .with(TypeParamInfo::new::<V>("V")),
                ),
            )
        })
    }
}

fn collect_index_map<K, V, S>(entries: Vec<(Box<dyn Any>, Box<dyn Any>)>) -> Result<Box<dyn Any>, CollectError>
where
    K: Any + Eq + Hash,
    V: Any,
    S: BuildHasher + Default + 'static,
{
    let map = collect_map::<K, V, IndexMap<K, V, S>>(entries, |map, key, value| {
        map.insert(key, value).is_none()
    })?;
    Ok(Box::new(map))
}

fn index_map_entries<K: Any, V: Any, S: 'static>(value: &dyn Any) -> Option<Vec<(&dyn Any, &dyn Any)>> {
    let map = value.downcast_ref::<IndexMap<K, V, S>>()?;
    Some(map.iter().map(|(k, v)| (k as &dyn Any, v as &dyn Any)).collect())
}
