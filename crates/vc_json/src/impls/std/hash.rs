use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::hash::{BuildHasher, Hash};
use std::collections::{HashMap, HashSet};

use crate::impls::{collect_map, collect_set};
use crate::info::{CollectError, GenericTypeInfoCell, Generics, MapInfo, SetInfo};
use crate::info::{TypeInfo, TypeParamInfo, TypeRef, Typed};

impl<T, S> Typed for HashSet<T, S>
where
    T: Typed + Eq + Hash,
    S: BuildHasher + Default + Send + Sync + 'static,
{
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Set(
                SetInfo::new::<Self>(TypeRef::param(0), false, collect_hash_set::<T, S>, hash_set_items::<T, S>)
                    .with_generics(Generics::new().with(TypeParamInfo::new::<T>("T"))),
            )
        })
    }
}

fn collect_hash_set<T, S>(items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, CollectError>
where
    T: Any + Eq + Hash,
    S: BuildHasher + Default + 'static,
{
    let set = collect_set::<T, HashSet<T, S>>(items, |set, item| set.insert(item))?;
    Ok(Box::new(set))
}

fn hash_set_items<T: Any, S: 'static>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    let set = value.downcast_ref::<HashSet<T, S>>()?;
    Some(set.iter().map(|item| item as &dyn Any).collect())
}

impl<K, V, S> Typed for HashMap<K, V, S>
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
                    false,
                    collect_hash_map::<K, V, S>,
                    hash_map_entries::<K, V, S>,
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

fn collect_hash_map<K, V, S>(entries: Vec<(Box<dyn Any>, Box<dyn Any>)>) -> Result<Box<dyn Any>, CollectError>
where
    K: Any + Eq + Hash,
    V: Any,
    S: BuildHasher + Default + 'static,
{
    let map = collect_map::<K, V, HashMap<K, V, S>>(entries, |map, key, value| {
        map.insert(key, value).is_none()
    })?;
    Ok(Box::new(map))
}

fn hash_map_entries<K: Any, V: Any, S: 'static>(value: &dyn Any) -> Option<Vec<(&dyn Any, &dyn Any)>> {
    let map = value.downcast_ref::<HashMap<K, V, S>>()?;
    Some(map.iter().map(|(k, v)| (k as &dyn Any, v as &dyn Any)).collect())
}
