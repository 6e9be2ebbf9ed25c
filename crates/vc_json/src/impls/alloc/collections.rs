use alloc::boxed::Box;
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::any::Any;

use crate::impls::{collect_map, collect_set};
use crate::info::{CollectError, GenericTypeInfoCell, Generics, MapInfo, SetInfo};
use crate::info::{TypeInfo, TypeParamInfo, TypeRef, Typed};

// -----------------------------------------------------------------------------
// BTreeSet

impl<T: Typed + Ord> Typed for BTreeSet<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Set(
                SetInfo::new::<Self>(TypeRef::param(0), true, collect_btree_set::<T>, btree_set_items::<T>)
                    .with_generics(Generics::new().with(TypeParamInfo::new::<T>("T"))),
            )
        })
    }
}

fn collect_btree_set<T: Any + Ord>(items: Vec<Box<dyn Any>>) -> Result<Box<dyn Any>, CollectError> {
    let set = collect_set::<T, BTreeSet<T>>(items, |set, item| set.insert(item))?;
    Ok(Box::new(set))
}

fn btree_set_items<T: Any>(value: &dyn Any) -> Option<Vec<&dyn Any>> {
    let set = value.downcast_ref::<BTreeSet<T>>()?;
    Some(set.iter().map(|item| item as &dyn Any).collect())
}

// -----------------------------------------------------------------------------
// BTreeMap

impl<K: Typed + Ord, V: Typed> Typed for BTreeMap<K, V> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Map(
                MapInfo::new::<Self>(
                    TypeRef::param(0),
                    TypeRef::param(1),
                    true,
                    collect_btree_map::<K, V>,
                    btree_map_entries::<K, V>,
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

fn collect_btree_map<K: Any + Ord, V: Any>(
    entries: Vec<(Box<dyn Any>, Box<dyn Any>)>,
) -> Result<Box<dyn Any>, CollectError> {
    let map = collect_map::<K, V, BTreeMap<K, V>>(entries, |map, key, value| {
        map.insert(key, value).is_none()
    })?;
    Ok(Box::new(map))
}

fn btree_map_entries<K: Any, V: Any>(value: &dyn Any) -> Option<Vec<(&dyn Any, &dyn Any)>> {
    let map = value.downcast_ref::<BTreeMap<K, V>>()?;
    Some(map.iter().map(|(k, v)| (k as &dyn Any, v as &dyn Any)).collect())
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeSet;
    use alloc::string::String;
    use alloc::vec;
    use core::any::Any;

    use crate::info::{CollectError, Typed};

    #[test]
    fn duplicate_position_is_reported() {
        let info = BTreeSet::<String>::type_info().as_set().unwrap();
        let items: vec::Vec<Box<dyn Any>> = vec![
            Box::new(String::from("abc")),
            Box::new(String::from("def")),
            Box::new(String::from("abc")),
        ];
        assert_eq!((info.collect_fn())(items).unwrap_err(), CollectError::Duplicate(2));
    }
}
