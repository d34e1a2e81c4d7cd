use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::{Hash, Hasher};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use redblack::RbMap;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 4_000;

fn key_strategy() -> impl Strategy<Value = i32> {
    -1_000i32..1_000i32
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i32, u16),
    Remove(i32),
    RemoveEntry(i32),
    Get(i32),
    GetMut(i32, u16),
    FirstKeyValue,
    PopFirst,
    Clear,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), any::<u16>()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::RemoveEntry),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => (key_strategy(), any::<u16>()).prop_map(|(k, v)| MapOp::GetMut(k, v)),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::Clear),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays a random sequence of operations on both RbMap and BTreeMap and asserts identical
    /// results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb_map: RbMap<i32, u16> = RbMap::new();
        let mut bt_map: BTreeMap<i32, u16> = BTreeMap::new();

        for op in &ops {
            match *op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(rb_map.insert(k, v), bt_map.insert(k, v), "insert({})", k);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(rb_map.remove(&k), bt_map.remove(&k), "remove({})", k);
                }
                MapOp::RemoveEntry(k) => {
                    prop_assert_eq!(rb_map.remove_entry(&k), bt_map.remove_entry(&k));
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(rb_map.get(&k), bt_map.get(&k), "get({})", k);
                    prop_assert_eq!(rb_map.contains_key(&k), bt_map.contains_key(&k));
                }
                MapOp::GetMut(k, v) => {
                    if let Some(slot) = rb_map.get_mut(&k) {
                        *slot = v;
                    }
                    if let Some(slot) = bt_map.get_mut(&k) {
                        *slot = v;
                    }
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(rb_map.first_key_value(), bt_map.first_key_value());
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(rb_map.pop_first(), bt_map.pop_first());
                }
                MapOp::Clear => {
                    rb_map.clear();
                    bt_map.clear();
                }
            }
            prop_assert_eq!(rb_map.len(), bt_map.len());
        }

        prop_assert!(rb_map.iter().eq(bt_map.iter()));
        prop_assert!(rb_map.keys().eq(bt_map.keys()));
        prop_assert!(rb_map.values().eq(bt_map.values()));
        prop_assert!(rb_map.into_iter().eq(bt_map.into_iter()));
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn duplicate_key_overwrites_payload() {
    let mut map = RbMap::new();
    assert_eq!(map.insert("k", 1), None);
    assert_eq!(map.insert("k", 2), Some(1));
    assert_eq!(map.len(), 1);
    assert_eq!(map[&"k"], 2);
}

#[test]
fn collects_and_compares() {
    let map: RbMap<u8, char> = [(3, 'c'), (1, 'a'), (3, 'C'), (2, 'b')].into_iter().collect();
    assert_eq!(map, RbMap::from([(1, 'a'), (2, 'b'), (3, 'C')]));
    assert_eq!(format!("{map:?}"), "{1: 'a', 2: 'b', 3: 'C'}");
    assert_eq!(map.values().len(), 3);
}

#[test]
fn string_keys_look_up_by_reference() {
    let mut map = RbMap::new();
    for word in ["pear", "apple", "fig"] {
        map.insert(String::from(word), word.len());
    }
    assert_eq!(map.get(&String::from("fig")), Some(&3));
    assert_eq!(map.get("fig"), Some(&3));
    assert_eq!(map["apple"], 5);
    assert!(map.contains_key("pear"));
    assert_eq!(map.remove("apple"), Some(5));
    assert_eq!(map.remove("apple"), None);
    assert_eq!(map.keys().map(String::as_str).collect::<Vec<_>>(), ["fig", "pear"]);
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn equal_maps_hash_alike() {
    let a = RbMap::from([(1, "one"), (2, "two")]);
    let b: RbMap<_, _> = [(2, "two"), (1, "one")].into_iter().collect();
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_eq!(hash_of(&a), hash_of(&BTreeMap::from([(1, "one"), (2, "two")])));

    let mut seen = HashSet::new();
    assert!(seen.insert(a));
    assert!(!seen.insert(b));
}

#[test]
fn maps_order_like_btreemap() {
    let maps = [
        RbMap::from([(1, 'b')]),
        RbMap::from([(1, 'a'), (3, 'a')]),
        RbMap::new(),
        RbMap::from([(1, 'a')]),
        RbMap::from([(2, 'a')]),
    ];
    let sorted: BTreeSet<RbMap<u8, char>> = maps.iter().cloned().collect();
    let to_btree = |map: &RbMap<u8, char>| -> BTreeMap<u8, char> { map.iter().map(|(k, v)| (*k, *v)).collect() };

    let mut expected: Vec<_> = maps.iter().map(to_btree).collect();
    expected.sort();
    assert_eq!(sorted.iter().map(to_btree).collect::<Vec<_>>(), expected);
    assert!(maps[3] < maps[1]);
    assert_eq!(maps[0].partial_cmp(&maps[4]), Some(std::cmp::Ordering::Less));
}
