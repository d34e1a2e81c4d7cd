use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeSet, HashSet};
use std::hash::{Hash, Hasher};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use redblack::RbSet;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 4_000;

/// Values drawn from a narrow range so inserts and removals collide often.
fn value_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Replace(i64),
    Remove(i64),
    Take(i64),
    Contains(i64),
    First,
    PopFirst,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        1 => value_strategy().prop_map(SetOp::Replace),
        3 => value_strategy().prop_map(SetOp::Remove),
        1 => value_strategy().prop_map(SetOp::Take),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::First),
        1 => Just(SetOp::PopFirst),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Replays a random sequence of operations on both RbSet and BTreeSet and asserts identical
    /// results at every step.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        let mut rb_set: RbSet<i64> = RbSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    prop_assert_eq!(rb_set.insert(*v), bt_set.insert(*v), "insert({})", v);
                }
                SetOp::Replace(v) => {
                    prop_assert_eq!(rb_set.replace(*v), bt_set.replace(*v), "replace({})", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(rb_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Take(v) => {
                    prop_assert_eq!(rb_set.take(v), bt_set.take(v), "take({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(rb_set.contains(v), bt_set.contains(v), "contains({})", v);
                    prop_assert_eq!(rb_set.get(v), bt_set.get(v), "get({})", v);
                }
                SetOp::First => {
                    prop_assert_eq!(rb_set.first(), bt_set.first());
                }
                SetOp::PopFirst => {
                    prop_assert_eq!(rb_set.pop_first(), bt_set.pop_first());
                }
            }
            prop_assert_eq!(rb_set.len(), bt_set.len());
        }

        prop_assert!(rb_set.iter().eq(bt_set.iter()));
        prop_assert!(rb_set.into_iter().eq(bt_set.into_iter()));
    }

    /// Set algebra agrees with BTreeSet for arbitrary inputs.
    #[test]
    fn set_algebra_matches_btreeset(
        a in proptest::collection::btree_set(value_strategy(), 0..200),
        b in proptest::collection::btree_set(value_strategy(), 0..200),
    ) {
        let rb_a: RbSet<i64> = a.iter().copied().collect();
        let rb_b: RbSet<i64> = b.iter().copied().collect();

        prop_assert!(rb_a.union(&rb_b).eq(a.union(&b)));
        prop_assert!(rb_a.intersection(&rb_b).eq(a.intersection(&b)));
        prop_assert!(rb_a.difference(&rb_b).eq(a.difference(&b)));
        prop_assert!(rb_a.symmetric_difference(&rb_b).eq(a.symmetric_difference(&b)));
        prop_assert_eq!(rb_a.is_disjoint(&rb_b), a.is_disjoint(&b));
        prop_assert_eq!(rb_a.is_subset(&rb_b), a.is_subset(&b));
        prop_assert_eq!(rb_a.is_superset(&rb_b), a.is_superset(&b));
    }
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[test]
fn mixed_inserts_iterate_sorted() {
    let mut set = RbSet::new();
    for value in [5, 3, 8, 1, 4, 7, 9] {
        assert!(set.insert(value));
    }
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(set.len(), 7);
}

#[test]
fn popping_the_minimum_drains_in_order() {
    let mut set = RbSet::from([5, 1, 9, 3]);
    let mut popped = Vec::new();
    while let Some(value) = set.pop_first() {
        popped.push(value);
    }
    assert_eq!(popped, [1, 3, 5, 9]);
    assert!(set.is_empty());
    assert_eq!(set.first(), None);
}

#[test]
fn duplicates_are_ignored() {
    let mut set = RbSet::new();
    for value in [2, 2, 1, 2, 1] {
        set.insert(value);
    }
    assert_eq!(set.len(), 2);
    assert_eq!(format!("{set:?}"), "{1, 2}");
}

#[test]
fn large_ascending_and_descending_runs() {
    let mut set: RbSet<u32> = (0..10_000).collect();
    set.extend((10_000..20_000).rev());
    assert_eq!(set.len(), 20_000);
    assert!(set.iter().copied().eq(0..20_000));

    for value in (0..20_000).step_by(2) {
        assert!(set.remove(&value));
    }
    assert!(set.iter().copied().eq((1..20_000).step_by(2)));
}

#[test]
fn clear_then_reuse() {
    let mut set = RbSet::from(["b", "a", "c"]);
    set.clear();
    assert!(set.is_empty());
    assert!(set.insert("z"));
    assert_eq!(set.iter().collect::<Vec<_>>(), [&"z"]);
}

#[test]
fn operators_build_new_sets() {
    let a = RbSet::from([1, 2, 3]);
    let b = RbSet::from([2, 3, 4]);
    assert_eq!(&a | &b, RbSet::from([1, 2, 3, 4]));
    assert_eq!(&a & &b, RbSet::from([2, 3]));
    assert_eq!(&a - &b, RbSet::from([1]));
    assert_eq!(&a ^ &b, RbSet::from([1, 4]));
}

#[test]
fn borrowed_forms_find_owned_values() {
    let mut set: RbSet<String> = ["pear", "apple", "fig"].into_iter().map(String::from).collect();
    assert!(set.contains("fig"));
    assert_eq!(set.get("apple").map(String::as_str), Some("apple"));
    assert!(set.remove("pear"));
    assert_eq!(set.take("fig"), Some(String::from("fig")));
    assert_eq!(set.take("fig"), None);
    assert_eq!(set.len(), 1);
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn equal_sets_hash_alike() {
    let a = RbSet::from([3, 1, 2]);
    let b: RbSet<i32> = (1..=3).rev().collect();
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_eq!(hash_of(&a), hash_of(&BTreeSet::from([1, 2, 3])));

    let mut seen = HashSet::new();
    assert!(seen.insert(a));
    assert!(!seen.insert(b));
}

#[test]
fn sets_order_like_btreeset() {
    let sets = [RbSet::from([2]), RbSet::from([1, 3]), RbSet::new(), RbSet::from([1]), RbSet::from([1, 2, 9])];
    let sorted: BTreeSet<RbSet<u8>> = sets.iter().cloned().collect();

    let mut expected: Vec<Vec<u8>> = sets.iter().map(|s| s.iter().copied().collect()).collect();
    expected.sort();
    let ordered: Vec<Vec<u8>> = sorted.iter().map(|s| s.iter().copied().collect()).collect();
    assert_eq!(ordered, expected);
    assert!(sets[3] < sets[4]);
    assert_eq!(sets[1].cmp(&sets[0]), std::cmp::Ordering::Less);
}
