//! Property-based tests for skeleton merging.
//!
//! Keys are drawn from two disjoint pools so that generated inputs never
//! hit a type conflict: `a`..`e` always hold scalars and `m`..`o` always
//! hold mappings of scalars.

use super::merge::tests::{entry, skeleton};
use super::merge::{merge, merge_files, merge_pair, merge_values};
use super::FileEntry;
use proptest::prelude::*;
use serde_yaml::{Mapping, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i64>().prop_map(|n| Value::Number(n.into())),
        "[a-z]{0,4}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
    ]
}

fn values() -> impl Strategy<Value = Mapping> {
    let scalars = prop::collection::btree_map("[a-e]", scalar(), 0..4);
    let nested = prop::collection::btree_map(
        "[m-o]",
        prop::collection::btree_map("[x-z]", scalar(), 0..3),
        0..3,
    );
    (scalars, nested).prop_map(|(scalars, nested)| {
        let mut mapping = Mapping::new();
        for (key, value) in scalars {
            mapping.insert(Value::String(key), value);
        }
        for (key, inner) in nested {
            let inner: Mapping = inner
                .into_iter()
                .map(|(k, v)| (Value::String(k), v))
                .collect();
            mapping.insert(Value::String(key), Value::Mapping(inner));
        }
        mapping
    })
}

fn files() -> impl Strategy<Value = Vec<FileEntry>> {
    prop::collection::vec("[a-d](/[a-d]){0,2}", 0..6)
        .prop_map(|paths| paths.iter().map(|p| entry(p)).collect())
}

proptest! {
    /// Property: deep merge is associative for conflict-free inputs
    #[test]
    fn merge_values_is_associative(a in values(), b in values(), c in values()) {
        let left = merge_values(&merge_values(&a, &b).unwrap(), &c).unwrap();
        let right = merge_values(&a, &merge_values(&b, &c).unwrap()).unwrap();
        prop_assert_eq!(left, right);
    }

    /// Property: merging with an empty mapping changes nothing
    #[test]
    fn merge_values_empty_is_neutral(a in values()) {
        prop_assert_eq!(merge_values(&a, &Mapping::new()).unwrap(), a.clone());
        prop_assert_eq!(merge_values(&Mapping::new(), &a).unwrap(), a);
    }

    /// Property: every top-level key of the child survives with the child's scalar
    #[test]
    fn merge_values_child_scalars_win(a in values(), b in values()) {
        let merged = merge_values(&a, &b).unwrap();
        for (key, value) in &b {
            if !value.is_mapping() {
                prop_assert_eq!(merged.get(key), Some(value));
            }
        }
    }
}

proptest! {
    /// Property: merged files are unique by path and sorted ascending
    #[test]
    fn merge_files_unique_and_sorted(lhs in files(), rhs in files()) {
        let merged = merge_files(&lhs, &rhs);
        for pair in merged.windows(2) {
            prop_assert!(pair[0].path < pair[1].path);
        }
        for input in lhs.iter().chain(rhs.iter()) {
            prop_assert!(merged.iter().any(|e| e.path == input.path));
        }
    }

    /// Property: a path is inherited exactly when only the ancestor has it
    #[test]
    fn merge_files_inherited_flag(lhs in files(), rhs in files()) {
        let merged = merge_files(&lhs, &rhs);
        for file in &merged {
            let in_rhs = rhs.iter().any(|e| e.path == file.path);
            prop_assert_eq!(file.inherited, !in_rhs);
        }
    }

    /// Property: merging a list equals folding merge_pair left to right
    #[test]
    fn merge_list_equals_fold(
        a in (values(), files()),
        b in (values(), files()),
        c in (values(), files()),
    ) {
        let a = skeleton("a", a.0, merge_files(&[], &a.1));
        let b = skeleton("b", b.0, merge_files(&[], &b.1));
        let c = skeleton("c", c.0, merge_files(&[], &c.1));

        let folded = merge_pair(merge_pair(a.clone(), b.clone()).unwrap(), c.clone()).unwrap();
        let merged = merge(vec![a, b, c]).unwrap();
        prop_assert_eq!(merged, folded);
    }

    /// Property: a single-element merge is the identity
    #[test]
    fn merge_single_is_identity(a in values(), f in files()) {
        let only = skeleton("only", a, merge_files(&[], &f));
        prop_assert_eq!(merge(vec![only.clone()]).unwrap(), only);
    }
}
