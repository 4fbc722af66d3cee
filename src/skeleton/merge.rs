//! Composition of skeletons.
//!
//! The right-hand side of every merge is the more specific skeleton (the
//! child) and wins over the left-hand side (the ancestor):
//!
//! - values are deep merged; nested mappings merge key by key, anything
//!   else is replaced by the child's value, and a mapping meeting a
//!   non-mapping is an error
//! - files are a union keyed by path; the ancestor's entries are marked
//!   inherited
//! - the description is always the child's
//!
//! Merging is a left fold, so it is associative but not commutative.

use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};

use super::{FileEntry, Skeleton};
use crate::error::{Error, Result};

/// Deep merge two value mappings without modifying either.
pub fn merge_values(lhs: &Mapping, rhs: &Mapping) -> Result<Mapping> {
    merge_mapping(lhs, rhs, "")
}

fn merge_mapping(lhs: &Mapping, rhs: &Mapping, prefix: &str) -> Result<Mapping> {
    let mut result = lhs.clone();

    for (key, rhs_value) in rhs {
        let key_path = join_key(prefix, key);

        let merged = match (result.get(key), rhs_value) {
            (Some(Value::Mapping(lhs_map)), Value::Mapping(rhs_map)) => {
                Value::Mapping(merge_mapping(lhs_map, rhs_map, &key_path)?)
            }
            (Some(lhs_value @ Value::Mapping(_)), _) | (Some(lhs_value), Value::Mapping(_)) => {
                return Err(Error::Validation {
                    message: format!(
                        "cannot merge values at key {:?}: {} cannot be merged with {}",
                        key_path,
                        type_name(lhs_value),
                        type_name(rhs_value)
                    ),
                });
            }
            _ => rhs_value.clone(),
        };

        result.insert(key.clone(), merged);
    }

    Ok(result)
}

fn join_key(prefix: &str, key: &Value) -> String {
    let key = match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".to_string(),
        other => format!("{:?}", other),
    };
    if prefix.is_empty() {
        key
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Union of two file sets keyed by path, sorted ascending.
///
/// Entries from `lhs` are marked inherited. Entries from `rhs` replace
/// same-path entries and keep their own flag.
pub fn merge_files(lhs: &[FileEntry], rhs: &[FileEntry]) -> Vec<FileEntry> {
    let mut by_path: BTreeMap<&str, FileEntry> = BTreeMap::new();

    for entry in lhs {
        by_path.insert(
            &entry.path,
            FileEntry {
                inherited: true,
                ..entry.clone()
            },
        );
    }

    for entry in rhs {
        by_path.insert(&entry.path, entry.clone());
    }

    by_path.into_values().collect()
}

/// Merge a child skeleton onto its ancestor.
///
/// The result's parent is `lhs`.
pub fn merge_pair(lhs: Skeleton, rhs: Skeleton) -> Result<Skeleton> {
    let values = merge_values(&lhs.values, &rhs.values)?;
    let files = merge_files(&lhs.files, &rhs.files);

    Ok(Skeleton {
        description: rhs.description,
        values,
        files,
        info: rhs.info,
        parent: Some(Box::new(lhs)),
    })
}

/// Merge a list of skeletons left to right.
///
/// A single skeleton is returned as is.
pub fn merge(skeletons: Vec<Skeleton>) -> Result<Skeleton> {
    let mut iter = skeletons.into_iter();
    let first = iter.next().ok_or_else(|| Error::Validation {
        message: "at least one skeleton is required".to_string(),
    })?;
    iter.try_fold(first, merge_pair)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::repository::{RepositoryInfo, RepositoryLocation, SkeletonInfo};
    use std::path::PathBuf;

    pub(crate) fn yaml(src: &str) -> Mapping {
        serde_yaml::from_str(src).unwrap()
    }

    pub(crate) fn entry(path: &str) -> FileEntry {
        FileEntry {
            path: path.to_string(),
            source: PathBuf::from("/skel").join(path),
            mode: 0o644,
            is_dir: false,
            inherited: false,
        }
    }

    pub(crate) fn skeleton(name: &str, values: Mapping, files: Vec<FileEntry>) -> Skeleton {
        Skeleton {
            description: format!("{} description", name),
            values,
            files,
            info: SkeletonInfo {
                name: name.to_string(),
                path: PathBuf::from("/repo").join(name),
                repository: RepositoryInfo {
                    name: None,
                    location: RepositoryLocation::Local {
                        path: PathBuf::from("/repo"),
                        revision: None,
                    },
                    root: PathBuf::from("/repo"),
                },
            },
            parent: None,
        }
    }

    #[test]
    fn test_merge_values_deep() {
        let lhs = yaml("{a: 1, b: {x: 1}}");
        let rhs = yaml("{b: {y: 2}, c: 3}");
        let merged = merge_values(&lhs, &rhs).unwrap();
        assert_eq!(merged, yaml("{a: 1, b: {x: 1, y: 2}, c: 3}"));
    }

    #[test]
    fn test_merge_values_rhs_wins_for_scalars_and_sequences() {
        let lhs = yaml("{a: 1, list: [1, 2], s: old}");
        let rhs = yaml("{a: 2, list: [3], s: ~}");
        let merged = merge_values(&lhs, &rhs).unwrap();
        assert_eq!(merged, yaml("{a: 2, list: [3], s: ~}"));
    }

    #[test]
    fn test_merge_values_type_mismatch() {
        let err = merge_values(&yaml("{a: 1}"), &yaml("{a: {x: 1}}")).unwrap_err();
        match err {
            Error::Validation { message } => {
                assert!(message.contains("\"a\""), "message: {}", message);
                assert!(message.contains("a number cannot be merged with a mapping"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_merge_values_type_mismatch_names_nested_key() {
        let err =
            merge_values(&yaml("{outer: {inner: {x: 1}}}"), &yaml("{outer: {inner: [1]}}"))
                .unwrap_err();
        assert!(err.to_string().contains("outer.inner"));
    }

    #[test]
    fn test_merge_values_does_not_mutate_inputs() {
        let lhs = yaml("{b: {x: 1}}");
        let rhs = yaml("{b: {y: 2}}");
        let (lhs_before, rhs_before) = (lhs.clone(), rhs.clone());
        merge_values(&lhs, &rhs).unwrap();
        assert_eq!(lhs, lhs_before);
        assert_eq!(rhs, rhs_before);
    }

    #[test]
    fn test_merge_files_union_sorted_with_inherited_flags() {
        let mut stale = entry("b.txt");
        stale.inherited = false;
        let lhs = vec![entry("c.txt"), stale, entry("shared.txt")];
        let mut override_entry = entry("shared.txt");
        override_entry.source = PathBuf::from("/child/shared.txt");
        let rhs = vec![override_entry, entry("a.txt")];

        let merged = merge_files(&lhs, &rhs);
        let summary: Vec<(&str, bool)> = merged
            .iter()
            .map(|e| (e.path.as_str(), e.inherited))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a.txt", false),
                ("b.txt", true),
                ("c.txt", true),
                ("shared.txt", false)
            ]
        );
        assert_eq!(merged[3].source, PathBuf::from("/child/shared.txt"));
    }

    #[test]
    fn test_merge_pair_takes_child_description_and_info() {
        let parent = skeleton("parent", yaml("{a: 1}"), vec![entry("p.txt")]);
        let mut child = skeleton("child", yaml("{b: 2}"), vec![entry("c.txt")]);
        child.description = String::new();

        let merged = merge_pair(parent.clone(), child).unwrap();
        assert_eq!(merged.description, "");
        assert_eq!(merged.info.name, "child");
        assert_eq!(merged.values, yaml("{a: 1, b: 2}"));
        assert_eq!(merged.parent.as_deref(), Some(&parent));
    }

    #[test]
    fn test_merge_empty_list_fails() {
        assert!(matches!(merge(vec![]), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_merge_single_is_identity() {
        let only = skeleton("only", yaml("{a: 1}"), vec![entry("x")]);
        assert_eq!(merge(vec![only.clone()]).unwrap(), only);
    }

    #[test]
    fn test_merge_is_not_commutative() {
        let a = skeleton("a", yaml("{k: a}"), vec![entry("f")]);
        let b = skeleton("b", yaml("{k: b}"), vec![entry("f")]);

        let ab = merge(vec![a.clone(), b.clone()]).unwrap();
        let ba = merge(vec![b, a]).unwrap();
        assert_ne!(ab.values, ba.values);
        assert_eq!(ab.values, yaml("{k: b}"));
        assert_eq!(ba.values, yaml("{k: a}"));
    }

    #[test]
    fn test_merge_list_equals_pairwise_fold() {
        let a = skeleton("a", yaml("{x: 1, m: {p: 1}}"), vec![entry("1"), entry("2")]);
        let b = skeleton("b", yaml("{y: 2, m: {q: 2}}"), vec![entry("2"), entry("3")]);
        let c = skeleton("c", yaml("{x: 3, m: {p: 3}}"), vec![entry("4")]);

        let folded = merge_pair(merge_pair(a.clone(), b.clone()).unwrap(), c.clone()).unwrap();
        let merged = merge(vec![a, b, c]).unwrap();
        assert_eq!(merged, folded);
        assert_eq!(merged.values, yaml("{x: 3, m: {p: 3, q: 2}, y: 2}"));
        assert_eq!(merged.ancestors().count(), 2);
    }
}
