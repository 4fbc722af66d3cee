//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{encode_path_segment, join_slash_path, normalize_path, split_slash_path};
    use proptest::prelude::*;
    use std::path::{Component, Path};

    // ============================================================================
    // normalize_path property tests
    // ============================================================================

    proptest! {
        /// Property: normalizing twice is the same as normalizing once
        #[test]
        fn normalize_path_is_idempotent(input in "(/)?([a-z]{1,3}|\\.|\\.\\.)(/([a-z]{1,3}|\\.|\\.\\.)){0,6}") {
            let once = normalize_path(Path::new(&input));
            let twice = normalize_path(&once);
            prop_assert_eq!(once, twice);
        }

        /// Property: the result never contains `.` components
        #[test]
        fn normalize_path_has_no_cur_dir(input in "(/)?([a-z]{1,3}|\\.|\\.\\.)(/([a-z]{1,3}|\\.|\\.\\.)){0,6}") {
            let normalized = normalize_path(Path::new(&input));
            prop_assert!(normalized.components().all(|c| c != Component::CurDir));
        }

        /// Property: absolute inputs never produce `..` components
        #[test]
        fn normalize_absolute_path_never_escapes_root(input in "/([a-z]{1,3}|\\.\\.)(/([a-z]{1,3}|\\.\\.)){0,6}") {
            let normalized = normalize_path(Path::new(&input));
            prop_assert!(normalized.is_absolute());
            prop_assert!(normalized.components().all(|c| c != Component::ParentDir));
        }

        /// Property: paths made only of normal components are unchanged
        #[test]
        fn normalize_path_preserves_plain_paths(input in "/[a-z]{1,5}(/[a-z]{1,5}){0,5}") {
            let normalized = normalize_path(Path::new(&input));
            prop_assert_eq!(normalized, Path::new(&input).to_path_buf());
        }
    }

    // ============================================================================
    // slash path property tests
    // ============================================================================

    proptest! {
        /// Property: split followed by join reproduces the input
        #[test]
        fn split_then_join_roundtrips(input in "[a-z]{1,4}(/[a-z]{1,4}){0,4}") {
            let (dir, name) = split_slash_path(&input);
            prop_assert_eq!(join_slash_path(dir, name), input);
        }

        /// Property: the file name part never contains a separator
        #[test]
        fn split_name_has_no_separator(input in "[a-z/]{0,20}") {
            let (_, name) = split_slash_path(&input);
            prop_assert!(!name.contains('/'));
        }
    }

    // ============================================================================
    // encode_path_segment property tests
    // ============================================================================

    proptest! {
        /// Property: encoding never produces filesystem-unsafe characters
        #[test]
        fn encode_never_produces_unsafe_chars(input in ".*") {
            let result = encode_path_segment(&input);
            let unsafe_chars = ['\\', ':', '*', '?', '"', '<', '>', '|'];
            for ch in unsafe_chars {
                prop_assert!(
                    !result.contains(ch),
                    "encode_path_segment produced unsafe character '{}' from input '{}'",
                    ch,
                    input
                );
            }
        }

        /// Property: characters are replaced one to one
        #[test]
        fn encode_preserves_char_count(input in ".+") {
            let result = encode_path_segment(&input);
            prop_assert_eq!(result.chars().count(), input.chars().count());
        }
    }
}
