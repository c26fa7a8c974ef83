//! Property tests for hashing and diffing.

use std::collections::{BTreeMap, HashMap};

use proptest::prelude::*;

use deephash::{canonical_bytes, diff, hash, DeepHasher};

proptest! {
    #[test]
    fn hash_is_deterministic(values in proptest::collection::vec(any::<i64>(), 0..32)) {
        prop_assert_eq!(hash(&values), hash(&values.clone()));
    }

    #[test]
    fn map_order_does_not_matter(entries in proptest::collection::vec((any::<u16>(), ".{0,8}"), 0..16)) {
        let forward: HashMap<u16, String> = entries.iter().cloned().collect();
        let mut pairs: Vec<(u16, String)> = forward.clone().into_iter().collect();
        pairs.reverse();
        let reversed: HashMap<u16, String> = pairs.into_iter().collect();
        let sorted: BTreeMap<u16, String> = forward.clone().into_iter().collect();

        prop_assert_eq!(hash(&forward), hash(&reversed));
        prop_assert_eq!(hash(&forward), hash(&sorted));
    }

    #[test]
    fn array_and_vec_agree(values in any::<[u32; 6]>()) {
        prop_assert_eq!(hash(&values), hash(&values.to_vec()));
        prop_assert_eq!(canonical_bytes(&values), canonical_bytes(values.as_slice()));
    }

    #[test]
    fn diff_is_symmetric(
        left in proptest::collection::vec(any::<u8>(), 0..16),
        right in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        prop_assert_eq!(
            diff("xs", &left, &right).unwrap(),
            diff("xs", &right, &left).unwrap()
        );
    }

    #[test]
    fn diff_empty_iff_hashes_equal(
        left in proptest::collection::vec(any::<u8>(), 0..8),
        right in proptest::collection::vec(any::<u8>(), 0..8),
    ) {
        let empty = diff("xs", &left, &right).unwrap().is_empty();
        prop_assert_eq!(empty, hash(&left) == hash(&right));
        prop_assert_eq!(empty, left == right);
    }

    #[test]
    fn diff_reports_each_changed_index(
        values in proptest::collection::vec(any::<u8>(), 1..16),
        index in any::<prop::sample::Index>(),
    ) {
        let i = index.index(values.len());
        let mut changed = values.clone();
        changed[i] = changed[i].wrapping_add(1);

        prop_assert_eq!(
            diff("xs", &values, &changed).unwrap(),
            vec![format!("xs[{i}] is not equal")]
        );
    }

    #[test]
    fn seeded_hasher_matches_its_canonical_bytes(seed in any::<u64>(), s in ".{0,32}") {
        let hasher = DeepHasher::with_seed(seed);
        let bytes = hasher.canonical_bytes(s.as_str());
        prop_assert_eq!(bytes.as_slice(), s.as_bytes());
        prop_assert_eq!(
            hasher.hash(s.as_str()).as_u64(),
            xxhash_rust::xxh64::xxh64(&bytes, seed)
        );
    }
}
