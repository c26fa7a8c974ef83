//! Sequences, maps and sets.
//!
//! Sequences keep index order; arrays, slices, `Vec` and `VecDeque` with the
//! same elements hash the same. Maps and sets are canonicalised by key
//! sub-hash, so insertion and iteration order never matter. A set is a map
//! whose values contribute nothing.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::BuildHasher;

use crate::error::DeepHashError;
use crate::visitor::{DeepHash, Visitor};

fn sequence_label<'v, T, I>(items: I) -> String
where
    T: DeepHash + 'v,
    I: IntoIterator<Item = &'v T>,
{
    let parts: Vec<String> = items
        .into_iter()
        .map(|item| format!("{:?}", item.key_label()))
        .collect();
    format!("[{}]", parts.join(", "))
}

impl<T: DeepHash> DeepHash for [T] {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.sequence(path, self)
    }

    fn key_label(&self) -> String {
        sequence_label(self)
    }
}

impl<T: DeepHash, const N: usize> DeepHash for [T; N] {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.sequence(path, self)
    }

    fn key_label(&self) -> String {
        sequence_label(self)
    }
}

impl<T: DeepHash> DeepHash for Vec<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.sequence(path, self)
    }

    fn key_label(&self) -> String {
        sequence_label(self)
    }
}

impl<T: DeepHash> DeepHash for VecDeque<T> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.sequence(path, self)
    }

    fn key_label(&self) -> String {
        sequence_label(self)
    }
}

impl<K: DeepHash, V: DeepHash, S: BuildHasher> DeepHash for HashMap<K, V, S> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.map(path, self)
    }
}

impl<K: DeepHash, V: DeepHash> DeepHash for BTreeMap<K, V> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.map(path, self)
    }
}

impl<K: DeepHash, S: BuildHasher> DeepHash for HashSet<K, S> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.map(path, self.iter().map(|key| (key, &())))
    }
}

impl<K: DeepHash> DeepHash for BTreeSet<K> {
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError> {
        visitor.map(path, self.iter().map(|key| (key, &())))
    }
}
