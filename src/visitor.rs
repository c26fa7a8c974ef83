//! Traversal engine.
//!
//! ## Dispatch
//!
//! Every participating type implements [`DeepHash`] and routes itself to one
//! of the structural helpers on [`Visitor`]:
//!
//! | Kind                   | Helper                         | Fragment          |
//! |------------------------|--------------------------------|-------------------|
//! | primitive              | [`Visitor::write`]             | leaf bytes        |
//! | record                 | [`Visitor::record`] + [`Visitor::field`] | none    |
//! | sequence               | [`Visitor::sequence`]          | none              |
//! | associative container  | [`Visitor::map`]               | key sub-hash      |
//! | shared pointer         | [`Visitor::shared`]            | none              |
//! | reference / union      | [`Visitor::visit`] (same path) | none              |
//!
//! Absent values return before touching the cycle guard. Aggregates never
//! emit fragments of their own; only their leaves do.

use std::collections::HashSet;

use tracing::trace;

use crate::error::DeepHashError;
use crate::guard::{type_key, CycleGuard, Identity, TypeKey};
use crate::path::{append_name, append_with, NameKind};
use crate::writer::{FieldWriter, HashWriter};

/// A value the engine can traverse.
///
/// Implemented for primitives, standard containers and pointers. Records,
/// newtypes and enums get implementations from
/// [`deep_hash_record!`](crate::deep_hash_record),
/// [`deep_hash_newtype!`](crate::deep_hash_newtype) and
/// [`deep_hash_enum!`](crate::deep_hash_enum).
pub trait DeepHash {
    /// Feed this value's leaves into `visitor` under `path`.
    ///
    /// An empty `path` means labels are not tracked.
    fn deep_hash(&self, visitor: &mut Visitor<'_>, path: &str) -> Result<(), DeepHashError>;

    /// Human-readable form of this value when it is used as a map key.
    ///
    /// Appears inside `[key]` / `[key-key]` labels. Keys of one map that
    /// render the same are told apart by their sub-hash, so an ambiguous
    /// form only costs readability.
    fn key_label(&self) -> String {
        format!("<{}>", std::any::type_name::<Self>())
    }
}

/// One traversal: the sink being fed and the guard for the active path.
pub struct Visitor<'a> {
    sink: &'a mut dyn FieldWriter,
    guard: &'a mut CycleGuard,
    seed: u64,
}

impl<'a> Visitor<'a> {
    /// Create a visitor. `seed` drives the private sub-hashes of map keys.
    pub fn new(sink: &'a mut dyn FieldWriter, guard: &'a mut CycleGuard, seed: u64) -> Self {
        Self { sink, guard, seed }
    }

    /// Traverse `value` at `path`.
    pub fn visit<T: DeepHash + ?Sized>(
        &mut self,
        value: &T,
        path: &str,
    ) -> Result<(), DeepHashError> {
        value.deep_hash(self, path)
    }

    /// Emit one leaf fragment.
    pub fn write(&mut self, path: &str, bytes: &[u8]) -> Result<(), DeepHashError> {
        self.sink.write_field(path, bytes)
    }

    /// Run `body` unless `(identity, ty)` is already on the active path.
    ///
    /// The pair is released after `body` returns, including on error.
    pub fn guarded<F>(
        &mut self,
        identity: Identity,
        ty: TypeKey,
        path: &str,
        body: F,
    ) -> Result<(), DeepHashError>
    where
        F: FnOnce(&mut Self) -> Result<(), DeepHashError>,
    {
        if self.guard.enter(identity, ty) {
            trace!(
                identity = identity.addr(),
                type_key = ty,
                path = path,
                "cycle guard skipped active node"
            );
            return Ok(());
        }

        let result = body(self);
        self.guard.leave(identity, ty);
        result
    }

    /// Traverse a record: guard on its address and type, then run `fields`.
    pub fn record<T, F>(&mut self, record: &T, path: &str, fields: F) -> Result<(), DeepHashError>
    where
        T: ?Sized,
        F: FnOnce(&mut Self) -> Result<(), DeepHashError>,
    {
        self.guarded(Identity::of(record), type_key::<T>(), path, fields)
    }

    /// Traverse one record field at `path.name`.
    pub fn field<T: DeepHash + ?Sized>(
        &mut self,
        path: &str,
        name: &str,
        value: &T,
    ) -> Result<(), DeepHashError> {
        let child = append_name(path, name, NameKind::Field);
        self.visit(value, &child)
    }

    /// Traverse the target of a shared pointer `P` at the same path.
    ///
    /// Cycles can only close through shared ownership, so the pointee is
    /// guarded under the pointer's own type key.
    pub fn shared<P, T>(&mut self, target: &T, path: &str) -> Result<(), DeepHashError>
    where
        P: ?Sized,
        T: DeepHash + ?Sized,
    {
        self.guarded(Identity::of(target), type_key::<P>(), path, |visitor| {
            visitor.visit(target, path)
        })
    }

    /// Traverse elements in order, labelling each `path[i]`.
    pub fn sequence<'v, T, I>(&mut self, path: &str, items: I) -> Result<(), DeepHashError>
    where
        T: DeepHash + ?Sized + 'v,
        I: IntoIterator<Item = &'v T>,
    {
        for (i, item) in items.into_iter().enumerate() {
            let child = append_with(path, NameKind::Indexed, || i.to_string());
            self.visit(item, &child)?;
        }
        Ok(())
    }

    /// Traverse an associative container independently of its iteration order.
    ///
    /// Each key is sub-hashed on its own; entries are visited in ascending
    /// sub-hash order (stable, so ties keep iteration order). Per entry the
    /// sub-hash is written at `path[key-key]` and the value traversed at
    /// `path[key]`. A key whose label is already used in this map, in either
    /// form, is labelled `key#<sub-hash>` instead.
    pub fn map<'v, K, V, I>(&mut self, path: &str, entries: I) -> Result<(), DeepHashError>
    where
        K: DeepHash + ?Sized + 'v,
        V: DeepHash + ?Sized + 'v,
        I: IntoIterator<Item = (&'v K, &'v V)>,
    {
        let mut elements = Vec::new();
        for (key, value) in entries {
            elements.push((self.sub_hash(key)?, key, value));
        }
        elements.sort_by_key(|(key_hash, _, _)| *key_hash);

        let mut taken = HashSet::new();
        for (key_hash, key, value) in elements {
            let label = if path.is_empty() {
                String::new()
            } else {
                unique_key_label(&mut taken, key.key_label(), key_hash)
            };

            let key_path = append_name(path, &label, NameKind::MapKey);
            self.write(&key_path, &key_hash.to_be_bytes())?;

            let value_path = append_name(path, &label, NameKind::Indexed);
            self.visit(value, &value_path)?;
        }
        Ok(())
    }

    /// Hash `value` on its own, sharing this traversal's cycle guard.
    fn sub_hash<T: DeepHash + ?Sized>(&mut self, value: &T) -> Result<u64, DeepHashError> {
        let mut sink = HashWriter::new(self.seed);
        Visitor::new(&mut sink, &mut *self.guard, self.seed).visit(value, "")?;
        Ok(sink.finish())
    }
}

/// Claim a label for one map entry that neither `[label]` nor `[label-key]`
/// of an earlier entry already uses.
///
/// The readable form is kept when free. On a clash the key sub-hash is
/// appended, then a counter for keys whose sub-hashes also agree.
fn unique_key_label(taken: &mut HashSet<String>, readable: String, key_hash: u64) -> String {
    fn is_free(taken: &HashSet<String>, label: &str) -> bool {
        !taken.contains(label) && !taken.contains(&format!("{label}-key"))
    }

    let mut label = readable;
    if !is_free(taken, &label) {
        let base = format!("{label}#{key_hash:016x}");
        label = base.clone();
        let mut n = 1usize;
        while !is_free(taken, &label) {
            label = format!("{base}#{n}");
            n += 1;
        }
    }

    taken.insert(format!("{label}-key"));
    taken.insert(label.clone());
    label
}

impl std::fmt::Debug for Visitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visitor")
            .field("guard", &self.guard)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
