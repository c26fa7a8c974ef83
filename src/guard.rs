//! Cycle guard for self-referential value graphs.
//!
//! ## Invariant
//!
//! An `(identity, type)` pair is active exactly while a traversal call for
//! it is on the stack. Re-entering an active pair contributes nothing, which
//! is what makes `a.next = b; b.next = a` terminate.
//!
//! The state per identity is a list of type keys, not a single type: a
//! record and its first field share an address, as do a shared pointer and
//! the value it points at. Leaving removes only the occurrence that was
//! entered, and drops the identity once nothing is active for it.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Opaque address-derived identity of a value.
///
/// Only ever used as a map key; never turned back into a pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(usize);

impl Identity {
    /// Identity of the value behind `value`.
    pub fn of<T: ?Sized>(value: &T) -> Self {
        Self((value as *const T).cast::<()>() as usize)
    }

    /// Identity from a raw address.
    pub fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    /// The raw address.
    pub fn addr(&self) -> usize {
        self.0
    }
}

/// Type key distinguishing views of the same identity.
pub type TypeKey = &'static str;

/// Type key for `T`.
pub fn type_key<T: ?Sized>() -> TypeKey {
    std::any::type_name::<T>()
}

/// Tracks `(identity, type)` pairs on the active recursion path.
#[derive(Debug, Default)]
pub struct CycleGuard {
    active: HashMap<Identity, Vec<TypeKey>>,
}

impl CycleGuard {
    /// Create an empty guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `(identity, ty)` active.
    ///
    /// Returns `true` if the pair was already active, in which case nothing
    /// is recorded and the caller must skip the subtree (and must not call
    /// [`leave`](Self::leave)).
    pub fn enter(&mut self, identity: Identity, ty: TypeKey) -> bool {
        let types = self.active.entry(identity).or_default();
        if types.contains(&ty) {
            return true;
        }
        types.push(ty);
        false
    }

    /// Release a pair previously recorded by [`enter`](Self::enter).
    pub fn leave(&mut self, identity: Identity, ty: TypeKey) {
        if let Entry::Occupied(mut entry) = self.active.entry(identity) {
            let types = entry.get_mut();
            if let Some(pos) = types.iter().rposition(|t| *t == ty) {
                types.remove(pos);
            }
            if types.is_empty() {
                entry.remove();
            }
        }
    }

    /// Whether `(identity, ty)` is currently active.
    pub fn is_active(&self, identity: Identity, ty: TypeKey) -> bool {
        self.active
            .get(&identity)
            .map_or(false, |types| types.contains(&ty))
    }

    /// Number of identities with at least one active type.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether nothing is active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OUTER: TypeKey = "Outer";
    const INNER: TypeKey = "Inner";

    #[test]
    fn test_enter_then_reenter_skips() {
        let mut guard = CycleGuard::new();
        let id = Identity::from_addr(0x1000);

        assert!(!guard.enter(id, OUTER));
        assert!(guard.enter(id, OUTER));
        assert!(guard.is_active(id, OUTER));

        guard.leave(id, OUTER);
        assert!(!guard.is_active(id, OUTER));
        assert!(guard.is_empty());
    }

    #[test]
    fn test_same_address_different_types() {
        let mut guard = CycleGuard::new();
        let id = Identity::from_addr(0x2000);

        assert!(!guard.enter(id, OUTER));
        assert!(!guard.enter(id, INNER));
        assert_eq!(guard.len(), 1);

        // Leaving the nested view keeps the outer one active.
        guard.leave(id, INNER);
        assert!(guard.is_active(id, OUTER));
        assert!(!guard.is_active(id, INNER));

        guard.leave(id, OUTER);
        assert!(guard.is_empty());
    }

    #[test]
    fn test_sibling_reentry_after_leave() {
        let mut guard = CycleGuard::new();
        let id = Identity::from_addr(0x3000);

        // Two siblings visiting the same shared node one after the other.
        assert!(!guard.enter(id, OUTER));
        guard.leave(id, OUTER);
        assert!(!guard.enter(id, OUTER));
        guard.leave(id, OUTER);
        assert!(guard.is_empty());
    }

    #[test]
    fn test_leave_unknown_is_noop() {
        let mut guard = CycleGuard::new();
        guard.leave(Identity::from_addr(0x4000), OUTER);
        assert!(guard.is_empty());
    }

    #[test]
    fn test_identity_of_field_shares_address() {
        #[repr(C)]
        struct Outer {
            inner: u64,
            other: u64,
        }

        let value = Outer { inner: 1, other: 2 };
        assert_eq!(Identity::of(&value), Identity::of(&value.inner));
        assert_ne!(Identity::of(&value), Identity::of(&value.other));
    }

    #[test]
    fn test_type_keys_differ() {
        assert_ne!(type_key::<u8>(), type_key::<u16>());
        assert_eq!(type_key::<String>(), type_key::<String>());
    }
}
