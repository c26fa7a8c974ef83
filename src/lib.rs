//! # deephash
//!
//! Structural fingerprints and field-path diffs for arbitrary values.
//!
//! Two values with the same observable contents hash identically, however
//! they are laid out in memory; two values that differ in any nested field
//! hash differently, and [`diff`] names the fields.
//!
//! ## Core Contract
//!
//! 1. [`hash`] walks a value and folds its leaves into a 64-bit xxh64 digest
//! 2. [`diff`] walks two values and reports every label whose leaves differ
//! 3. Both share one traversal; only the injected [`FieldWriter`] changes
//!
//! ## Architecture
//!
//! ```text
//! value → Visitor ──(label, bytes)──→ FieldWriter
//!            │                         ├── HashWriter    → digest
//!            ↓                         ├── CompareWriter → differences
//!       CycleGuard                     └── StreamWriter  → canonical bytes
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Record fields are visited in declaration order
//! - Sequences are visited in index order
//! - Maps and sets are visited in ascending key sub-hash order
//! - `&T`, `Box<T>`, `Rc<T>`, `Some(T)` and newtypes are transparent
//! - Self-referential graphs terminate: an `(address, type)` pair already on
//!   the recursion path contributes nothing
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use deephash::{deep_hash_record, diff, hash};
//!
//! struct Config {
//!     name: String,
//!     limits: HashMap<String, u32>,
//! }
//!
//! deep_hash_record!(Config { name, limits });
//!
//! let a = Config { name: "api".into(), limits: HashMap::from([("rps".into(), 10)]) };
//! let b = Config { name: "api".into(), limits: HashMap::from([("rps".into(), 20)]) };
//!
//! assert_ne!(hash(&a), hash(&b));
//! assert_eq!(diff("config", &a, &b).unwrap(), vec!["config.limits[rps] is not equal"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

#[macro_use]
mod macros;

pub mod error;
pub mod guard;
pub mod hasher;
pub mod path;
pub mod visitor;
pub mod writer;
mod impls;

// Re-exports
pub use error::DeepHashError;
pub use guard::{CycleGuard, Identity, TypeKey};
pub use hasher::{DeepHasher, Digest, HashConfig};
pub use path::{append_name, NameKind};
pub use visitor::{DeepHash, Visitor};
pub use writer::{
    CompareWriter, ComparePhase, FieldWriter, HashWriter, StreamWriter, NOT_EQUAL, ROOT_LABEL,
};

/// Schema version of the leaf encodings.
/// Increment on any change that alters digests for existing values.
pub const ENCODING_VERSION: &str = "1.0.0";

/// 64-bit digest of `value` with the default configuration.
pub fn hash<T: DeepHash + ?Sized>(value: &T) -> u64 {
    DeepHasher::default().hash(value).as_u64()
}

/// Digest of `value` as 16 lowercase hex characters.
pub fn hash_hex<T: DeepHash + ?Sized>(value: &T) -> String {
    DeepHasher::default().hash(value).to_string()
}

/// Digest of `value`, surfacing sink errors instead of panicking.
pub fn try_hash<T: DeepHash + ?Sized>(value: &T) -> Result<u64, DeepHashError> {
    DeepHasher::default().try_hash(value).map(u64::from)
}

/// Differences between `left` and `right` as `"<label> is not equal"`.
///
/// `label` names the root; `""` means `"value"`. The result is sorted and
/// symmetric: swapping `left` and `right` yields the same entries.
pub fn diff<L, R>(label: &str, left: &L, right: &R) -> Result<Vec<String>, DeepHashError>
where
    L: DeepHash + ?Sized,
    R: DeepHash + ?Sized,
{
    DeepHasher::default().diff(label, left, right)
}

/// The exact byte stream [`hash`] folds into its digest.
pub fn canonical_bytes<T: DeepHash + ?Sized>(value: &T) -> Vec<u8> {
    DeepHasher::default().canonical_bytes(value)
}

/// Write the byte stream [`hash`] folds into its digest to `writer`.
pub fn write_canonical<T, W>(value: &T, writer: W) -> Result<W, DeepHashError>
where
    T: DeepHash + ?Sized,
    W: std::io::Write,
{
    DeepHasher::default().write_canonical(value, writer)
}
