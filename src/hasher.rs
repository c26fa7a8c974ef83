//! Top-level hash and diff entry points.
//!
//! Every call builds its own [`CycleGuard`] and sink, so a [`DeepHasher`]
//! holds nothing but configuration and can be shared freely across threads.

use std::io;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::DeepHashError;
use crate::guard::CycleGuard;
use crate::visitor::{DeepHash, Visitor};
use crate::writer::{CompareWriter, FieldWriter, HashWriter, StreamWriter, ROOT_LABEL};

/// 64-bit structural digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest(u64);

impl Digest {
    /// Wrap a raw digest.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw digest.
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Big-endian bytes of the digest.
    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl From<Digest> for u64 {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

/// Configuration for a [`DeepHasher`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    /// Seed of the xxh64 accumulator. Digests are only comparable under the same seed.
    pub seed: u64,
    /// Root label used by [`DeepHasher::diff`] when the caller passes `""`.
    /// An empty value falls back to [`ROOT_LABEL`].
    pub default_root_label: String,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            default_root_label: ROOT_LABEL.to_string(),
        }
    }
}

/// Computes digests and diffs under one [`HashConfig`].
#[derive(Debug, Clone, Default)]
pub struct DeepHasher {
    config: HashConfig,
}

impl DeepHasher {
    /// Create a hasher with the given configuration.
    pub fn new(config: HashConfig) -> Self {
        Self { config }
    }

    /// Create a hasher with default configuration and the given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(HashConfig {
            seed,
            ..HashConfig::default()
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Run one traversal of `value` into `sink` with a fresh guard.
    pub fn traverse<T: DeepHash + ?Sized>(
        &self,
        value: &T,
        path: &str,
        sink: &mut dyn FieldWriter,
    ) -> Result<(), DeepHashError> {
        let mut guard = CycleGuard::new();
        Visitor::new(sink, &mut guard, self.config.seed).visit(value, path)
    }

    /// Digest of `value`, surfacing sink errors.
    pub fn try_hash<T: DeepHash + ?Sized>(&self, value: &T) -> Result<Digest, DeepHashError> {
        let mut sink = HashWriter::new(self.config.seed);
        self.traverse(value, "", &mut sink)?;
        Ok(Digest(sink.finish()))
    }

    /// Digest of `value`.
    ///
    /// The in-memory accumulator never rejects a write, so this cannot fail.
    pub fn hash<T: DeepHash + ?Sized>(&self, value: &T) -> Digest {
        self.try_hash(value).expect("In-memory hash sink failed")
    }

    /// Labels whose leaf contents or existence differ between `left` and `right`.
    ///
    /// Sorted, one entry per label. An empty `root` uses the configured
    /// default root label.
    pub fn diff_labels<L, R>(&self, root: &str, left: &L, right: &R) -> Result<Vec<String>, DeepHashError>
    where
        L: DeepHash + ?Sized,
        R: DeepHash + ?Sized,
    {
        let root = self.root_label(root);

        let mut sink = CompareWriter::new();
        self.traverse(left, root, &mut sink)?;
        sink.start_comparing();
        self.traverse(right, root, &mut sink)?;

        let labels = sink.finish();
        debug!(root = root, differences = labels.len(), "diff complete");
        Ok(labels)
    }

    /// Differences between `left` and `right`, each `"<label> is not equal"`.
    pub fn diff<L, R>(&self, root: &str, left: &L, right: &R) -> Result<Vec<String>, DeepHashError>
    where
        L: DeepHash + ?Sized,
        R: DeepHash + ?Sized,
    {
        let labels = self.diff_labels(root, left, right)?;
        Ok(labels
            .into_iter()
            .map(|label| format!("{label}{}", crate::writer::NOT_EQUAL))
            .collect())
    }

    /// Stream the exact bytes the accumulator would consume into `writer`.
    ///
    /// Paths are tracked under the default root label so a failed write
    /// names the field it was writing.
    pub fn write_canonical<T, W>(&self, value: &T, writer: W) -> Result<W, DeepHashError>
    where
        T: DeepHash + ?Sized,
        W: io::Write,
    {
        let mut sink = StreamWriter::new(writer);
        self.traverse(value, self.root_label(""), &mut sink)?;
        Ok(sink.into_inner())
    }

    /// Root label for `root`: itself, else the configured default, else
    /// [`ROOT_LABEL`]. Never empty, since an empty root disables paths.
    fn root_label<'r>(&'r self, root: &'r str) -> &'r str {
        if !root.is_empty() {
            root
        } else if !self.config.default_root_label.is_empty() {
            &self.config.default_root_label
        } else {
            ROOT_LABEL
        }
    }

    /// The exact bytes the accumulator would consume.
    pub fn canonical_bytes<T: DeepHash + ?Sized>(&self, value: &T) -> Vec<u8> {
        self.write_canonical(value, Vec::new())
            .expect("Writing to a Vec cannot fail")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xxhash_rust::xxh64::xxh64;

    #[test]
    fn test_digest_display() {
        assert_eq!(Digest::new(0xab).to_string(), "00000000000000ab");
        assert_eq!(Digest::new(u64::MAX).to_string().len(), 16);
    }

    #[test]
    fn test_hash_equals_xxh64_of_canonical_bytes() {
        let hasher = DeepHasher::with_seed(42);
        let value = (vec!["a", "bc"], 7u16);
        let bytes = hasher.canonical_bytes(&value);
        assert_eq!(hasher.hash(&value).as_u64(), xxh64(&bytes, 42));
    }

    #[test]
    fn test_seed_changes_digest() {
        let value = "foo";
        assert_ne!(
            DeepHasher::with_seed(1).hash(value),
            DeepHasher::with_seed(2).hash(value)
        );
    }

    #[test]
    fn test_default_root_label() {
        let hasher = DeepHasher::default();
        assert_eq!(hasher.diff("", &1u8, &2u8).unwrap(), vec!["value is not equal"]);

        let custom = DeepHasher::new(HashConfig {
            default_root_label: "doc".to_string(),
            ..HashConfig::default()
        });
        assert_eq!(custom.diff("", &1u8, &2u8).unwrap(), vec!["doc is not equal"]);
        assert_eq!(custom.diff("xyz", &1u8, &2u8).unwrap(), vec!["xyz is not equal"]);
    }

    #[test]
    fn test_empty_default_root_label_falls_back() {
        let hasher = DeepHasher::new(HashConfig {
            default_root_label: String::new(),
            ..HashConfig::default()
        });
        assert_eq!(
            hasher.diff("", &vec![1u8, 2], &vec![1u8, 3]).unwrap(),
            vec!["value[1] is not equal"]
        );
        assert!(hasher.diff("", &(1u8, 2u8), &(1u8, 2u8)).unwrap().is_empty());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: HashConfig = serde_json::from_str(r#"{"seed": 9}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.default_root_label, "value");
    }

    #[test]
    fn test_write_canonical_into_buffer() {
        let hasher = DeepHasher::default();
        let buf = hasher.write_canonical(&("a", true), Vec::new()).unwrap();
        assert_eq!(buf, b"a1");
    }

    /// Accepts `budget` bytes, then refuses every write.
    #[derive(Debug)]
    struct FailAfter {
        budget: usize,
    }

    impl io::Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf.len() > self.budget {
                return Err(io::Error::new(io::ErrorKind::WriteZero, "budget exhausted"));
            }
            self.budget -= buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct Account {
        owner: String,
        balance: u64,
        note: String,
    }

    deep_hash_record!(Account { owner, balance, note });

    #[test]
    fn test_write_failure_aborts_traversal_with_field_label() {
        let account = Account {
            owner: "ann".into(),
            balance: 10,
            note: "never reached".into(),
        };
        let writer = FailAfter { budget: 5 };

        let err = DeepHasher::default().write_canonical(&account, writer).unwrap_err();
        match err {
            DeepHashError::Write { label, source } => {
                assert_eq!(label, "value.balance");
                assert_eq!(source.kind(), io::ErrorKind::WriteZero);
            }
            other => panic!("expected a write error, got {other:?}"),
        }
    }

    #[test]
    fn test_hasher_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DeepHasher>();
    }
}
