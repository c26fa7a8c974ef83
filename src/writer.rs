//! Write strategies fed by the traversal.
//!
//! The traversal emits `(label, bytes)` fragments for every leaf it reaches
//! and never looks at what the sink does with them. Swapping the sink is
//! what turns the same walk into a hash, a diff, or a byte dump.
//!
//! | Sink             | Uses label | Result                         |
//! |------------------|------------|--------------------------------|
//! | [`HashWriter`]   | no         | streaming xxh64 digest         |
//! | [`CompareWriter`]| yes        | labels whose leaves differ     |
//! | [`StreamWriter`] | no         | canonical bytes to any `Write` |

use std::collections::{BTreeSet, HashMap};
use std::hash::Hasher;
use std::io;

use xxhash_rust::xxh64::Xxh64;

use crate::error::DeepHashError;

/// Label substituted for the root when none was given.
pub const ROOT_LABEL: &str = "value";

/// Suffix of every reported difference.
pub const NOT_EQUAL: &str = " is not equal";

/// Target of the labeled byte fragments produced by a traversal.
pub trait FieldWriter {
    /// Consume one leaf fragment.
    fn write_field(&mut self, label: &str, bytes: &[u8]) -> Result<(), DeepHashError>;
}

/// Accumulates every fragment into one running xxh64 state.
pub struct HashWriter {
    hasher: Xxh64,
}

impl HashWriter {
    /// Create an accumulator with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            hasher: Xxh64::new(seed),
        }
    }

    /// Digest of everything written so far.
    pub fn finish(&self) -> u64 {
        self.hasher.finish()
    }
}

impl std::fmt::Debug for HashWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashWriter")
            .field("digest", &format_args!("{:016x}", self.finish()))
            .finish()
    }
}

impl FieldWriter for HashWriter {
    fn write_field(&mut self, _label: &str, bytes: &[u8]) -> Result<(), DeepHashError> {
        self.hasher.write(bytes);
        Ok(())
    }
}

/// Forwards every fragment to an [`io::Write`], ignoring labels.
#[derive(Debug)]
pub struct StreamWriter<W> {
    inner: W,
}

impl<W: io::Write> StreamWriter<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Recover the wrapped writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: io::Write> FieldWriter for StreamWriter<W> {
    fn write_field(&mut self, label: &str, bytes: &[u8]) -> Result<(), DeepHashError> {
        self.inner
            .write_all(bytes)
            .map_err(|source| DeepHashError::Write {
                label: label.to_string(),
                source,
            })
    }
}

/// Phase of a [`CompareWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparePhase {
    /// Storing the left-hand side's fragments by label.
    Recording,
    /// Checking the right-hand side's fragments against the recorded ones.
    Comparing,
}

/// Records one side's fragments, then compares the other side against them.
///
/// Every label is consumed on first sight in the comparing phase, so the
/// resulting set holds each differing label once, whichever side it came
/// from.
#[derive(Debug)]
pub struct CompareWriter {
    recorded: HashMap<String, Vec<u8>>,
    differences: BTreeSet<String>,
    phase: ComparePhase,
}

impl CompareWriter {
    /// Create a writer in the recording phase.
    pub fn new() -> Self {
        Self {
            recorded: HashMap::new(),
            differences: BTreeSet::new(),
            phase: ComparePhase::Recording,
        }
    }

    /// Switch from recording to comparing.
    pub fn start_comparing(&mut self) {
        self.phase = ComparePhase::Comparing;
    }

    /// Current phase.
    pub fn phase(&self) -> ComparePhase {
        self.phase
    }

    /// Number of recorded labels not yet matched.
    pub fn pending(&self) -> usize {
        self.recorded.len()
    }

    /// Close the comparison and return the differing labels, sorted.
    ///
    /// Labels recorded on the left but never produced on the right count as
    /// differences.
    pub fn finish(mut self) -> Vec<String> {
        let leftover: Vec<String> = self.recorded.drain().map(|(label, _)| label).collect();
        self.differences.extend(leftover);
        self.differences.into_iter().collect()
    }

    /// Close the comparison and render each label as `"<label> is not equal"`.
    pub fn into_report(self) -> Vec<String> {
        self.finish()
            .into_iter()
            .map(|label| format!("{label}{NOT_EQUAL}"))
            .collect()
    }
}

impl Default for CompareWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldWriter for CompareWriter {
    fn write_field(&mut self, label: &str, bytes: &[u8]) -> Result<(), DeepHashError> {
        let label = if label.is_empty() { ROOT_LABEL } else { label };

        match self.phase {
            ComparePhase::Recording => {
                if self.recorded.contains_key(label) {
                    return Err(DeepHashError::DuplicateLabel {
                        label: label.to_string(),
                    });
                }
                self.recorded.insert(label.to_string(), bytes.to_vec());
            }
            ComparePhase::Comparing => match self.recorded.remove(label) {
                Some(previous) if previous == bytes => {}
                _ => {
                    self.differences.insert(label.to_string());
                }
            },
        }

        Ok(())
    }
}
