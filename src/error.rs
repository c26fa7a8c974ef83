//! Error types for traversal and sinks.

/// Error raised while feeding a value into a [`FieldWriter`](crate::writer::FieldWriter).
///
/// Absent values, unsupported kinds, empty containers and cycles are not
/// errors; they simply contribute nothing to the digest.
#[derive(Debug, thiserror::Error)]
pub enum DeepHashError {
    /// The sink rejected a write. Aborts the whole traversal.
    #[error("Failed to write field {label:?}: {source}")]
    Write {
        /// Label of the fragment being written.
        label: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The same label was recorded twice in one traversal.
    ///
    /// Labels are unique per position, so this means two distinct map keys
    /// rendered the same `key_label`.
    #[error("Field label {label:?} was written more than once")]
    DuplicateLabel {
        /// The colliding label.
        label: String,
    },
}
