//! Field-path labels used to attribute differences.
//!
//! ## Grammar
//!
//! | Position            | Label            |
//! |---------------------|------------------|
//! | record field        | `base.name`      |
//! | sequence element    | `base[i]`        |
//! | map value           | `base[key]`      |
//! | map key             | `base[key-key]`  |
//!
//! An empty base means path tracking is off: every derived label is empty
//! too, and the component is never rendered.

/// How a component is attached to its parent label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// Record field: `.name`.
    Field,
    /// Map key entry: `[key-key]`.
    MapKey,
    /// Sequence index or map value: `[i]` / `[key]`.
    Indexed,
}

/// Append `component` to `base` using the grammar for `kind`.
pub fn append_name(base: &str, component: &str, kind: NameKind) -> String {
    if base.is_empty() {
        return String::new();
    }

    match kind {
        NameKind::Field => format!("{base}.{component}"),
        NameKind::MapKey => format!("{base}[{component}-key]"),
        NameKind::Indexed => format!("{base}[{component}]"),
    }
}

/// Like [`append_name`], but only renders the component when paths are tracked.
pub fn append_with<F>(base: &str, kind: NameKind, component: F) -> String
where
    F: FnOnce() -> String,
{
    if base.is_empty() {
        return String::new();
    }
    append_name(base, &component(), kind)
}
