use thiserror::Error;

/// Errors surfaced by catalog backends
///
/// Any failure of a remote primitive (query, create, remove, fetch,
/// upload, tag) maps onto one of these variants. Transient failures are
/// not retried here; retry policy belongs to the session layer.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No collection exists at the given path
    #[error("No such collection: {path}")]
    MissingContainer { path: String },
    /// No data object exists at the given path
    #[error("No such data object: {path}")]
    MissingLeaf { path: String },
    /// A non-recursive removal hit a collection that still has entries
    #[error("Collection not empty: {path}")]
    NotEmpty { path: String },
    /// A generic remote operation failure with enough context to diagnose
    #[error("Failed to {action} {path}: {reason}")]
    Operation {
        action: &'static str,
        path: String,
        reason: String,
    },
    /// Represents an I/O error from a backend touching the filesystem
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    #[must_use]
    pub fn operation(action: &'static str, path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Operation {
            action,
            path: path.into(),
            reason: reason.into(),
        }
    }
}
