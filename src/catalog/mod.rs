//! Catalog abstraction for remote hierarchical namespaces
//!
//! A catalog stores collections (containers) and data objects (leaves)
//! under `/`-separated absolute paths and answers `LIKE`-style name
//! queries about them. All traversal and bulk logic in this crate is
//! written against the [`Catalog`] trait so that the remote session is an
//! injected dependency rather than ambient state; two in-crate backends
//! are provided:
//!
//! - [`MemoryCatalog`]: collections and objects held in memory, used by
//!   the test suite and as a reference implementation.
//! - [`DirCatalog`]: a local directory tree presented as a catalog, which
//!   backs the CLI.

pub mod dir;
pub mod error;
pub mod memory;
pub mod query;

pub use dir::DirCatalog;
pub use error::CatalogError;
pub use memory::MemoryCatalog;
pub use query::{Criterion, Query, QueryField, like_match};

use std::path::Path;

use crate::patterns::join;

/// The two kinds of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    /// A collection: a container of other entries
    Container,
    /// A data object: a leaf holding content
    Leaf,
}

impl EntryKind {
    /// Human-readable noun for diagnostics
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Container => "collection",
            Self::Leaf => "object",
        }
    }
}

/// A name/value/unit metadata triple attachable to any entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub unit: Option<String>,
}

impl Attribute {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            unit: None,
        }
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Handle to a fetched data object
///
/// Carries the object's bytes when the fetch was asked to return content
/// in memory instead of writing a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafHandle {
    pub path: String,
    pub data: Option<Vec<u8>>,
}

/// One result row of a catalog query: a collection path, plus the object
/// name when the query selected data objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub container: String,
    pub leaf: Option<String>,
}

impl Row {
    /// Absolute path of the matched entry.
    #[must_use]
    pub fn path(&self) -> String {
        match &self.leaf {
            Some(name) => join(&self.container, name),
            None => self.container.clone(),
        }
    }
}

/// Lazy sequence of query result rows
pub type Rows<'a> = Box<dyn Iterator<Item = Result<Row, CatalogError>> + 'a>;

/// A hierarchical storage catalog
///
/// Queries preserve the backend's own result ordering and never mutate
/// remote state. Mutation primitives block until the remote round-trip
/// completes; callers wanting timeouts must wrap the call externally.
pub trait Catalog {
    /// Resolve a possibly-relative path against the session's current
    /// working collection (and `~` against its home collection).
    fn resolve(&self, path: &str) -> String;

    /// Whether a collection exists at this absolute path.
    fn container_exists(&self, path: &str) -> Result<bool, CatalogError>;

    /// Whether a data object exists at this absolute path.
    fn leaf_exists(&self, path: &str) -> Result<bool, CatalogError>;

    /// Run a read-only name query, yielding rows in catalog order.
    fn query<'a>(&'a self, query: &Query) -> Rows<'a>;

    /// Create a collection; with `recursive`, create missing ancestors too.
    fn create_container(&self, path: &str, recursive: bool) -> Result<(), CatalogError>;

    /// Remove a collection; with `recursive`, remove its whole subtree in
    /// one call. Without it, a non-empty collection is an error.
    fn remove_container(&self, path: &str, recursive: bool) -> Result<(), CatalogError>;

    /// Remove a single data object.
    fn unlink_leaf(&self, path: &str) -> Result<(), CatalogError>;

    /// Fetch a data object. With `local` set, write into that directory
    /// (or file path) and return a content-less handle; otherwise return
    /// the bytes in the handle.
    fn fetch_leaf(&self, path: &str, local: Option<&Path>) -> Result<LeafHandle, CatalogError>;

    /// Upload a local file into the given collection, keeping its name.
    fn upload_leaf(&self, local: &Path, container: &str) -> Result<(), CatalogError>;

    /// Attach a metadata attribute to an entry, replacing any existing
    /// attribute of the same name.
    fn set_metadata(&self, kind: EntryKind, path: &str, attr: &Attribute)
    -> Result<(), CatalogError>;
}

/// Resolve `path` to a normalized absolute catalog path.
///
/// `""` and `"."` mean the current working collection, `~` the home
/// collection; `.` and `..` segments are collapsed.
#[must_use]
pub fn resolve_path(path: &str, cwd: &str, home: &str) -> String {
    let expanded = if path == "~" {
        home.to_string()
    } else if let Some(rest) = path.strip_prefix("~/") {
        join(home, rest)
    } else if path.starts_with('/') {
        path.to_string()
    } else if path.is_empty() || path == "." {
        cwd.to_string()
    } else {
        join(cwd, path)
    };
    normalize(&expanded)
}

fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}
