//! In-memory catalog backend
//!
//! Holds the whole namespace in `BTreeMap`s so query results come back in
//! stable lexicographic order. Serves as the reference implementation of
//! the [`Catalog`] contract and as the fixture backend for the test
//! suite, in the same way the UI layer ships a scripted mock alongside
//! its real adapter.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::patterns::{basename, join, parent};

use super::query::like_match;
use super::{Attribute, Catalog, CatalogError, EntryKind, LeafHandle, Query, Row, Rows, resolve_path};

#[derive(Debug, Default)]
struct Inner {
    /// Absolute collection paths, root chain included
    containers: BTreeSet<String>,
    /// Absolute object path -> content
    leaves: BTreeMap<String, Vec<u8>>,
    container_meta: BTreeMap<String, Vec<Attribute>>,
    leaf_meta: BTreeMap<String, Vec<Attribute>>,
}

/// A catalog held entirely in memory
///
/// Interior mutability keeps the mutation primitives callable through a
/// shared reference, matching the trait; the whole crate is
/// single-threaded by design, so no locking is involved. Queries snapshot
/// their results eagerly, so mutating during result iteration is safe.
#[derive(Debug)]
pub struct MemoryCatalog {
    inner: RefCell<Inner>,
    cwd: String,
    home: String,
}

impl MemoryCatalog {
    /// Create a catalog whose home (and initial working) collection is
    /// `home`, with the ancestor chain pre-created.
    #[must_use]
    pub fn new(home: &str) -> Self {
        let home = resolve_path(home, "/", "/");
        let mut inner = Inner::default();
        let mut path = String::new();
        inner.containers.insert("/".to_string());
        for segment in home.split('/').filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
            inner.containers.insert(path.clone());
        }
        Self {
            inner: RefCell::new(inner),
            cwd: home.clone(),
            home,
        }
    }

    /// Change the session's current working collection.
    #[must_use]
    pub fn with_cwd(mut self, cwd: &str) -> Self {
        self.cwd = resolve_path(cwd, &self.cwd, &self.home);
        self
    }

    /// Insert a collection (and any missing ancestors), for fixtures.
    pub fn add_container(&self, path: &str) {
        let abs = self.resolve(path);
        let mut inner = self.inner.borrow_mut();
        let mut partial = String::new();
        for segment in abs.split('/').filter(|s| !s.is_empty()) {
            partial.push('/');
            partial.push_str(segment);
            inner.containers.insert(partial.clone());
        }
    }

    /// Insert a data object with content (and its parent chain), for fixtures.
    pub fn add_leaf(&self, path: &str, content: &[u8]) {
        let abs = self.resolve(path);
        self.add_container(parent(&abs));
        self.inner.borrow_mut().leaves.insert(abs, content.to_vec());
    }

    /// Content of an object, if it exists.
    #[must_use]
    pub fn leaf_content(&self, path: &str) -> Option<Vec<u8>> {
        let abs = self.resolve(path);
        self.inner.borrow().leaves.get(&abs).cloned()
    }

    /// Attributes attached to a collection.
    #[must_use]
    pub fn container_attrs(&self, path: &str) -> Vec<Attribute> {
        let abs = self.resolve(path);
        self.inner
            .borrow()
            .container_meta
            .get(&abs)
            .cloned()
            .unwrap_or_default()
    }

    /// Attributes attached to an object.
    #[must_use]
    pub fn leaf_attrs(&self, path: &str) -> Vec<Attribute> {
        let abs = self.resolve(path);
        self.inner
            .borrow()
            .leaf_meta
            .get(&abs)
            .cloned()
            .unwrap_or_default()
    }

    /// All absolute object paths, in catalog order.
    #[must_use]
    pub fn leaf_paths(&self) -> Vec<String> {
        self.inner.borrow().leaves.keys().cloned().collect()
    }

    fn subtree_prefix(path: &str) -> String {
        format!("{}/", path.trim_end_matches('/'))
    }
}

impl Catalog for MemoryCatalog {
    fn resolve(&self, path: &str) -> String {
        resolve_path(path, &self.cwd, &self.home)
    }

    fn container_exists(&self, path: &str) -> Result<bool, CatalogError> {
        let abs = self.resolve(path);
        Ok(self.inner.borrow().containers.contains(&abs))
    }

    fn leaf_exists(&self, path: &str) -> Result<bool, CatalogError> {
        let abs = self.resolve(path);
        Ok(self.inner.borrow().leaves.contains_key(&abs))
    }

    fn query<'a>(&'a self, query: &Query) -> Rows<'a> {
        let inner = self.inner.borrow();
        let container_pattern = query.container_pattern();

        let rows: Vec<Row> = if let Some(leaf_pattern) = query.leaf_pattern() {
            inner
                .leaves
                .keys()
                .filter(|path| {
                    like_match(container_pattern, parent(path))
                        && like_match(leaf_pattern, basename(path))
                })
                .map(|path| Row {
                    container: parent(path).to_string(),
                    leaf: Some(basename(path).to_string()),
                })
                .collect()
        } else {
            inner
                .containers
                .iter()
                .filter(|path| like_match(container_pattern, path))
                .map(|path| Row {
                    container: path.clone(),
                    leaf: None,
                })
                .collect()
        };

        Box::new(rows.into_iter().map(Ok))
    }

    fn create_container(&self, path: &str, recursive: bool) -> Result<(), CatalogError> {
        let abs = self.resolve(path);
        let mut inner = self.inner.borrow_mut();
        if inner.leaves.contains_key(&abs) {
            return Err(CatalogError::operation(
                "create collection",
                abs,
                "a data object exists at this path",
            ));
        }
        if inner.containers.contains(&abs) {
            return Ok(());
        }
        let up = parent(&abs).to_string();
        if !recursive && !inner.containers.contains(&up) {
            return Err(CatalogError::MissingContainer { path: up });
        }
        let mut partial = String::new();
        for segment in abs.split('/').filter(|s| !s.is_empty()) {
            partial.push('/');
            partial.push_str(segment);
            inner.containers.insert(partial.clone());
        }
        Ok(())
    }

    fn remove_container(&self, path: &str, recursive: bool) -> Result<(), CatalogError> {
        let abs = self.resolve(path);
        let mut inner = self.inner.borrow_mut();
        if !inner.containers.contains(&abs) {
            return Err(CatalogError::MissingContainer { path: abs });
        }
        let prefix = Self::subtree_prefix(&abs);
        if !recursive {
            let has_children = inner.containers.iter().any(|c| c.starts_with(&prefix))
                || inner.leaves.keys().any(|l| l.starts_with(&prefix));
            if has_children {
                return Err(CatalogError::NotEmpty { path: abs });
            }
        }
        inner.containers.retain(|c| c != &abs && !c.starts_with(&prefix));
        inner.leaves.retain(|l, _| !l.starts_with(&prefix));
        inner.container_meta.retain(|c, _| c != &abs && !c.starts_with(&prefix));
        inner.leaf_meta.retain(|l, _| !l.starts_with(&prefix));
        Ok(())
    }

    fn unlink_leaf(&self, path: &str) -> Result<(), CatalogError> {
        let abs = self.resolve(path);
        let mut inner = self.inner.borrow_mut();
        if inner.leaves.remove(&abs).is_none() {
            return Err(CatalogError::MissingLeaf { path: abs });
        }
        inner.leaf_meta.remove(&abs);
        Ok(())
    }

    fn fetch_leaf(&self, path: &str, local: Option<&Path>) -> Result<LeafHandle, CatalogError> {
        let abs = self.resolve(path);
        let content = self
            .inner
            .borrow()
            .leaves
            .get(&abs)
            .cloned()
            .ok_or_else(|| CatalogError::MissingLeaf { path: abs.clone() })?;

        match local {
            Some(dest) => {
                let target = if dest.is_dir() {
                    dest.join(basename(&abs))
                } else {
                    dest.to_path_buf()
                };
                fs::write(target, &content)?;
                Ok(LeafHandle {
                    path: abs,
                    data: None,
                })
            }
            None => Ok(LeafHandle {
                path: abs,
                data: Some(content),
            }),
        }
    }

    fn upload_leaf(&self, local: &Path, container: &str) -> Result<(), CatalogError> {
        let dest = self.resolve(container.trim_end_matches('/'));
        if !self.inner.borrow().containers.contains(&dest) {
            return Err(CatalogError::MissingContainer { path: dest });
        }
        let name = local
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CatalogError::operation("upload", local.display().to_string(), "no file name")
            })?;
        let content = fs::read(local)?;
        self.inner
            .borrow_mut()
            .leaves
            .insert(join(&dest, &name), content);
        Ok(())
    }

    fn set_metadata(
        &self,
        kind: EntryKind,
        path: &str,
        attr: &Attribute,
    ) -> Result<(), CatalogError> {
        let abs = self.resolve(path);
        let mut inner = self.inner.borrow_mut();
        let entries = match kind {
            EntryKind::Container => {
                if !inner.containers.contains(&abs) {
                    return Err(CatalogError::MissingContainer { path: abs });
                }
                inner.container_meta.entry(abs).or_default()
            }
            EntryKind::Leaf => {
                if !inner.leaves.contains_key(&abs) {
                    return Err(CatalogError::MissingLeaf { path: abs });
                }
                inner.leaf_meta.entry(abs).or_default()
            }
        };
        // "set" semantics: replace any attribute of the same name
        entries.retain(|a| a.name != attr.name);
        entries.push(attr.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MemoryCatalog {
        let cat = MemoryCatalog::new("/tank/home/ada");
        cat.add_leaf("data/c6h6.xyz", b"benzene");
        cat.add_leaf("data/molecules/ch4.xyz", b"methane");
        cat.add_container("empty");
        cat
    }

    #[test]
    fn existence_checks() {
        let cat = catalog();
        assert!(cat.container_exists("data").unwrap());
        assert!(cat.container_exists("/tank/home/ada/data/molecules").unwrap());
        assert!(cat.leaf_exists("data/c6h6.xyz").unwrap());
        assert!(!cat.leaf_exists("data").unwrap());
        assert!(!cat.container_exists("data/c6h6.xyz").unwrap());
    }

    #[test]
    fn with_cwd_rebases_relative_paths() {
        let cat = catalog().with_cwd("data");
        assert!(cat.leaf_exists("c6h6.xyz").unwrap());
        assert_eq!(cat.resolve("~"), "/tank/home/ada");
        assert_eq!(cat.resolve("molecules"), "/tank/home/ada/data/molecules");
    }

    #[test]
    fn container_query_matches_full_names() {
        let cat = catalog();
        let q = Query::containers("/tank/home/ada", "d*");
        let rows: Vec<_> = cat.query(&q).collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].container, "/tank/home/ada/data");
    }

    #[test]
    fn leaf_query_filters_parent_and_name() {
        let cat = catalog();
        let q = Query::leaves_exact("/tank/home/ada", "data/*.xyz");
        let rows: Vec<_> = cat.query(&q).collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].path(), "/tank/home/ada/data/c6h6.xyz");

        let q = Query::leaves_descendants("/tank/home/ada", "data/*.xyz");
        let rows: Vec<_> = cat.query(&q).collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].path(), "/tank/home/ada/data/molecules/ch4.xyz");
    }

    #[test]
    fn remove_container_respects_recursion_flag() {
        let cat = catalog();
        let err = cat.remove_container("/tank/home/ada/data", false).unwrap_err();
        assert!(matches!(err, CatalogError::NotEmpty { .. }));

        cat.remove_container("/tank/home/ada/data", true).unwrap();
        assert!(!cat.container_exists("data").unwrap());
        assert!(!cat.leaf_exists("data/molecules/ch4.xyz").unwrap());

        cat.remove_container("/tank/home/ada/empty", false).unwrap();
        assert!(!cat.container_exists("empty").unwrap());
    }

    #[test]
    fn create_container_needs_parent_unless_recursive() {
        let cat = catalog();
        let err = cat.create_container("a/b/c", false).unwrap_err();
        assert!(matches!(err, CatalogError::MissingContainer { .. }));

        cat.create_container("a/b/c", true).unwrap();
        assert!(cat.container_exists("a/b").unwrap());
    }

    #[test]
    fn set_metadata_replaces_same_name() {
        let cat = catalog();
        let path = "/tank/home/ada/data/c6h6.xyz";
        cat.set_metadata(EntryKind::Leaf, path, &Attribute::new("kind", "aromatic"))
            .unwrap();
        cat.set_metadata(EntryKind::Leaf, path, &Attribute::new("kind", "ring"))
            .unwrap();
        let attrs = cat.leaf_attrs(path);
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].value, "ring");
    }

    #[test]
    fn metadata_on_missing_entry_errors() {
        let cat = catalog();
        let err = cat
            .set_metadata(EntryKind::Leaf, "nope.xyz", &Attribute::new("a", "b"))
            .unwrap_err();
        assert!(matches!(err, CatalogError::MissingLeaf { .. }));
    }

    #[test]
    fn fetch_returns_bytes_when_no_local_target() {
        let cat = catalog();
        let handle = cat.fetch_leaf("/tank/home/ada/data/c6h6.xyz", None).unwrap();
        assert_eq!(handle.data.as_deref(), Some(b"benzene".as_slice()));
    }
}
