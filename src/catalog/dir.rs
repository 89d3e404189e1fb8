//! Local-directory catalog backend
//!
//! Presents a directory tree on the local filesystem as a catalog:
//! directories become collections, files become data objects, and the
//! virtual namespace root `/` maps onto the configured root directory.
//! This keeps the CLI exercisable end-to-end without a remote server.
//!
//! Metadata attributes are held in memory for the lifetime of the
//! session; a remote catalog persists them server-side.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::patterns::{basename, join};

use super::query::like_match;
use super::{Attribute, Catalog, CatalogError, EntryKind, LeafHandle, Query, Row, Rows, resolve_path};

/// A catalog backed by a local directory tree
#[derive(Debug)]
pub struct DirCatalog {
    root: PathBuf,
    meta: RefCell<BTreeMap<(EntryKind, String), Vec<Attribute>>>,
}

impl DirCatalog {
    /// Open a catalog rooted at an existing local directory.
    ///
    /// # Errors
    /// Returns `CatalogError` if `root` is not an existing directory.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(CatalogError::operation(
                "open catalog root",
                root.display().to_string(),
                "not an existing directory",
            ));
        }
        Ok(Self {
            root,
            meta: RefCell::new(BTreeMap::new()),
        })
    }

    /// Map a virtual absolute path onto the backing directory.
    fn local(&self, abs: &str) -> PathBuf {
        self.root.join(abs.trim_start_matches('/'))
    }

    /// Collect every (virtual container path, virtual leaf name) in the
    /// tree, depth-first with sorted siblings so results are stable.
    fn walk(&self) -> Result<(Vec<String>, Vec<(String, String)>), CatalogError> {
        let mut containers = vec!["/".to_string()];
        let mut leaves = Vec::new();
        let mut pending = vec![String::from("/")];

        while let Some(dir) = pending.pop() {
            let mut entries: Vec<_> = fs::read_dir(self.local(&dir))?
                .collect::<Result<Vec<_>, _>>()?;
            entries.sort_by_key(std::fs::DirEntry::file_name);

            for entry in entries {
                let name = entry.file_name().to_string_lossy().into_owned();
                let kind = entry.file_type()?;
                if kind.is_dir() {
                    let child = join(&dir, &name);
                    containers.push(child.clone());
                    pending.push(child);
                } else if kind.is_file() {
                    leaves.push((dir.clone(), name));
                }
            }
        }
        Ok((containers, leaves))
    }
}

impl Catalog for DirCatalog {
    fn resolve(&self, path: &str) -> String {
        // The virtual namespace has a single session rooted at "/"
        resolve_path(path, "/", "/")
    }

    fn container_exists(&self, path: &str) -> Result<bool, CatalogError> {
        Ok(self.local(&self.resolve(path)).is_dir())
    }

    fn leaf_exists(&self, path: &str) -> Result<bool, CatalogError> {
        Ok(self.local(&self.resolve(path)).is_file())
    }

    fn query<'a>(&'a self, query: &Query) -> Rows<'a> {
        let walked = match self.walk() {
            Ok(walked) => walked,
            Err(e) => return Box::new(std::iter::once(Err(e))),
        };
        let (containers, leaves) = walked;
        let container_pattern = query.container_pattern().to_string();

        let rows: Vec<Row> = if let Some(leaf_pattern) = query.leaf_pattern() {
            let leaf_pattern = leaf_pattern.to_string();
            leaves
                .into_iter()
                .filter(|(dir, name)| {
                    like_match(&container_pattern, dir) && like_match(&leaf_pattern, name)
                })
                .map(|(dir, name)| Row {
                    container: dir,
                    leaf: Some(name),
                })
                .collect()
        } else {
            containers
                .into_iter()
                .filter(|dir| like_match(&container_pattern, dir))
                .map(|dir| Row {
                    container: dir,
                    leaf: None,
                })
                .collect()
        };

        Box::new(rows.into_iter().map(Ok))
    }

    fn create_container(&self, path: &str, recursive: bool) -> Result<(), CatalogError> {
        let abs = self.resolve(path);
        let target = self.local(&abs);
        if target.is_dir() {
            return Ok(());
        }
        if recursive {
            fs::create_dir_all(target)?;
        } else {
            fs::create_dir(target)?;
        }
        Ok(())
    }

    fn remove_container(&self, path: &str, recursive: bool) -> Result<(), CatalogError> {
        let abs = self.resolve(path);
        let target = self.local(&abs);
        if !target.is_dir() {
            return Err(CatalogError::MissingContainer { path: abs });
        }
        if recursive {
            fs::remove_dir_all(target)?;
        } else {
            fs::remove_dir(target).map_err(|_| CatalogError::NotEmpty { path: abs })?;
        }
        Ok(())
    }

    fn unlink_leaf(&self, path: &str) -> Result<(), CatalogError> {
        let abs = self.resolve(path);
        let target = self.local(&abs);
        if !target.is_file() {
            return Err(CatalogError::MissingLeaf { path: abs });
        }
        fs::remove_file(target)?;
        Ok(())
    }

    fn fetch_leaf(&self, path: &str, local: Option<&Path>) -> Result<LeafHandle, CatalogError> {
        let abs = self.resolve(path);
        let source = self.local(&abs);
        if !source.is_file() {
            return Err(CatalogError::MissingLeaf { path: abs });
        }
        match local {
            Some(dest) => {
                let target = if dest.is_dir() {
                    dest.join(basename(&abs))
                } else {
                    dest.to_path_buf()
                };
                fs::copy(source, target)?;
                Ok(LeafHandle {
                    path: abs,
                    data: None,
                })
            }
            None => Ok(LeafHandle {
                path: abs.clone(),
                data: Some(fs::read(source)?),
            }),
        }
    }

    fn upload_leaf(&self, local: &Path, container: &str) -> Result<(), CatalogError> {
        let dest = self.resolve(container.trim_end_matches('/'));
        let dest_dir = self.local(&dest);
        if !dest_dir.is_dir() {
            return Err(CatalogError::MissingContainer { path: dest });
        }
        let name = local
            .file_name()
            .ok_or_else(|| {
                CatalogError::operation("upload", local.display().to_string(), "no file name")
            })?;
        fs::copy(local, dest_dir.join(name))?;
        Ok(())
    }

    fn set_metadata(
        &self,
        kind: EntryKind,
        path: &str,
        attr: &Attribute,
    ) -> Result<(), CatalogError> {
        let abs = self.resolve(path);
        match kind {
            EntryKind::Container if !self.container_exists(&abs)? => {
                return Err(CatalogError::MissingContainer { path: abs });
            }
            EntryKind::Leaf if !self.leaf_exists(&abs)? => {
                return Err(CatalogError::MissingLeaf { path: abs });
            }
            _ => {}
        }
        let mut meta = self.meta.borrow_mut();
        let entries = meta.entry((kind, abs)).or_default();
        entries.retain(|a| a.name != attr.name);
        entries.push(attr.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, DirCatalog) {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("data/molecules")).unwrap();
        fs::write(tmp.path().join("data/c6h6.xyz"), b"benzene").unwrap();
        fs::write(tmp.path().join("data/molecules/ch4.xyz"), b"methane").unwrap();
        let cat = DirCatalog::new(tmp.path()).unwrap();
        (tmp, cat)
    }

    #[test]
    fn maps_directories_to_containers() {
        let (_tmp, cat) = fixture();
        assert!(cat.container_exists("/data").unwrap());
        assert!(cat.container_exists("data/molecules").unwrap());
        assert!(cat.leaf_exists("/data/c6h6.xyz").unwrap());
        assert!(!cat.leaf_exists("/data").unwrap());
    }

    #[test]
    fn queries_walk_the_tree() {
        let (_tmp, cat) = fixture();
        let q = Query::containers("/", "*molecule*");
        let rows: Vec<_> = cat.query(&q).collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].container, "/data/molecules");

        let q = Query::leaves_descendants("/", "*.xyz");
        let rows: Vec<_> = cat.query(&q).collect::<Result<_, _>>().unwrap();
        let paths: Vec<_> = rows.iter().map(Row::path).collect();
        assert_eq!(paths, vec!["/data/c6h6.xyz", "/data/molecules/ch4.xyz"]);
    }

    #[test]
    fn mutations_touch_the_backing_tree() {
        let (tmp, cat) = fixture();
        cat.create_container("/fresh/deep", true).unwrap();
        assert!(tmp.path().join("fresh/deep").is_dir());

        cat.unlink_leaf("/data/c6h6.xyz").unwrap();
        assert!(!tmp.path().join("data/c6h6.xyz").exists());

        cat.remove_container("/data", true).unwrap();
        assert!(!tmp.path().join("data").exists());
    }
}
