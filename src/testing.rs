//! Testing utilities for trawl
//!
//! Shared fixtures for unit tests: a small populated in-memory catalog
//! and helpers for staging local files.
//!
//! Only available when compiled with `cfg(test)`.

use std::fs;
use std::path::Path;

use crate::catalog::MemoryCatalog;

/// A populated catalog rooted at `/tank/home/ada`:
///
/// ```text
/// ethanol.xyz
/// data/c6h6.xyz
/// data/molecules/ch4.xyz
/// data/molecules/co2.xyz
/// docs/readme.txt
/// tmp_scratch/           (empty collection)
/// ```
pub fn sample_catalog() -> MemoryCatalog {
    let cat = MemoryCatalog::new("/tank/home/ada");
    cat.add_leaf("ethanol.xyz", b"C2H5OH");
    cat.add_leaf("data/c6h6.xyz", b"benzene");
    cat.add_leaf("data/molecules/ch4.xyz", b"methane");
    cat.add_leaf("data/molecules/co2.xyz", b"carbon dioxide");
    cat.add_leaf("docs/readme.txt", b"hello");
    cat.add_container("tmp_scratch");
    cat
}

/// Create a local file with the given content, creating parents as needed.
pub fn stage_file(path: impl AsRef<Path>, content: &[u8]) -> std::io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
