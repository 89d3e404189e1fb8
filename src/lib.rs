//! trawl — bulk file operations for remote storage catalogs
//!
//! Shell-style `find`, `glob`, `rm` and `cp` over a hierarchical
//! catalog namespace: wildcard patterns are translated into catalog
//! queries, matches stream back lazily, and bulk operations walk the
//! matched tree with an explicit frame stack.
//!
//! The catalog itself sits behind the [`catalog::Catalog`] trait.
//! [`catalog::DirCatalog`] serves a local directory tree through it;
//! [`catalog::MemoryCatalog`] backs the test suite.

pub mod bulk;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod output;
pub mod patterns;
pub mod search;

#[cfg(test)]
pub mod testing;

use thiserror::Error;

/// Top-level error type for every fallible operation in the crate
#[derive(Error, Debug)]
pub enum TrawlError {
    #[error("pattern error: {0}")]
    Pattern(#[from] patterns::PatternError),

    #[error("catalog error: {0}")]
    Catalog(#[from] catalog::CatalogError),

    #[error("config error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("glob failed: {0}")]
    Glob(#[from] glob::GlobError),

    /// Multiple matches but the destination is not an existing directory
    /// or collection
    #[error("destination '{dest}' does not exist or is not a directory")]
    DestinationMissing { dest: String },

    /// A path names both a collection and a data object
    #[error("'{path}' is both a collection and a data object")]
    AmbiguousEntry { path: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
