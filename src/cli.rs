//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for trawl using the `clap`
//! crate.
//!
//! # Commands
//!
//! - **find**: Walk the catalog namespace and print matching entries
//! - **glob**: Expand wildcard patterns into matching paths
//! - **rm**: Remove matching data objects and collections
//! - **get**: Copy matching entries out of the catalog
//! - **put**: Copy local files and directories into the catalog
//! - **meta**: Attach metadata attributes to matching entries
//! - **root**: Manage named catalog roots (add, remove, list, set-default)
//!
//! # Examples
//!
//! ```no_run
//! use trawl::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_args();
//! match cli.command {
//!     Commands::Glob { patterns } => {
//!         for pattern in patterns {
//!             println!("{pattern}");
//!         }
//!     }
//!     _ => {}
//! }
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::TrawlError;
use crate::catalog::Attribute;
use crate::search::KindFilter;

/// Entry kind selector for the find command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    /// Collections only
    #[value(alias = "d")]
    Collection,
    /// Data objects only
    #[value(alias = "f")]
    Object,
    /// Both kinds
    Any,
}

impl From<KindArg> for KindFilter {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Collection => Self::CONTAINERS,
            KindArg::Object => Self::LEAVES,
            KindArg::Any => Self::BOTH,
        }
    }
}

/// Parse a `NAME=VALUE` or `NAME=VALUE=UNIT` metadata argument
///
/// # Errors
///
/// Returns `InvalidInput` when the argument has no `=` or an empty name.
pub fn parse_attr(arg: &str) -> Result<Attribute, TrawlError> {
    let mut parts = arg.splitn(3, '=');
    let name = parts.next().unwrap_or_default();
    let Some(value) = parts.next() else {
        return Err(TrawlError::InvalidInput(format!(
            "expected NAME=VALUE or NAME=VALUE=UNIT, got '{arg}'"
        )));
    };
    if name.is_empty() {
        return Err(TrawlError::InvalidInput(format!(
            "empty attribute name in '{arg}'"
        )));
    }
    Ok(match parts.next() {
        Some(unit) => Attribute::new(name, value).with_unit(unit),
        None => Attribute::new(name, value),
    })
}

/// Root management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RootCommands {
    /// Add a named root
    Add {
        /// Name of the root
        name: String,

        /// Directory the root serves
        path: PathBuf,
    },

    /// List all configured roots
    List,

    /// Remove a root from configuration
    #[command(visible_alias = "rm")]
    Remove {
        /// Name of the root to remove
        name: String,
    },

    /// Set the default root
    #[command(name = "set-default")]
    SetDefault {
        /// Name of the root to set as default
        name: String,
    },
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "trawl")]
#[command(about = "Bulk file operations for storage catalogs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print per-entry progress
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Directory to serve as the catalog root (overrides configuration)
    #[arg(long = "root", value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Named root from configuration to use
    #[arg(long = "use", value_name = "NAME", global = true, conflicts_with = "root")]
    pub use_root: Option<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Walk the namespace and print matching entries
    #[command(visible_alias = "f")]
    Find {
        /// Collection to search under
        #[arg(value_name = "PATH", default_value = ".")]
        path: String,

        /// Name pattern to match (`*` is the wildcard)
        #[arg(short = 'n', long = "name", value_name = "PATTERN", default_value = "*")]
        name: String,

        /// Match the pattern against the whole path below PATH, slashes included
        #[arg(short = 'w', long = "wholename")]
        wholename: bool,

        /// Restrict matches to one entry kind
        #[arg(short = 't', long = "type", value_name = "KIND", default_value = "any")]
        kind: KindArg,
    },

    /// Expand wildcard patterns into matching paths
    #[command(visible_alias = "g")]
    Glob {
        /// Patterns to expand
        #[arg(value_name = "PATTERN", required = true)]
        patterns: Vec<String>,
    },

    /// Remove matching data objects and collections
    Rm {
        /// Patterns naming the entries to remove
        #[arg(value_name = "PATTERN", required = true)]
        patterns: Vec<String>,

        /// Remove matched collections with their whole subtree
        #[arg(short = 'r', long = "recurse")]
        recurse: bool,

        /// Ask before each removal
        #[arg(short = 'i', long = "prompt")]
        prompt: bool,
    },

    /// Copy matching entries out of the catalog
    Get {
        /// Patterns naming the entries to fetch
        #[arg(value_name = "PATTERN", required = true)]
        patterns: Vec<String>,

        /// Local destination directory
        #[arg(short = 'd', long = "dest", value_name = "DIR", default_value = ".")]
        dest: PathBuf,

        /// Descend into matched collections
        #[arg(short = 'r', long = "recurse")]
        recurse: bool,
    },

    /// Copy local files and directories into the catalog
    Put {
        /// Local patterns naming the files to upload
        #[arg(value_name = "PATTERN", required = true)]
        patterns: Vec<String>,

        /// Destination collection
        #[arg(short = 'd', long = "dest", value_name = "PATH", default_value = ".")]
        dest: String,

        /// Descend into matched directories
        #[arg(short = 'r', long = "recurse")]
        recurse: bool,
    },

    /// Attach metadata attributes to matching entries
    Meta {
        /// Patterns naming the entries to annotate
        #[arg(value_name = "PATTERN", required = true)]
        patterns: Vec<String>,

        /// Descend into matched collections
        #[arg(short = 'r', long = "recurse")]
        recurse: bool,

        /// Attribute for matched collections (NAME=VALUE or NAME=VALUE=UNIT)
        #[arg(long = "collection-attr", value_name = "ATTR", num_args = 0..)]
        collection_attrs: Vec<String>,

        /// Attribute for matched data objects (NAME=VALUE or NAME=VALUE=UNIT)
        #[arg(long = "object-attr", value_name = "ATTR", num_args = 0..)]
        object_attrs: Vec<String>,
    },

    /// Manage named catalog roots
    Root {
        #[command(subcommand)]
        command: RootCommands,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_find_defaults() {
        let cli = Cli::parse_from(["trawl", "find"]);
        if let Commands::Find {
            path,
            name,
            wholename,
            kind,
        } = cli.command
        {
            assert_eq!(path, ".");
            assert_eq!(name, "*");
            assert!(!wholename);
            assert_eq!(kind, KindArg::Any);
        } else {
            panic!("Expected Find command");
        }
    }

    #[test]
    fn test_parse_find_with_type_alias() {
        let cli = Cli::parse_from(["trawl", "find", "data", "-n", "*.xyz", "-t", "f", "-w"]);
        if let Commands::Find {
            path,
            name,
            wholename,
            kind,
        } = cli.command
        {
            assert_eq!(path, "data");
            assert_eq!(name, "*.xyz");
            assert!(wholename);
            assert_eq!(kind, KindArg::Object);
        } else {
            panic!("Expected Find command");
        }
    }

    #[test]
    fn test_parse_rm_flags() {
        let cli = Cli::parse_from(["trawl", "rm", "-r", "-i", "data/*", "tmp*"]);
        if let Commands::Rm {
            patterns,
            recurse,
            prompt,
        } = cli.command
        {
            assert_eq!(patterns, vec!["data/*".to_string(), "tmp*".to_string()]);
            assert!(recurse);
            assert!(prompt);
        } else {
            panic!("Expected Rm command");
        }
    }

    #[test]
    fn test_parse_get_with_destination() {
        let cli = Cli::parse_from(["trawl", "get", "-d", "/tmp/out", "-r", "*.xyz"]);
        if let Commands::Get {
            patterns,
            dest,
            recurse,
        } = cli.command
        {
            assert_eq!(patterns, vec!["*.xyz".to_string()]);
            assert_eq!(dest, PathBuf::from("/tmp/out"));
            assert!(recurse);
        } else {
            panic!("Expected Get command");
        }
    }

    #[test]
    fn test_parse_meta_attrs() {
        let cli = Cli::parse_from([
            "trawl",
            "meta",
            "data",
            "-r",
            "--collection-attr",
            "project=solvents",
            "--object-attr",
            "format=xyz=v1",
        ]);
        if let Commands::Meta {
            patterns,
            recurse,
            collection_attrs,
            object_attrs,
        } = cli.command
        {
            assert_eq!(patterns, vec!["data".to_string()]);
            assert!(recurse);
            assert_eq!(collection_attrs, vec!["project=solvents".to_string()]);
            assert_eq!(object_attrs, vec!["format=xyz=v1".to_string()]);
        } else {
            panic!("Expected Meta command");
        }
    }

    #[test]
    fn test_global_root_flag() {
        let cli = Cli::parse_from(["trawl", "glob", "*", "--root", "/srv/archive"]);
        assert_eq!(cli.root, Some(PathBuf::from("/srv/archive")));
    }

    #[test]
    fn test_parse_attr_forms() {
        let attr = parse_attr("project=solvents").unwrap();
        assert_eq!(attr.name, "project");
        assert_eq!(attr.value, "solvents");
        assert!(attr.unit.is_none());

        let attr = parse_attr("format=xyz=v1").unwrap();
        assert_eq!(attr.unit.as_deref(), Some("v1"));

        assert!(parse_attr("novalue").is_err());
        assert!(parse_attr("=orphan").is_err());
    }
}
