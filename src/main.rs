//! Trawl CLI application entry point
//!
//! Command-line interface for bulk file operations over a hierarchical
//! storage catalog. The binary serves a local directory tree through the
//! catalog trait, so the same pattern language works against it that a
//! remote catalog backend would see.
//!
//! # Usage
//!
//! ```bash
//! # Walk the namespace
//! trawl find data -n '*.xyz' -t f
//!
//! # Expand patterns
//! trawl glob 'data/*' '*.txt'
//!
//! # Remove matching entries (recursively, with confirmation)
//! trawl rm -r -i 'tmp*'
//!
//! # Copy out of / into the catalog
//! trawl get -r -d ./local 'data/*'
//! trawl put -r -d incoming './staging/*'
//!
//! # Attach metadata
//! trawl meta data -r --collection-attr project=solvents
//!
//! # Manage named roots
//! trawl root add archive /srv/archive
//! trawl root set-default archive
//! ```
//!
//! Configuration is stored in the user's config directory
//! (`~/.config/trawl/config.toml` on Linux).

use std::path::PathBuf;
use std::process::ExitCode;

use colored::Colorize;
use trawl::{
    TrawlError,
    bulk::{
        AcceptAll, Bulk, ConfirmPrompt, GetOptions, Interactive, MetadataOptions, PutOptions,
        RemoveOptions,
    },
    catalog::{Catalog, DirCatalog},
    cli::{Cli, Commands, RootCommands, parse_attr},
    config::TrawlConfig,
    output::Reporter,
    search,
};

type Result<T> = std::result::Result<T, TrawlError>;

/// Pick the directory to serve: `--root` wins, then `--use`/default from
/// configuration.
fn catalog_root(cli: &Cli, config: &TrawlConfig) -> Result<PathBuf> {
    if let Some(root) = &cli.root {
        return Ok(root.clone());
    }
    config
        .resolve_root(cli.use_root.as_deref())
        .cloned()
        .ok_or_else(|| {
            TrawlError::InvalidInput(
                "No catalog root. Pass --root <dir>, or configure one with 'trawl root add <name> <path>'."
                    .into(),
            )
        })
}

fn handle_find(
    catalog: &dyn Catalog,
    reporter: &Reporter,
    path: &str,
    name: &str,
    wholename: bool,
    kind: trawl::cli::KindArg,
) -> Result<()> {
    for item in search::find(catalog, path, name, wholename, kind.into(), reporter) {
        println!("{}", item?);
    }
    Ok(())
}

fn handle_glob(catalog: &dyn Catalog, reporter: &Reporter, patterns: &[String]) -> Result<()> {
    for pattern in patterns {
        for item in search::glob(catalog, pattern, reporter)? {
            println!("{item}");
        }
    }
    Ok(())
}

fn handle_rm(bulk: &Bulk, patterns: &[String], recurse: bool, prompt: bool) -> Result<()> {
    bulk.remove(patterns, &RemoveOptions { recurse, prompt })
}

fn handle_get(bulk: &Bulk, patterns: &[String], dest: PathBuf, recurse: bool) -> Result<()> {
    bulk.get(
        patterns,
        &GetOptions {
            local_path: dest,
            recurse,
            return_handles: false,
        },
    )?;
    Ok(())
}

fn handle_put(bulk: &Bulk, patterns: &[String], dest: String, recurse: bool) -> Result<()> {
    bulk.put(
        patterns,
        &PutOptions {
            remote_path: dest,
            recurse,
        },
    )
}

fn handle_meta(
    bulk: &Bulk,
    patterns: &[String],
    recurse: bool,
    collection_attrs: &[String],
    object_attrs: &[String],
) -> Result<()> {
    let container_attrs = collection_attrs
        .iter()
        .map(|a| parse_attr(a))
        .collect::<Result<Vec<_>>>()?;
    let leaf_attrs = object_attrs
        .iter()
        .map(|a| parse_attr(a))
        .collect::<Result<Vec<_>>>()?;
    bulk.add_metadata(
        patterns,
        &MetadataOptions {
            recurse,
            container_attrs,
            leaf_attrs,
        },
    )
}

/// Handle the root command - manage named catalog roots
fn handle_root_command(mut config: TrawlConfig, command: &RootCommands) -> Result<()> {
    match command {
        RootCommands::Add { name, path } => {
            if config.get_root(name).is_some() {
                return Err(TrawlError::InvalidInput(format!(
                    "Root '{name}' already exists"
                )));
            }
            config.add_root(name.clone(), path.clone())?;
            println!("Root '{name}' added at {}", path.display());

            if config.roots.len() == 1 {
                config.set_default_root(name.clone())?;
                println!("Set '{name}' as default root");
            }
        }
        RootCommands::List => {
            if config.roots.is_empty() {
                println!("No roots configured.");
                println!("Add one with: trawl root add <name> <path>");
                return Ok(());
            }

            let default = config.default_root.as_deref();
            let mut names: Vec<_> = config.roots.keys().collect();
            names.sort();

            for name in names {
                if let Some(path) = config.get_root(name) {
                    let marker = if default == Some(name.as_str()) {
                        " (default)"
                    } else {
                        ""
                    };
                    println!("  {} -> {}{marker}", name, path.display());
                }
            }
        }
        RootCommands::Remove { name } => {
            let removed = config.remove_root(name)?;
            if removed.is_none() {
                return Err(TrawlError::InvalidInput(format!(
                    "Root '{name}' does not exist"
                )));
            }
            println!("Root '{name}' removed from configuration");

            if config.default_root.as_deref() == Some(name.as_str()) {
                config.default_root = None;
                config.save()?;
                println!("Note: '{name}' was the default root; set a new one with 'trawl root set-default'");
            }
        }
        RootCommands::SetDefault { name } => {
            config.set_default_root(name.clone())?;
            println!("Set '{name}' as default root");
        }
    }
    Ok(())
}

fn run() -> Result<()> {
    let config = TrawlConfig::load()?;
    let cli = Cli::parse_args();
    let verbose = cli.verbose || config.verbose;
    let reporter = Reporter::new(verbose);

    if let Commands::Root { command } = &cli.command {
        return handle_root_command(config, command);
    }

    let root = catalog_root(&cli, &config)?;
    let catalog = DirCatalog::new(&root)?;

    match cli.command {
        Commands::Find {
            ref path,
            ref name,
            wholename,
            kind,
        } => handle_find(&catalog, &reporter, path, name, wholename, kind),
        Commands::Glob { ref patterns } => handle_glob(&catalog, &reporter, patterns),
        Commands::Rm {
            ref patterns,
            recurse,
            prompt,
        } => {
            let interactive = Interactive;
            let accept = AcceptAll;
            let chosen: &dyn ConfirmPrompt = if prompt { &interactive } else { &accept };
            let bulk = Bulk::new(&catalog, &reporter, chosen);
            handle_rm(&bulk, patterns, recurse, prompt)
        }
        Commands::Get {
            ref patterns,
            ref dest,
            recurse,
        } => {
            let accept = AcceptAll;
            let bulk = Bulk::new(&catalog, &reporter, &accept);
            handle_get(&bulk, patterns, dest.clone(), recurse)
        }
        Commands::Put {
            ref patterns,
            ref dest,
            recurse,
        } => {
            let accept = AcceptAll;
            let bulk = Bulk::new(&catalog, &reporter, &accept);
            handle_put(&bulk, patterns, dest.clone(), recurse)
        }
        Commands::Meta {
            ref patterns,
            recurse,
            ref collection_attrs,
            ref object_attrs,
        } => {
            let accept = AcceptAll;
            let bulk = Bulk::new(&catalog, &reporter, &accept);
            handle_meta(&bulk, patterns, recurse, collection_attrs, object_attrs)
        }
        Commands::Root { .. } => unreachable!(),
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
