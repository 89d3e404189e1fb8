//! Bulk operations over pattern matches
//!
//! UNIX-style `rm`/`cp`-like operations driven by namespace searches:
//! every path matched by a pattern is classified as collection or data
//! object and the per-kind action applied. Collections are descended
//! into only when recursion is requested; a descent derives the fresh
//! pattern `<collection>/*`, so depth follows the real tree shape.
//!
//! Traversal keeps an explicit stack of suspended match iterators, one
//! frame per entered collection, instead of recursing natively; deep
//! namespaces cost heap frames, not call stack.
//!
//! Catalog wildcard matching crosses path separators, so a recursive
//! pattern can yield both a collection and entries deep inside it. When
//! recursion is on, candidates lying under a collection already handled
//! for the same pattern are skipped: the descent (or the subtree
//! removal) covers them, and mirrored copies stay exact.
//!
//! Hit counting is scoped per top-level pattern argument: a pattern that
//! matches nothing draws exactly one warning, which is never suppressed.
//! The first failing remote operation aborts the whole call; nothing is
//! swallowed or retried.

pub mod confirm;

pub use confirm::{AcceptAll, ConfirmPrompt, Interactive, Scripted};

use std::fs;
use std::path::PathBuf;

use crate::TrawlError;
use crate::catalog::{Attribute, Catalog, EntryKind, LeafHandle};
use crate::output::Reporter;
use crate::patterns::{PatternError, basename, join};
use crate::search::{Iglob, iglob};

/// Options for [`Bulk::remove`]
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveOptions {
    /// Remove matched collections with their whole subtree
    pub recurse: bool,
    /// Confirm each removal with the operator
    pub prompt: bool,
}

/// Options for [`Bulk::get`]
#[derive(Debug, Clone)]
pub struct GetOptions {
    /// Local destination directory
    pub local_path: PathBuf,
    /// Descend into matched collections, mirroring them locally
    pub recurse: bool,
    /// Return in-memory handles instead of writing local files
    pub return_handles: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            local_path: PathBuf::from("."),
            recurse: false,
            return_handles: false,
        }
    }
}

/// Options for [`Bulk::put`]
#[derive(Debug, Clone)]
pub struct PutOptions {
    /// Destination collection in the catalog
    pub remote_path: String,
    /// Descend into matched local directories, mirroring them remotely
    pub recurse: bool,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self {
            remote_path: String::from("."),
            recurse: false,
        }
    }
}

/// Options for [`Bulk::add_metadata`]
///
/// Attribute lists default to freshly-constructed empty vectors per
/// call; nothing is shared across invocations.
#[derive(Debug, Clone, Default)]
pub struct MetadataOptions {
    /// Apply collection attributes (and descend) into matched collections
    pub recurse: bool,
    /// Attributes to attach to every matched collection
    pub container_attrs: Vec<Attribute>,
    /// Attributes to attach to every matched data object
    pub leaf_attrs: Vec<Attribute>,
}

/// One suspended descent: a match sequence plus its local destination
/// and the collections already handled at this level.
struct Frame<'c> {
    items: Iglob<'c>,
    dest: PathBuf,
    handled: Vec<String>,
}

impl Frame<'_> {
    /// Whether a collection entered at this level already accounts for `path`.
    fn covers(&self, path: &str) -> bool {
        self.handled.iter().any(|h| lies_under(path, h))
    }
}

/// All four operations take at least one non-empty pattern.
fn ensure_patterns(patterns: &[String]) -> Result<(), TrawlError> {
    if patterns.iter().any(String::is_empty) {
        return Err(PatternError::Empty.into());
    }
    Ok(())
}

/// Whether `path` sits strictly inside `ancestor`.
fn lies_under(path: &str, ancestor: &str) -> bool {
    path.len() > ancestor.len()
        && path.starts_with(ancestor)
        && path.as_bytes()[ancestor.len()] == b'/'
}

/// Bulk operation engine over an injected catalog
pub struct Bulk<'a> {
    catalog: &'a dyn Catalog,
    reporter: &'a Reporter,
    prompt: &'a dyn ConfirmPrompt,
}

impl<'a> Bulk<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a dyn Catalog,
        reporter: &'a Reporter,
        prompt: &'a dyn ConfirmPrompt,
    ) -> Self {
        Self {
            catalog,
            reporter,
            prompt,
        }
    }

    /// Remove matching data objects and, with `recurse`, collections, in
    /// the manner of `rm`.
    ///
    /// A matched collection is removed with its whole subtree in a
    /// single call rather than entry by entry. Without `recurse`,
    /// matched collections are skipped with a notice.
    ///
    /// # Errors
    /// The first failing removal aborts the remaining patterns.
    pub fn remove(&self, patterns: &[String], opts: &RemoveOptions) -> Result<(), TrawlError> {
        ensure_patterns(patterns)?;
        for pattern in patterns {
            let mut hits = 0usize;
            let mut removed: Vec<String> = Vec::new();

            for item in iglob(self.catalog, pattern, self.reporter) {
                let item = item?;
                hits += 1;
                let path = self.catalog.resolve(&item);
                if opts.recurse && removed.iter().any(|r| lies_under(&path, r)) {
                    // Went with its subtree already
                    continue;
                }

                match self.classify(&path)? {
                    EntryKind::Container => {
                        if opts.recurse {
                            if self.confirmed(opts.prompt, "remove", EntryKind::Container, &path)? {
                                self.reporter.info(&format!("Removing collection {path}"));
                                self.catalog.remove_container(&path, true)?;
                                removed.push(path);
                            }
                        } else {
                            self.reporter
                                .info(&format!("Skipping collection {item} (no recursion)"));
                        }
                    }
                    EntryKind::Leaf => {
                        if self.confirmed(opts.prompt, "remove", EntryKind::Leaf, &path)? {
                            self.reporter.info(&format!("Removing object {path}"));
                            self.catalog.unlink_leaf(&path)?;
                        }
                    }
                }
            }

            if hits == 0 {
                self.no_match("remove", pattern);
            }
        }
        Ok(())
    }

    /// Copy matching entries out of the catalog, in the manner of `cp`.
    ///
    /// Collections are mirrored as local directories and descended into
    /// when `recurse` is set. With `return_handles`, nothing touches the
    /// local disk and the fetched objects come back in memory.
    ///
    /// When more than one entry matches across all patterns combined and
    /// files are being written, the destination must already be a
    /// directory; that precondition is checked before any transfer so a
    /// multi-file fetch cannot silently pile into a missing path.
    ///
    /// # Errors
    /// `DestinationMissing` before any transfer on the precondition
    /// above; the first failing fetch aborts the remaining patterns.
    pub fn get(
        &self,
        patterns: &[String],
        opts: &GetOptions,
    ) -> Result<Option<Vec<LeafHandle>>, TrawlError> {
        ensure_patterns(patterns)?;
        if self.more_than_one_remote(patterns)?
            && !opts.return_handles
            && !opts.local_path.is_dir()
        {
            return Err(TrawlError::DestinationMissing {
                dest: opts.local_path.display().to_string(),
            });
        }

        let mut handles = Vec::new();

        for pattern in patterns {
            let mut hits = 0usize;
            let mut frames: Vec<Frame<'a>> = vec![Frame {
                items: iglob(self.catalog, pattern, self.reporter),
                dest: opts.local_path.clone(),
                handled: Vec::new(),
            }];

            loop {
                let depth = frames.len();
                let Some(frame) = frames.last_mut() else { break };
                let Some(item) = frame.items.next() else {
                    frames.pop();
                    continue;
                };
                let item = item?;
                if depth == 1 {
                    hits += 1;
                }
                let dest = frame.dest.clone();
                let path = self.catalog.resolve(&item);
                if opts.recurse && frame.covers(&path) {
                    // Reached through a collection already entered here
                    continue;
                }

                match self.classify(&path)? {
                    EntryKind::Container => {
                        if opts.recurse {
                            let sub_dest = dest.join(basename(&item));
                            if !opts.return_handles && !sub_dest.exists() {
                                self.reporter
                                    .info(&format!("Creating directory: {}", sub_dest.display()));
                                fs::create_dir(&sub_dest)?;
                            }
                            if let Some(frame) = frames.last_mut() {
                                frame.handled.push(path);
                            }
                            let sub_pattern = join(&item, "*");
                            frames.push(Frame {
                                items: iglob(self.catalog, &sub_pattern, self.reporter),
                                dest: sub_dest,
                                handled: Vec::new(),
                            });
                        } else {
                            self.reporter
                                .info(&format!("Skipping collection {item} (no recursion)"));
                        }
                    }
                    EntryKind::Leaf => {
                        if opts.return_handles {
                            self.reporter.info(&format!("Getting object {item}"));
                        } else {
                            self.reporter.info(&format!(
                                "Getting object {path} to destination {}",
                                dest.display()
                            ));
                        }
                        let local = (!opts.return_handles).then(|| dest.as_path());
                        let handle = self.catalog.fetch_leaf(&path, local)?;
                        if opts.return_handles {
                            handles.push(handle);
                        }
                    }
                }
            }

            if hits == 0 {
                self.no_match("get", pattern);
            }
        }

        Ok(opts.return_handles.then_some(handles))
    }

    /// Copy matching local files and directories into the catalog, in
    /// the manner of `cp`. Patterns are expanded against the local
    /// filesystem; directories are mirrored as collections and descended
    /// into when `recurse` is set.
    ///
    /// When more than one local entry matches across all patterns, the
    /// destination collection must already exist; checked before any
    /// upload.
    ///
    /// # Errors
    /// `DestinationMissing` on the precondition above; the first failing
    /// upload aborts the remaining patterns.
    pub fn put(&self, patterns: &[String], opts: &PutOptions) -> Result<(), TrawlError> {
        ensure_patterns(patterns)?;
        let dest = self.catalog.resolve(&opts.remote_path);

        if self.more_than_one_local(patterns)? && !self.catalog.container_exists(&dest)? {
            return Err(TrawlError::DestinationMissing { dest });
        }

        for pattern in patterns {
            let mut hits = 0usize;
            let mut frames: Vec<(glob::Paths, String)> = vec![(glob::glob(pattern)?, dest.clone())];

            loop {
                let Some(frame) = frames.last_mut() else { break };
                let next = frame.0.next();
                let frame_dest = frame.1.clone();
                let depth = frames.len();

                let Some(entry) = next else {
                    frames.pop();
                    continue;
                };
                let item = entry?;
                if depth == 1 {
                    hits += 1;
                }

                if item.is_dir() {
                    if opts.recurse {
                        let Some(name) = item.file_name() else { continue };
                        let sub_dest = join(&frame_dest, &name.to_string_lossy());
                        if !self.catalog.container_exists(&sub_dest)? {
                            self.reporter
                                .info(&format!("Creating collection: {sub_dest}"));
                            self.catalog.create_container(&sub_dest, true)?;
                        }
                        let sub_pattern = format!("{}/*", item.display());
                        frames.push((glob::glob(&sub_pattern)?, sub_dest));
                    } else {
                        self.reporter.info(&format!(
                            "Skipping directory {} (no recursion)",
                            item.display()
                        ));
                    }
                } else if item.is_file() {
                    self.reporter.info(&format!(
                        "Putting object {} in collection {frame_dest}",
                        item.display()
                    ));
                    self.catalog.upload_leaf(&item, &frame_dest)?;
                }
            }

            if hits == 0 {
                self.no_match("put", pattern);
            }
        }
        Ok(())
    }

    /// Attach metadata attributes to matching entries.
    ///
    /// With `recurse`, every descendant collection receives the
    /// collection attributes and every descendant object the object
    /// attributes; without it, matched collections are skipped entirely.
    ///
    /// # Errors
    /// The first failing metadata call aborts the remaining patterns.
    pub fn add_metadata(
        &self,
        patterns: &[String],
        opts: &MetadataOptions,
    ) -> Result<(), TrawlError> {
        ensure_patterns(patterns)?;
        for pattern in patterns {
            let mut hits = 0usize;
            let mut frames: Vec<Frame<'a>> = vec![Frame {
                items: iglob(self.catalog, pattern, self.reporter),
                dest: PathBuf::new(),
                handled: Vec::new(),
            }];

            loop {
                let depth = frames.len();
                let Some(frame) = frames.last_mut() else { break };
                let Some(item) = frame.items.next() else {
                    frames.pop();
                    continue;
                };
                let item = item?;
                if depth == 1 {
                    hits += 1;
                }
                let path = self.catalog.resolve(&item);
                if opts.recurse && frame.covers(&path) {
                    continue;
                }

                match self.classify(&path)? {
                    EntryKind::Container => {
                        if opts.recurse {
                            for attr in &opts.container_attrs {
                                self.reporter
                                    .info(&format!("Adding metadata to collection {path}"));
                                self.catalog
                                    .set_metadata(EntryKind::Container, &path, attr)?;
                            }
                            if let Some(frame) = frames.last_mut() {
                                frame.handled.push(path);
                            }
                            let sub_pattern = join(&item, "*");
                            frames.push(Frame {
                                items: iglob(self.catalog, &sub_pattern, self.reporter),
                                dest: PathBuf::new(),
                                handled: Vec::new(),
                            });
                        } else {
                            self.reporter
                                .info(&format!("Skipping collection {item} (no recursion)"));
                        }
                    }
                    EntryKind::Leaf => {
                        for attr in &opts.leaf_attrs {
                            self.reporter
                                .info(&format!("Adding metadata to object {path}"));
                            self.catalog.set_metadata(EntryKind::Leaf, &path, attr)?;
                        }
                    }
                }
            }

            if hits == 0 {
                self.no_match("add metadata to", pattern);
            }
        }
        Ok(())
    }

    /// Decide whether this absolute path is a collection or an object.
    ///
    /// Both-at-once is a hard error. Neither is reported as an object so
    /// the subsequent action surfaces the miss with its own context.
    fn classify(&self, path: &str) -> Result<EntryKind, TrawlError> {
        let as_container = self.catalog.container_exists(path)?;
        let as_leaf = self.catalog.leaf_exists(path)?;
        match (as_container, as_leaf) {
            (true, true) => Err(TrawlError::AmbiguousEntry { path: path.into() }),
            (true, false) => Ok(EntryKind::Container),
            _ => Ok(EntryKind::Leaf),
        }
    }

    fn confirmed(
        &self,
        prompt: bool,
        operation: &str,
        kind: EntryKind,
        path: &str,
    ) -> Result<bool, TrawlError> {
        if !prompt {
            return Ok(true);
        }
        let ok = self.prompt.confirm(operation, kind.noun(), path)?;
        if !ok {
            self.reporter
                .info(&format!("Skipping {} {path} (declined)", kind.noun()));
        }
        Ok(ok)
    }

    fn no_match(&self, verb: &str, pattern: &str) {
        self.reporter
            .warn(&format!("cannot {verb} '{pattern}': no such entry"));
    }

    /// Whether the patterns match more than one catalog entry combined,
    /// short-circuiting after the second hit.
    fn more_than_one_remote(&self, patterns: &[String]) -> Result<bool, TrawlError> {
        let mut count = 0usize;
        for pattern in patterns {
            for item in iglob(self.catalog, pattern, self.reporter) {
                let _ = item?;
                count += 1;
                if count > 1 {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Local-filesystem counterpart of [`Self::more_than_one_remote`].
    fn more_than_one_local(&self, patterns: &[String]) -> Result<bool, TrawlError> {
        let mut count = 0usize;
        for pattern in patterns {
            for entry in glob::glob(pattern)? {
                let _ = entry?;
                count += 1;
                if count > 1 {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }
}
