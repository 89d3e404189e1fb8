//! Namespace searching: `find`, `glob` and `iglob`
//!
//! These compose the pattern translation in [`crate::patterns`] with the
//! catalog queries in [`crate::catalog::query`] into lazy sequences of
//! matching paths, in the spirit of the UNIX `find` command and the
//! `glob` builtin. Only `*` is expanded.
//!
//! Searches are pure reads of current catalog state: iterating a second
//! time re-issues the queries. A [`Find`] iterator advances through its
//! query stages as a small state machine — containers, then objects with
//! an exactly-matching parent, then objects in descendant collections —
//! and issues each query only when its stage is first polled.

use std::collections::VecDeque;

use crate::TrawlError;
use crate::catalog::{Catalog, Query, Rows};
use crate::output::Reporter;
use crate::patterns::{join, split_wildcard};

/// Which entry kinds a `find` should yield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindFilter {
    pub containers: bool,
    pub leaves: bool,
}

impl KindFilter {
    pub const BOTH: Self = Self {
        containers: true,
        leaves: true,
    };
    pub const CONTAINERS: Self = Self {
        containers: true,
        leaves: false,
    };
    pub const LEAVES: Self = Self {
        containers: false,
        leaves: true,
    };
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Containers,
    LeavesExact,
    LeavesDescendant,
}

/// Lazy sequence of paths matching a pattern under a root collection
pub struct Find<'c> {
    catalog: &'c dyn Catalog,
    root: String,
    root_abs: String,
    pattern: String,
    stages: VecDeque<Stage>,
    rows: Option<Rows<'c>>,
}

/// Search for collections and data objects matching `pattern` under
/// `root`, like the UNIX `find` command.
///
/// Yielded paths always begin with the caller's `root` string: absolute
/// results from the catalog are rewritten back into whatever relative,
/// absolute or `~`-prefixed form the caller used.
///
/// `use_wholename` records that the caller knows the pattern spans path
/// segments. Matching is unaffected, but a separator in the pattern
/// without it usually means no hits, so that combination draws a
/// warning before the search runs.
pub fn find<'c>(
    catalog: &'c dyn Catalog,
    root: &str,
    pattern: &str,
    use_wholename: bool,
    kinds: KindFilter,
    reporter: &Reporter,
) -> Find<'c> {
    if !use_wholename && pattern.contains('/') {
        reporter.warn(&format!(
            "pattern '{pattern}' contains a slash; entry names usually don't, \
             so this search will probably yield no results (try whole-name matching)"
        ));
    }

    let mut stages = VecDeque::new();
    if kinds.containers {
        stages.push_back(Stage::Containers);
    }
    if kinds.leaves {
        stages.push_back(Stage::LeavesExact);
        stages.push_back(Stage::LeavesDescendant);
    }

    Find {
        catalog,
        root: root.to_string(),
        root_abs: catalog.resolve(root),
        pattern: pattern.to_string(),
        stages,
        rows: None,
    }
}

impl Find<'_> {
    /// Rewrite an absolute result path back under the caller's root.
    fn rebase(&self, path_abs: &str) -> String {
        let relative = path_abs
            .strip_prefix(&self.root_abs)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(path_abs);
        if relative.is_empty() {
            self.root.clone()
        } else {
            join(&self.root, relative)
        }
    }
}

impl Iterator for Find<'_> {
    type Item = Result<String, TrawlError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(rows) = &mut self.rows {
                match rows.next() {
                    Some(Ok(row)) => {
                        let path = row.path();
                        return Some(Ok(self.rebase(&path)));
                    }
                    Some(Err(e)) => return Some(Err(e.into())),
                    None => self.rows = None,
                }
            }
            let query = match self.stages.pop_front()? {
                Stage::Containers => Query::containers(&self.root_abs, &self.pattern),
                Stage::LeavesExact => Query::leaves_exact(&self.root_abs, &self.pattern),
                Stage::LeavesDescendant => Query::leaves_descendants(&self.root_abs, &self.pattern),
            };
            self.rows = Some(self.catalog.query(&query));
        }
    }
}

/// Lazy sequence of paths matching `pattern`, like `glob.iglob`
///
/// A wildcard-free pattern is an existence probe: it yields the pattern
/// itself exactly once when the catalog holds a collection or data
/// object there, and nothing otherwise. A path reported as both at once
/// is an error. With a wildcard, the pattern is split into its literal
/// prefix and remainder and delegated to [`find`] over both entry kinds.
pub enum Iglob<'c> {
    Literal {
        catalog: &'c dyn Catalog,
        pattern: String,
        done: bool,
    },
    Wild(Find<'c>),
}

/// See [`Iglob`].
pub fn iglob<'c>(catalog: &'c dyn Catalog, pattern: &str, reporter: &Reporter) -> Iglob<'c> {
    match split_wildcard(pattern) {
        None => Iglob::Literal {
            catalog,
            pattern: pattern.to_string(),
            done: false,
        },
        Some((prefix, remainder)) => Iglob::Wild(find(
            catalog,
            &prefix,
            &remainder,
            true,
            KindFilter::BOTH,
            reporter,
        )),
    }
}

/// Eager version of [`iglob`], like `glob.glob`.
pub fn glob(
    catalog: &dyn Catalog,
    pattern: &str,
    reporter: &Reporter,
) -> Result<Vec<String>, TrawlError> {
    iglob(catalog, pattern, reporter).collect()
}

impl Iterator for Iglob<'_> {
    type Item = Result<String, TrawlError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Wild(find) => find.next(),
            Self::Literal {
                catalog,
                pattern,
                done,
            } => {
                if *done {
                    return None;
                }
                *done = true;
                let path = catalog.resolve(pattern);
                let as_container = match catalog.container_exists(&path) {
                    Ok(exists) => exists,
                    Err(e) => return Some(Err(e.into())),
                };
                let as_leaf = match catalog.leaf_exists(&path) {
                    Ok(exists) => exists,
                    Err(e) => return Some(Err(e.into())),
                };
                match (as_container, as_leaf) {
                    (true, true) => Some(Err(TrawlError::AmbiguousEntry { path })),
                    (false, false) => None,
                    _ => Some(Ok(pattern.clone())),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::testing::sample_catalog;

    fn collect(iter: impl Iterator<Item = Result<String, TrawlError>>) -> Vec<String> {
        iter.collect::<Result<Vec<_>, _>>().unwrap()
    }

    #[test]
    fn find_containers_by_name_pattern() {
        let cat = sample_catalog();
        let reporter = Reporter::capturing();
        let hits = collect(find(&cat, ".", "d*", false, KindFilter::CONTAINERS, &reporter));
        assert_eq!(hits, vec!["./data", "./data/molecules", "./docs"]);
    }

    #[test]
    fn find_leaves_exact_parent_before_descendants() {
        let cat = sample_catalog();
        let reporter = Reporter::capturing();
        let hits = collect(find(&cat, ".", "*.xyz", false, KindFilter::LEAVES, &reporter));
        assert_eq!(
            hits,
            vec![
                "./ethanol.xyz",
                "./data/c6h6.xyz",
                "./data/molecules/ch4.xyz",
                "./data/molecules/co2.xyz",
            ]
        );
    }

    #[test]
    fn find_preserves_callers_root_form() {
        let cat = sample_catalog();
        let reporter = Reporter::capturing();
        let hits = collect(find(
            &cat,
            "~/data",
            "mol*",
            false,
            KindFilter::CONTAINERS,
            &reporter,
        ));
        assert_eq!(hits, vec!["~/data/molecules"]);

        let hits = collect(find(
            &cat,
            "/tank/home/ada/data",
            "mol*",
            false,
            KindFilter::CONTAINERS,
            &reporter,
        ));
        assert_eq!(hits, vec!["/tank/home/ada/data/molecules"]);
    }

    #[test]
    fn find_warns_on_slash_without_wholename() {
        let cat = sample_catalog();
        let reporter = Reporter::capturing();
        let _ = collect(find(
            &cat,
            ".",
            "mol*/c*.xyz",
            false,
            KindFilter::LEAVES,
            &reporter,
        ));
        assert_eq!(reporter.warnings().len(), 1);

        let reporter = Reporter::capturing();
        let _ = collect(find(
            &cat,
            ".",
            "mol*/c*.xyz",
            true,
            KindFilter::LEAVES,
            &reporter,
        ));
        assert!(reporter.warnings().is_empty());
    }

    #[test]
    fn iglob_literal_hits_existing_entries_only() {
        let cat = sample_catalog();
        let reporter = Reporter::capturing();
        assert_eq!(
            collect(iglob(&cat, "data/c6h6.xyz", &reporter)),
            vec!["data/c6h6.xyz"]
        );
        assert_eq!(collect(iglob(&cat, "data", &reporter)), vec!["data"]);
        assert!(collect(iglob(&cat, "no/such/entry", &reporter)).is_empty());
    }

    #[test]
    fn iglob_rejects_ambiguous_entries() {
        let cat = MemoryCatalog::new("/tank/home/ada");
        cat.add_container("weird");
        cat.add_leaf("weird", b"both");
        let reporter = Reporter::capturing();
        let result: Result<Vec<_>, _> = iglob(&cat, "weird", &reporter).collect();
        assert!(matches!(result, Err(TrawlError::AmbiguousEntry { .. })));
    }

    #[test]
    fn iglob_expands_wildcards_over_both_kinds() {
        let cat = sample_catalog();
        let reporter = Reporter::capturing();
        let hits = collect(iglob(&cat, "data/mol*", &reporter));
        assert_eq!(hits, vec!["data/molecules"]);

        let hits = collect(iglob(&cat, "~/docs/*", &reporter));
        assert_eq!(hits, vec!["~/docs/readme.txt"]);
    }

    #[test]
    fn glob_is_the_eager_form() {
        let cat = sample_catalog();
        let reporter = Reporter::capturing();
        assert_eq!(
            glob(&cat, "eth*", &reporter).unwrap(),
            vec!["ethanol.xyz"]
        );
        assert!(glob(&cat, "nothing*", &reporter).unwrap().is_empty());
    }

    #[test]
    fn searches_are_restartable() {
        let cat = sample_catalog();
        let reporter = Reporter::capturing();
        let first = collect(iglob(&cat, "d*", &reporter));
        let second = collect(iglob(&cat, "d*", &reporter));
        assert_eq!(first, second);
    }
}
