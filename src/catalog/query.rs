//! Catalog query construction
//!
//! Builds the wildcard-translated predicates that namespace searches run
//! against a catalog. Collections carry their full path as their catalog
//! name, so a collection query filters on a single name criterion. Data
//! objects have no hierarchical listing of their own: they are filtered
//! on parent collection name *and* object name, and covering a subtree
//! takes two queries because the catalog distinguishes "exactly this
//! collection" from "this collection or any descendant".

use crate::patterns::{basename, join, parent, to_catalog};

/// Queryable catalog name fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    /// Full path of a collection
    ContainerName,
    /// Base name of a data object
    LeafName,
}

/// A single wildcard-match predicate against one name field
///
/// The operator is always `LIKE`-style pattern matching with `%` as the
/// zero-or-more wildcard; exact matching is just a wildcard-free pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub field: QueryField,
    pub pattern: String,
}

impl Criterion {
    #[must_use]
    pub fn like(field: QueryField, pattern: impl Into<String>) -> Self {
        Self {
            field,
            pattern: pattern.into(),
        }
    }
}

/// A read-only catalog query: the conjunction of its criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    criteria: Vec<Criterion>,
}

impl Query {
    /// Query for collections whose full name matches `root_abs/name_pattern`.
    #[must_use]
    pub fn containers(root_abs: &str, name_pattern: &str) -> Self {
        let container = to_catalog(&join(root_abs, name_pattern));
        Self {
            criteria: vec![Criterion::like(QueryField::ContainerName, container)],
        }
    }

    /// Query for data objects directly inside the collection that matches
    /// `root_abs/<parent of pattern>`.
    #[must_use]
    pub fn leaves_exact(root_abs: &str, pattern: &str) -> Self {
        Self::leaves_in(root_abs, parent(pattern), pattern)
    }

    /// Query for data objects inside any immediate or deeper descendant of
    /// the collection matching `root_abs/<parent of pattern>`.
    #[must_use]
    pub fn leaves_descendants(root_abs: &str, pattern: &str) -> Self {
        let dir = join(parent(pattern), "*");
        Self::leaves_in(root_abs, &dir, pattern)
    }

    fn leaves_in(root_abs: &str, dir: &str, pattern: &str) -> Self {
        let container = to_catalog(join(root_abs, dir).trim_end_matches('/'));
        let leaf = to_catalog(basename(pattern));
        Self {
            criteria: vec![
                Criterion::like(QueryField::ContainerName, container),
                Criterion::like(QueryField::LeafName, leaf),
            ],
        }
    }

    #[must_use]
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// The pattern constraining collection names.
    #[must_use]
    pub fn container_pattern(&self) -> &str {
        self.pattern_for(QueryField::ContainerName).unwrap_or("%")
    }

    /// The pattern constraining object names, if this query selects objects.
    #[must_use]
    pub fn leaf_pattern(&self) -> Option<&str> {
        self.pattern_for(QueryField::LeafName)
    }

    /// Whether this query selects data objects rather than collections.
    #[must_use]
    pub fn wants_leaves(&self) -> bool {
        self.leaf_pattern().is_some()
    }

    fn pattern_for(&self, field: QueryField) -> Option<&str> {
        self.criteria
            .iter()
            .find(|c| c.field == field)
            .map(|c| c.pattern.as_str())
    }
}

/// `LIKE`-style wildcard matching: `%` matches zero or more characters,
/// including path separators; everything else matches literally.
///
/// Shared by the in-crate backends; a real remote catalog evaluates the
/// same semantics server-side.
#[must_use]
pub fn like_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0usize, 0usize);
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() && (p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '%' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((sp, st)) = star {
            // Backtrack: let the last wildcard absorb one more character
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '%' {
        pi += 1;
    }
    pi == p.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_query_translates_wildcards() {
        let q = Query::containers("/tank/home/ada", "m*");
        assert_eq!(q.container_pattern(), "/tank/home/ada/m%");
        assert!(!q.wants_leaves());
    }

    #[test]
    fn leaf_queries_cover_exact_and_descendant_parents() {
        let exact = Query::leaves_exact("/tank/home/ada", "m*/ch4.xyz");
        assert_eq!(exact.container_pattern(), "/tank/home/ada/m%");
        assert_eq!(exact.leaf_pattern(), Some("ch4.xyz"));

        let deep = Query::leaves_descendants("/tank/home/ada", "m*/ch4.xyz");
        assert_eq!(deep.container_pattern(), "/tank/home/ada/m%/%");
        assert_eq!(deep.leaf_pattern(), Some("ch4.xyz"));
    }

    #[test]
    fn leaf_query_with_bare_name_pattern() {
        // A parent-less pattern anchors on the root itself
        let exact = Query::leaves_exact("/tank/home/ada", "c*.xyz");
        assert_eq!(exact.container_pattern(), "/tank/home/ada");
        assert_eq!(exact.leaf_pattern(), Some("c%.xyz"));

        let deep = Query::leaves_descendants("/tank/home/ada", "c*.xyz");
        assert_eq!(deep.container_pattern(), "/tank/home/ada/%");
    }

    #[test]
    fn like_match_literals_and_wildcards() {
        assert!(like_match("abc", "abc"));
        assert!(!like_match("abc", "abx"));
        assert!(!like_match("abc", "abcd"));
        assert!(like_match("a%c", "abc"));
        assert!(like_match("a%c", "ac"));
        assert!(like_match("%", ""));
        assert!(like_match("%", "anything/at/all"));
        assert!(like_match("/a/%/c", "/a/b/x/c"));
        assert!(!like_match("/a/%/c", "/a/b"));
    }

    #[test]
    fn like_match_crosses_separators() {
        assert!(like_match("/tank/%", "/tank/home/ada/data"));
        assert!(like_match("%.xyz", "/tank/home/ada/data/c6h6.xyz"));
    }

    #[test]
    fn like_match_multiple_wildcards() {
        assert!(like_match("%mol%", "some_molecules_db"));
        assert!(like_match("c%h%.xyz", "c6h6.xyz"));
        assert!(!like_match("c%h%.xyz", "co2.xyz"));
    }
}
