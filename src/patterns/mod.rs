//! Wildcard pattern translation and catalog path manipulation
//!
//! Catalog namespaces use `/`-separated path strings that are not local
//! filesystem paths, so the usual `std::path` machinery does not apply.
//! This module provides the string-level helpers (`join`, `parent`,
//! `basename`) plus the pattern splitting and wildcard translation that
//! turn a shell-style `*` pattern into catalog query text.
//!
//! Only `*` is expanded. The other shell specials (`?`, `[]`, `{}`) are
//! treated as literal characters.

mod error;

pub use error::PatternError;

/// The shell-side wildcard recognized in search patterns.
pub const WILDCARD: char = '*';

/// The wildcard glyph understood by the catalog's `LIKE`-style matching.
pub const CATALOG_WILDCARD: char = '%';

/// Join two catalog path fragments with a separator.
///
/// An absolute `name` replaces `base` entirely, mirroring the usual
/// path-join convention.
#[must_use]
pub fn join(base: &str, name: &str) -> String {
    if name.starts_with('/') || base.is_empty() {
        name.to_string()
    } else if base.ends_with('/') {
        format!("{base}{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Everything before the final separator, with trailing separators trimmed.
///
/// Returns `""` for separator-free input and `"/"` for the root itself.
#[must_use]
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        None => "",
        Some(i) => {
            let head = &path[..=i];
            if head.bytes().all(|b| b == b'/') {
                head
            } else {
                head.trim_end_matches('/')
            }
        }
    }
}

/// Everything after the final separator (empty for paths ending in `/`).
#[must_use]
pub fn basename(path: &str) -> &str {
    match path.rfind('/') {
        None => path,
        Some(i) => &path[i + 1..],
    }
}

/// Split a pattern at its first wildcard into a literal directory prefix
/// and a remainder pattern.
///
/// Returns `None` when the pattern holds no wildcard at all; the caller
/// should then treat the whole string as an exact path. Otherwise the
/// prefix is wildcard-free and `join(prefix, remainder)` reconstructs the
/// original pattern (modulo redundant separators).
///
/// ```
/// use trawl::patterns::split_wildcard;
///
/// assert_eq!(split_wildcard("m*/ch4.xyz"), Some(("".into(), "m*/ch4.xyz".into())));
/// assert_eq!(split_wildcard("./*/*"), Some((".".into(), "*/*".into())));
/// assert_eq!(split_wildcard("~/foo/c*.xyz"), Some(("~/foo".into(), "c*.xyz".into())));
/// assert_eq!(split_wildcard("exact/path"), None);
/// ```
#[must_use]
pub fn split_wildcard(pattern: &str) -> Option<(String, String)> {
    let index = pattern.find(WILDCARD)?;
    let prefix = parent(&pattern[..index]);
    let remainder = if prefix.is_empty() {
        pattern
    } else {
        pattern[prefix.len()..].trim_start_matches('/')
    };
    Some((prefix.to_string(), remainder.to_string()))
}

/// Translate a shell-style pattern into catalog query text by mapping
/// every `*` to the catalog wildcard.
///
/// Literal occurrences of the catalog wildcard in entry names are not
/// escaped; a name containing `%` will over-match.
#[must_use]
pub fn to_catalog(pattern: &str) -> String {
    pattern.replace(WILDCARD, &CATALOG_WILDCARD.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_basic() {
        assert_eq!(join("/tank/home", "data"), "/tank/home/data");
        assert_eq!(join("/tank/home/", "data"), "/tank/home/data");
        assert_eq!(join("", "data"), "data");
        assert_eq!(join(".", "a/b"), "./a/b");
        assert_eq!(join("/tank", "/abs/path"), "/abs/path");
    }

    #[test]
    fn join_empty_name_keeps_trailing_separator() {
        assert_eq!(join("/tank/home", ""), "/tank/home/");
    }

    #[test]
    fn parent_basic() {
        assert_eq!(parent("a/b/c"), "a/b");
        assert_eq!(parent("name"), "");
        assert_eq!(parent("./"), ".");
        assert_eq!(parent("/a"), "/");
        assert_eq!(parent("/"), "/");
        assert_eq!(parent("~/foo/c"), "~/foo");
    }

    #[test]
    fn basename_basic() {
        assert_eq!(basename("a/b/c.xyz"), "c.xyz");
        assert_eq!(basename("c.xyz"), "c.xyz");
        assert_eq!(basename("a/"), "");
    }

    #[test]
    fn split_no_wildcard_is_exact() {
        assert_eq!(split_wildcard("data/molecules"), None);
        assert_eq!(split_wildcard(""), None);
    }

    #[test]
    fn split_wildcard_in_first_segment() {
        let (prefix, rest) = split_wildcard("m*/ch4.xyz").unwrap();
        assert_eq!(prefix, "");
        assert_eq!(rest, "m*/ch4.xyz");
    }

    #[test]
    fn split_relative_dot_prefix() {
        let (prefix, rest) = split_wildcard("./*/*").unwrap();
        assert_eq!(prefix, ".");
        assert_eq!(rest, "*/*");
    }

    #[test]
    fn split_literal_prefix_segments() {
        let (prefix, rest) = split_wildcard("~/foo/c*.xyz").unwrap();
        assert_eq!(prefix, "~/foo");
        assert_eq!(rest, "c*.xyz");
        assert_eq!(join(&prefix, &rest), "~/foo/c*.xyz");
    }

    #[test]
    fn split_reconstructs_original() {
        for pattern in ["a/b/c*", "/srv/data/*.dat", "x*/y*/z", "*"] {
            let (prefix, rest) = split_wildcard(pattern).unwrap();
            assert!(!prefix.contains('*'));
            assert_eq!(join(&prefix, &rest), *pattern);
        }
    }

    #[test]
    fn translate_wildcards() {
        assert_eq!(to_catalog("c*.xyz"), "c%.xyz");
        assert_eq!(to_catalog("*mol*"), "%mol%");
        assert_eq!(to_catalog("plain"), "plain");
    }
}
