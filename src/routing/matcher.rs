//! Path prefix matching.
//!
//! # Responsibilities
//! - Decide whether a route path sits under a middleware scope
//!
//! # Design Decisions
//! - Matching is case-sensitive and byte-exact
//! - A prefix only matches on a `/` boundary: `/api` covers `/api` and `/api/x`, never `/apix`
//! - The empty prefix is the global scope and covers every path

/// Returns true if `path` is under `prefix`.
///
/// `path` is under `prefix` iff `path == prefix`, or `path` starts with
/// `prefix` immediately followed by `/`.
pub fn is_under(path: &str, prefix: &str) -> bool {
    if prefix.is_empty() || path == prefix {
        return true;
    }
    path.len() > prefix.len()
        && path.starts_with(prefix)
        && path.as_bytes()[prefix.len()] == b'/'
}
