//! Path pattern matching shared by the admin, public and API surfaces.
//!
//! A pattern is a `/`-separated list of segments. A segment written as
//! `[name]` is dynamic and binds `name` to whatever the request carries in
//! that position; every other segment must match exactly. Patterns never
//! match a request with a different number of segments, and the first
//! matching pattern in declaration order wins.

use std::collections::BTreeMap;

/// Parameters bound by dynamic segments.
pub type RouteParams = BTreeMap<String, String>;

/// Splits a path on `/`, dropping empty segments.
///
/// `""`, `"/"` and `"//"` all yield zero segments.
#[must_use]
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Returns the parameter name of a dynamic segment.
///
/// Only a single bracket pair around a non-empty name counts; `[]`,
/// `[[id]]` and `a[id]` are treated as static text.
#[must_use]
pub fn dynamic_name(segment: &str) -> Option<&str> {
    let inner = segment.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() || inner.contains(['[', ']']) {
        None
    } else {
        Some(inner)
    }
}

/// Matches route segments against request segments.
#[must_use]
pub fn match_segments(route: &[&str], request: &[&str]) -> Option<RouteParams> {
    if route.len() != request.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (pattern, actual) in route.iter().zip(request) {
        match dynamic_name(pattern) {
            Some(name) if !actual.is_empty() => {
                params.insert(name.to_string(), (*actual).to_string());
            }
            Some(_) => return None,
            None if pattern == actual => {}
            None => return None,
        }
    }
    Some(params)
}

/// Matches a route pattern string against a request path string.
#[must_use]
pub fn match_path(pattern: &str, request_path: &str) -> Option<RouteParams> {
    match_segments(&split_path(pattern), &split_path(request_path))
}

/// Anything declared with a path pattern: admin pages, public pages, API routes.
pub trait Routable {
    fn pattern(&self) -> &str;
}

impl Routable for &str {
    fn pattern(&self) -> &str {
        self
    }
}

impl Routable for String {
    fn pattern(&self) -> &str {
        self
    }
}

/// Returns the first entry whose pattern matches, with its bound parameters.
pub fn find_match<'a, R: Routable>(
    entries: &'a [R],
    request: &[&str],
) -> Option<(&'a R, RouteParams)> {
    entries.iter().find_map(|entry| {
        match_segments(&split_path(entry.pattern()), request).map(|params| (entry, params))
    })
}

/// Strips `base` from the front of `request` when every base segment matches.
///
/// Matching is per segment, so `/concerts` is not a prefix of `/concertsx`.
#[must_use]
pub fn strip_segment_prefix<'a, 'r>(base: &[&str], request: &'a [&'r str]) -> Option<&'a [&'r str]> {
    if base.len() > request.len() {
        return None;
    }
    let (head, rest) = request.split_at(base.len());
    (head == base).then_some(rest)
}
