//! URL helpers: slash normalization and query (de)serialization.
//!
//! Encoding follows `encodeURIComponent`: everything except ASCII
//! alphanumerics and `- _ . ! ~ * ' ( )` is percent-encoded as UTF-8.
//! Decoding is the inverse and leaves `+` untouched.

use crate::params::{LocationQuery, QueryValue};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in query keys and values.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Collapse every run of `/` into a single `/`.
///
/// Leading and trailing slashes are kept; an empty string stays empty.
///
/// ```
/// use uni_mini_router::normalize_url;
///
/// assert_eq!(normalize_url("//pages//index"), "/pages/index");
/// assert_eq!(normalize_url("/pages/index/"), "/pages/index/");
/// assert_eq!(normalize_url(""), "");
/// ```
pub fn normalize_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut prev_slash = false;
    for c in url.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

/// Return the path part of a URL (everything before `?`).
pub fn strip_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(path, _)| path)
}

/// Parse the query string of a URL.
///
/// Everything after the first `?` and before any `#` is split on `&`.
/// A pair without `=` gets an empty value; repeated keys collect into a
/// list.
///
/// ```
/// use uni_mini_router::get_url_params;
///
/// let query = get_url_params("/pages/index?id=1&name=test");
/// assert_eq!(query.get_str("id"), Some("1"));
/// assert_eq!(query.get_str("name"), Some("test"));
///
/// assert!(get_url_params("/pages/index").is_empty());
/// ```
pub fn get_url_params(url: &str) -> LocationQuery {
    let mut query = LocationQuery::new();
    let Some((_, search)) = url.split_once('?') else {
        return query;
    };
    let search = search.split_once('#').map_or(search, |(search, _)| search);

    for pair in search.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        query.append(decode_component(key), decode_component(value));
    }
    query
}

/// Append a query to a path.
///
/// Null values and null list items are skipped; list values repeat the key.
/// If `path` already has a query string the pairs are appended with `&`.
///
/// ```
/// use uni_mini_router::{stringify_query, LocationQuery};
///
/// let query = LocationQuery::from_iter([("id", "1"), ("name", "test")]);
/// assert_eq!(stringify_query("/pages/index", &query), "/pages/index?id=1&name=test");
/// assert_eq!(stringify_query("/pages/index", &LocationQuery::new()), "/pages/index");
/// ```
pub fn stringify_query(path: &str, query: &LocationQuery) -> String {
    let mut pairs = Vec::with_capacity(query.len());
    for (key, value) in query.iter() {
        match value {
            QueryValue::Single(value) => pairs.push(encode_pair(key, value)),
            QueryValue::List(values) => {
                pairs.extend(values.iter().flatten().map(|value| encode_pair(key, value)));
            }
            QueryValue::Null => {}
        }
    }

    if pairs.is_empty() {
        return path.to_string();
    }
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{}{}{}", path, separator, pairs.join("&"))
}

/// `true` when the query has no keys at all.
pub fn is_empty_query(query: Option<&LocationQuery>) -> bool {
    query.map_or(true, LocationQuery::is_empty)
}

fn encode_pair(key: &str, value: &str) -> String {
    format!("{}={}", encode_component(key), encode_component(value))
}

/// Percent-encode a query component.
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Percent-decode a query component; invalid UTF-8 is replaced lossily.
pub fn decode_component(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

// ============================================================================
// Tests
// ============================================================================
