//! Route parameters and location queries.
//!
//! This module provides the two key/value bags carried by a navigation:
//!
//! - [`RouteParams`]: values substituted into `:name` placeholders when
//!   navigating by route name. Each value is a string or a list of strings.
//! - [`LocationQuery`]: the query string of a location. Each value is a
//!   string, an explicit null, or a list of (nullable) strings.
//!
//! Both keep **insertion order**, since it decides the order of pairs in
//! the serialized full path.
//!
//! # Example
//!
//! ```
//! use uni_mini_router::{LocationQuery, RouteParams};
//!
//! let mut params = RouteParams::new();
//! params.insert("id", "42");
//! assert_eq!(params.get_as::<u32>("id"), Some(42));
//!
//! let query = LocationQuery::from_iter([("page", "1"), ("sort", "name")]);
//! assert_eq!(query.get_str("page"), Some("1"));
//! assert_eq!(query.keys().collect::<Vec<_>>(), vec!["page", "sort"]);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Route parameters
// ============================================================================

/// A single route parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// One value.
    Single(String),
    /// Repeated values.
    List(Vec<String>),
}

impl ParamValue {
    /// The first value, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::List(values) => values.first().map(String::as_str),
        }
    }
}

/// Formats lists comma-joined, which is how a list is spliced into a path.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(value) => f.write_str(value),
            Self::List(values) => f.write_str(&values.join(",")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(String::from).collect())
    }
}

macro_rules! impl_from_display {
    ($target:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for $target {
                fn from(value: $ty) -> Self {
                    Self::Single(value.to_string())
                }
            }
        )*
    };
}

impl_from_display!(ParamValue: i32, i64, u32, u64, usize, bool);

/// Route parameters substituted into a record's path template.
///
/// # Example
///
/// ```
/// use uni_mini_router::RouteParams;
///
/// let mut params = RouteParams::new();
/// params.insert("id", "123");
///
/// assert_eq!(params.get("id").and_then(|v| v.first()), Some("123"));
/// assert_eq!(params.get_as::<i32>("id"), Some(123));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteParams {
    params: IndexMap<String, ParamValue>,
}

impl RouteParams {
    /// Create empty route parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a parameter value by key.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Get the first value of a parameter and parse it as `T`.
    ///
    /// Returns `None` if the parameter doesn't exist or cannot be parsed.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.params.get(key)?.first()?.parse().ok()
    }

    /// Insert or overwrite a parameter, keeping its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.params.insert(key.into(), value.into());
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Iterate over all `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.params.iter()
    }

    /// Return `true` if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Return the number of parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            params: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Location query
// ============================================================================

/// A single query value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// `?key=value`
    Single(String),
    /// `?key=a&key=b`; null items are dropped when serialized.
    List(Vec<Option<String>>),
    /// Present but null; dropped when serialized.
    Null,
}

impl QueryValue {
    /// The first non-null value, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::List(values) => values.iter().flatten().next().map(String::as_str),
            Self::Null => None,
        }
    }

    /// `true` for [`QueryValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values.into_iter().map(Some).collect())
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(|v| Some(v.to_string())).collect())
    }
}

impl From<ParamValue> for QueryValue {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Single(value) => Self::Single(value),
            ParamValue::List(values) => values.into(),
        }
    }
}

impl_from_display!(QueryValue: i32, i64, u32, u64, usize, bool, f64);

/// Query of a location, in insertion order.
///
/// # Example
///
/// ```
/// use uni_mini_router::{LocationQuery, QueryValue};
///
/// let mut query = LocationQuery::new();
/// query.insert("id", "1");
/// query.insert("tab", QueryValue::Null);
///
/// assert_eq!(query.get_str("id"), Some("1"));
/// assert!(query.get("tab").is_some_and(QueryValue::is_null));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationQuery {
    values: IndexMap<String, QueryValue>,
}

impl LocationQuery {
    /// Create an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.values.get(key)
    }

    /// Get the first non-null string for a key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.first()
    }

    /// Get the first non-null value for a key, parsed as `T`.
    pub fn get_as<T>(&self, key: &str) -> Option<T>
    where
        T: std::str::FromStr,
    {
        self.get_str(key)?.parse().ok()
    }

    /// Insert or overwrite a value, keeping its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<QueryValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Append a value for `key`, turning an existing value into a list.
    ///
    /// This is how repeated keys in a query string (`?tag=a&tag=b`) are
    /// collected.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.values.entry(key.into()) {
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(QueryValue::Single(value));
            }
            indexmap::map::Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                match existing {
                    QueryValue::List(values) => values.push(Some(value)),
                    QueryValue::Single(first) => {
                        let first = std::mem::take(first);
                        *existing = QueryValue::List(vec![Some(first), Some(value)]);
                    }
                    QueryValue::Null => *existing = QueryValue::Single(value),
                }
            }
        }
    }

    /// Return `true` if the given key is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterate over all `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.values.iter()
    }

    /// Return `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Merge a parsed query with an explicitly supplied one.
    ///
    /// Keys keep the position they first appeared at; on collision the
    /// explicit value wins.
    ///
    /// ```
    /// use uni_mini_router::LocationQuery;
    ///
    /// let parsed = LocationQuery::from_iter([("id", "1"), ("from", "url")]);
    /// let explicit = LocationQuery::from_iter([("from", "caller")]);
    ///
    /// let merged = LocationQuery::merge(&parsed, Some(&explicit));
    /// assert_eq!(merged.get_str("id"), Some("1"));
    /// assert_eq!(merged.get_str("from"), Some("caller"));
    /// ```
    pub fn merge(parsed: &LocationQuery, explicit: Option<&LocationQuery>) -> LocationQuery {
        let mut merged = parsed.clone();
        if let Some(explicit) = explicit {
            for (key, value) in explicit.iter() {
                merged.values.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

impl From<&RouteParams> for LocationQuery {
    fn from(params: &RouteParams) -> Self {
        params
            .iter()
            .map(|(k, v)| (k.clone(), QueryValue::from(v.clone())))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for LocationQuery
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
