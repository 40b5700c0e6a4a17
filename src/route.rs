//! Route records and the route table.
//!
//! A [`RouteRecord`] describes one page the host can show. Records are
//! supplied once through [`RouterOptions`] when the router is created and
//! are never modified afterwards.
//!
//! Records deserialize from the same JSON shape the host uses for its page
//! table, so a route table can be loaded straight from configuration:
//!
//! ```
//! use uni_mini_router::RouterOptions;
//!
//! let options = RouterOptions::from_json(r#"{
//!     "routes": [
//!         { "path": "/pages/home/index", "name": "home", "aliasPath": "/" },
//!         { "path": "/pages/user/detail", "name": "user", "meta": { "auth": true } }
//!     ]
//! }"#).unwrap();
//!
//! assert_eq!(options.routes.len(), 2);
//! assert_eq!(options.routes[0].alias_path.as_deref(), Some("/"));
//! ```
//!
//! Any key other than `path`, `name`, `aliasPath`, `meta` and `style` is kept
//! in [`RouteRecord::extra`] and copied onto every location resolved from the
//! record.

use crate::error::NavigationResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Free-form metadata attached to a route (e.g. `{"auth": true}`).
pub type RouteMeta = IndexMap<String, Value>;

/// Per-platform page style, passed through to the host untouched.
pub type RouteStyle = IndexMap<String, Value>;

/// Extra attributes declared on a route record.
pub type RouteAttributes = IndexMap<String, Value>;

/// Static descriptor of one navigable page.
///
/// # Example
///
/// ```
/// use uni_mini_router::RouteRecord;
///
/// let record = RouteRecord::new("/pages/user/detail")
///     .name("user")
///     .alias("/user")
///     .meta("auth", true)
///     .attr("tabBar", false);
///
/// assert!(record.matches_path("/user"));
/// assert_eq!(record.meta["auth"], true);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
    /// Absolute page path, the primary match key.
    pub path: String,

    /// Unique name for name-based navigation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Secondary path that also matches this record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_path: Option<String>,

    /// Route metadata.
    #[serde(default)]
    pub meta: Arc<RouteMeta>,

    /// Page style bag.
    #[serde(default)]
    pub style: Arc<RouteStyle>,

    /// Every other key found on the record.
    #[serde(flatten)]
    pub extra: Arc<RouteAttributes>,
}

impl RouteRecord {
    /// Create a record for `path` with no name, alias, meta or style.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            alias_path: None,
            meta: Arc::default(),
            style: Arc::default(),
            extra: Arc::default(),
        }
    }

    /// Set the route name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the alias path.
    pub fn alias(mut self, alias_path: impl Into<String>) -> Self {
        self.alias_path = Some(alias_path.into());
        self
    }

    /// Add a metadata entry.
    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.meta).insert(key.into(), value.into());
        self
    }

    /// Add a style entry.
    pub fn style(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.style).insert(key.into(), value.into());
        self
    }

    /// Add an extra attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.extra).insert(key.into(), value.into());
        self
    }

    /// `true` if `path` equals this record's path or alias.
    ///
    /// `path` is expected to be normalized already.
    pub fn matches_path(&self, path: &str) -> bool {
        self.path == path || self.alias_path.as_deref() == Some(path)
    }
}

/// Options for [`create_router`](crate::create_router).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterOptions {
    /// The route table, in match priority order.
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

impl RouterOptions {
    /// Options with the given routes.
    pub fn new(routes: impl IntoIterator<Item = RouteRecord>) -> Self {
        Self {
            routes: routes.into_iter().collect(),
        }
    }

    /// Load options from a JSON document.
    pub fn from_json(json: &str) -> NavigationResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Immutable, shared list of route records.
///
/// Lookups are linear scans in registration order; the first record that
/// matches wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    records: Arc<[RouteRecord]>,
}

impl RouteTable {
    /// Build a table from records.
    pub fn new(records: Vec<RouteRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// All records in registration order.
    pub fn records(&self) -> &[RouteRecord] {
        &self.records
    }

    /// Index of the first record whose path or alias equals `path`.
    pub fn position_by_path(&self, path: &str) -> Option<usize> {
        self.records.iter().position(|r| r.matches_path(path))
    }

    /// First record whose path or alias equals `path`.
    pub fn find_by_path(&self, path: &str) -> Option<&RouteRecord> {
        self.position_by_path(path).map(|i| &self.records[i])
    }

    /// First record with this exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.records
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
    }

    /// Record at `index`.
    pub fn get(&self, index: usize) -> Option<&RouteRecord> {
        self.records.get(index)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` if the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let record = RouteRecord::new("/pages/a")
            .name("a")
            .alias("/a")
            .meta("title", "A")
            .style("navigationBarTitleText", "Page A");

        assert_eq!(record.name.as_deref(), Some("a"));
        assert_eq!(record.meta["title"], json!("A"));
        assert_eq!(record.style["navigationBarTitleText"], json!("Page A"));
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_matches_path_and_alias() {
        let record = RouteRecord::new("/pages/home").alias("/");
        assert!(record.matches_path("/pages/home"));
        assert!(record.matches_path("/"));
        assert!(!record.matches_path("/pages/other"));
    }

    #[test]
    fn test_unknown_keys_land_in_extra() {
        let record: RouteRecord = serde_json::from_value(json!({
            "path": "/pages/tab",
            "name": "tab",
            "tabBar": true,
            "order": 3
        }))
        .unwrap();

        assert_eq!(record.extra.len(), 2);
        assert_eq!(record.extra["tabBar"], json!(true));
        assert_eq!(record.extra["order"], json!(3));
        assert!(record.meta.is_empty());
    }

    #[test]
    fn test_table_lookup_first_match_wins() {
        let table = RouteTable::new(vec![
            RouteRecord::new("/pages/a").name("first").alias("/x"),
            RouteRecord::new("/x").name("second"),
        ]);

        assert_eq!(
            table.find_by_path("/x").and_then(|r| r.name.as_deref()),
            Some("first")
        );
        assert_eq!(table.find_by_name("second").map(|r| r.path.as_str()), Some("/x"));
        assert!(table.find_by_name("missing").is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_options_from_json_rejects_bad_input() {
        let err = RouterOptions::from_json(r#"{"routes": [{"name": "no-path"}]}"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid router configuration"));
    }
}
