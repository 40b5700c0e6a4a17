//! Navigation targets and resolved locations.
//!
//! - [`RouteLocationRaw`] is what callers hand to `push` and friends: a bare
//!   path string or a [`RouteDescriptor`].
//! - [`RouteLocation`] is what the resolver produces and what the router
//!   stores as the current route.
//!
//! # Example
//!
//! ```
//! use uni_mini_router::{RouteDescriptor, RouteLocationRaw, NavType};
//!
//! let by_path: RouteLocationRaw = "/pages/user/detail?id=7".into();
//! assert_eq!(by_path.path(), Some("/pages/user/detail?id=7"));
//!
//! let by_name: RouteLocationRaw = RouteDescriptor::named("user")
//!     .param("id", 7)
//!     .nav_type(NavType::Replace)
//!     .into();
//! assert_eq!(by_name.name(), Some("user"));
//! assert_eq!(by_name.nav_type(), Some(NavType::Replace));
//! ```

use crate::host::NavType;
use crate::params::{LocationQuery, ParamValue, QueryValue, RouteParams};
use crate::route::{RouteAttributes, RouteMeta, RouteStyle};
use crate::transition::{Animation, AnimationType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// RouteLocation
// ============================================================================

/// A fully resolved location.
///
/// Locations are immutable snapshots. The router swaps the whole value when
/// the current route changes; `meta`, `style` and `extra` are shared with the
/// route record they came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLocation {
    /// Page path without query or hash.
    pub path: String,
    /// Name of the matched record, if it has one.
    pub name: Option<String>,
    /// Params supplied for a named navigation.
    pub params: RouteParams,
    /// Query parameters.
    pub query: LocationQuery,
    /// Hash fragment (empty when absent).
    pub hash: String,
    /// Path plus serialized query.
    pub full_path: String,
    /// Metadata of the matched record.
    pub meta: Arc<RouteMeta>,
    /// Style of the matched record.
    pub style: Arc<RouteStyle>,
    /// Extra attributes of the matched record.
    pub extra: Arc<RouteAttributes>,
    /// The location a guard redirected away from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<Arc<RouteLocation>>,
}

impl RouteLocation {
    /// The "not yet navigated" location: `/` with everything else empty.
    pub fn start() -> Self {
        Self {
            path: "/".to_string(),
            name: None,
            params: RouteParams::new(),
            query: LocationQuery::new(),
            hash: String::new(),
            full_path: "/".to_string(),
            meta: Arc::default(),
            style: Arc::default(),
            extra: Arc::default(),
            redirected_from: None,
        }
    }

    /// `true` if this is the start location.
    pub fn is_start(&self) -> bool {
        self.full_path == "/" && self.name.is_none() && self.meta.is_empty()
    }

    /// Look up a metadata value.
    pub fn meta_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.meta.get(key)
    }

    /// `true` if the metadata entry `key` is JSON `true`.
    pub fn meta_flag(&self, key: &str) -> bool {
        matches!(self.meta.get(key), Some(serde_json::Value::Bool(true)))
    }
}

impl Default for RouteLocation {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for RouteLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path)
    }
}

// ============================================================================
// RouteLocationRaw
// ============================================================================

/// A navigation target as written by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteLocationRaw {
    /// A path, optionally with a query string.
    Path(String),
    /// A structured target.
    Descriptor(RouteDescriptor),
}

impl RouteLocationRaw {
    /// The target path, for string targets and path descriptors.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            Self::Descriptor(d) => d.path.as_deref(),
        }
    }

    /// The target route name, for named descriptors.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Path(_) => None,
            Self::Descriptor(d) => d.name.as_deref(),
        }
    }

    /// Navigation type override carried by the target.
    pub fn nav_type(&self) -> Option<NavType> {
        match self {
            Self::Path(_) => None,
            Self::Descriptor(d) => d.nav_type,
        }
    }

    /// Animation settings carried by the target.
    pub fn animation(&self) -> Animation {
        match self {
            Self::Path(_) => Animation::default(),
            Self::Descriptor(d) => d.animation,
        }
    }
}

impl From<&str> for RouteLocationRaw {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for RouteLocationRaw {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<&String> for RouteLocationRaw {
    fn from(path: &String) -> Self {
        Self::Path(path.clone())
    }
}

impl From<RouteDescriptor> for RouteLocationRaw {
    fn from(descriptor: RouteDescriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

impl From<&RouteLocation> for RouteLocationRaw {
    fn from(location: &RouteLocation) -> Self {
        Self::Path(location.full_path.clone())
    }
}

impl fmt::Display for RouteLocationRaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => f.write_str(path),
            Self::Descriptor(d) => match (&d.path, &d.name) {
                (Some(path), _) => f.write_str(path),
                (None, Some(name)) => write!(f, "route '{}'", name),
                (None, None) => f.write_str("<empty location>"),
            },
        }
    }
}

// ============================================================================
// RouteDescriptor
// ============================================================================

/// Structured navigation target.
///
/// When both `path` and `name` are set the name wins. When neither is set the
/// target resolves to the start location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    /// Target path, optionally with a query string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Target route name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Params substituted into `:key` placeholders of a named route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RouteParams>,
    /// Explicit query; wins over keys parsed from `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<LocationQuery>,
    /// Hash fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Overrides the navigation method that was called.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nav_type: Option<NavType>,
    /// Window animation handed to the host.
    #[serde(flatten)]
    pub animation: Animation,
}

impl RouteDescriptor {
    /// Descriptor targeting a path.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Descriptor targeting a named route.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Add one param.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params
            .get_or_insert_with(RouteParams::new)
            .insert(key, value);
        self
    }

    /// Replace all params.
    pub fn params(mut self, params: RouteParams) -> Self {
        self.params = Some(params);
        self
    }

    /// Add one query entry.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query
            .get_or_insert_with(LocationQuery::new)
            .insert(key, value);
        self
    }

    /// Replace the whole query.
    pub fn with_query(mut self, query: LocationQuery) -> Self {
        self.query = Some(query);
        self
    }

    /// Set the hash fragment.
    pub fn hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    /// Override the navigation method.
    pub fn nav_type(mut self, nav_type: NavType) -> Self {
        self.nav_type = Some(nav_type);
        self
    }

    /// Set the window animation.
    pub fn animation(mut self, animation_type: AnimationType, duration_ms: u32) -> Self {
        self.animation = Animation::new(animation_type, duration_ms);
        self
    }
}
