//! Location resolution
//!
//! Turns a [`RouteLocationRaw`] into a [`RouteLocation`] using the route
//! table:
//!
//! ```text
//! "/pages//detail?id=1"            → path lookup   → /pages/detail?id=1
//! { path: "/pages/detail",
//!   query: { id: 2 } }             → path lookup   → /pages/detail?id=2
//! { name: "user",
//!   params: { id: 7 } }            → name lookup   → /pages/user?id=7
//! { }                              → start location
//! ```
//!
//! Path lookups match a record's `path` or `alias_path` after slash
//! normalization. With the `cache` feature the result of each lookup is kept
//! in a [`ResolveCache`](crate::cache::ResolveCache).

use crate::error::{NavigationError, NavigationResult};
use crate::location::{RouteDescriptor, RouteLocation, RouteLocationRaw};
use crate::params::{LocationQuery, ParamValue, RouteParams};
use crate::route::{RouteRecord, RouteTable};
use crate::url::{get_url_params, normalize_url, strip_query, stringify_query};
use crate::{debug_log, trace_log};
#[cfg(feature = "cache")]
use {
    crate::cache::{CacheStats, ResolveCache},
    parking_lot::Mutex,
};

/// Replace every `:key` placeholder in `path` with the matching param.
///
/// Params are applied in insertion order; list values are joined with `,`.
/// Placeholders without a param are left as they are.
///
/// ```
/// use uni_mini_router::{fill_params, RouteParams};
///
/// let params = RouteParams::from_iter([("id", "42")]);
/// assert_eq!(fill_params("/pages/user/:id/:tab", &params), "/pages/user/42/:tab");
/// ```
pub fn fill_params(path: &str, params: &RouteParams) -> String {
    let mut filled = path.to_string();
    for (key, value) in params.iter() {
        let placeholder = format!(":{}", key);
        if filled.contains(&placeholder) {
            filled = filled.replace(&placeholder, &param_text(value));
        }
    }
    filled
}

fn param_text(value: &ParamValue) -> String {
    match value {
        ParamValue::Single(s) => s.clone(),
        ParamValue::List(items) => items.join(","),
    }
}

/// Resolves navigation targets against an immutable route table.
pub(crate) struct Resolver {
    table: RouteTable,
    #[cfg(feature = "cache")]
    cache: Mutex<ResolveCache>,
}

impl Resolver {
    pub(crate) fn new(table: RouteTable) -> Self {
        Self {
            table,
            #[cfg(feature = "cache")]
            cache: Mutex::new(ResolveCache::new()),
        }
    }

    pub(crate) fn table(&self) -> &RouteTable {
        &self.table
    }

    #[cfg(feature = "cache")]
    pub(crate) fn cache_stats(&self) -> CacheStats {
        self.cache.lock().stats()
    }

    /// Resolve `to` into a location, or fail with a not-found error.
    pub(crate) fn resolve(&self, to: &RouteLocationRaw) -> NavigationResult<RouteLocation> {
        let location = match to {
            RouteLocationRaw::Path(path) => self.resolve_path(path, None)?,
            RouteLocationRaw::Descriptor(descriptor) => self.resolve_descriptor(descriptor)?,
        };
        trace_log!("Resolved {} → '{}'", to, location.full_path);
        Ok(location)
    }

    fn resolve_descriptor(&self, descriptor: &RouteDescriptor) -> NavigationResult<RouteLocation> {
        if let Some(name) = descriptor.name.as_deref().filter(|n| !n.is_empty()) {
            return self.resolve_named(name, descriptor);
        }
        match descriptor.path.as_deref().filter(|p| !p.is_empty()) {
            Some(path) => self.resolve_path(path, descriptor.query.as_ref()),
            None => {
                debug_log!("Descriptor has neither path nor name; using the start location");
                Ok(RouteLocation::start())
            }
        }
    }

    fn resolve_named(
        &self,
        name: &str,
        descriptor: &RouteDescriptor,
    ) -> NavigationResult<RouteLocation> {
        let record = self
            .table
            .find_by_name(name)
            .ok_or_else(|| NavigationError::NamedRouteNotFound {
                name: name.to_string(),
            })?;

        if descriptor.query.is_some() {
            debug_log!("Named route '{}': query is ignored, params become the query", name);
        }

        let params = descriptor.params.clone().unwrap_or_default();
        let path = fill_params(&record.path, &params);
        let query = LocationQuery::from(&params);
        let full_path = stringify_query(&path, &query);

        Ok(Self::location_from(
            record,
            RouteLocation {
                path,
                name: Some(name.to_string()),
                params,
                query,
                hash: descriptor.hash.clone().unwrap_or_default(),
                full_path,
                ..RouteLocation::start()
            },
        ))
    }

    fn resolve_path(
        &self,
        raw: &str,
        explicit: Option<&LocationQuery>,
    ) -> NavigationResult<RouteLocation> {
        let path = normalize_url(strip_query(raw));
        let record = self
            .lookup(&path)
            .ok_or_else(|| NavigationError::RouteNotFound { path: path.clone() })?;

        let query = LocationQuery::merge(&get_url_params(raw), explicit);
        let full_path = stringify_query(&path, &query);

        Ok(Self::location_from(
            record,
            RouteLocation {
                name: record.name.clone(),
                query,
                full_path,
                path,
                ..RouteLocation::start()
            },
        ))
    }

    /// Copy the record's shared bags onto `location`.
    fn location_from(record: &RouteRecord, location: RouteLocation) -> RouteLocation {
        RouteLocation {
            meta: record.meta.clone(),
            style: record.style.clone(),
            extra: record.extra.clone(),
            ..location
        }
    }

    #[cfg(feature = "cache")]
    fn lookup(&self, path: &str) -> Option<&RouteRecord> {
        let mut cache = self.cache.lock();
        let index = match cache.get(path) {
            Some(index) => index,
            None => {
                let index = self.table.position_by_path(path);
                cache.insert(path.to_string(), index);
                index
            }
        };
        index.and_then(|i| self.table.get(i))
    }

    #[cfg(not(feature = "cache"))]
    fn lookup(&self, path: &str) -> Option<&RouteRecord> {
        self.table.find_by_path(path)
    }
}
