//! Navigation outcomes and page lifecycle synchronization.
//!
//! This module defines two pieces:
//!
//! - [`NavigationAction`], the answer a before-guard gives: continue, cancel,
//!   or go somewhere else.
//! - The page-lifecycle hook that keeps the router's current route in step
//!   with the host page stack. The host, not the router, decides when a page
//!   is really shown, so the current route only changes when a page reports
//!   `onLoad` / `onShow` through [`Router::on_page_load`] and
//!   [`Router::on_page_show`].
//!
//! # Navigation pipeline
//!
//! 1. **Resolve** the target against the route table
//! 2. **Before-guards** run in registration order
//! 3. **Host call** (`navigateTo`, `redirectTo`, ...)
//! 4. The host shows the page and fires its lifecycle hook
//! 5. **Sync**: the current route is swapped and after-hooks run
//!
//! [`Router::on_page_load`]: crate::Router::on_page_load
//! [`Router::on_page_show`]: crate::Router::on_page_show

use crate::guards::{AfterHook, GuardList};
use crate::host::{HostNavigator, MpType};
use crate::location::{RouteDescriptor, RouteLocation, RouteLocationRaw};
use crate::params::LocationQuery;
use crate::route::RouteTable;
use crate::state::RouteCell;
use crate::url::{get_url_params, normalize_url};
use crate::{debug_log, trace_log, warn_log};

// ============================================================================
// NavigationAction
// ============================================================================

/// Outcome of a before-guard.
///
/// Guards can return anything convertible into an action:
///
/// | Value | Action |
/// |-------|--------|
/// | `()` / `true` | [`Continue`](Self::Continue) |
/// | `false` | [`Cancel`](Self::Cancel) |
/// | a path, descriptor or [`RouteLocationRaw`] | [`Redirect`](Self::Redirect) |
///
/// # Example
///
/// ```
/// use uni_mini_router::NavigationAction;
///
/// assert!(NavigationAction::from(true).is_continue());
/// assert!(NavigationAction::from(false).is_cancel());
///
/// let action = NavigationAction::from("/pages/login");
/// assert_eq!(action.redirect_target().and_then(|to| to.path()), Some("/pages/login"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationAction {
    /// Let the navigation proceed to the next guard.
    Continue,

    /// Abort the navigation.
    Cancel,

    /// Abort and start a new navigation to this target.
    Redirect(RouteLocationRaw),
}

impl NavigationAction {
    /// Create a redirect action.
    pub fn redirect(to: impl Into<RouteLocationRaw>) -> Self {
        Self::Redirect(to.into())
    }

    /// Check if this action lets navigation continue.
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue)
    }

    /// Check if this action cancels navigation.
    pub fn is_cancel(&self) -> bool {
        matches!(self, Self::Cancel)
    }

    /// Check if this action redirects navigation.
    pub fn is_redirect(&self) -> bool {
        matches!(self, Self::Redirect(_))
    }

    /// Get the redirect target, if this is a redirect action.
    pub fn redirect_target(&self) -> Option<&RouteLocationRaw> {
        match self {
            Self::Redirect(to) => Some(to),
            _ => None,
        }
    }
}

impl Default for NavigationAction {
    fn default() -> Self {
        Self::Continue
    }
}

impl From<()> for NavigationAction {
    fn from((): ()) -> Self {
        Self::Continue
    }
}

impl From<bool> for NavigationAction {
    fn from(allow: bool) -> Self {
        if allow {
            Self::Continue
        } else {
            Self::Cancel
        }
    }
}

impl From<&str> for NavigationAction {
    fn from(path: &str) -> Self {
        Self::Redirect(path.into())
    }
}

impl From<String> for NavigationAction {
    fn from(path: String) -> Self {
        Self::Redirect(path.into())
    }
}

impl From<RouteLocationRaw> for NavigationAction {
    fn from(to: RouteLocationRaw) -> Self {
        Self::Redirect(to)
    }
}

impl From<RouteDescriptor> for NavigationAction {
    fn from(to: RouteDescriptor) -> Self {
        Self::Redirect(to.into())
    }
}

/// `None` continues.
impl<T: Into<NavigationAction>> From<Option<T>> for NavigationAction {
    fn from(action: Option<T>) -> Self {
        action.map_or(Self::Continue, Into::into)
    }
}

// ============================================================================
// Page lifecycle sync
// ============================================================================

/// Bring the current route in line with the top of the host page stack.
///
/// Does nothing for non-page instances, when the host reports no page or a
/// page without a route, or when the page's full path equals the current
/// full path. Otherwise the new
/// location is stored and every after-hook runs with `(to, from)`.
///
/// Returns `true` if the current route changed.
pub(crate) fn sync_route_from_page(
    mp_type: MpType,
    host: &dyn HostNavigator,
    table: &RouteTable,
    current: &RouteCell,
    after_hooks: &GuardList<AfterHook>,
    query: Option<LocationQuery>,
) -> bool {
    if mp_type != MpType::Page {
        trace_log!("Ignoring lifecycle event from {:?} instance", mp_type);
        return false;
    }

    let Some(page) = host.current_page().filter(|page| !page.route.is_empty()) else {
        debug_log!("Lifecycle event fired but the host reports no current page");
        return false;
    };

    let full_path = page.resolved_full_path();
    let path = normalize_url(&page.path());

    let swapped = current.update(|from| {
        if from.full_path == full_path {
            trace_log!("Route already at '{}', skipping sync", full_path);
            return None;
        }

        let query = query.unwrap_or_else(|| get_url_params(&full_path));
        let mut location = RouteLocation {
            path: path.clone(),
            query,
            full_path: full_path.clone(),
            ..RouteLocation::start()
        };

        match table.find_by_path(&path) {
            Some(record) => {
                location.name = record.name.clone();
                location.meta = record.meta.clone();
                location.style = record.style.clone();
                location.extra = record.extra.clone();
            }
            None => {
                warn_log!(
                    "Page '{}' is not in the route table; meta and style will be empty",
                    path
                );
            }
        }
        Some(location)
    });

    let Some((to, from)) = swapped else {
        return false;
    };

    debug_log!("Route synced: '{}' → '{}'", from.full_path, to.full_path);
    for hook in after_hooks.snapshot() {
        hook(&to, &from);
    }
    true
}
