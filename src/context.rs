//! The router and its app-context integration.
//!
//! This module contains the types an application touches directly:
//!
//! - [`Router`]: the central routing object. It owns the current-route cell,
//!   the route table and both guard lists, and runs the navigation pipeline
//!   (resolve → guards → host call).
//!
//! - [`AppContext`]: an explicit injection handle. [`Router::install`] puts
//!   the router and its current route into it; [`use_router`] and
//!   [`use_route`] take them back out anywhere the context is available.
//!
//! # Initialization
//!
//! Use [`create_router`] once at startup, then install it into the app
//! context:
//!
//! ```no_run
//! # use uni_mini_router::*;
//! # struct Host;
//! # impl HostNavigator for Host {
//! #     fn navigate_to(&self, _: HostNavigation, _: HostCallback) { unimplemented!() }
//! #     fn redirect_to(&self, _: HostNavigation, _: HostCallback) { unimplemented!() }
//! #     fn switch_tab(&self, _: HostNavigation, _: HostCallback) { unimplemented!() }
//! #     fn relaunch(&self, _: HostNavigation, _: HostCallback) { unimplemented!() }
//! #     fn navigate_back(&self, _: BackOptions, _: HostCallback) { unimplemented!() }
//! #     fn current_page(&self) -> Option<PageInfo> { unimplemented!() }
//! # }
//! # fn host() -> impl HostNavigator { Host }
//! let router = create_router(
//!     RouterOptions::new([
//!         RouteRecord::new("/pages/home/index").name("home").alias("/"),
//!         RouteRecord::new("/pages/login/index").name("login"),
//!     ]),
//!     host(),
//! );
//!
//! let mut cx = AppContext::new();
//! router.install(&mut cx);
//!
//! let router = use_router(&cx).unwrap();
//! let route = use_route(&cx).unwrap();
//! # let _ = (router, route);
//! ```
//!
//! # Pages
//!
//! Each page forwards its lifecycle hooks to the router so the current route
//! follows the host page stack:
//!
//! ```no_run
//! # use uni_mini_router::*;
//! # fn on_load(router: &Router, query: LocationQuery) {
//! router.on_page_load(MpType::Page, Some(query));
//! # }
//! # fn on_show(router: &Router) {
//! router.on_page_show(MpType::Page);
//! # }
//! ```

#[cfg(feature = "cache")]
use crate::cache::CacheStats;
use crate::error::{NavigationError, NavigationResult};
use crate::guards::{run_guard_queue, AfterHook, GuardList, GuardRegistration, NavigationGuard};
use crate::host::{call_host, HostCall, HostNavigator, MpType, NavType, RouteBack};
use crate::lifecycle::sync_route_from_page;
use crate::location::{RouteLocation, RouteLocationRaw};
use crate::params::LocationQuery;
use crate::resolve::Resolver;
use crate::route::{RouteRecord, RouteTable, RouterOptions};
use crate::state::{RouteCell, RouteView};
use crate::{debug_log, info_log, warn_log};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::sync::Arc;

/// Future returned by the navigation methods.
///
/// Resolves to the location that was handed to the host. The current route
/// is **not** updated yet at that point; it changes when the new page
/// reports its lifecycle event.
pub type NavigationFuture = BoxFuture<'static, NavigationResult<RouteLocation>>;

/// Create a router from options and a host.
pub fn create_router(options: RouterOptions, host: impl HostNavigator) -> Router {
    Router::new(options, Arc::new(host))
}

// ============================================================================
// Router
// ============================================================================

struct RouterInner {
    resolver: Resolver,
    host: Arc<dyn HostNavigator>,
    current: RouteCell,
    before_guards: GuardList<NavigationGuard>,
    after_hooks: GuardList<AfterHook>,
}

/// Navigation router for a mini-program host.
///
/// Cheap to clone; clones share all state.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl Router {
    /// Create a router with a shared host handle.
    pub fn new(options: RouterOptions, host: Arc<dyn HostNavigator>) -> Self {
        let table = RouteTable::new(options.routes);
        info_log!("Router created with {} routes", table.len());
        Self {
            inner: Arc::new(RouterInner {
                resolver: Resolver::new(table),
                host,
                current: RouteCell::new(RouteLocation::start()),
                before_guards: GuardList::new(),
                after_hooks: GuardList::new(),
            }),
        }
    }

    /// Get the router installed in `cx`.
    pub fn of(cx: &AppContext) -> NavigationResult<Router> {
        use_router(cx)
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Resolve a target without navigating.
    pub fn resolve(&self, to: impl Into<RouteLocationRaw>) -> NavigationResult<RouteLocation> {
        self.inner.resolver.resolve(&to.into())
    }

    /// Open a new page on top of the stack (`navigateTo`).
    pub fn push(&self, to: impl Into<RouteLocationRaw>) -> NavigationFuture {
        self.navigate(to.into(), NavType::Push)
    }

    /// Replace the current page (`redirectTo`).
    pub fn replace(&self, to: impl Into<RouteLocationRaw>) -> NavigationFuture {
        self.navigate(to.into(), NavType::Replace)
    }

    /// Close every page and open the target (`reLaunch`).
    pub fn replace_all(&self, to: impl Into<RouteLocationRaw>) -> NavigationFuture {
        self.navigate(to.into(), NavType::ReplaceAll)
    }

    /// Switch to a tab page (`switchTab`).
    pub fn push_tab(&self, to: impl Into<RouteLocationRaw>) -> NavigationFuture {
        self.navigate(to.into(), NavType::PushTab)
    }

    /// Go back in the page stack.
    ///
    /// Accepts a delta, [`BackOptions`](crate::BackOptions), or
    /// `RouteBack::default()` for one page. Guards do not run; a host
    /// failure is only logged.
    pub fn back(&self, back: impl Into<RouteBack>) {
        let options = back.into().into_options();
        debug_log!("Navigating back {} page(s)", options.delta);
        self.inner.host.navigate_back(
            options,
            Box::new(|result| {
                if let Err(err) = result {
                    warn_log!("navigateBack failed: {}", err);
                }
            }),
        );
    }

    fn navigate(&self, to: RouteLocationRaw, nav_type: NavType) -> NavigationFuture {
        let router = self.clone();
        async move { router.run_navigation(to, nav_type).await }.boxed()
    }

    async fn run_navigation(
        &self,
        to: RouteLocationRaw,
        nav_type: NavType,
    ) -> NavigationResult<RouteLocation> {
        let target = Arc::new(self.inner.resolver.resolve(&to)?);
        let from = self.inner.current.get();
        info_log!(
            "Navigation {}: '{}' → '{}'",
            nav_type,
            from.full_path,
            target.full_path
        );

        let guards = self.inner.before_guards.snapshot();
        match run_guard_queue(&guards, &target, &from).await {
            Ok(()) => {}
            Err(NavigationError::NavigationRedirect { to: redirect }) => {
                debug_log!("Guard redirected '{}' to {}", target.full_path, redirect);
                return self.run_redirect(*redirect, nav_type, target).await;
            }
            Err(err) => {
                debug_log!("Navigation to '{}' stopped: {}", target.full_path, err);
                return Err(err);
            }
        }

        self.dispatch(&to, into_owned_location(target), nav_type).await
    }

    /// Navigate to a guard's redirect target without running guards again.
    async fn run_redirect(
        &self,
        to: RouteLocationRaw,
        nav_type: NavType,
        redirected_from: Arc<RouteLocation>,
    ) -> NavigationResult<RouteLocation> {
        let mut target = self.inner.resolver.resolve(&to)?;
        target.redirected_from = Some(redirected_from);
        self.dispatch(&to, target, nav_type).await
    }

    /// Issue the host call for `target`.
    ///
    /// The target's own `nav_type` wins over the method that was called.
    async fn dispatch(
        &self,
        to: &RouteLocationRaw,
        target: RouteLocation,
        nav_type: NavType,
    ) -> NavigationResult<RouteLocation> {
        let nav_type = to.nav_type().unwrap_or(nav_type);
        let call = HostCall::new(nav_type, target.full_path.clone(), to.animation());
        match call_host(self.inner.host.as_ref(), call).await {
            Ok(()) => {
                debug_log!("Host accepted {} to '{}'", nav_type, target.full_path);
                Ok(target)
            }
            Err(err) => {
                warn_log!("{} to '{}' failed: {}", nav_type, target.full_path, err);
                Err(err)
            }
        }
    }

    // ========================================================================
    // Guards
    // ========================================================================

    /// Register a before-guard. Guards run in registration order.
    pub fn before_each(&self, guard: impl Into<NavigationGuard>) -> GuardRegistration {
        let guard = guard.into();
        debug_log!("Registered before-guard '{}'", guard.name());
        self.inner.before_guards.push(guard)
    }

    /// Register an after-hook, called with `(to, from)` after every route
    /// change.
    pub fn after_each<F>(&self, hook: F) -> GuardRegistration
    where
        F: Fn(&RouteLocation, &RouteLocation) + Send + Sync + 'static,
    {
        self.inner.after_hooks.push(Arc::new(hook))
    }

    // ========================================================================
    // Page lifecycle
    // ========================================================================

    /// Page `onLoad` hook. Returns `true` if the current route changed.
    pub fn on_page_load(&self, mp_type: MpType, query: Option<LocationQuery>) -> bool {
        self.sync(mp_type, query)
    }

    /// Page `onShow` hook. Returns `true` if the current route changed.
    pub fn on_page_show(&self, mp_type: MpType) -> bool {
        self.sync(mp_type, None)
    }

    fn sync(&self, mp_type: MpType, query: Option<LocationQuery>) -> bool {
        sync_route_from_page(
            mp_type,
            self.inner.host.as_ref(),
            self.inner.resolver.table(),
            &self.inner.current,
            &self.inner.after_hooks,
            query,
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The reactive current-route cell.
    pub fn current_route(&self) -> RouteCell {
        self.inner.current.clone()
    }

    /// The route table.
    pub fn routes(&self) -> &[RouteRecord] {
        self.inner.resolver.table().records()
    }

    /// Path lookup cache counters.
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.resolver.cache_stats()
    }

    /// Put this router and its current route into `cx`.
    pub fn install(&self, cx: &mut AppContext) {
        info_log!("Router installed into app context");
        cx.router = Some(self.clone());
        cx.route = Some(self.inner.current.clone());
    }
}

fn into_owned_location(location: Arc<RouteLocation>) -> RouteLocation {
    Arc::try_unwrap(location).unwrap_or_else(|shared| (*shared).clone())
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.inner.resolver.table().len())
            .field("current", &self.inner.current.full_path())
            .field("before_guards", &self.inner.before_guards.len())
            .field("after_hooks", &self.inner.after_hooks.len())
            .finish()
    }
}

// ============================================================================
// AppContext
// ============================================================================

/// Explicit injection context carrying the router and the current route.
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    router: Option<Router>,
    route: Option<RouteCell>,
}

impl AppContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a router has been installed.
    pub fn has_router(&self) -> bool {
        self.router.is_some()
    }
}

/// Get the router installed in `cx`.
pub fn use_router(cx: &AppContext) -> NavigationResult<Router> {
    cx.router.clone().ok_or(NavigationError::ContextMissing {
        accessor: "use_router",
    })
}

/// Get a live view of the current route installed in `cx`.
pub fn use_route(cx: &AppContext) -> NavigationResult<RouteView> {
    cx.route
        .clone()
        .map(RouteView::new)
        .ok_or(NavigationError::ContextMissing {
            accessor: "use_route",
        })
}
