//! # uni-mini-router
//!
//! Client-side routing for mini-program hosts (uni-app style page stacks).
//!
//! The router resolves navigation targets against a static route table, runs
//! navigation guards, and hands the actual page transition to the host
//! through the [`HostNavigator`] trait. The host stays in charge of the page
//! stack: the router's current route is only updated when a page reports its
//! `onLoad` / `onShow` lifecycle event.
//!
//! ## Features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `log` | yes | Diagnostics through the `log` crate |
//! | `tracing` | no | Diagnostics through the `tracing` crate |
//! | `cache` | yes | LRU cache for path lookups |
//!
//! ## Quick start
//!
//! ```no_run
//! use uni_mini_router::*;
//!
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
//! # async fn run() -> NavigationResult<()> {
//! let router = create_router(
//!     RouterOptions::from_json(r#"{
//!         "routes": [
//!             { "path": "/pages/home/index", "name": "home", "aliasPath": "/" },
//!             { "path": "/pages/user/index", "name": "user", "meta": { "auth": true } },
//!             { "path": "/pages/login/index", "name": "login" }
//!         ]
//!     }"#)?,
//!     host(),
//! );
//!
//! router.before_each(AuthGuard::new(|| false, "/pages/login/index"));
//! router.after_each(|to, from| println!("{} -> {}", from.full_path, to.full_path));
//!
//! // Redirected to the login page by the guard.
//! let shown = router.push(RouteDescriptor::named("user").param("id", 1)).await?;
//! assert_eq!(shown.path, "/pages/login/index");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`route`]: route records and [`RouterOptions`]
//! - [`location`]: navigation targets and resolved locations
//! - [`guards`]: before-guards, after-hooks and [`AuthGuard`]
//! - [`host`]: the host navigation trait and its argument types
//! - [`url`]: query string helpers
//! - [`cache`]: path lookup cache (feature `cache`)

#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
pub mod logging;

#[cfg(feature = "cache")]
#[cfg_attr(docsrs, doc(cfg(feature = "cache")))]
pub mod cache;
mod context;
pub mod error;
pub mod guards;
pub mod host;
pub mod lifecycle;
pub mod location;
pub mod params;
mod resolve;
pub mod route;
pub mod state;
pub mod transition;
pub mod url;

pub use context::{create_router, use_route, use_router, AppContext, NavigationFuture, Router};
pub use error::{NavigationError, NavigationResult};
pub use guards::{
    AfterHook, AuthCheckFn, AuthGuard, GuardRegistration, NavigationGuard, Next, RouteGuard,
};
pub use host::{
    BackOptions, HostCallback, HostError, HostNavigation, HostNavigator, MpType, NavType, PageInfo,
    RouteBack,
};
pub use lifecycle::NavigationAction;
pub use location::{RouteDescriptor, RouteLocation, RouteLocationRaw};
pub use params::{LocationQuery, ParamValue, QueryValue, RouteParams};
pub use resolve::fill_params;
pub use route::{RouteAttributes, RouteMeta, RouteRecord, RouteStyle, RouteTable, RouterOptions};
pub use state::{RouteCell, RouteView, Subscription};
pub use transition::{Animation, AnimationType};
pub use url::{get_url_params, is_empty_query, normalize_url, stringify_query};

/// The location the router starts at before any page has loaded.
pub fn start_location() -> RouteLocation {
    RouteLocation::start()
}
