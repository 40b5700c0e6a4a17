//! The seam between the router and the mini-program host.
//!
//! The router never moves pages itself. Every transition is delegated to a
//! [`HostNavigator`] supplied by the embedding application, which forwards it
//! to the host's native page-stack API and reports the outcome through a
//! one-shot callback.
//!
//! # Example
//!
//! ```
//! use uni_mini_router::{BackOptions, HostCallback, HostNavigation, HostNavigator, PageInfo};
//!
//! struct LoggingHost;
//!
//! impl HostNavigator for LoggingHost {
//!     fn navigate_to(&self, nav: HostNavigation, done: HostCallback) {
//!         println!("navigateTo {}", nav.url);
//!         done(Ok(()));
//!     }
//!     fn redirect_to(&self, nav: HostNavigation, done: HostCallback) {
//!         println!("redirectTo {}", nav.url);
//!         done(Ok(()));
//!     }
//!     fn switch_tab(&self, nav: HostNavigation, done: HostCallback) {
//!         println!("switchTab {}", nav.url);
//!         done(Ok(()));
//!     }
//!     fn relaunch(&self, nav: HostNavigation, done: HostCallback) {
//!         println!("reLaunch {}", nav.url);
//!         done(Ok(()));
//!     }
//!     fn navigate_back(&self, options: BackOptions, done: HostCallback) {
//!         println!("navigateBack {}", options.delta);
//!         done(Ok(()));
//!     }
//!     fn current_page(&self) -> Option<PageInfo> {
//!         None
//!     }
//! }
//! ```

use crate::error::{NavigationError, NavigationResult};
use crate::transition::{Animation, AnimationType};
use crate::{debug_log, trace_log};
use futures::channel::oneshot;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Completion callback handed to every host primitive.
///
/// Must be invoked at most once. Dropping it without calling it fails the
/// pending navigation.
pub type HostCallback = Box<dyn FnOnce(Result<(), HostError>) + Send + 'static>;

/// Host navigation primitives.
pub trait HostNavigator: Send + Sync + 'static {
    /// Push a page onto the stack (`navigateTo`).
    fn navigate_to(&self, nav: HostNavigation, done: HostCallback);

    /// Replace the top page (`redirectTo`).
    fn redirect_to(&self, nav: HostNavigation, done: HostCallback);

    /// Switch to a tab page (`switchTab`).
    fn switch_tab(&self, nav: HostNavigation, done: HostCallback);

    /// Clear the stack and open a page (`reLaunch`).
    fn relaunch(&self, nav: HostNavigation, done: HostCallback);

    /// Pop pages off the stack (`navigateBack`).
    fn navigate_back(&self, options: BackOptions, done: HostCallback);

    /// The page currently on top of the stack.
    fn current_page(&self) -> Option<PageInfo>;
}

/// Arguments of a forward host navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNavigation {
    /// Target URL including the query string.
    pub url: String,
    /// Window animation.
    #[serde(flatten)]
    pub animation: Animation,
}

impl HostNavigation {
    /// Navigation to `url` with the host's default animation.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            animation: Animation::default(),
        }
    }

    /// Set the animation.
    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }
}

/// Failure reported by a host primitive.
///
/// Hosts report failures with either a `message` or an `errMsg`; the router
/// prefers `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostError {
    /// Error message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Raw `errMsg` reported by the host API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub err_msg: Option<String>,
}

impl HostError {
    /// Error carrying a `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            err_msg: None,
        }
    }

    /// Error carrying only the host's `errMsg`.
    pub fn from_err_msg(err_msg: impl Into<String>) -> Self {
        Self {
            message: None,
            err_msg: Some(err_msg.into()),
        }
    }

    /// Best available description, `"Unknown error"` when the host gave none.
    pub fn description(&self) -> &str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.err_msg.as_deref().filter(|m| !m.is_empty()))
            .unwrap_or("Unknown error")
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl std::error::Error for HostError {}

impl From<HostError> for NavigationError {
    fn from(err: HostError) -> Self {
        NavigationError::NavigationFailed {
            message: err.description().to_string(),
        }
    }
}

/// The top of the host page stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Page route as the host reports it, usually without a leading `/`.
    pub route: String,
    /// Full path including the query string, when the host knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_path: Option<String>,
}

impl PageInfo {
    /// Page at `route` with no known full path.
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            full_path: None,
        }
    }

    /// Set the full path.
    pub fn with_full_path(mut self, full_path: impl Into<String>) -> Self {
        self.full_path = Some(full_path.into());
        self
    }

    /// The route with a leading `/`.
    pub fn path(&self) -> String {
        ensure_leading_slash(&self.route)
    }

    /// The full path with a leading `/`, falling back to [`path`](Self::path).
    pub fn resolved_full_path(&self) -> String {
        match self.full_path.as_deref().filter(|p| !p.is_empty()) {
            Some(full_path) => ensure_leading_slash(full_path),
            None => self.path(),
        }
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// How a navigation moves through the page stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NavType {
    /// `navigateTo`
    Push,
    /// `redirectTo`
    Replace,
    /// `reLaunch`
    ReplaceAll,
    /// `switchTab`
    PushTab,
    /// `navigateBack`
    Back,
}

impl NavType {
    /// Name of the host primitive this maps to.
    pub fn host_method(self) -> &'static str {
        match self {
            Self::Push => "navigateTo",
            Self::Replace => "redirectTo",
            Self::ReplaceAll => "reLaunch",
            Self::PushTab => "switchTab",
            Self::Back => "navigateBack",
        }
    }
}

impl fmt::Display for NavType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host_method())
    }
}

/// Kind of component instance reporting a lifecycle event.
///
/// Only `Page` instances move the current route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MpType {
    /// The application instance.
    App,
    /// A page.
    Page,
    /// A component inside a page.
    Component,
}

/// Options for `navigateBack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackOptions {
    /// Number of pages to pop.
    #[serde(default = "default_delta")]
    pub delta: u32,
    /// Window animation.
    #[serde(flatten)]
    pub animation: Animation,
}

fn default_delta() -> u32 {
    1
}

impl BackOptions {
    /// Pop `delta` pages.
    pub fn new(delta: u32) -> Self {
        Self {
            delta,
            animation: Animation::default(),
        }
    }

    /// Set the animation.
    pub fn animation(mut self, animation_type: AnimationType, duration_ms: u32) -> Self {
        self.animation = Animation::new(animation_type, duration_ms);
        self
    }
}

impl Default for BackOptions {
    fn default() -> Self {
        Self::new(default_delta())
    }
}

/// Argument of [`Router::back`](crate::Router::back).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteBack {
    /// Pop this many pages.
    Delta(u32),
    /// Full back options.
    Options(BackOptions),
}

impl RouteBack {
    /// Expand into host back options.
    pub fn into_options(self) -> BackOptions {
        match self {
            Self::Delta(delta) => BackOptions::new(delta),
            Self::Options(options) => options,
        }
    }
}

impl Default for RouteBack {
    fn default() -> Self {
        Self::Delta(1)
    }
}

impl From<u32> for RouteBack {
    fn from(delta: u32) -> Self {
        Self::Delta(delta)
    }
}

impl From<BackOptions> for RouteBack {
    fn from(options: BackOptions) -> Self {
        Self::Options(options)
    }
}

impl From<Option<RouteBack>> for RouteBack {
    fn from(back: Option<RouteBack>) -> Self {
        back.unwrap_or_default()
    }
}

/// Host call for one navigation, ready to be issued.
///
/// One variant per host primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HostCall {
    NavigateTo(HostNavigation),
    RedirectTo(HostNavigation),
    SwitchTab(HostNavigation),
    Relaunch(HostNavigation),
    NavigateBack(BackOptions),
}

impl HostCall {
    /// Build the call for `nav_type`.
    ///
    /// `Back` ignores `url` and pops a single page with the given animation.
    pub(crate) fn new(nav_type: NavType, url: String, animation: Animation) -> Self {
        let nav = HostNavigation { url, animation };
        match nav_type {
            NavType::Push => Self::NavigateTo(nav),
            NavType::Replace => Self::RedirectTo(nav),
            NavType::PushTab => Self::SwitchTab(nav),
            NavType::ReplaceAll => Self::Relaunch(nav),
            NavType::Back => Self::NavigateBack(BackOptions {
                delta: default_delta(),
                animation: nav.animation,
            }),
        }
    }

    fn issue(self, host: &dyn HostNavigator, done: HostCallback) {
        match self {
            Self::NavigateTo(nav) => host.navigate_to(nav, done),
            Self::RedirectTo(nav) => host.redirect_to(nav, done),
            Self::SwitchTab(nav) => host.switch_tab(nav, done),
            Self::Relaunch(nav) => host.relaunch(nav, done),
            Self::NavigateBack(options) => host.navigate_back(options, done),
        }
    }
}

/// Issue `call` on `host` and wait for its callback.
///
/// A callback that is dropped without being called counts as a failure.
pub(crate) async fn call_host(host: &dyn HostNavigator, call: HostCall) -> NavigationResult<()> {
    let (tx, rx) = oneshot::channel::<Result<(), HostError>>();
    trace_log!("Issuing host call {:?}", call);
    call.issue(
        host,
        Box::new(move |result| {
            // The receiver is gone only if the navigation future was dropped.
            let _ = tx.send(result);
        }),
    );

    match rx.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            debug_log!("Host navigation failed: {}", err);
            Err(err.into())
        }
        Err(oneshot::Canceled) => {
            debug_log!("Host dropped the navigation callback");
            Err(HostError::default().into())
        }
    }
}
