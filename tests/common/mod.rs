//! Test utilities for router tests
//!
//! Provides a recording mock host, a shared route table fixture and small
//! helpers used by the integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use std::sync::Arc;
use uni_mini_router::*;

/// One call received by [`MockHost`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    /// URL for forward navigations, `"delta=N"` for back.
    pub target: String,
    pub animation: Animation,
}

#[derive(Default)]
struct MockState {
    calls: Vec<RecordedCall>,
    stack: Vec<PageInfo>,
    fail_next: Option<HostError>,
    drop_callbacks: bool,
}

/// Host double that records calls and keeps a page stack.
///
/// Clones share state, so a test can keep one handle after giving another
/// to the router.
#[derive(Clone, Default)]
pub struct MockHost {
    state: Arc<Mutex<MockState>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// `(method, target)` pairs of every call received so far.
    pub fn call_log(&self) -> Vec<(&'static str, String)> {
        self.calls()
            .into_iter()
            .map(|c| (c.method, c.target))
            .collect()
    }

    /// Fail the next host call with `error`.
    pub fn fail_next(&self, error: HostError) {
        self.state.lock().fail_next = Some(error);
    }

    /// Drop callbacks without calling them.
    pub fn drop_callbacks(&self) {
        self.state.lock().drop_callbacks = true;
    }

    /// Current page stack, bottom first.
    pub fn stack(&self) -> Vec<PageInfo> {
        self.state.lock().stack.clone()
    }

    /// Put a page on the stack directly, as if the host had opened it.
    pub fn open_page(&self, url: &str) {
        self.state.lock().stack.push(page_for(url));
    }

    fn record(
        &self,
        method: &'static str,
        target: String,
        animation: Animation,
        apply: impl FnOnce(&mut Vec<PageInfo>),
        done: HostCallback,
    ) {
        let mut state = self.state.lock();
        state.calls.push(RecordedCall {
            method,
            target,
            animation,
        });
        if state.drop_callbacks {
            drop(state);
            drop(done);
            return;
        }
        let result = match state.fail_next.take() {
            Some(err) => Err(err),
            None => {
                apply(&mut state.stack);
                Ok(())
            }
        };
        drop(state);
        done(result);
    }
}

impl HostNavigator for MockHost {
    fn navigate_to(&self, nav: HostNavigation, done: HostCallback) {
        let page = page_for(&nav.url);
        self.record("navigateTo", nav.url, nav.animation, |s| s.push(page), done);
    }

    fn redirect_to(&self, nav: HostNavigation, done: HostCallback) {
        let page = page_for(&nav.url);
        self.record(
            "redirectTo",
            nav.url,
            nav.animation,
            |s| {
                s.pop();
                s.push(page);
            },
            done,
        );
    }

    fn switch_tab(&self, nav: HostNavigation, done: HostCallback) {
        let page = page_for(&nav.url);
        self.record(
            "switchTab",
            nav.url,
            nav.animation,
            |s| {
                s.clear();
                s.push(page);
            },
            done,
        );
    }

    fn relaunch(&self, nav: HostNavigation, done: HostCallback) {
        let page = page_for(&nav.url);
        self.record(
            "reLaunch",
            nav.url,
            nav.animation,
            |s| {
                s.clear();
                s.push(page);
            },
            done,
        );
    }

    fn navigate_back(&self, options: BackOptions, done: HostCallback) {
        let delta = options.delta as usize;
        self.record(
            "navigateBack",
            format!("delta={}", options.delta),
            options.animation,
            |s| {
                let keep = s.len().saturating_sub(delta).max(1);
                s.truncate(keep);
            },
            done,
        );
    }

    fn current_page(&self) -> Option<PageInfo> {
        self.state.lock().stack.last().cloned()
    }
}

/// Page info the way a host reports it: route without leading slash.
pub fn page_for(url: &str) -> PageInfo {
    let route = url.split('?').next().unwrap_or(url).trim_start_matches('/');
    PageInfo::new(route).with_full_path(url)
}

/// Route table shared by the integration tests.
pub fn test_routes() -> RouterOptions {
    RouterOptions::new([
        RouteRecord::new("/pages/home/index")
            .name("home")
            .alias("/")
            .meta("title", "Home"),
        RouteRecord::new("/pages/login/index").name("login"),
        RouteRecord::new("/pages/user/index")
            .name("user")
            .meta("auth", true)
            .style("navigationBarTitleText", "Profile"),
        RouteRecord::new("/pages/detail/index")
            .name("detail")
            .attr("shareable", true),
        RouteRecord::new("/pages/tab/cart").name("cart").attr("tabBar", true),
    ])
}

/// Router over [`test_routes`] plus a handle to its mock host.
pub fn test_router() -> (Router, MockHost) {
    init_logging();
    let host = MockHost::new();
    (create_router(test_routes(), host.clone()), host)
}

/// Navigate through `router`, then let the page report `onLoad` the way a
/// real host would.
pub async fn push_and_load(router: &Router, to: impl Into<RouteLocationRaw>) -> RouteLocation {
    let location = router.push(to).await.expect("navigation should succeed");
    router.on_page_load(MpType::Page, None);
    location
}

/// Capture every after-hook call as `"from -> to"`.
pub fn record_after_hooks(router: &Router) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    router.after_each(move |to, from| {
        sink.lock()
            .push(format!("{} -> {}", from.full_path, to.full_path));
    });
    seen
}

/// Route log output to the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
