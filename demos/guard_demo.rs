//! Route Guards Demo
//!
//! Drives the router against an in-memory page stack. An auth guard sends
//! signed-out users to the login page, a maintenance guard cancels one page,
//! and an after-hook prints every route change.
//!
//! Run with `RUST_LOG=uni_mini_router=debug` to see the router's own logs.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uni_mini_router::*;

// ============================================================================
// Console host
// ============================================================================

/// Host that keeps its page stack in memory and prints each call.
#[derive(Default)]
struct ConsoleHost {
    stack: Mutex<Vec<PageInfo>>,
}

impl ConsoleHost {
    fn open(&self, method: &str, url: &str, replace: usize, done: HostCallback) {
        println!("  host.{}({})", method, url);
        let route = url.split('?').next().unwrap_or(url).trim_start_matches('/');
        let mut stack = self.stack.lock();
        let keep = stack.len().saturating_sub(replace);
        stack.truncate(keep);
        stack.push(PageInfo::new(route).with_full_path(url));
        drop(stack);
        done(Ok(()));
    }
}

impl HostNavigator for ConsoleHost {
    fn navigate_to(&self, nav: HostNavigation, done: HostCallback) {
        self.open("navigateTo", &nav.url, 0, done);
    }

    fn redirect_to(&self, nav: HostNavigation, done: HostCallback) {
        self.open("redirectTo", &nav.url, 1, done);
    }

    fn switch_tab(&self, nav: HostNavigation, done: HostCallback) {
        self.open("switchTab", &nav.url, usize::MAX, done);
    }

    fn relaunch(&self, nav: HostNavigation, done: HostCallback) {
        self.open("reLaunch", &nav.url, usize::MAX, done);
    }

    fn navigate_back(&self, options: BackOptions, done: HostCallback) {
        println!("  host.navigateBack(delta={})", options.delta);
        let mut stack = self.stack.lock();
        if stack.len() <= 1 {
            drop(stack);
            done(Err(HostError::from_err_msg("navigateBack:fail cannot go back")));
            return;
        }
        let keep = stack.len().saturating_sub(options.delta as usize).max(1);
        stack.truncate(keep);
        drop(stack);
        done(Ok(()));
    }

    fn current_page(&self) -> Option<PageInfo> {
        self.stack.lock().last().cloned()
    }
}

// ============================================================================
// Guards
// ============================================================================

struct Maintenance;

impl RouteGuard for Maintenance {
    fn check(&self, to: &RouteLocation, _from: &RouteLocation) -> NavigationAction {
        if to.meta_flag("maintenance") {
            println!("  Maintenance: '{}' is closed", to.path);
            NavigationAction::Cancel
        } else {
            NavigationAction::Continue
        }
    }

    fn name(&self) -> &'static str {
        "Maintenance"
    }
}

// ============================================================================
// Main
// ============================================================================

const ROUTES: &str = r#"{
    "routes": [
        { "path": "/pages/home/index", "name": "home", "aliasPath": "/",
          "style": { "navigationBarTitleText": "Home" } },
        { "path": "/pages/login/index", "name": "login" },
        { "path": "/pages/profile/index", "name": "profile", "meta": { "auth": true } },
        { "path": "/pages/shop/index", "name": "shop", "meta": { "maintenance": true } },
        { "path": "/pages/tab/cart", "name": "cart" }
    ]
}"#;

#[tokio::main(flavor = "current_thread")]
async fn main() -> NavigationResult<()> {
    env_logger::init();

    let signed_in = Arc::new(AtomicBool::new(false));
    let router = create_router(RouterOptions::from_json(ROUTES)?, ConsoleHost::default());

    {
        let signed_in = Arc::clone(&signed_in);
        router.before_each(AuthGuard::new(
            move || signed_in.load(Ordering::SeqCst),
            RouteDescriptor::named("login"),
        ));
    }
    router.before_each(Maintenance);
    router.after_each(|to, from| println!("  route: {} -> {}", from, to));

    let mut cx = AppContext::new();
    router.install(&mut cx);
    let route = use_route(&cx)?;

    println!("Open home:");
    visit(&router, router.replace_all("/")).await;

    println!("Open profile while signed out:");
    visit(&router, router.push(RouteDescriptor::named("profile").param("id", 7))).await;

    println!("Sign in and try again:");
    signed_in.store(true, Ordering::SeqCst);
    visit(&router, router.push(RouteDescriptor::named("profile").param("id", 7))).await;

    println!("Open the shop:");
    visit(&router, router.push("/pages/shop/index")).await;

    println!("Switch to the cart tab:");
    visit(&router, router.push_tab("/pages/tab/cart")).await;

    println!("Go back from the only page:");
    router.back(RouteBack::default());

    println!("Current route: {} ({:?})", route.full_path(), route.name());
    Ok(())
}

/// Await a navigation and let the new page report `onLoad`.
async fn visit(router: &Router, navigation: NavigationFuture) {
    match navigation.await {
        Ok(shown) => {
            if let Some(from) = &shown.redirected_from {
                println!("  redirected from {}", from);
            }
            router.on_page_load(MpType::Page, None);
        }
        Err(err) => println!("  {}", err),
    }
}
