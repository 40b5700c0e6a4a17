//! Integration tests for before-guards and redirects

mod common;

use common::*;
use futures::FutureExt;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uni_mini_router::*;

#[tokio::test]
async fn test_guards_run_in_registration_order() {
    let (router, _host) = test_router();
    let order = Arc::new(Mutex::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let order = Arc::clone(&order);
        router.before_each(NavigationGuard::from_fn(move |_, _| {
            order.lock().push(label);
        }));
    }

    router.push("/pages/detail/index").await.unwrap();
    assert_eq!(*order.lock(), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_guard_sees_target_and_current() {
    let (router, _host) = test_router();
    push_and_load(&router, "/pages/login/index").await;

    let seen = Arc::new(Mutex::new(None));
    {
        let seen = Arc::clone(&seen);
        router.before_each(NavigationGuard::from_fn(move |to, from| {
            *seen.lock() = Some((to.full_path.clone(), from.full_path.clone()));
        }));
    }

    router.push("/pages/detail/index?id=3").await.unwrap();
    assert_eq!(
        seen.lock().clone(),
        Some((
            "/pages/detail/index?id=3".to_string(),
            "/pages/login/index".to_string()
        ))
    );
}

#[tokio::test]
async fn test_cancel_stops_before_host_call() {
    let (router, host) = test_router();
    let later = Arc::new(AtomicUsize::new(0));
    router.before_each(NavigationGuard::from_fn(|_, _| false));
    {
        let later = Arc::clone(&later);
        router.before_each(NavigationGuard::from_fn(move |_, _| {
            later.fetch_add(1, Ordering::SeqCst);
        }));
    }

    let err = router.push("/pages/detail/index").await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(later.load(Ordering::SeqCst), 0);
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_redirect_dispatches_once_without_rerunning_guards() {
    let (router, host) = test_router();
    let runs = Arc::new(AtomicUsize::new(0));
    {
        let runs = Arc::clone(&runs);
        router.before_each(NavigationGuard::from_fn(move |to, _| {
            runs.fetch_add(1, Ordering::SeqCst);
            if to.path == "/pages/detail/index" {
                NavigationAction::redirect("/pages/login/index")
            } else {
                NavigationAction::Continue
            }
        }));
    }

    let shown = router.push("/pages/detail/index?id=1").await.unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(shown.path, "/pages/login/index");
    assert_eq!(
        shown.redirected_from.as_ref().map(|from| from.full_path.as_str()),
        Some("/pages/detail/index?id=1")
    );
    assert_eq!(
        host.call_log(),
        vec![("navigateTo", "/pages/login/index".to_string())]
    );
}

#[tokio::test]
async fn test_redirect_keeps_method_of_original_call() {
    let (router, host) = test_router();
    router.before_each(NavigationGuard::from_fn(|to, _| {
        (to.path != "/pages/login/index").then(|| "/pages/login/index")
    }));

    router.replace_all("/pages/detail/index").await.unwrap();

    assert_eq!(host.call_log()[0].0, "reLaunch");
}

#[tokio::test]
async fn test_redirect_descriptor_can_change_nav_type() {
    let (router, host) = test_router();
    router.before_each(NavigationGuard::from_fn(|to, _| {
        if to.name.as_deref() == Some("detail") {
            NavigationAction::redirect(RouteDescriptor::named("cart").nav_type(NavType::PushTab))
        } else {
            NavigationAction::Continue
        }
    }));

    router.push("/pages/detail/index").await.unwrap();

    assert_eq!(host.call_log(), vec![("switchTab", "/pages/tab/cart".to_string())]);
}

#[tokio::test]
async fn test_redirect_to_unknown_route_fails() {
    let (router, host) = test_router();
    router.before_each(NavigationGuard::from_fn(|_, _| "/pages/gone"));

    let err = router.push("/pages/detail/index").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(host.calls().is_empty());
}

// ============================================================================
// Async and Next-style guards
// ============================================================================

#[tokio::test]
async fn test_async_guard() {
    let (router, host) = test_router();
    router.before_each(NavigationGuard::from_async(|to, _from| async move {
        tokio::task::yield_now().await;
        !to.meta_flag("auth")
    }));

    router.push("/pages/detail/index").await.unwrap();
    let err = router.push("/pages/user/index").await.unwrap_err();

    assert!(err.is_cancelled());
    assert_eq!(host.calls().len(), 1);
}

#[tokio::test]
async fn test_next_guard_proceeds() {
    let (router, host) = test_router();
    router.before_each(NavigationGuard::with_next(|_, _, next| next.proceed()));

    router.push("/pages/detail/index").await.unwrap();
    assert_eq!(host.calls().len(), 1);
}

#[tokio::test]
async fn test_next_guard_first_signal_wins() {
    let (router, host) = test_router();
    router.before_each(NavigationGuard::with_next(|_, _, next| {
        next.cancel();
        next.proceed();
    }));

    let err = router.push("/pages/detail/index").await.unwrap_err();
    assert!(err.is_cancelled());
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_async_next_guard_redirects() {
    let (router, host) = test_router();
    router.before_each(NavigationGuard::with_next_async(|to, _from, next| async move {
        tokio::task::yield_now().await;
        if to.name.as_deref() == Some("user") {
            next.redirect(RouteDescriptor::named("login"));
        } else {
            next.proceed();
        }
    }));

    let shown = router.push("/pages/user/index").await.unwrap();

    assert_eq!(shown.name.as_deref(), Some("login"));
    assert_eq!(host.call_log()[0].1, "/pages/login/index");
}

#[test]
fn test_navigation_continues_while_guard_body_is_still_pending() {
    let (router, host) = test_router();
    router.before_each(NavigationGuard::with_next_async(|_, _, next| async move {
        next.proceed();
        futures::future::pending::<()>().await;
    }));

    let outcome = router.push("/pages/detail/index").now_or_never();

    assert!(matches!(outcome, Some(Ok(_))));
    assert_eq!(
        host.call_log(),
        vec![("navigateTo", "/pages/detail/index".to_string())]
    );
}

#[tokio::test]
async fn test_next_guard_that_never_signals_is_invalid() {
    let (router, host) = test_router();
    router.before_each(NavigationGuard::with_next(|_, _, _next| {}).named("forgetful"));

    let err = router.push("/pages/detail/index").await.unwrap_err();

    assert!(matches!(err, NavigationError::InvalidGuard { ref guard } if guard == "forgetful"));
    assert!(host.calls().is_empty());
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_removed_guard_no_longer_runs() {
    let (router, host) = test_router();
    let blocker = router.before_each(NavigationGuard::from_fn(|_, _| false));
    let keeper = router.before_each(NavigationGuard::from_fn(|_, _| true));

    assert!(router.push("/pages/detail/index").await.is_err());

    blocker.remove();
    blocker.remove();
    assert!(!blocker.is_active());
    assert!(keeper.is_active());

    router.push("/pages/detail/index").await.unwrap();
    assert_eq!(host.calls().len(), 1);
}

#[tokio::test]
async fn test_removing_one_of_two_identical_guards() {
    let (router, _host) = test_router();
    let runs = Arc::new(AtomicUsize::new(0));
    let make = |runs: Arc<AtomicUsize>| {
        NavigationGuard::from_fn(move |_, _| {
            runs.fetch_add(1, Ordering::SeqCst);
        })
    };

    let first = router.before_each(make(Arc::clone(&runs)));
    let _second = router.before_each(make(Arc::clone(&runs)));
    first.remove();

    router.push("/pages/detail/index").await.unwrap();
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_guard_added_during_navigation_waits_for_next_one() {
    let (router, _host) = test_router();
    let late_runs = Arc::new(AtomicUsize::new(0));
    {
        let router_handle = router.clone();
        let late_runs = Arc::clone(&late_runs);
        let added = Arc::new(AtomicUsize::new(0));
        router.before_each(NavigationGuard::from_fn(move |_, _| {
            if added.fetch_add(1, Ordering::SeqCst) == 0 {
                let late_runs = Arc::clone(&late_runs);
                router_handle.before_each(NavigationGuard::from_fn(move |_, _| {
                    late_runs.fetch_add(1, Ordering::SeqCst);
                }));
            }
        }));
    }

    router.push("/pages/detail/index").await.unwrap();
    assert_eq!(late_runs.load(Ordering::SeqCst), 0);

    router.push("/pages/detail/index").await.unwrap();
    assert_eq!(late_runs.load(Ordering::SeqCst), 1);
}

// ============================================================================
// AuthGuard
// ============================================================================

#[tokio::test]
async fn test_auth_guard_redirects_protected_routes() {
    let (router, host) = test_router();
    router.before_each(AuthGuard::new(|| false, "/pages/login/index"));

    router.push("/pages/detail/index").await.unwrap();
    let shown = router.push("/pages/user/index").await.unwrap();

    assert_eq!(shown.path, "/pages/login/index");
    assert_eq!(
        host.call_log(),
        vec![
            ("navigateTo", "/pages/detail/index".to_string()),
            ("navigateTo", "/pages/login/index".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_auth_guard_lets_signed_in_users_through() {
    let (router, _host) = test_router();
    router.before_each(AuthGuard::new(|| true, "/pages/login/index"));

    let shown = router.push("/pages/user/index").await.unwrap();
    assert_eq!(shown.path, "/pages/user/index");
    assert!(shown.redirected_from.is_none());
}

#[tokio::test]
async fn test_auth_guard_custom_meta_key() {
    let (router, _host) = test_router();
    router.before_each(AuthGuard::new(|| false, "/pages/login/index").meta_key("title"));

    let shown = router.push("/pages/user/index").await.unwrap();
    assert_eq!(shown.path, "/pages/user/index");
}

struct DenyTabs;

impl RouteGuard for DenyTabs {
    fn check(&self, to: &RouteLocation, _from: &RouteLocation) -> NavigationAction {
        if to.extra.get("tabBar").and_then(|v| v.as_bool()) == Some(true) {
            NavigationAction::Cancel
        } else {
            NavigationAction::Continue
        }
    }
}

#[tokio::test]
async fn test_route_guard_trait_object() {
    let (router, _host) = test_router();
    router.before_each(DenyTabs);

    assert!(router.push_tab("/pages/tab/cart").await.unwrap_err().is_cancelled());
    router.push("/pages/detail/index").await.unwrap();
}
