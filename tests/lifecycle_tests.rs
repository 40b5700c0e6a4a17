//! Integration tests for page lifecycle synchronization
//!
//! The current route follows the host page stack: it only moves when a page
//! reports `onLoad` / `onShow`.

mod common;

use common::*;
use std::sync::Arc;
use uni_mini_router::*;

#[tokio::test]
async fn test_load_syncs_route_from_top_page() {
    let (router, _host) = test_router();

    push_and_load(&router, "/pages/user/index?id=9").await;

    let route = router.current_route().get();
    assert_eq!(route.path, "/pages/user/index");
    assert_eq!(route.full_path, "/pages/user/index?id=9");
    assert_eq!(route.name.as_deref(), Some("user"));
    assert_eq!(route.query.get_str("id"), Some("9"));
    assert_eq!(route.style["navigationBarTitleText"], "Profile");
}

#[tokio::test]
async fn test_after_hooks_run_once_per_change() {
    let (router, _host) = test_router();
    let seen = record_after_hooks(&router);

    push_and_load(&router, "/pages/detail/index").await;
    // The page reporting onShow right after onLoad does not change anything.
    assert!(!router.on_page_show(MpType::Page));

    assert_eq!(*seen.lock(), vec!["/ -> /pages/detail/index"]);
}

#[tokio::test]
async fn test_after_hooks_see_previous_route() {
    let (router, _host) = test_router();
    let seen = record_after_hooks(&router);

    push_and_load(&router, "/pages/login/index").await;
    push_and_load(&router, "/pages/detail/index?id=1").await;

    assert_eq!(
        *seen.lock(),
        vec![
            "/ -> /pages/login/index",
            "/pages/login/index -> /pages/detail/index?id=1",
        ]
    );
}

#[tokio::test]
async fn test_after_hooks_run_in_registration_order() {
    let (router, _host) = test_router();
    let order = Arc::new(parking_lot::Mutex::new(Vec::new()));
    for label in [1, 2, 3] {
        let order = Arc::clone(&order);
        router.after_each(move |_, _| order.lock().push(label));
    }

    push_and_load(&router, "/pages/detail/index").await;
    assert_eq!(*order.lock(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_removed_after_hook_is_not_called() {
    let (router, _host) = test_router();
    let seen = Arc::new(parking_lot::Mutex::new(0));
    let registration = {
        let seen = Arc::clone(&seen);
        router.after_each(move |_, _| *seen.lock() += 1)
    };

    push_and_load(&router, "/pages/detail/index").await;
    registration.remove();
    push_and_load(&router, "/pages/login/index").await;

    assert_eq!(*seen.lock(), 1);
}

#[tokio::test]
async fn test_show_after_back_restores_previous_route() {
    let (router, host) = test_router();
    let seen = record_after_hooks(&router);

    push_and_load(&router, "/pages/login/index").await;
    push_and_load(&router, "/pages/detail/index").await;
    router.back(1u32);
    assert_eq!(host.stack().len(), 1);

    assert!(router.on_page_show(MpType::Page));
    assert_eq!(router.current_route().full_path(), "/pages/login/index");
    assert_eq!(
        seen.lock().last().map(String::as_str),
        Some("/pages/detail/index -> /pages/login/index")
    );
}

#[tokio::test]
async fn test_explicit_load_query_wins() {
    let (router, _host) = test_router();

    router.push("/pages/detail/index?id=1").await.unwrap();
    let query = LocationQuery::from_iter([("id", "1"), ("source", "share")]);
    router.on_page_load(MpType::Page, Some(query));

    let route = router.current_route().get();
    assert_eq!(route.query.get_str("source"), Some("share"));
    assert_eq!(route.full_path, "/pages/detail/index?id=1");
}

#[test]
fn test_component_events_are_ignored() {
    let (router, host) = test_router();
    host.open_page("/pages/detail/index");

    assert!(!router.on_page_load(MpType::Component, None));
    assert!(!router.on_page_show(MpType::App));
    assert!(router.current_route().get().is_start());
}

#[test]
fn test_no_page_is_ignored() {
    let (router, _host) = test_router();
    assert!(!router.on_page_show(MpType::Page));
    assert!(router.current_route().get().is_start());
}

#[test]
fn test_page_without_route_is_ignored() {
    let (router, host) = test_router();
    let seen = record_after_hooks(&router);
    host.open_page("");

    assert!(!router.on_page_show(MpType::Page));
    assert!(router.current_route().get().is_start());
    assert!(seen.lock().is_empty());
}

#[test]
fn test_unknown_page_still_syncs() {
    let (router, host) = test_router();
    host.open_page("/pages/webview/index?url=x");

    assert!(router.on_page_load(MpType::Page, None));

    let route = router.current_route().get();
    assert_eq!(route.full_path, "/pages/webview/index?url=x");
    assert!(route.name.is_none());
    assert!(route.meta.is_empty());
}

#[tokio::test]
async fn test_subscribers_follow_route_changes() {
    let (router, _host) = test_router();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let subscription = {
        let seen = Arc::clone(&seen);
        router
            .current_route()
            .subscribe(move |route| seen.lock().push(route.path.clone()))
    };

    push_and_load(&router, "/pages/detail/index").await;
    subscription.unsubscribe();
    push_and_load(&router, "/pages/login/index").await;

    assert_eq!(*seen.lock(), vec!["/pages/detail/index"]);
}

#[test]
fn test_concurrent_syncs_run_hooks_once() {
    let (router, host) = test_router();
    let seen = record_after_hooks(&router);
    host.open_page("/pages/detail/index");

    let changed: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| router.on_page_show(MpType::Page)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum()
    });

    assert_eq!(changed, 1);
    assert_eq!(seen.lock().len(), 1);
}
