//! Navigation guards.
//!
//! Before-guards run **before** the host is asked to change pages. They can
//! let the navigation through, cancel it, or redirect it elsewhere.
//! After-hooks run once the host has shown the new page and the current route
//! has been synced.
//!
//! # Guard flavors
//!
//! The flavor is chosen when the guard is built:
//!
//! | Constructor | Signals through | Async |
//! |-------------|-----------------|-------|
//! | [`NavigationGuard::from_fn`] | return value | no |
//! | [`NavigationGuard::from_async`] | return value | yes |
//! | [`NavigationGuard::with_next`] | [`Next`] | no |
//! | [`NavigationGuard::with_next_async`] | [`Next`] | yes |
//!
//! A `Next`-style guard must signal before it settles. Only the first signal
//! counts, and the chain moves on as soon as it is given. A guard that
//! settles without signalling fails the navigation with
//! [`InvalidGuard`](crate::NavigationError::InvalidGuard).
//!
//! Types implementing [`RouteGuard`] convert into return-value guards, which
//! is how [`AuthGuard`] plugs in.
//!
//! # Execution order
//!
//! Guards run sequentially in registration order. The first
//! non-[`Continue`](crate::NavigationAction::Continue) result short-circuits
//! the chain.
//!
//! # Example
//!
//! ```
//! use uni_mini_router::{NavigationAction, NavigationGuard};
//!
//! let block_admin = NavigationGuard::from_fn(|to, _from| {
//!     if to.path.starts_with("/pages/admin") {
//!         NavigationAction::redirect("/pages/login")
//!     } else {
//!         NavigationAction::Continue
//!     }
//! })
//! .named("block_admin");
//!
//! let log_and_continue = NavigationGuard::with_next(|to, from, next| {
//!     println!("{} -> {}", from.full_path, to.full_path);
//!     next.proceed();
//! });
//! # let _ = (block_admin, log_and_continue);
//! ```

use crate::error::{NavigationError, NavigationResult};
use crate::lifecycle::NavigationAction;
use crate::location::{RouteLocation, RouteLocationRaw};
use crate::{trace_log, warn_log};
use futures::channel::oneshot;
use futures::future::{self, BoxFuture, Either, FutureExt};
use parking_lot::Mutex;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type ReturnValueFn =
    dyn Fn(Arc<RouteLocation>, Arc<RouteLocation>) -> BoxFuture<'static, NavigationAction>
        + Send
        + Sync;

type ContinuationFn =
    dyn Fn(Arc<RouteLocation>, Arc<RouteLocation>, Next) -> BoxFuture<'static, ()> + Send + Sync;

/// Hook run after the current route changed, with `(to, from)`.
pub type AfterHook = Arc<dyn Fn(&RouteLocation, &RouteLocation) + Send + Sync>;

#[derive(Clone)]
enum GuardKind {
    ReturnValue(Arc<ReturnValueFn>),
    Continuation(Arc<ContinuationFn>),
}

// ============================================================================
// NavigationGuard
// ============================================================================

/// A before-guard registered with [`Router::before_each`](crate::Router::before_each).
#[derive(Clone)]
pub struct NavigationGuard {
    name: Option<String>,
    kind: GuardKind,
}

impl NavigationGuard {
    /// Guard that answers with its return value.
    ///
    /// The return value can be anything convertible into a
    /// [`NavigationAction`]: `()`, a `bool`, a path, or an action.
    pub fn from_fn<F, A>(f: F) -> Self
    where
        F: Fn(&RouteLocation, &RouteLocation) -> A + Send + Sync + 'static,
        A: Into<NavigationAction>,
    {
        Self::new_kind(GuardKind::ReturnValue(Arc::new(
            move |to: Arc<RouteLocation>, from: Arc<RouteLocation>| {
                let action: NavigationAction = f(&to, &from).into();
                future::ready(action).boxed()
            },
        )))
    }

    /// Guard that answers with the output of a future.
    ///
    /// ```
    /// use uni_mini_router::NavigationGuard;
    ///
    /// let guard = NavigationGuard::from_async(|to, _from| async move {
    ///     // e.g. ask a session service
    ///     !to.meta_flag("auth")
    /// });
    /// # let _ = guard;
    /// ```
    pub fn from_async<F, Fut, A>(f: F) -> Self
    where
        F: Fn(Arc<RouteLocation>, Arc<RouteLocation>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = A> + Send + 'static,
        A: Into<NavigationAction>,
    {
        Self::new_kind(GuardKind::ReturnValue(Arc::new(
            move |to: Arc<RouteLocation>, from: Arc<RouteLocation>| {
                f(to, from)
                    .map(|action| -> NavigationAction { action.into() })
                    .boxed()
            },
        )))
    }

    /// Guard that signals through a [`Next`] handle before returning.
    pub fn with_next<F>(f: F) -> Self
    where
        F: Fn(&RouteLocation, &RouteLocation, Next) + Send + Sync + 'static,
    {
        Self::new_kind(GuardKind::Continuation(Arc::new(
            move |to: Arc<RouteLocation>, from: Arc<RouteLocation>, next: Next| {
                f(&to, &from, next);
                future::ready(()).boxed()
            },
        )))
    }

    /// Guard that signals through a [`Next`] handle before its future settles.
    pub fn with_next_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Arc<RouteLocation>, Arc<RouteLocation>, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new_kind(GuardKind::Continuation(Arc::new(
            move |to: Arc<RouteLocation>, from: Arc<RouteLocation>, next: Next| {
                f(to, from, next).boxed()
            },
        )))
    }

    fn new_kind(kind: GuardKind) -> Self {
        Self { name: None, kind }
    }

    /// Give the guard a name for diagnostics.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name used in diagnostics.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous guard")
    }

    /// `true` for `Next`-style guards.
    pub fn uses_next(&self) -> bool {
        matches!(self.kind, GuardKind::Continuation(_))
    }

    /// Run the guard and return its decision.
    pub(crate) async fn evaluate(
        &self,
        to: Arc<RouteLocation>,
        from: Arc<RouteLocation>,
    ) -> NavigationResult<NavigationAction> {
        match &self.kind {
            GuardKind::ReturnValue(f) => Ok(f(to, from).await),
            GuardKind::Continuation(f) => {
                let (signalled, on_signal) = oneshot::channel();
                let next = Next::new(signalled);
                let body = f(to, from, next.clone());
                // The chain moves on at the first signal; the rest of the
                // body is dropped with the losing future.
                if let Either::Left(_) = future::select(on_signal, body).await {
                    trace_log!("Guard '{}' signalled before settling", self.name());
                }
                next.take().ok_or_else(|| {
                    warn_log!(
                        "The \"next\" callback was never called inside of \"{}\". If you are \
                         returning a value instead of calling \"next\", build the guard with \
                         NavigationGuard::from_fn or NavigationGuard::from_async.",
                        self.name()
                    );
                    NavigationError::InvalidGuard {
                        guard: self.name().to_string(),
                    }
                })
            }
        }
    }
}

impl fmt::Debug for NavigationGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationGuard")
            .field("name", &self.name())
            .field("uses_next", &self.uses_next())
            .finish()
    }
}

/// Run `guards` in order against a navigation from `from` to `to`.
///
/// `Cancel` becomes [`NavigationError::NavigationCancelled`]; `Redirect`
/// becomes [`NavigationError::NavigationRedirect`] for the caller to act on.
pub(crate) async fn run_guard_queue(
    guards: &[NavigationGuard],
    to: &Arc<RouteLocation>,
    from: &Arc<RouteLocation>,
) -> NavigationResult<()> {
    for guard in guards {
        let action = guard.evaluate(Arc::clone(to), Arc::clone(from)).await?;
        trace_log!("Guard '{}' → {:?}", guard.name(), action);
        match action {
            NavigationAction::Continue => {}
            NavigationAction::Cancel => return Err(NavigationError::NavigationCancelled),
            NavigationAction::Redirect(target) => {
                return Err(NavigationError::NavigationRedirect {
                    to: Box::new(target),
                });
            }
        }
    }
    Ok(())
}

// ============================================================================
// Next
// ============================================================================

/// Continuation handle passed to `Next`-style guards.
///
/// Clones share the same slot; the first signal on any clone wins and later
/// ones are ignored. The navigation moves on as soon as a signal is given,
/// without waiting for the rest of the guard body.
#[derive(Clone)]
pub struct Next {
    signal: Arc<Mutex<Signal>>,
}

struct Signal {
    action: Option<NavigationAction>,
    notify: Option<oneshot::Sender<()>>,
}

impl Next {
    fn new(notify: oneshot::Sender<()>) -> Self {
        Self {
            signal: Arc::new(Mutex::new(Signal {
                action: None,
                notify: Some(notify),
            })),
        }
    }

    /// Signal with any value convertible into a [`NavigationAction`].
    pub fn call(&self, action: impl Into<NavigationAction>) {
        let mut signal = self.signal.lock();
        if signal.action.is_some() {
            trace_log!("Ignoring repeated call to next");
            return;
        }
        signal.action = Some(action.into());
        if let Some(notify) = signal.notify.take() {
            let _ = notify.send(());
        }
    }

    /// Let the navigation continue.
    pub fn proceed(&self) {
        self.call(NavigationAction::Continue);
    }

    /// Cancel the navigation.
    pub fn cancel(&self) {
        self.call(NavigationAction::Cancel);
    }

    /// Redirect to another target.
    pub fn redirect(&self, to: impl Into<RouteLocationRaw>) {
        self.call(NavigationAction::Redirect(to.into()));
    }

    /// `true` once any signal was given.
    pub fn is_called(&self) -> bool {
        self.signal.lock().action.is_some()
    }

    fn take(&self) -> Option<NavigationAction> {
        self.signal.lock().action.take()
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("signal", &self.signal.lock().action)
            .finish()
    }
}

// ============================================================================
// RouteGuard trait
// ============================================================================

/// Trait for reusable, synchronous before-guards.
///
/// Any implementor converts into a [`NavigationGuard`] and can be passed
/// straight to [`Router::before_each`](crate::Router::before_each).
///
/// # Example
///
/// ```
/// use uni_mini_router::{NavigationAction, RouteGuard, RouteLocation};
///
/// struct Maintenance;
///
/// impl RouteGuard for Maintenance {
///     fn check(&self, to: &RouteLocation, _from: &RouteLocation) -> NavigationAction {
///         if to.path == "/pages/maintenance" {
///             NavigationAction::Continue
///         } else {
///             NavigationAction::redirect("/pages/maintenance")
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         "Maintenance"
///     }
/// }
/// ```
pub trait RouteGuard: Send + Sync + 'static {
    /// Decide what happens to a navigation from `from` to `to`.
    fn check(&self, to: &RouteLocation, from: &RouteLocation) -> NavigationAction;

    /// Guard name for diagnostics.
    fn name(&self) -> &'static str {
        "RouteGuard"
    }
}

impl<G: RouteGuard> From<G> for NavigationGuard {
    fn from(guard: G) -> Self {
        let name = guard.name();
        NavigationGuard::from_fn(move |to, from| guard.check(to, from)).named(name)
    }
}

// ============================================================================
// AuthGuard
// ============================================================================

/// Function type for authentication checks.
pub type AuthCheckFn = Box<dyn Fn() -> bool + Send + Sync>;

/// Redirects to a login page when the target route requires authentication.
///
/// A route requires authentication when its meta has the flag key (default
/// `"auth"`) set to `true`.
///
/// ```
/// use uni_mini_router::AuthGuard;
///
/// let guard = AuthGuard::new(|| false, "/pages/login").meta_key("requiresLogin");
/// # let _ = guard;
/// ```
pub struct AuthGuard {
    check_fn: AuthCheckFn,
    login: RouteLocationRaw,
    meta_key: String,
}

impl AuthGuard {
    /// Create an auth guard with a check function and a login target.
    pub fn new<F>(check_fn: F, login: impl Into<RouteLocationRaw>) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            check_fn: Box::new(check_fn),
            login: login.into(),
            meta_key: "auth".to_string(),
        }
    }

    /// Use a different meta flag to mark protected routes.
    pub fn meta_key(mut self, key: impl Into<String>) -> Self {
        self.meta_key = key.into();
        self
    }
}

impl RouteGuard for AuthGuard {
    fn check(&self, to: &RouteLocation, _from: &RouteLocation) -> NavigationAction {
        if !to.meta_flag(&self.meta_key) || (self.check_fn)() {
            NavigationAction::Continue
        } else {
            NavigationAction::Redirect(self.login.clone())
        }
    }

    fn name(&self) -> &'static str {
        "AuthGuard"
    }
}

// ============================================================================
// Registration
// ============================================================================

struct ListInner<T> {
    entries: Mutex<Vec<(u64, T)>>,
    next_id: AtomicU64,
}

/// Ordered guard list with identity-based removal.
pub(crate) struct GuardList<T> {
    inner: Arc<ListInner<T>>,
}

impl<T: Clone + Send + 'static> GuardList<T> {
    pub(crate) fn new() -> Self {
        Self {
            inner: Arc::new(ListInner {
                entries: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(0),
            }),
        }
    }

    /// Append `item` and return the handle that removes it again.
    pub(crate) fn push(&self, item: T) -> GuardRegistration {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.entries.lock().push((id, item));

        let list: Weak<ListInner<T>> = Arc::downgrade(&self.inner);
        GuardRegistration {
            remover: Mutex::new(Some(Box::new(move || {
                if let Some(list) = list.upgrade() {
                    list.entries.lock().retain(|(entry_id, _)| *entry_id != id);
                }
            }))),
        }
    }

    /// Clone of the current entries in registration order.
    pub(crate) fn snapshot(&self) -> Vec<T> {
        self.inner
            .entries
            .lock()
            .iter()
            .map(|(_, item)| item.clone())
            .collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }
}

/// Handle returned by `before_each` / `after_each`.
///
/// [`remove`](Self::remove) unregisters exactly the guard it was returned
/// for. Dropping the handle leaves the guard registered.
pub struct GuardRegistration {
    remover: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl GuardRegistration {
    /// Unregister the guard. Repeated calls are no-ops.
    pub fn remove(&self) {
        let remover = self.remover.lock().take();
        if let Some(remove) = remover {
            remove();
        }
    }

    /// `true` until [`remove`](Self::remove) has been called.
    pub fn is_active(&self) -> bool {
        self.remover.lock().is_some()
    }
}

impl fmt::Debug for GuardRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardRegistration")
            .field("active", &self.is_active())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
