//! Router state: the reactive current-route cell

use crate::location::RouteLocation;
use crate::params::LocationQuery;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type Subscriber = Arc<dyn Fn(&Arc<RouteLocation>) + Send + Sync>;

struct CellInner {
    /// Current location, swapped wholesale
    current: ArcSwap<RouteLocation>,
    /// Serializes compare-and-swap updates
    write_lock: Mutex<()>,
    subscribers: Mutex<Vec<(u64, Subscriber)>>,
    next_subscriber: AtomicU64,
}

/// Shared, observable holder of the current [`RouteLocation`].
///
/// Reads are lock-free snapshots. Only the router writes; everyone else can
/// read and [`subscribe`](Self::subscribe) to changes.
#[derive(Clone)]
pub struct RouteCell {
    inner: Arc<CellInner>,
}

impl RouteCell {
    pub(crate) fn new(initial: RouteLocation) -> Self {
        Self {
            inner: Arc::new(CellInner {
                current: ArcSwap::from_pointee(initial),
                write_lock: Mutex::new(()),
                subscribers: Mutex::new(Vec::new()),
                next_subscriber: AtomicU64::new(0),
            }),
        }
    }

    /// Snapshot of the current location.
    pub fn get(&self) -> Arc<RouteLocation> {
        self.inner.current.load_full()
    }

    /// Full path of the current location.
    pub fn full_path(&self) -> String {
        self.inner.current.load().full_path.clone()
    }

    /// Call `f` with every new location after it is stored.
    ///
    /// Subscribers run on the thread that performed the update, after the
    /// swap, in subscription order.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&Arc<RouteLocation>) + Send + Sync + 'static,
    {
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.lock().push((id, Arc::new(f)));
        Subscription {
            id,
            cell: Arc::downgrade(&self.inner),
        }
    }

    /// Store the location built by `update` unless it returns `None`.
    ///
    /// `update` sees the current value under the writer lock, so two
    /// concurrent updates cannot both observe the same "from" location.
    /// Returns `(to, from)` when a swap happened.
    pub(crate) fn update<F>(&self, update: F) -> Option<(Arc<RouteLocation>, Arc<RouteLocation>)>
    where
        F: FnOnce(&RouteLocation) -> Option<RouteLocation>,
    {
        let swapped = {
            let _guard = self.inner.write_lock.lock();
            let from = self.inner.current.load_full();
            let to = Arc::new(update(&from)?);
            self.inner.current.store(Arc::clone(&to));
            (to, from)
        };
        self.notify(&swapped.0);
        Some(swapped)
    }

    fn notify(&self, location: &Arc<RouteLocation>) {
        let subscribers: Vec<Subscriber> = self
            .inner
            .subscribers
            .lock()
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(location);
        }
    }

    fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl fmt::Debug for RouteCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteCell")
            .field("current", &self.full_path())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle returned by [`RouteCell::subscribe`].
///
/// Dropping it keeps the subscription alive; call
/// [`unsubscribe`](Self::unsubscribe) to stop receiving updates.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    cell: std::sync::Weak<CellInner>,
}

impl Subscription {
    /// Stop receiving updates. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.cell.upgrade() {
            inner.subscribers.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Live, read-only view of the current route.
///
/// Every accessor reads the latest location, so a view obtained once keeps
/// reflecting later navigations.
#[derive(Clone, Debug)]
pub struct RouteView {
    cell: RouteCell,
}

impl RouteView {
    pub(crate) fn new(cell: RouteCell) -> Self {
        Self { cell }
    }

    /// Snapshot of the current location.
    pub fn current(&self) -> Arc<RouteLocation> {
        self.cell.get()
    }

    /// Current path.
    pub fn path(&self) -> String {
        self.cell.get().path.clone()
    }

    /// Current full path.
    pub fn full_path(&self) -> String {
        self.cell.full_path()
    }

    /// Current route name.
    pub fn name(&self) -> Option<String> {
        self.cell.get().name.clone()
    }

    /// Current query.
    pub fn query(&self) -> LocationQuery {
        self.cell.get().query.clone()
    }

    /// Current metadata value for `key`.
    pub fn meta(&self, key: &str) -> Option<serde_json::Value> {
        self.cell.get().meta.get(key).cloned()
    }

    /// Subscribe to route changes.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn(&Arc<RouteLocation>) + Send + Sync + 'static,
    {
        self.cell.subscribe(f)
    }
}
