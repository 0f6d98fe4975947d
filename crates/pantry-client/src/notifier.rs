//! Inventory change fan-out.
//!
//! [`ChangeNotifier`] carries no payload: a notification only means "something
//! in the inventory changed, re-fetch what you display". One instance is owned
//! by the composition root and cloned into every repository wrapper and
//! every subscriber.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::trace;

type Listener = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Inner {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<u64, Listener>>,
}

impl Inner {
    fn listeners(&self) -> MutexGuard<'_, BTreeMap<u64, Listener>> {
        // A panicking listener never runs while the lock is held, so the map
        // itself is always consistent.
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Publish/subscribe hub for the coarse "inventory changed" signal.
#[derive(Clone, Default)]
pub struct ChangeNotifier {
    inner: Arc<Inner>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`. It runs once per [`notify`](Self::notify) until
    /// the returned [`Subscription`] is unsubscribed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners().insert(id, Arc::new(listener));
        trace!(id, "listener subscribed");

        Subscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Invoke every registered listener once.
    ///
    /// Iterates over a snapshot, so listeners may subscribe or unsubscribe
    /// from inside their callback. A listener removed during the pass is
    /// skipped if it has not run yet; one added during the pass waits for the
    /// next notification.
    pub fn notify(&self) {
        let snapshot: Vec<(u64, Listener)> = self
            .inner
            .listeners()
            .iter()
            .map(|(id, listener)| (*id, Arc::clone(listener)))
            .collect();

        trace!(listeners = snapshot.len(), "notifying inventory change");

        for (id, listener) in snapshot {
            let still_registered = self.inner.listeners().contains_key(&id);
            if still_registered {
                listener();
            }
        }
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners().len()
    }
}

/// Handle returned by [`ChangeNotifier::subscribe`].
///
/// Dropping the handle does not unsubscribe; call [`unsubscribe`](Self::unsubscribe).
#[must_use = "keep the subscription to be able to unsubscribe"]
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    inner: Weak<Inner>,
}

impl Subscription {
    /// Remove the listener. Calling this more than once is harmless.
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            if inner.listeners().remove(&self.id).is_some() {
                trace!(id = self.id, "listener unsubscribed");
            }
        }
    }
}
