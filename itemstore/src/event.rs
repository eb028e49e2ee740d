use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;

use crate::key::{KeyMap, StoreKey};

/// The kind of change a store notification describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemAction {
    /// An item was fetched from the backend and cached for the first time
    /// since the last invalidation. Not emitted on cache hits.
    Loaded,
    /// A locally created item was prepended at virtual index 0.
    Added,
    /// An existing item was marked dirty for a future commit.
    Modified,
    /// An item was synchronously reloaded from the backend.
    Refreshed,
    /// An item was removed (or an uncommitted addition was discarded).
    Removed,
    /// The visible item set changed wholesale: reset, discard, or a
    /// configuration change. Index-based state held by consumers is stale.
    SetChanged,
}

/// A store change notification.
///
/// `previous` carries the replaced item where one exists (refresh, or a
/// re-load over an existing cache entry). For [`ItemAction::SetChanged`] all
/// fields other than `action` are `None`.
pub struct ItemEvent<'a, T, I> {
    pub action: ItemAction,
    pub item: Option<&'a T>,
    pub id: Option<&'a I>,
    pub previous: Option<&'a T>,
}

impl<T, I> Clone for ItemEvent<'_, T, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, I> Copy for ItemEvent<'_, T, I> {}

impl<T: core::fmt::Debug, I: core::fmt::Debug> core::fmt::Debug for ItemEvent<'_, T, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ItemEvent")
            .field("action", &self.action)
            .field("item", &self.item)
            .field("id", &self.id)
            .field("previous", &self.previous)
            .finish()
    }
}

/// A callback observing store change notifications.
pub type ItemListener<T, I> = dyn for<'a> Fn(ItemEvent<'a, T, I>) + Send + Sync;

/// A detachable listener handle.
///
/// The store's subscription table only holds a weak reference to the
/// listener; this handle owns the strong one. Dropping the handle detaches
/// the listener — there is no explicit unsubscribe call, and a forgotten
/// handle cannot keep a dead consumer wired into the store.
pub struct Subscription<T, I> {
    _listener: Arc<ItemListener<T, I>>,
}

impl<T, I> core::fmt::Debug for Subscription<T, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Subscription(..)")
    }
}

/// The store-owned subscription table: listeners for all actions, plus
/// listeners keyed by item identity.
pub(crate) struct SubscriptionSet<T, I> {
    any: Vec<Weak<ItemListener<T, I>>>,
    by_id: KeyMap<I, Vec<Weak<ItemListener<T, I>>>>,
}

impl<T, I> Default for SubscriptionSet<T, I> {
    fn default() -> Self {
        Self {
            any: Vec::new(),
            by_id: KeyMap::default(),
        }
    }
}

impl<T, I: StoreKey> SubscriptionSet<T, I> {
    /// Registers a listener for every store notification.
    pub(crate) fn subscribe(
        &mut self,
        listener: impl for<'a> Fn(ItemEvent<'a, T, I>) + Send + Sync + 'static,
    ) -> Subscription<T, I> {
        self.prune();
        let listener: Arc<ItemListener<T, I>> = Arc::new(listener);
        self.any.push(Arc::downgrade(&listener));
        Subscription {
            _listener: listener,
        }
    }

    /// Registers a listener invoked only for notifications carrying `id`.
    pub(crate) fn watch(
        &mut self,
        id: I,
        listener: impl for<'a> Fn(ItemEvent<'a, T, I>) + Send + Sync + 'static,
    ) -> Subscription<T, I> {
        self.prune();
        let listener: Arc<ItemListener<T, I>> = Arc::new(listener);
        self.by_id
            .entry(id)
            .or_default()
            .push(Arc::downgrade(&listener));
        Subscription {
            _listener: listener,
        }
    }

    /// Dispatches an event to live listeners. Dead entries are skipped here
    /// and removed on the next subscribe.
    pub(crate) fn emit(&self, event: ItemEvent<'_, T, I>) {
        for weak in &self.any {
            if let Some(listener) = weak.upgrade() {
                listener(event);
            }
        }
        if let Some(id) = event.id {
            if let Some(watchers) = self.by_id.get(id) {
                for weak in watchers {
                    if let Some(listener) = weak.upgrade() {
                        listener(event);
                    }
                }
            }
        }
    }

    fn prune(&mut self) {
        self.any.retain(|weak| weak.strong_count() > 0);
        self.by_id.retain(|_, watchers| {
            watchers.retain(|weak| weak.strong_count() > 0);
            !watchers.is_empty()
        });
    }
}
