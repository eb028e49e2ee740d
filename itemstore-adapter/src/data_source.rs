use itemstore::{DEFAULT_MAX_CACHE_SIZE, ItemProvider, ItemStore, StoreError, StoreKey};

use crate::commit::CommitHandler;
use crate::sort::{ItemSort, SortableQuery};

/// A framework-neutral controller that wraps an [`ItemStore`] and provides
/// the buffered data-source workflows a view adapter needs: commit/discard of
/// pending edits, explicit refresh, the auto-reload ↔ freeze mapping, and
/// sort state.
///
/// This type does not hold any UI objects. Adapters drive it by calling:
/// - `add` / `update` / `remove` when the user edits rows
/// - `commit(handler)` / `discard` when the edit session ends
/// - `sort` / `refresh` when the view configuration changes
#[derive(Debug)]
pub struct DataSource<P: ItemProvider, I = u64> {
    store: ItemStore<P, I>,
}

impl<P, I> DataSource<P, I>
where
    P: ItemProvider,
    P::Item: Clone + PartialEq,
    I: StoreKey,
{
    pub fn new(store: ItemStore<P, I>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ItemStore<P, I> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ItemStore<P, I> {
        &mut self.store
    }

    pub fn into_store(self) -> ItemStore<P, I> {
        self.store
    }

    /// Hands the pending edits to `handler` and, on success, resets the store
    /// to a clean, reloadable state (preserving the freeze flag).
    ///
    /// Additions are passed in insertion order — the store keeps them newest
    /// first for indexing, persistence wants them oldest first. A handler
    /// failure leaves the overlay untouched so the commit can be retried.
    pub fn commit(&mut self, handler: &mut impl CommitHandler<P::Item>) -> Result<(), StoreError> {
        let mut added = self.store.added_items();
        added.reverse();
        let modified = self.store.modified_items();
        let removed = self.store.removed_items();
        handler.commit(&added, &modified, &removed)?;
        self.store.reset(true, true);
        Ok(())
    }

    /// Drops the pending edits and restores backend truth, without invoking
    /// any commit handler.
    pub fn discard(&mut self) {
        self.store.discard();
    }

    /// Explicitly reloads the store, even while auto-reload is off.
    pub fn refresh(&mut self) -> Result<u64, StoreError> {
        self.store.refresh()
    }

    pub fn is_auto_reload(&self) -> bool {
        !self.store.is_frozen()
    }

    /// Maps the auto-reload flag onto the store's freeze flag: with
    /// auto-reload off the store serves only what is already cached and waits
    /// for an explicit [`Self::refresh`].
    pub fn set_auto_reload(&mut self, auto_reload: bool) {
        self.store.set_frozen(!auto_reload);
    }

    /// Adds a new item, returning its identity.
    pub fn add(&mut self, item: P::Item) -> I {
        self.store.add_item(item)
    }

    /// Records an edit to an existing item.
    pub fn update(&mut self, item: P::Item) {
        self.store.set_item_modified(item);
    }

    /// Removes an item. Returns `Ok(false)` when it is not part of the view.
    pub fn remove(&mut self, item: &P::Item) -> Result<bool, StoreError> {
        self.store.remove_item_by_value(item)
    }

    /// Replaces the sort state carried by the query descriptor.
    ///
    /// This rebuilds the configuration, which invalidates the store and
    /// discards pending edits — rows may sit elsewhere (or nowhere) under the
    /// new ordering.
    pub fn sort<S>(&mut self, sorts: &[ItemSort<S>])
    where
        P::Query: SortableQuery<S> + Clone,
    {
        let config = self
            .store
            .config()
            .clone()
            .with_query_update(|query| query.apply_sorts(sorts));
        self.store.set_config(config);
    }

    /// Clears the sort state.
    pub fn clear_sorts<S>(&mut self)
    where
        P::Query: SortableQuery<S> + Clone,
    {
        self.sort::<S>(&[]);
    }
}

/// Derives an item cache capacity from a batch size: room for ten windows,
/// or the store default when batching is disabled.
pub fn cache_size_for_batch(batch_size: u64) -> usize {
    if batch_size > 0 {
        (batch_size as usize).saturating_mul(10)
    } else {
        DEFAULT_MAX_CACHE_SIZE
    }
}
