use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::cache::ItemCache;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::event::{ItemAction, ItemEvent, Subscription, SubscriptionSet};
use crate::ids::{Identity, NaturalIds};
use crate::key::{KeyMap, StoreKey};
use crate::overlay::EditOverlay;
use crate::provider::ItemProvider;

/// A lazily-loading, bounded-cache, identity-aware item store.
///
/// The store is the single authority for three questions: what item sits at
/// virtual index `i`, what index holds identity `id`, and what has changed
/// locally but is not yet persisted. It composes an [`ItemProvider`] (the
/// backend), a bounded [`ItemCache`], an identity strategy (an identifier
/// function, or the item's own index), and an overlay of pending
/// added/modified/removed edits.
///
/// Reads are lazy: a cache miss fetches one aligned batch window through the
/// provider and caches every returned row. Configuration changes invalidate
/// the cache and identity state atomically, so no index ever serves data
/// computed under a stale ordering.
///
/// The store is designed for single-threaded cooperative use within one UI
/// session; it performs no internal locking, and provider calls block the
/// caller for the duration of the fetch.
pub struct ItemStore<P: ItemProvider, I = u64> {
    config: StoreConfig<P::Query>,
    provider: P,
    identity: Identity<P::Item, I>,
    cache: ItemCache<P::Item>,
    overlay: EditOverlay<P::Item>,
    listeners: SubscriptionSet<P::Item, I>,
    /// Memoized id → backend index mappings for identifier-function stores.
    /// Invalidated together with the cache.
    id_index: KeyMap<I, u64>,
    /// Backend count under the current configuration. `None` until the first
    /// count query after construction or invalidation.
    count: Option<u64>,
    frozen: bool,
}

impl<P> ItemStore<P, u64>
where
    P: ItemProvider,
    P::Item: Clone + PartialEq,
{
    /// Creates a store whose item identities are the virtual indexes
    /// themselves (see [`NaturalIds`]).
    ///
    /// `max_cache_size` bounds the number of non-overlay entries kept in
    /// memory; it must be at least 1.
    pub fn new(
        config: StoreConfig<P::Query>,
        provider: P,
        max_cache_size: usize,
    ) -> Result<Self, StoreError> {
        Self::build(
            config,
            provider,
            Identity::Natural {
                to_id: |index| index,
                to_index: |id| *id,
            },
            max_cache_size,
        )
    }
}

impl<P, I> ItemStore<P, I>
where
    P: ItemProvider,
    P::Item: Clone + PartialEq,
    I: StoreKey,
{
    /// Creates a store deriving item identities through `identifier`.
    pub fn with_identifier(
        config: StoreConfig<P::Query>,
        provider: P,
        max_cache_size: usize,
        identifier: impl Fn(&P::Item) -> I + Send + Sync + 'static,
    ) -> Result<Self, StoreError> {
        Self::build(
            config,
            provider,
            Identity::Function(Arc::new(identifier)),
            max_cache_size,
        )
    }

    fn build(
        config: StoreConfig<P::Query>,
        provider: P,
        identity: Identity<P::Item, I>,
        max_cache_size: usize,
    ) -> Result<Self, StoreError> {
        let cache = ItemCache::new(max_cache_size)?;
        let frozen = !config.auto_reload();
        Ok(Self {
            config,
            provider,
            identity,
            cache,
            overlay: EditOverlay::default(),
            listeners: SubscriptionSet::default(),
            id_index: KeyMap::default(),
            count: None,
            frozen,
        })
    }

    pub fn config(&self) -> &StoreConfig<P::Query> {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn max_cache_size(&self) -> usize {
        self.cache.capacity()
    }

    /// Rebounds the item cache. Shrinking evicts down immediately.
    pub fn set_max_cache_size(&mut self, max_cache_size: usize) -> Result<(), StoreError> {
        self.cache.set_capacity(max_cache_size)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Whether the backend count is known under the current configuration.
    pub fn is_loaded(&self) -> bool {
        self.count.is_some()
    }

    /// Suspends (or resumes) implicit backend loading. Unfreezing does not
    /// itself load anything: the next `size()`/`get_item()` does.
    pub fn set_frozen(&mut self, frozen: bool) {
        itrace!(frozen, "set_frozen");
        self.frozen = frozen;
    }

    /// Number of items in the current view: the backend count adjusted by
    /// pending additions and removals.
    ///
    /// A frozen store that has never loaded reports 0 and performs no backend
    /// access; once loaded, the cached count keeps being served. The count is
    /// obtained through the provider's counting call, never by loading items.
    pub fn size(&mut self) -> Result<u64, StoreError> {
        if self.frozen && self.count.is_none() {
            return Ok(0);
        }
        let backend = self.backend_count()?;
        Ok(backend.saturating_sub(self.overlay.removed_len()) + self.overlay.added_len())
    }

    /// Returns the item at `index` in the current view.
    ///
    /// Pending additions occupy the lowest indexes and are served from the
    /// overlay. Otherwise a cache hit returns immediately; a miss loads the
    /// aligned batch window containing the index, caches every returned row
    /// (emitting [`ItemAction::Loaded`] per newly cached row) and returns the
    /// requested one. While frozen, only overlaid and cached items are
    /// served.
    pub fn get_item(&mut self, index: u64) -> Result<P::Item, StoreError> {
        let size = self.size()?;
        if index >= size {
            return Err(StoreError::OutOfBounds { index, size });
        }
        let added_len = self.overlay.added_len();
        if index < added_len {
            return Ok(self.overlay.added()[index as usize].clone());
        }
        let backend_index = index - added_len;
        if let Some(item) = self.cache.get(backend_index) {
            return Ok(item.clone());
        }
        if self.frozen {
            return Err(StoreError::Frozen(index));
        }
        self.load_window(backend_index)
    }

    /// Identities of all items in view order: pending additions first (most
    /// recent first), then backend items, excluding removed identities.
    ///
    /// With natural identities this is pure arithmetic. With an identifier
    /// function it has to visit every row of the view, loading windows as
    /// needed. A frozen store exposes no id enumeration and returns an empty
    /// list.
    pub fn item_ids(&mut self) -> Result<Vec<I>, StoreError> {
        if self.frozen {
            return Ok(Vec::new());
        }
        match self.identity.clone() {
            Identity::Natural { to_id, .. } => {
                let size = self.size()?;
                Ok(NaturalIds::new(size).iter().map(to_id).collect())
            }
            Identity::Function(f) => {
                let mut ids: Vec<I> = self.overlay.added().iter().map(|item| f(item)).collect();
                let removed_ids: Vec<I> =
                    self.overlay.removed().iter().map(|item| f(item)).collect();
                let added_len = self.overlay.added_len();
                let size = self.size()?;
                for index in added_len..size {
                    let item = self.get_item(index)?;
                    let id = f(&item);
                    self.id_index.insert(id.clone(), index - added_len);
                    if !removed_ids.contains(&id) {
                        ids.push(id);
                    }
                }
                Ok(ids)
            }
        }
    }

    /// Returns the identity of the item at `index`.
    pub fn id_at(&mut self, index: u64) -> Result<I, StoreError> {
        let size = self.size()?;
        if index >= size {
            return Err(StoreError::OutOfBounds { index, size });
        }
        match self.identity.clone() {
            Identity::Natural { to_id, .. } => Ok(to_id(index)),
            Identity::Function(f) => {
                let added_len = self.overlay.added_len();
                if index < added_len {
                    return Ok(f(&self.overlay.added()[index as usize]));
                }
                let item = self.get_item(index)?;
                let id = f(&item);
                self.id_index.insert(id.clone(), index - added_len);
                Ok(id)
            }
        }
    }

    /// Returns the index holding identity `id`, if present in the view.
    ///
    /// The overlay is consulted first (removed identities report `None`,
    /// pending additions their low indexes), then the memoized id→index
    /// mappings, then a positional search. While frozen, only cached rows are
    /// searched.
    pub fn index_of_id(&mut self, id: &I) -> Result<Option<u64>, StoreError> {
        if self.frozen && self.count.is_none() {
            return Ok(None);
        }
        match self.identity.clone() {
            Identity::Natural { to_index, .. } => {
                let candidate = to_index(id);
                let size = self.size()?;
                Ok(NaturalIds::new(size).index_of(candidate))
            }
            Identity::Function(f) => {
                if self.overlay.removed_contains(|item| f(item) == *id) {
                    return Ok(None);
                }
                if let Some(pos) = self.overlay.added_position(|item| f(item) == *id) {
                    return Ok(Some(pos as u64));
                }
                let added_len = self.overlay.added_len();
                if let Some(backend_index) = self.id_index.get(id) {
                    return Ok(Some(added_len + *backend_index));
                }
                if self.frozen {
                    for (backend_index, item) in self.cache.iter() {
                        if f(item) == *id {
                            return Ok(Some(added_len + *backend_index));
                        }
                    }
                    return Ok(None);
                }
                let size = self.size()?;
                for index in added_len..size {
                    let item = self.get_item(index)?;
                    let candidate = f(&item);
                    self.id_index.insert(candidate.clone(), index - added_len);
                    if candidate == *id {
                        return Ok(Some(index));
                    }
                }
                Ok(None)
            }
        }
    }

    pub fn contains_id(&mut self, id: &I) -> Result<bool, StoreError> {
        Ok(self.index_of_id(id)?.is_some())
    }

    /// Returns the identity of `item`, via the identifier function or, for
    /// natural identities, a positional equality search.
    pub fn item_id(&mut self, item: &P::Item) -> Result<Option<I>, StoreError> {
        match self.identity.clone() {
            Identity::Function(f) => Ok(Some(f(item))),
            Identity::Natural { to_id, .. } => Ok(self.index_of_item(item)?.map(to_id)),
        }
    }

    /// Returns the index of `item`, matching by identity where an identifier
    /// function exists and by equality otherwise.
    pub fn index_of_item(&mut self, item: &P::Item) -> Result<Option<u64>, StoreError> {
        match self.identity.clone() {
            Identity::Function(f) => {
                let id = f(item);
                self.index_of_id(&id)
            }
            Identity::Natural { .. } => {
                if self.frozen {
                    if let Some(pos) = self.overlay.added_position(|added| added == item) {
                        return Ok(Some(pos as u64));
                    }
                    let added_len = self.overlay.added_len();
                    for (backend_index, cached) in self.cache.iter() {
                        if cached == item {
                            return Ok(Some(added_len + *backend_index));
                        }
                    }
                    return Ok(None);
                }
                let size = self.size()?;
                for index in 0..size {
                    if self.get_item(index)? == *item {
                        return Ok(Some(index));
                    }
                }
                Ok(None)
            }
        }
    }

    /// Prepends a locally created item at virtual index 0 and returns its
    /// identity. All other indexes shift by one logically; the translation is
    /// applied at lookup time, no cached entry moves.
    pub fn add_item(&mut self, item: P::Item) -> I {
        let id = match &self.identity {
            Identity::Natural { to_id, .. } => to_id(0),
            Identity::Function(f) => f(&item),
        };
        self.overlay.add(item.clone());
        itrace!(pending_added = self.overlay.added().len(), "add_item");
        self.emit(ItemAction::Added, Some(&item), Some(&id), None);
        id
    }

    /// Removes the item at `index`.
    ///
    /// A pending addition is simply dropped from the overlay — it never
    /// reached the backend, so no removal record is produced. An existing
    /// item is evicted from the cache and recorded for the next commit.
    /// Returns `Ok(false)` for an out-of-range index; "not found" is an
    /// expected outcome for UI-driven removals, not an error.
    pub fn remove_item(&mut self, index: u64) -> Result<bool, StoreError> {
        let size = self.size()?;
        if index >= size {
            return Ok(false);
        }
        let added_len = self.overlay.added_len();
        if index < added_len {
            let item = self.overlay.discard_added(index as usize);
            let id = self.id_of(&item, index);
            self.emit(ItemAction::Removed, Some(&item), Some(&id), None);
            return Ok(true);
        }
        let backend_index = index - added_len;
        let item = match self.cache.remove(backend_index) {
            Some(item) => item,
            None => {
                if self.frozen {
                    return Err(StoreError::Frozen(index));
                }
                let item = self.load_window(backend_index)?;
                self.cache.remove(backend_index);
                item
            }
        };
        let id = self.id_of(&item, index);
        self.overlay.record_removed(item.clone());
        self.emit(ItemAction::Removed, Some(&item), Some(&id), None);
        Ok(true)
    }

    /// Removes `item`, located by identity or equality. Returns `Ok(false)`
    /// when the item is not part of the current view.
    pub fn remove_item_by_value(&mut self, item: &P::Item) -> Result<bool, StoreError> {
        match self.index_of_item(item)? {
            Some(index) => self.remove_item(index),
            None => Ok(false),
        }
    }

    /// Marks `item` dirty for the next commit and emits
    /// [`ItemAction::Modified`].
    ///
    /// The cached row is replaced when the item's identity can be resolved,
    /// so subsequent reads observe the edit. Editing a pending addition
    /// updates the addition in place instead of producing a modify record.
    pub fn set_item_modified(&mut self, item: P::Item) {
        match self.identity.clone() {
            Identity::Function(f) => {
                let id = f(&item);
                if let Some(pos) = self.overlay.added_position(|added| f(added) == id) {
                    self.overlay.replace_added(pos, item.clone());
                    self.emit(ItemAction::Modified, Some(&item), Some(&id), None);
                    return;
                }
                let cached = self
                    .cache
                    .iter()
                    .find(|&(_, cached)| f(cached) == id)
                    .map(|(backend_index, _)| *backend_index);
                if let Some(backend_index) = cached {
                    self.cache.put(backend_index, item.clone());
                }
                self.overlay.mark_modified(item.clone(), |existing| f(existing) == id);
                self.emit(ItemAction::Modified, Some(&item), Some(&id), None);
            }
            Identity::Natural { .. } => {
                if self.overlay.added_position(|added| added == &item).is_some() {
                    return;
                }
                self.overlay.mark_modified(item.clone(), |existing| *existing == item);
                self.emit(ItemAction::Modified, Some(&item), None, None);
            }
        }
    }

    /// Synchronously reloads `item` through the provider's refresh operation,
    /// replacing the overlaid or cached entry at its index.
    ///
    /// Returns `Ok(false)` when the item is not part of the current view.
    /// Providers without per-item refresh surface
    /// [`crate::DataError::Unsupported`].
    pub fn refresh_item(&mut self, item: &P::Item) -> Result<bool, StoreError> {
        let Some(index) = self.index_of_item(item)? else {
            return Ok(false);
        };
        let refreshed = self.provider.refresh(&self.config, item)?;
        let added_len = self.overlay.added_len();
        let previous = if index < added_len {
            Some(self.overlay.replace_added(index as usize, refreshed.clone()))
        } else {
            self.cache.put(index - added_len, refreshed.clone())
        };
        let id = self.id_of(&refreshed, index);
        self.emit(
            ItemAction::Refreshed,
            Some(&refreshed),
            Some(&id),
            previous.as_ref(),
        );
        Ok(true)
    }

    /// Snapshot of pending additions, most recent first.
    pub fn added_items(&self) -> Vec<P::Item> {
        self.overlay.added().to_vec()
    }

    /// Snapshot of pending modifications, in edit order.
    pub fn modified_items(&self) -> Vec<P::Item> {
        self.overlay.modified().to_vec()
    }

    /// Snapshot of pending removals, in removal order.
    pub fn removed_items(&self) -> Vec<P::Item> {
        self.overlay.removed().to_vec()
    }

    /// Whether any pending edit exists.
    pub fn is_modified(&self) -> bool {
        !self.overlay.is_empty()
    }

    /// Drops all pending edits and evicts the affected cached rows, so the
    /// next read restores backend truth. No commit handler is involved.
    pub fn discard(&mut self) {
        if self.overlay.is_empty() {
            return;
        }
        idebug!("discarding pending edits");
        match self.identity.clone() {
            Identity::Function(f) => {
                let mut stale: Vec<u64> = Vec::new();
                for dirty in self
                    .overlay
                    .modified()
                    .iter()
                    .chain(self.overlay.removed().iter())
                {
                    let id = f(dirty);
                    for (backend_index, cached) in self.cache.iter() {
                        if f(cached) == id {
                            stale.push(*backend_index);
                        }
                    }
                }
                for backend_index in stale {
                    self.cache.remove(backend_index);
                }
            }
            Identity::Natural { .. } => {
                // edited positions are unknown without identities
                self.cache.clear();
            }
        }
        self.overlay.clear();
        self.emit(ItemAction::SetChanged, None, None, None);
    }

    /// Invalidates the cache, the identity state and the backend count; the
    /// next access reloads transparently.
    ///
    /// With `clear_overlay` the pending edits are dropped as well. The freeze
    /// flag is restored to its pre-reset value only when `preserve_freeze` is
    /// set, otherwise the store unfreezes.
    pub fn reset(&mut self, clear_overlay: bool, preserve_freeze: bool) {
        idebug!(clear_overlay, preserve_freeze, "reset");
        self.invalidate();
        if clear_overlay {
            self.overlay.clear();
        }
        if !preserve_freeze {
            self.frozen = false;
        }
        self.emit(ItemAction::SetChanged, None, None, None);
    }

    /// The explicit reload: invalidates and re-queries the backend count
    /// immediately, even while frozen. Returns the new view size.
    pub fn refresh(&mut self) -> Result<u64, StoreError> {
        self.invalidate();
        self.backend_count()?;
        self.emit(ItemAction::SetChanged, None, None, None);
        self.size()
    }

    /// Replaces the configuration.
    ///
    /// The cache, identity state and backend count are invalidated
    /// atomically, and pending edits are discarded — a changed
    /// filter/sort/parameter set may no longer contain the edited rows. The
    /// freeze flag is preserved.
    pub fn set_config(&mut self, config: StoreConfig<P::Query>) {
        self.config = config;
        self.overlay.clear();
        self.invalidate();
        self.emit(ItemAction::SetChanged, None, None, None);
    }

    /// Registers a listener for every store notification. Dropping the
    /// returned handle detaches it.
    pub fn subscribe(
        &mut self,
        listener: impl for<'a> Fn(ItemEvent<'a, P::Item, I>) + Send + Sync + 'static,
    ) -> Subscription<P::Item, I> {
        self.listeners.subscribe(listener)
    }

    /// Registers a listener for notifications carrying the given identity.
    pub fn watch_item(
        &mut self,
        id: I,
        listener: impl for<'a> Fn(ItemEvent<'a, P::Item, I>) + Send + Sync + 'static,
    ) -> Subscription<P::Item, I> {
        self.listeners.watch(id, listener)
    }

    fn invalidate(&mut self) {
        self.count = None;
        self.cache.clear();
        self.id_index.clear();
    }

    fn backend_count(&mut self) -> Result<u64, StoreError> {
        if let Some(count) = self.count {
            return Ok(count);
        }
        let mut count = self.provider.count(&self.config)?;
        let max_size = self.config.max_size();
        if max_size > 0 {
            count = count.min(max_size);
        }
        idebug!(count, "backend count");
        self.count = Some(count);
        Ok(count)
    }

    /// Loads the aligned batch window containing `backend_index` and caches
    /// every returned row.
    fn load_window(&mut self, backend_index: u64) -> Result<P::Item, StoreError> {
        let total = self.backend_count()?;
        let (offset, limit) = batch_window(backend_index, self.config.batch_size(), total);
        idebug!(offset, limit, "loading batch window");
        let items = self.provider.load(&self.config, offset, limit)?;
        if (items.len() as u64) < limit {
            iwarn!(
                returned = items.len(),
                expected = limit,
                "provider returned a short window"
            );
        }
        let mut requested = None;
        for (i, item) in items.into_iter().enumerate() {
            if i as u64 >= limit {
                break;
            }
            let index = offset + i as u64;
            if index == backend_index {
                requested = Some(item.clone());
            }
            let previous = self.cache.put(index, item.clone());
            self.emit(ItemAction::Loaded, Some(&item), None, previous.as_ref());
        }
        requested.ok_or(StoreError::MissingItem(backend_index))
    }

    fn id_of(&self, item: &P::Item, index: u64) -> I {
        match &self.identity {
            Identity::Natural { to_id, .. } => to_id(index),
            Identity::Function(f) => f(item),
        }
    }

    fn emit(
        &self,
        action: ItemAction,
        item: Option<&P::Item>,
        id: Option<&I>,
        previous: Option<&P::Item>,
    ) {
        self.listeners.emit(ItemEvent {
            action,
            item,
            id,
            previous,
        });
    }
}

impl<P: ItemProvider, I> core::fmt::Debug for ItemStore<P, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ItemStore")
            .field("count", &self.count)
            .field("frozen", &self.frozen)
            .field("cached", &self.cache.len())
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

/// Computes the `[offset, offset + limit)` window containing `index`.
///
/// Windows are aligned to multiples of `batch_size` so repeated misses around
/// the same region hit the same window. A zero `batch_size` disables batching
/// and spans the whole result set.
pub(crate) fn batch_window(index: u64, batch_size: u64, total: u64) -> (u64, u64) {
    if batch_size == 0 {
        return (0, total);
    }
    let offset = index - (index % batch_size);
    (offset, batch_size.min(total - offset))
}
