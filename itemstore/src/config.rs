/// Default number of backend rows fetched per batch window.
pub const DEFAULT_BATCH_SIZE: u64 = 20;

/// Default maximum number of non-overlay entries kept in the item cache.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 100;

/// Configuration for [`crate::ItemStore`].
///
/// A configuration is immutable once built: every mutator consumes `self`, and
/// replacing the configuration on a live store goes through
/// [`crate::ItemStore::set_config`], which invalidates cached state explicitly
/// instead of letting shared mutation leak into other holders.
///
/// `Q` is the opaque query descriptor (filters, sorts, parameters — whatever
/// the provider needs). The store never interprets it; it is forwarded
/// verbatim on every provider call.
#[derive(Clone)]
pub struct StoreConfig<Q = ()> {
    batch_size: u64,
    max_size: u64,
    auto_reload: bool,
    query: Q,
}

impl StoreConfig<()> {
    /// Creates a configuration with default batching and no query descriptor.
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_size: 0,
            auto_reload: true,
            query: (),
        }
    }
}

impl Default for StoreConfig<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q> StoreConfig<Q> {
    /// Replaces the opaque query descriptor, possibly changing its type.
    pub fn with_query<Q2>(self, query: Q2) -> StoreConfig<Q2> {
        StoreConfig {
            batch_size: self.batch_size,
            max_size: self.max_size,
            auto_reload: self.auto_reload,
            query,
        }
    }

    /// Applies an edit to the query descriptor, yielding a new configuration.
    pub fn with_query_update(mut self, f: impl FnOnce(&mut Q)) -> Self {
        f(&mut self.query);
        self
    }

    /// Sets the batch window size. `0` disables batching: a cache miss loads
    /// the whole backend result set in one provider call.
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Caps the backend count reported by the provider. `0` means no cap.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// When `false`, the store is constructed frozen and performs no backend
    /// access until an explicit reload.
    pub fn with_auto_reload(mut self, auto_reload: bool) -> Self {
        self.auto_reload = auto_reload;
        self
    }

    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    pub fn auto_reload(&self) -> bool {
        self.auto_reload
    }

    pub fn query(&self) -> &Q {
        &self.query
    }
}

impl<Q> core::fmt::Debug for StoreConfig<Q> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("batch_size", &self.batch_size)
            .field("max_size", &self.max_size)
            .field("auto_reload", &self.auto_reload)
            .finish_non_exhaustive()
    }
}
