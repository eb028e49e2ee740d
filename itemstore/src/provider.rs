use alloc::vec::Vec;

use crate::config::StoreConfig;
use crate::error::DataError;

/// Loads item data from a backing data source.
///
/// The provider receives the store's [`StoreConfig`] on every call and is
/// expected to honor whatever filter/sort/parameter state the opaque query
/// descriptor carries: `load` must return rows in the ordering implied by the
/// current configuration, and `count`/`load` must agree on the same view.
///
/// All calls are synchronous and may block for the duration of the backend
/// fetch; the store adds no timeouts and no retries.
pub trait ItemProvider {
    /// The domain item type, one value per row.
    type Item;
    /// The opaque query descriptor carried by [`StoreConfig`].
    type Query;

    /// Returns the number of items in the configured view.
    ///
    /// This must be answerable without loading the items themselves.
    fn count(&self, config: &StoreConfig<Self::Query>) -> Result<u64, DataError>;

    /// Loads the `[offset, offset + limit)` window of the configured view.
    fn load(
        &self,
        config: &StoreConfig<Self::Query>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self::Item>, DataError>;

    /// Reloads a single item from the backend.
    ///
    /// Providers without per-item refresh keep the default, which signals
    /// [`DataError::Unsupported`].
    fn refresh(
        &self,
        config: &StoreConfig<Self::Query>,
        item: &Self::Item,
    ) -> Result<Self::Item, DataError> {
        let _ = (config, item);
        Err(DataError::Unsupported("item refresh"))
    }
}

/// A trivial in-memory [`ItemProvider`] over a `Vec`.
///
/// Useful for demos and tests; the row order is the `Vec` order and the query
/// descriptor is ignored.
#[derive(Clone, Debug)]
pub struct VecProvider<T> {
    items: Vec<T>,
}

impl<T> VecProvider<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone + PartialEq> ItemProvider for VecProvider<T> {
    type Item = T;
    type Query = ();

    fn count(&self, _config: &StoreConfig<()>) -> Result<u64, DataError> {
        Ok(self.items.len() as u64)
    }

    fn load(&self, _config: &StoreConfig<()>, offset: u64, limit: u64) -> Result<Vec<T>, DataError> {
        let len = self.items.len() as u64;
        let start = offset.min(len) as usize;
        let end = offset.saturating_add(limit).min(len) as usize;
        Ok(self.items[start..end].to_vec())
    }

    fn refresh(&self, _config: &StoreConfig<()>, item: &T) -> Result<T, DataError> {
        self.items
            .iter()
            .find(|candidate| *candidate == item)
            .cloned()
            .ok_or_else(|| DataError::message("item not found in backing vec"))
    }
}
