use itemstore::DataError;

/// Persists a store's pending edits.
///
/// The handler receives the exact overlay snapshot taken at commit time:
/// `added` in insertion order (oldest first), `modified` and `removed` in
/// edit order. A failure propagates to the caller and leaves the overlay
/// untouched, so the commit can be retried.
pub trait CommitHandler<T> {
    fn commit(&mut self, added: &[T], modified: &[T], removed: &[T]) -> Result<(), DataError>;
}
