use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

/// Error raised by an [`crate::ItemProvider`].
///
/// Backend-side failures are carried unchanged: the store never retries and
/// never swallows a provider error.
#[derive(Debug, Error)]
pub enum DataError {
    /// A backend access failed (I/O, query failure, ...). Wraps the
    /// provider-side error as-is.
    #[error("data access failure: {0}")]
    Access(#[source] Box<dyn core::error::Error + Send + Sync + 'static>),
    /// A backend access failed, described by a plain message.
    #[error("data access failure: {0}")]
    Message(String),
    /// The provider does not implement the requested operation.
    #[error("operation not supported by the item provider: {0}")]
    Unsupported(&'static str),
}

impl DataError {
    /// Wraps a backend error.
    pub fn access(err: impl core::error::Error + Send + Sync + 'static) -> Self {
        Self::Access(Box::new(err))
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

/// Error raised by an [`crate::ItemStore`] operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A provider call failed; the underlying [`DataError`] is propagated
    /// unmodified.
    #[error(transparent)]
    Data(#[from] DataError),
    /// The requested virtual index is outside `0..size()`.
    #[error("item index {index} out of bounds (store size {size})")]
    OutOfBounds { index: u64, size: u64 },
    /// The store is frozen and the item is neither cached nor overlaid, so
    /// serving it would require an implicit backend load.
    #[error("store is frozen and item at index {0} is not cached")]
    Frozen(u64),
    /// The provider returned a window that did not include the requested
    /// index.
    #[error("provider window did not include item at index {0}")]
    MissingItem(u64),
    /// A collaborator or construction parameter was rejected at
    /// initialization.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(&'static str),
}
