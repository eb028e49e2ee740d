use alloc::sync::Arc;

/// An identifier function deriving an item's identity from its value.
pub type IdentifierFn<T, I> = Arc<dyn Fn(&T) -> I + Send + Sync>;

/// The identity strategy bound to a store at construction.
///
/// `Natural` is only ever built for `I = u64` (see `ItemStore::new`); the two
/// function pointers carry the index↔id conversions so the rest of the store
/// can stay generic over `I`.
pub(crate) enum Identity<T, I> {
    Natural {
        to_id: fn(u64) -> I,
        to_index: fn(&I) -> u64,
    },
    Function(IdentifierFn<T, I>),
}

impl<T, I> Clone for Identity<T, I> {
    fn clone(&self) -> Self {
        match self {
            Self::Natural { to_id, to_index } => Self::Natural {
                to_id: *to_id,
                to_index: *to_index,
            },
            Self::Function(f) => Self::Function(Arc::clone(f)),
        }
    }
}

impl<T, I> core::fmt::Debug for Identity<T, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Natural { .. } => f.write_str("Natural"),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// The ordered identity sequence `0..len` used when no identifier function is
/// supplied: an item's identity is its own virtual index.
///
/// Nothing is materialized; `get` and `index_of` are arithmetic bounds checks,
/// so an identity view over a million-row backend costs nothing until rows are
/// actually loaded for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NaturalIds {
    len: u64,
}

impl NaturalIds {
    pub fn new(len: u64) -> Self {
        Self { len }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the identity at `index`: the index itself, while in bounds.
    pub fn get(&self, index: u64) -> Option<u64> {
        (index < self.len).then_some(index)
    }

    /// Returns the index holding `id`: the id itself, while in bounds.
    pub fn index_of(&self, id: u64) -> Option<u64> {
        (id < self.len).then_some(id)
    }

    pub fn contains(&self, id: u64) -> bool {
        id < self.len
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> {
        0..self.len
    }
}
