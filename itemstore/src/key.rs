#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

#[cfg(feature = "std")]
pub(crate) type KeyMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type KeyMap<K, V> = BTreeMap<K, V>;

/// Bounds required of an item identity type.
///
/// Identities are hashed under `std` and ordered under `no_std`, mirroring the
/// map implementation backing identity lookups.
#[cfg(feature = "std")]
pub trait StoreKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> StoreKey for K {}

#[cfg(not(feature = "std"))]
pub trait StoreKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> StoreKey for K {}
