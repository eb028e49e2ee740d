//! A lazily-loading, bounded-cache, identity-aware item store for data-bound
//! list UIs.
//!
//! For adapter-level utilities (buffered commit workflows, sort state), see
//! the `itemstore-adapter` crate.
//!
//! This crate sits between an abstract [`ItemProvider`] and a UI-facing
//! index/id view: items are fetched in aligned batch windows on first access,
//! kept in a capacity-bounded LRU cache, and layered with an overlay of
//! uncommitted add/modify/remove edits until an explicit commit or discard.
//!
//! It is UI-agnostic. A list/grid adapter is expected to provide:
//! - the backing [`ItemProvider`] (count, windowed load, optional refresh)
//! - an optional identifier function (absent, identity = virtual index)
//! - the [`StoreConfig`] describing batching and the opaque query state
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod cache;
mod config;
mod error;
mod event;
mod ids;
mod key;
mod overlay;
mod provider;
mod store;


pub use cache::ItemCache;
pub use config::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_CACHE_SIZE, StoreConfig};
pub use error::{DataError, StoreError};
pub use event::{ItemAction, ItemEvent, ItemListener, Subscription};
pub use ids::{IdentifierFn, NaturalIds};
pub use key::StoreKey;
pub use provider::{ItemProvider, VecProvider};
pub use store::ItemStore;
