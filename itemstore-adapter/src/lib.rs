//! Adapter utilities for the `itemstore` crate.
//!
//! The `itemstore` crate is UI-agnostic and focuses on the core windowing,
//! caching and overlay state. This crate provides small, framework-neutral
//! helpers commonly needed when binding a store to a concrete list/grid
//! component:
//!
//! - A buffered [`DataSource`] controller that hands pending edits to a
//!   [`CommitHandler`] and resets the store on success
//! - Sort state ([`ItemSort`]) threaded through the opaque query descriptor
//!   via the [`SortableQuery`] seam
//! - The auto-reload ↔ freeze mapping
//!
//! This crate is intentionally framework-agnostic (no concrete UI bindings).
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod commit;
mod data_source;
mod sort;

#[cfg(test)]
mod tests;

pub use commit::CommitHandler;
pub use data_source::{DataSource, cache_size_for_batch};
pub use sort::{ItemSort, SortableQuery};
