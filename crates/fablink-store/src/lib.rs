//! Snapshot persistence for fablink layouts.
//!
//! Every fablink stage loads the latest persisted [`Layout`], computes,
//! and saves; nothing is carried in memory between stages. This crate
//! provides the store abstraction those stages call.
//!
//! # Architecture
//!
//! - [`SnapshotStore`] is the load/save seam the pipeline is generic over
//! - [`JsonFileStore`] persists to a JSON document, replacing it atomically
//! - [`MemoryStore`] keeps the snapshot in process, for tests
//! - [`layout_hash`] digests a snapshot for determinism checks
//!
//! # Format
//!
//! ```text
//! { "addresses": [ {id, name, pos: {x, y, z}}, ... ],
//!   "lines":     [ {id, name, fromAddress, toAddress, fromPos, toPos, curve}, ... ] }
//! ```
//!
//! [`Layout`]: fablink_core::Layout

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod hash;
pub mod json;
pub mod memory;

pub use error::StoreError;
pub use hash::layout_hash;
pub use json::JsonFileStore;
pub use memory::MemoryStore;

use fablink_core::Layout;

/// Load/save seam for persisted layout snapshots.
///
/// A failed `save` must leave the previously persisted snapshot intact.
pub trait SnapshotStore {
    /// Read the latest persisted snapshot.
    fn load(&self) -> Result<Layout, StoreError>;

    /// Replace the persisted snapshot with `layout`.
    fn save(&mut self, layout: &Layout) -> Result<(), StoreError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for &mut S {
    fn load(&self) -> Result<Layout, StoreError> {
        (**self).load()
    }

    fn save(&mut self, layout: &Layout) -> Result<(), StoreError> {
        (**self).save(layout)
    }
}
