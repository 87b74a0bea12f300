//! Spatial queries and the graph model for fablink layouts.
//!
//! This crate defines the [`NearestIndex`] trait, the single spatial query
//! the repair engine needs, along with two backends that agree exactly on
//! ordering, and [`LayoutGraph`], the in-memory address/line graph with
//! O(1) degree, adjacency and edge-existence lookups.
//!
//! # Backends
//!
//! - [`BruteForceIndex`]: O(n) scan per query; the reference semantics.
//! - [`RTreeIndex`]: `rstar`-backed index for large layouts, returning the
//!   same results as the brute-force scan including tie order.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod brute;
pub mod graph;
pub mod index;
pub mod rtree;

#[cfg(test)]
pub(crate) mod compliance;

pub use brute::BruteForceIndex;
pub use graph::{Classification, LayoutGraph};
pub use index::{IndexKind, Nearest, NearestIndex};
pub use rtree::RTreeIndex;
