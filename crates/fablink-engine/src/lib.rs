//! Connectivity repair and integrity checking for fablink layouts.
//!
//! The engine turns a possibly under-connected, possibly malformed
//! address/line snapshot into one where every address has at least two
//! neighbours wherever candidates allow, and no two lines join the same
//! pair of addresses.
//!
//! # Stages
//!
//! 1. [`connect_unused`]: every degree-0 address is joined to its nearest
//!    neighbours.
//! 2. [`connect_endpoints`]: every degree-1 address is joined to its
//!    nearest address that it is not already connected to.
//! 3. [`check_and_repair`]: duplicate and dangling records are reported,
//!    overlapping lines are removed.
//!
//! Each stage is a pure function from one [`Layout`] to the next.
//! [`Pipeline`] runs them against a [`SnapshotStore`], loading before and
//! saving after every stage so each stage sees exactly what the previous
//! one persisted.
//!
//! [`Layout`]: fablink_core::Layout
//! [`SnapshotStore`]: fablink_store::SnapshotStore

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod connect;
pub mod error;
pub mod integrity;
pub mod pipeline;

pub use config::{ConfigError, OverlapScan, RepairConfig};
pub use connect::{
    connect_endpoint, connect_endpoints, connect_unused, connect_unused_address, LineIdAllocator,
    PassReport,
};
pub use error::{EngineError, Stage};
pub use integrity::{
    check_and_repair, DanglingReference, DuplicateGroup, DuplicateKey, HighDegree,
    IntegrityReport, OverlapFinding,
};
pub use pipeline::{Pipeline, PipelineReport, RepairReport};
