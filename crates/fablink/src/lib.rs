//! fablink: transport-network graph repair and routing for layered fab layouts.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all fablink sub-crates. For most users, adding `fablink` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use fablink::prelude::*;
//! use rand::SeedableRng;
//!
//! let addresses: Vec<Address> = (1..=5)
//!     .map(|i| Address::new(AddressId(i), format!("ADDR_{i}"), Position::new(i as f64 * 54.0, 0.0, 6022.0)))
//!     .collect();
//! let mut store = MemoryStore::with_layout(Layout::new(addresses, vec![]));
//!
//! let report = Pipeline::new(&mut store, RepairConfig::default())?.run_all()?;
//! assert!(report.integrity.passed());
//!
//! let layout = store.load()?;
//! let adj = Adjacency::from_layout(&layout);
//! let path = shortest_path(&adj, AddressId(1), AddressId(5)).unwrap();
//! assert_eq!(path.first(), Some(&AddressId(1)));
//!
//! let log = MovementLog::builder().build()?;
//! let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
//! let records = log.generate(&adj, AddressId(1), AddressId(5), 0, &mut rng).unwrap();
//! assert_eq!(records.len(), path.len() - 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `fablink-core` | Ids, positions, addresses, lines, the layout snapshot |
//! | [`space`] | `fablink-space` | Nearest-neighbour backends and the graph model |
//! | [`store`] | `fablink-store` | Snapshot persistence and layout hashing |
//! | [`engine`] | `fablink-engine` | Repair passes, integrity check, pipeline |
//! | [`sim`] | `fablink-sim` | Shortest paths, movement logs, UDP log rendering |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core data model (`fablink-core`).
pub use fablink_core as types;

/// Nearest-neighbour queries and the graph model (`fablink-space`).
///
/// Provides the [`space::NearestIndex`] trait with the
/// [`space::BruteForceIndex`] and [`space::RTreeIndex`] backends, and
/// [`space::LayoutGraph`].
pub use fablink_space as space;

/// Snapshot persistence (`fablink-store`).
pub use fablink_store as store;

/// Connectivity repair and integrity checking (`fablink-engine`).
///
/// [`engine::Pipeline`] runs every stage against a store; the stage
/// functions are also usable on their own.
pub use fablink_engine as engine;

/// Routing and movement logs (`fablink-sim`).
pub use fablink_sim as sim;

/// Common imports for typical fablink usage.
///
/// ```rust
/// use fablink::prelude::*;
/// ```
pub mod prelude {
    // Data model
    pub use fablink_core::{Address, AddressId, Layout, Line, LineId, Position};

    // Graph and spatial queries
    pub use fablink_space::{IndexKind, LayoutGraph, NearestIndex};

    // Persistence
    pub use fablink_store::{JsonFileStore, MemoryStore, SnapshotStore, StoreError};

    // Engine
    pub use fablink_engine::{
        check_and_repair, connect_endpoints, connect_unused, EngineError, IntegrityReport,
        OverlapScan, PassReport, Pipeline, RepairConfig,
    };

    // Simulation
    pub use fablink_sim::{
        shortest_path, Adjacency, MoveRecord, MovementConfig, MovementLog, SimError, UdpLogWriter,
        UdpTemplate,
    };
}
