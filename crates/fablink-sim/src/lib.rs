//! Shortest-path routing and movement log generation over fablink layouts.
//!
//! The simulator is read-only over a repaired layout. It finds a
//! breadth-first shortest path between two addresses and turns it into a
//! timestamped hop-by-hop movement log, which [`UdpLogWriter`] renders to
//! the line-oriented vehicle log format.
//!
//! Timestamps advance by random increments drawn from a caller-supplied
//! RNG, so a seeded [`ChaCha8Rng`](rand_chacha::ChaCha8Rng) gives
//! reproducible logs.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod movement;
pub mod path;
pub mod udp;

pub use error::SimError;
pub use movement::{now_millis, MoveRecord, MovementConfig, MovementLog, MovementLogBuilder};
pub use path::{shortest_path, Adjacency};
pub use udp::{format_timestamp, UdpLogWriter, UdpTemplate};
