//! Core types for the fablink layout graph.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the data model every other fablink crate speaks: strongly-typed ids,
//! 3D positions, addresses (nodes), lines (undirected edges) and the
//! [`Layout`] snapshot that is loaded, repaired and saved by each stage.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod layout;
pub mod line;
pub mod position;

pub use id::{AddressId, LineId};
pub use layout::{Address, Layout};
pub use line::{EdgeKey, Line, OverlapKind};
pub use position::Position;
