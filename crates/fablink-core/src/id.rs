//! Strongly-typed identifiers for addresses and lines.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an address (graph node).
///
/// Address ids are assigned by the external geometry generator and are
/// expected to be unique across a layout. The core never allocates them.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AddressId(pub u64);

impl fmt::Display for AddressId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AddressId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies a line (graph edge).
///
/// Lines created by the repair engine receive ids from a monotonically
/// increasing allocator seeded past the largest id already in the layout.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LineId(pub u64);

impl LineId {
    /// The id immediately after this one, or `None` past `u64::MAX`.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for LineId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
