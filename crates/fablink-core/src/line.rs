//! Lines (undirected edges) and their equality semantics.

use crate::id::{AddressId, LineId};
use crate::layout::Address;
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A connection between two addresses.
///
/// Stored with a direction (`from_address` → `to_address`) but treated as
/// undirected for existence and overlap purposes: `(a, b)` and `(b, a)`
/// are the same edge. `from_pos`/`to_pos` snapshot the endpoint positions
/// at creation time and are never re-validated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// Unique line id.
    pub id: LineId,
    /// Line name, conventionally `LINE_{from}_{to}`.
    pub name: String,
    /// Source address id.
    pub from_address: AddressId,
    /// Target address id.
    pub to_address: AddressId,
    /// Position of the source address when the line was created.
    pub from_pos: Position,
    /// Position of the target address when the line was created.
    pub to_pos: Position,
    /// Whether the geometry generator drew this line as a curve.
    #[serde(default)]
    pub curve: bool,
}

impl Line {
    /// Create a straight line between two addresses, snapshotting their
    /// positions and naming it `LINE_{from}_{to}`.
    pub fn connecting(id: LineId, from: &Address, to: &Address) -> Self {
        Self {
            id,
            name: Self::name_for(from.id, to.id),
            from_address: from.id,
            to_address: to.id,
            from_pos: from.pos,
            to_pos: to.pos,
            curve: false,
        }
    }

    /// The conventional name for a line from `from` to `to`.
    pub fn name_for(from: AddressId, to: AddressId) -> String {
        format!("LINE_{from}_{to}")
    }

    /// The `(from, to)` pair as stored.
    pub fn endpoints(&self) -> (AddressId, AddressId) {
        (self.from_address, self.to_address)
    }

    /// The direction-independent key of this line.
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.from_address, self.to_address)
    }

    /// Returns `true` if `id` is one of this line's endpoints.
    pub fn touches(&self, id: AddressId) -> bool {
        self.from_address == id || self.to_address == id
    }

    /// The endpoint opposite `id`, or `None` if `id` is not an endpoint.
    ///
    /// A self-loop returns `id` itself.
    pub fn other_end(&self, id: AddressId) -> Option<AddressId> {
        if self.from_address == id {
            Some(self.to_address)
        } else if self.to_address == id {
            Some(self.from_address)
        } else {
            None
        }
    }

    /// Classify how `self` overlaps `other`, if at all.
    ///
    /// Identical takes precedence, so a pair of self-loops on the same
    /// address is reported as [`OverlapKind::Identical`].
    pub fn overlap_with(&self, other: &Line) -> Option<OverlapKind> {
        if self.from_address == other.from_address && self.to_address == other.to_address {
            Some(OverlapKind::Identical)
        } else if self.from_address == other.to_address && self.to_address == other.from_address
        {
            Some(OverlapKind::Reversed)
        } else {
            None
        }
    }
}

/// Unordered address pair: `EdgeKey::new(a, b) == EdgeKey::new(b, a)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    lo: AddressId,
    hi: AddressId,
}

impl EdgeKey {
    /// Canonicalize a pair so the smaller id comes first.
    pub fn new(a: AddressId, b: AddressId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// The smaller endpoint.
    pub fn lo(&self) -> AddressId {
        self.lo
    }

    /// The larger endpoint.
    pub fn hi(&self) -> AddressId {
        self.hi
    }

    /// Returns `true` for a self-loop.
    pub fn is_loop(&self) -> bool {
        self.lo == self.hi
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.lo, self.hi)
    }
}

/// How two lines connecting the same pair relate to each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlapKind {
    /// `(from1, to1) == (from2, to2)`.
    Identical,
    /// `(from1, to1) == (to2, from2)`.
    Reversed,
}

impl fmt::Display for OverlapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identical => write!(f, "identical"),
            Self::Reversed => write!(f, "reversed"),
        }
    }
}
