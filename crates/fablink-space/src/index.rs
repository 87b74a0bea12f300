//! The [`NearestIndex`] trait and backend selection.

use crate::brute::BruteForceIndex;
use crate::rtree::RTreeIndex;
use fablink_core::{Address, AddressId, Position};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::warn;

/// One result of a nearest-neighbour query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nearest {
    /// The candidate address id.
    pub id: AddressId,
    /// Position of the candidate in the indexed address order.
    pub rank: usize,
    /// The candidate's position.
    pub pos: Position,
    /// Euclidean distance from the query source.
    pub distance: f64,
}

impl Nearest {
    /// Result ordering: ascending distance, then ascending rank.
    pub fn cmp_by_distance(&self, other: &Nearest) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then(self.rank.cmp(&other.rank))
    }
}

/// Nearest-neighbour query over a fixed set of addresses.
///
/// # Contract
///
/// `nearest(source, k, exclude)` returns at most `k` results sorted by
/// ascending 3D Euclidean distance, ties broken by the order the
/// addresses were indexed in. The source itself (matched by id) and every
/// id in `exclude` are skipped. Fewer than `k` results are returned only
/// when fewer than `k` eligible candidates exist. Queries have no side
/// effects.
///
/// Every backend must match [`BruteForceIndex`] exactly; this is a
/// correctness contract, not a performance one.
pub trait NearestIndex: Send + Sync {
    /// Number of indexed addresses.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `k` nearest addresses to `source`, excluding `source` and `exclude`.
    fn nearest(&self, source: &Address, k: usize, exclude: &IndexSet<AddressId>) -> Vec<Nearest>;

    /// The single nearest eligible address, if any.
    fn nearest_one(&self, source: &Address, exclude: &IndexSet<AddressId>) -> Option<Nearest> {
        self.nearest(source, 1, exclude).into_iter().next()
    }
}

/// Which [`NearestIndex`] backend to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Linear scan per query.
    #[default]
    BruteForce,
    /// R*-tree backed query.
    #[serde(rename = "rtree")]
    RTree,
}

impl IndexKind {
    /// The backend [`build`](Self::build) will actually use for `addresses`.
    ///
    /// The R*-tree orders candidates by distance, which is undefined for
    /// NaN or infinite coordinates, so such layouts use the brute-force
    /// scan.
    pub fn effective(self, addresses: &[Address]) -> Self {
        match self {
            Self::RTree => match addresses.iter().find(|a| !a.pos.is_finite()) {
                Some(bad) => {
                    warn!(
                        address = %bad.id,
                        pos = %bad.pos,
                        "non-finite position, using brute-force index"
                    );
                    Self::BruteForce
                }
                None => Self::RTree,
            },
            Self::BruteForce => Self::BruteForce,
        }
    }

    /// Build an index of this kind over `addresses`, in their given order.
    pub fn build(self, addresses: &[Address]) -> Box<dyn NearestIndex> {
        match self.effective(addresses) {
            Self::BruteForce => Box::new(BruteForceIndex::new(addresses)),
            Self::RTree => Box::new(RTreeIndex::new(addresses)),
        }
    }
}
