//! `rstar`-backed nearest-neighbour index.

use crate::index::{Nearest, NearestIndex};
use fablink_core::{Address, AddressId, Position};
use indexmap::IndexSet;
use rstar::primitives::GeomWithData;
use rstar::RTree;

type Entry = GeomWithData<[f64; 3], usize>;

/// R*-tree [`NearestIndex`] for large layouts.
///
/// The tree yields candidates in ascending distance. Once `k` eligible
/// candidates are collected, the scan continues through every candidate
/// at exactly the k-th distance so that ties resolve by index order, the
/// same way [`BruteForceIndex`](crate::BruteForceIndex) resolves them.
///
/// Coordinates must be finite; [`IndexKind::build`](crate::IndexKind::build)
/// falls back to the brute-force scan when any is not.
pub struct RTreeIndex {
    tree: RTree<Entry>,
    entries: Vec<(AddressId, Position)>,
}

impl RTreeIndex {
    /// Index `addresses`; ranks follow their given order.
    pub fn new(addresses: &[Address]) -> Self {
        let entries: Vec<(AddressId, Position)> =
            addresses.iter().map(|a| (a.id, a.pos)).collect();
        let points: Vec<Entry> = entries
            .iter()
            .enumerate()
            .map(|(rank, (_, pos))| GeomWithData::new(pos.to_array(), rank))
            .collect();
        Self {
            tree: RTree::bulk_load(points),
            entries,
        }
    }
}

impl NearestIndex for RTreeIndex {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn nearest(&self, source: &Address, k: usize, exclude: &IndexSet<AddressId>) -> Vec<Nearest> {
        if k == 0 {
            return Vec::new();
        }
        let query = source.pos.to_array();
        let mut found: Vec<Nearest> = Vec::with_capacity(k);
        let mut cutoff: Option<f64> = None;

        for entry in self.tree.nearest_neighbor_iter(&query) {
            let rank = entry.data;
            let (id, pos) = self.entries[rank];
            if id == source.id || exclude.contains(&id) {
                continue;
            }
            // Recomputed so the value is bit-identical to the brute-force scan.
            let distance = source.pos.distance(&pos);
            if let Some(limit) = cutoff {
                if distance > limit {
                    break;
                }
            }
            found.push(Nearest {
                id,
                rank,
                pos,
                distance,
            });
            if cutoff.is_none() && found.len() == k {
                cutoff = Some(distance);
            }
        }

        found.sort_by(Nearest::cmp_by_distance);
        found.truncate(k);
        found
    }
}
