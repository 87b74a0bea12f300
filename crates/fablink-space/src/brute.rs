//! Linear-scan nearest-neighbour index.

use crate::index::{Nearest, NearestIndex};
use fablink_core::{Address, AddressId, Position};
use indexmap::IndexSet;

/// Reference [`NearestIndex`]: computes every distance on every query.
///
/// O(n log n) per query, which is fine for layouts of a few thousand
/// addresses. Its output defines the ordering every other backend must
/// reproduce.
///
/// # Examples
///
/// ```
/// use fablink_core::{Address, AddressId, Position};
/// use fablink_space::{BruteForceIndex, NearestIndex};
/// use indexmap::IndexSet;
///
/// let addrs = vec![
///     Address::new(AddressId(1), "A", Position::new(0.0, 0.0, 0.0)),
///     Address::new(AddressId(2), "B", Position::new(10.0, 0.0, 0.0)),
///     Address::new(AddressId(3), "C", Position::new(0.0, 10.0, 0.0)),
/// ];
/// let index = BruteForceIndex::new(&addrs);
/// let found = index.nearest(&addrs[0], 2, &IndexSet::new());
///
/// // Equal distances keep input order.
/// assert_eq!(found[0].id, AddressId(2));
/// assert_eq!(found[1].id, AddressId(3));
/// assert_eq!(found[0].distance, 10.0);
/// ```
#[derive(Clone, Debug)]
pub struct BruteForceIndex {
    entries: Vec<(AddressId, Position)>,
}

impl BruteForceIndex {
    /// Index `addresses` in their given order.
    pub fn new(addresses: &[Address]) -> Self {
        Self {
            entries: addresses.iter().map(|a| (a.id, a.pos)).collect(),
        }
    }
}

impl NearestIndex for BruteForceIndex {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn nearest(&self, source: &Address, k: usize, exclude: &IndexSet<AddressId>) -> Vec<Nearest> {
        if k == 0 {
            return Vec::new();
        }
        let mut found: Vec<Nearest> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, (id, _))| *id != source.id && !exclude.contains(id))
            .map(|(rank, &(id, pos))| Nearest {
                id,
                rank,
                pos,
                distance: source.pos.distance(&pos),
            })
            .collect();
        // Stable sort: equal distances keep rank order.
        found.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        found.truncate(k);
        found
    }
}
