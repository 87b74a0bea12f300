//! NearestIndex compliance test helpers.
//!
//! These functions verify that an index backend satisfies the ordering
//! contract of [`NearestIndex`]. Reused by every backend's test module.

use crate::brute::BruteForceIndex;
use crate::index::NearestIndex;
use fablink_core::{Address, AddressId, Position};
use indexmap::IndexSet;

/// A 4x4x2 integer grid: every interior query has many exact ties.
pub fn tie_heavy_grid() -> Vec<Address> {
    let mut out = Vec::new();
    let mut id = 100;
    for z in 0..2 {
        for y in 0..4 {
            for x in 0..4 {
                out.push(Address::new(
                    AddressId(id),
                    format!("ADDR_{id}"),
                    Position::new(x as f64, y as f64, z as f64),
                ));
                id += 1;
            }
        }
    }
    out
}

/// Assert results are sorted by distance, then by rank.
pub fn assert_sorted(index: &dyn NearestIndex, addrs: &[Address]) {
    for source in addrs {
        let found = index.nearest(source, addrs.len(), &IndexSet::new());
        for pair in found.windows(2) {
            assert!(
                pair[0].cmp_by_distance(&pair[1]).is_lt(),
                "results for {} out of order: {:?} then {:?}",
                source.id,
                pair[0],
                pair[1]
            );
        }
    }
}

/// Assert the source and excluded ids never appear.
pub fn assert_excludes(index: &dyn NearestIndex, addrs: &[Address]) {
    let exclude: IndexSet<AddressId> = addrs.iter().step_by(3).map(|a| a.id).collect();
    for source in addrs {
        for n in index.nearest(source, addrs.len(), &exclude) {
            assert_ne!(n.id, source.id, "source {} returned itself", source.id);
            assert!(!exclude.contains(&n.id), "excluded {} returned", n.id);
        }
    }
}

/// Assert `min(k, eligible)` results come back for every k.
pub fn assert_counts(index: &dyn NearestIndex, addrs: &[Address]) {
    let eligible = addrs.len().saturating_sub(1);
    for source in addrs.iter().take(4) {
        for k in 0..=addrs.len() + 1 {
            assert_eq!(
                index.nearest(source, k, &IndexSet::new()).len(),
                k.min(eligible),
                "wrong result count for k={k}"
            );
        }
    }
}

/// Assert exact agreement with the brute-force reference.
pub fn assert_matches_brute_force(index: &dyn NearestIndex, addrs: &[Address]) {
    let reference = BruteForceIndex::new(addrs);
    for source in addrs {
        for k in [1, 2, 3, 7] {
            assert_eq!(
                index.nearest(source, k, &IndexSet::new()),
                reference.nearest(source, k, &IndexSet::new()),
                "backend disagrees with brute force for source {} k={k}",
                source.id
            );
        }
    }
}

/// Run all compliance checks. `index` must be built over [`tie_heavy_grid`].
pub fn run_full_compliance(index: &dyn NearestIndex) {
    let addrs = tie_heavy_grid();
    assert_eq!(index.len(), addrs.len());
    assert_sorted(index, &addrs);
    assert_excludes(index, &addrs);
    assert_counts(index, &addrs);
    assert_matches_brute_force(index, &addrs);
}
