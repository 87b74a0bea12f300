//! Duplicate, overlap and dangling-reference checks.
//!
//! [`check_and_repair`] reports every finding against the layout as
//! loaded. The only mutation it performs is overlap removal: for each
//! unordered address pair, every line after the first one joining that
//! pair is removed. Removal is decided over the whole scan before any
//! line is dropped.

use std::fmt;

use fablink_core::{Address, AddressId, EdgeKey, Layout, Line, LineId, OverlapKind, Position};
use fablink_space::LayoutGraph;
use indexmap::{IndexMap, IndexSet};
use tracing::{info, warn};

use crate::config::{OverlapScan, RepairConfig};

// ── Findings ───────────────────────────────────────────────────────

/// The value a group of duplicate records share.
#[derive(Clone, Debug, PartialEq)]
pub enum DuplicateKey {
    /// Addresses sharing an id.
    AddressId(AddressId),
    /// Addresses sharing a name.
    AddressName(String),
    /// Addresses at bit-identical positions.
    Position(Position),
    /// Lines sharing an id.
    LineId(LineId),
    /// Lines sharing a name.
    LineName(String),
}

impl fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressId(id) => write!(f, "address id {id}"),
            Self::AddressName(name) => write!(f, "address name {name:?}"),
            Self::Position(pos) => write!(f, "position {pos}"),
            Self::LineId(id) => write!(f, "line id {id}"),
            Self::LineName(name) => write!(f, "line name {name:?}"),
        }
    }
}

/// Two or more records sharing a key that must be unique.
#[derive(Clone, Debug, PartialEq)]
pub struct DuplicateGroup {
    /// The shared value.
    pub key: DuplicateKey,
    /// Indices of the records in their collection, ascending.
    pub indices: Vec<usize>,
}

/// Two lines joining the same unordered pair of addresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlapFinding {
    /// Index of the earlier line.
    pub first: usize,
    /// Index of the later line, which is the one removed.
    pub second: usize,
    /// Id of the earlier line.
    pub first_id: LineId,
    /// Id of the later line.
    pub second_id: LineId,
    /// Same or opposite direction.
    pub kind: OverlapKind,
}

/// A line endpoint naming an address that does not exist.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DanglingReference {
    /// Index of the line in the loaded layout.
    pub index: usize,
    /// The line's id.
    pub line: LineId,
    /// The missing address id.
    pub missing: AddressId,
}

/// An address whose degree meets the high-degree threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct HighDegree {
    /// The address id as it appears in lines.
    pub id: AddressId,
    /// Degree over the repaired line set.
    pub degree: usize,
    /// The address record, or `None` if no address has this id.
    pub address: Option<Address>,
}

/// Everything [`check_and_repair`] found and did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct IntegrityReport {
    /// Address groups sharing an id, a name, or a position.
    pub duplicate_addresses: Vec<DuplicateGroup>,
    /// Line groups sharing an id or a name.
    pub duplicate_lines: Vec<DuplicateGroup>,
    /// Overlapping line pairs, sorted by `(first, second)`.
    pub overlaps: Vec<OverlapFinding>,
    /// Line endpoints that reference missing addresses.
    pub dangling: Vec<DanglingReference>,
    /// High-degree addresses, highest degree first.
    pub high_degree: Vec<HighDegree>,
    /// Ids of the removed lines, in their original order.
    pub removed: Vec<LineId>,
}

impl IntegrityReport {
    /// `true` iff the loaded layout had no duplicates, overlaps or
    /// dangling references. High-degree addresses do not fail the check.
    pub fn passed(&self) -> bool {
        self.duplicate_addresses.is_empty()
            && self.duplicate_lines.is_empty()
            && self.overlaps.is_empty()
            && self.dangling.is_empty()
    }
}

// ── Duplicates ─────────────────────────────────────────────────────

fn groups_by<T, K, F>(items: &[T], key_of: F) -> IndexMap<K, Vec<usize>>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut groups: IndexMap<K, Vec<usize>> = IndexMap::new();
    for (i, item) in items.iter().enumerate() {
        groups.entry(key_of(item)).or_default().push(i);
    }
    groups.retain(|_, members| members.len() > 1);
    groups
}

fn duplicate_addresses(addresses: &[Address]) -> Vec<DuplicateGroup> {
    let mut out = Vec::new();
    out.extend(
        groups_by(addresses, |a| a.id)
            .into_iter()
            .map(|(id, indices)| DuplicateGroup {
                key: DuplicateKey::AddressId(id),
                indices,
            }),
    );
    out.extend(
        groups_by(addresses, |a| a.name.clone())
            .into_iter()
            .map(|(name, indices)| DuplicateGroup {
                key: DuplicateKey::AddressName(name),
                indices,
            }),
    );
    out.extend(
        groups_by(addresses, |a| a.pos.bits_key())
            .into_iter()
            .map(|(_, indices)| DuplicateGroup {
                key: DuplicateKey::Position(addresses[indices[0]].pos),
                indices,
            }),
    );
    out
}

fn duplicate_lines(lines: &[Line]) -> Vec<DuplicateGroup> {
    let mut out = Vec::new();
    out.extend(
        groups_by(lines, |l| l.id)
            .into_iter()
            .map(|(id, indices)| DuplicateGroup {
                key: DuplicateKey::LineId(id),
                indices,
            }),
    );
    out.extend(
        groups_by(lines, |l| l.name.clone())
            .into_iter()
            .map(|(name, indices)| DuplicateGroup {
                key: DuplicateKey::LineName(name),
                indices,
            }),
    );
    out
}

// ── Overlaps ───────────────────────────────────────────────────────

fn finding(lines: &[Line], first: usize, second: usize, kind: OverlapKind) -> OverlapFinding {
    OverlapFinding {
        first,
        second,
        first_id: lines[first].id,
        second_id: lines[second].id,
        kind,
    }
}

fn overlaps_pairwise(lines: &[Line]) -> Vec<OverlapFinding> {
    let mut out = Vec::new();
    for i in 0..lines.len() {
        for j in (i + 1)..lines.len() {
            if let Some(kind) = lines[i].overlap_with(&lines[j]) {
                out.push(finding(lines, i, j, kind));
            }
        }
    }
    out
}

fn overlaps_indexed(lines: &[Line]) -> Vec<OverlapFinding> {
    let mut buckets: IndexMap<EdgeKey, Vec<usize>> = IndexMap::new();
    for (i, line) in lines.iter().enumerate() {
        buckets.entry(line.key()).or_default().push(i);
    }
    let mut out = Vec::new();
    for members in buckets.values().filter(|m| m.len() > 1) {
        for (n, &i) in members.iter().enumerate() {
            for &j in &members[n + 1..] {
                if let Some(kind) = lines[i].overlap_with(&lines[j]) {
                    out.push(finding(lines, i, j, kind));
                }
            }
        }
    }
    out.sort_by_key(|f| (f.first, f.second));
    out
}

// ── Dangling references ────────────────────────────────────────────

fn dangling_references(addresses: &[Address], lines: &[Line]) -> Vec<DanglingReference> {
    let known: IndexSet<AddressId> = addresses.iter().map(|a| a.id).collect();
    let mut out = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let (from, to) = line.endpoints();
        let mut check = |missing: AddressId| {
            if !known.contains(&missing) {
                out.push(DanglingReference {
                    index,
                    line: line.id,
                    missing,
                });
            }
        };
        check(from);
        if to != from {
            check(to);
        }
    }
    out
}

// ── check_and_repair ───────────────────────────────────────────────

/// Check `layout` and remove overlapping lines.
///
/// Returns the report and the repaired layout. Addresses are never
/// modified; duplicate and dangling findings are advisory here and are
/// acted on by the caller.
pub fn check_and_repair(layout: Layout, config: &RepairConfig) -> (IntegrityReport, Layout) {
    let Layout { addresses, lines } = layout;

    let duplicate_addresses = duplicate_addresses(&addresses);
    let duplicate_lines = duplicate_lines(&lines);
    let dangling = dangling_references(&addresses, &lines);
    let overlaps = match config.overlap_scan {
        OverlapScan::Pairwise => overlaps_pairwise(&lines),
        OverlapScan::CanonicalIndex => overlaps_indexed(&lines),
    };

    for group in &duplicate_addresses {
        warn!(key = %group.key, indices = ?group.indices, "duplicate addresses");
    }
    for group in &duplicate_lines {
        warn!(key = %group.key, indices = ?group.indices, "duplicate lines");
    }
    for d in &dangling {
        warn!(line = %d.line, missing = %d.missing, "line references missing address");
    }
    for o in &overlaps {
        warn!(kept = %o.first_id, removed = %o.second_id, kind = %o.kind, "overlapping lines");
    }

    let doomed: IndexSet<usize> = overlaps.iter().map(|o| o.second).collect();
    let mut removed = Vec::with_capacity(doomed.len());
    let mut kept = Vec::with_capacity(lines.len() - doomed.len());
    for (i, line) in lines.into_iter().enumerate() {
        if doomed.contains(&i) {
            removed.push(line.id);
        } else {
            kept.push(line);
        }
    }

    let graph = LayoutGraph::new(Layout::new(addresses, kept));
    let mut high_degree: Vec<HighDegree> = graph
        .degrees()
        .filter(|&(_, degree)| degree >= config.high_degree_threshold)
        .map(|(id, degree)| HighDegree {
            id,
            degree,
            address: graph.address(id).cloned(),
        })
        .collect();
    high_degree.sort_by(|a, b| b.degree.cmp(&a.degree));
    for h in &high_degree {
        info!(address = %h.id, degree = h.degree, "high-degree address");
    }

    let report = IntegrityReport {
        duplicate_addresses,
        duplicate_lines,
        overlaps,
        dangling,
        high_degree,
        removed,
    };
    info!(
        passed = report.passed(),
        removed = report.removed.len(),
        lines = graph.line_count(),
        "integrity check complete"
    );
    (report, graph.into_layout())
}
