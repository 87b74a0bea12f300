//! The two connectivity repair passes.
//!
//! Both passes share one shape: classify the graph once at pass start,
//! walk the chosen addresses in layout order, and append lines through a
//! [`LayoutGraph`] so every edge-existence check sees the lines persisted
//! before the pass as well as those added earlier in the same pass.

use fablink_core::{Address, AddressId, Layout, Line, LineId};
use fablink_space::{LayoutGraph, Nearest, NearestIndex};
use indexmap::IndexSet;
use tracing::{debug, info, warn};

use crate::config::RepairConfig;

// ── LineIdAllocator ────────────────────────────────────────────────

/// Hands out fresh, strictly increasing line ids.
///
/// The first id is one past `max(floor, largest existing id)`. Once
/// `u64::MAX` has been handed out the allocator is exhausted and every
/// later call returns `None`; an id is never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineIdAllocator {
    next: Option<LineId>,
}

impl LineIdAllocator {
    /// Seed an allocator past `floor` and `max_existing`.
    pub fn new(floor: u64, max_existing: Option<LineId>) -> Self {
        let base = max_existing.map_or(floor, |id| id.0.max(floor));
        Self {
            next: base.checked_add(1).map(LineId),
        }
    }

    /// Seed an allocator for the lines already in `graph`.
    pub fn for_graph(floor: u64, graph: &LayoutGraph) -> Self {
        Self::new(floor, graph.max_line_id())
    }

    /// The id the next call to [`allocate`](Self::allocate) returns.
    pub fn peek(&self) -> Option<LineId> {
        self.next
    }

    /// Returns `true` if no ids are left.
    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }

    /// Take the next id, or `None` if the id space is used up.
    pub fn allocate(&mut self) -> Option<LineId> {
        let id = self.next?;
        self.next = id.next();
        Some(id)
    }
}

// ── PassReport ─────────────────────────────────────────────────────

/// What a repair pass did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Addresses the pass considered (degree 0 for pass 1, degree 1 for pass 2).
    pub examined: usize,
    /// Ids of the lines the pass created, in creation order.
    pub created: Vec<LineId>,
    /// Candidates skipped because an edge to them already existed.
    pub skipped_existing: usize,
    /// Addresses left alone because too few candidates existed.
    pub without_candidates: usize,
    /// Addresses that lost at least one line because no line id was left.
    pub id_exhausted: Vec<AddressId>,
}

impl PassReport {
    /// Number of lines created.
    pub fn created_count(&self) -> usize {
        self.created.len()
    }
}

// ── Per-address steps ──────────────────────────────────────────────

fn candidate_address<'g>(graph: &'g LayoutGraph, hit: &Nearest) -> Option<&'g Address> {
    // Rank is the position in the order the index was built over.
    graph.addresses().get(hit.rank).filter(|a| a.id == hit.id)
}

fn append_line(
    graph: &mut LayoutGraph,
    ids: &mut LineIdAllocator,
    report: &mut PassReport,
    from: &Address,
    to: &Address,
    distance: f64,
) {
    let Some(id) = ids.allocate() else {
        warn!(from = %from.id, to = %to.id, "line ids exhausted, line not created");
        if report.id_exhausted.last() != Some(&from.id) {
            report.id_exhausted.push(from.id);
        }
        return;
    };
    let line = Line::connecting(id, from, to);
    debug!(line = %id, from = %from.id, to = %to.id, distance, "line created");
    graph.push_line(line);
    report.created.push(id);
}

/// Connect one unused address to its `fanout` nearest neighbours.
///
/// Nothing happens unless `fanout` candidates exist. Each candidate is
/// then checked on its own: if an edge to it already exists it is skipped
/// and no substitute is tried.
pub fn connect_unused_address(
    graph: &mut LayoutGraph,
    index: &dyn NearestIndex,
    address: &Address,
    fanout: usize,
    ids: &mut LineIdAllocator,
    report: &mut PassReport,
) {
    report.examined += 1;
    let hits = index.nearest(address, fanout, &IndexSet::new());
    if hits.len() < fanout {
        debug!(
            address = %address.id,
            found = hits.len(),
            wanted = fanout,
            "too few candidates"
        );
        report.without_candidates += 1;
        return;
    }
    for hit in &hits {
        if graph.edge_exists(address.id, hit.id) {
            debug!(from = %address.id, to = %hit.id, "edge exists, skipped");
            report.skipped_existing += 1;
            continue;
        }
        let Some(candidate) = candidate_address(graph, hit).cloned() else {
            continue;
        };
        append_line(graph, ids, report, address, &candidate, hit.distance);
    }
}

/// Connect one endpoint to its nearest address it is not yet joined to.
///
/// The exclusion set is the address's live neighbour set, so lines added
/// earlier in the same pass are honoured.
pub fn connect_endpoint(
    graph: &mut LayoutGraph,
    index: &dyn NearestIndex,
    address: &Address,
    ids: &mut LineIdAllocator,
    report: &mut PassReport,
) {
    report.examined += 1;
    let exclude: IndexSet<AddressId> = graph.neighbours(address.id);
    let Some(hit) = index.nearest_one(address, &exclude) else {
        debug!(address = %address.id, "no candidate");
        report.without_candidates += 1;
        return;
    };
    if graph.edge_exists(address.id, hit.id) {
        debug!(from = %address.id, to = %hit.id, "edge exists, skipped");
        report.skipped_existing += 1;
        return;
    }
    let Some(candidate) = candidate_address(graph, &hit).cloned() else {
        report.without_candidates += 1;
        return;
    };
    append_line(graph, ids, report, address, &candidate, hit.distance);
}

// ── Passes ─────────────────────────────────────────────────────────

/// Pass 1: connect every degree-0 address to its nearest neighbours.
///
/// The unused set is computed once from `layout`; addresses that gain
/// lines while the pass runs are still processed.
///
/// # Examples
///
/// ```
/// use fablink_core::{Address, AddressId, Layout, Position};
/// use fablink_engine::{connect_unused, RepairConfig};
///
/// let addresses = vec![
///     Address::new(AddressId(1), "ADDR_1", Position::new(0.0, 0.0, 0.0)),
///     Address::new(AddressId(2), "ADDR_2", Position::new(10.0, 0.0, 0.0)),
///     Address::new(AddressId(3), "ADDR_3", Position::new(0.0, 10.0, 0.0)),
/// ];
/// let (layout, report) = connect_unused(Layout::new(addresses, vec![]), &RepairConfig::default());
/// assert_eq!(report.created_count(), 3);
/// assert_eq!(layout.lines[0].name, "LINE_1_2");
/// ```
pub fn connect_unused(layout: Layout, config: &RepairConfig) -> (Layout, PassReport) {
    let mut graph = LayoutGraph::new(layout);
    let unused = graph.classify().unused;
    let index = config.index.build(graph.addresses());
    let mut ids = LineIdAllocator::for_graph(config.line_id_floor, &graph);
    let mut report = PassReport::default();

    for address in &unused {
        connect_unused_address(
            &mut graph,
            index.as_ref(),
            address,
            config.unused_fanout,
            &mut ids,
            &mut report,
        );
    }

    info!(
        unused = unused.len(),
        created = report.created_count(),
        skipped = report.skipped_existing,
        id_exhausted = report.id_exhausted.len(),
        lines = graph.line_count(),
        "unused pass complete"
    );
    (graph.into_layout(), report)
}

/// Pass 2: connect every degree-1 address to one more neighbour.
///
/// The endpoint set is computed once from `layout`, which must already
/// hold pass 1's lines. An endpoint that gained a second line earlier in
/// this pass is still processed, against its current neighbours.
pub fn connect_endpoints(layout: Layout, config: &RepairConfig) -> (Layout, PassReport) {
    let mut graph = LayoutGraph::new(layout);
    let endpoints = graph.classify().endpoints;
    let index = config.index.build(graph.addresses());
    let mut ids = LineIdAllocator::for_graph(config.line_id_floor, &graph);
    let mut report = PassReport::default();

    for address in &endpoints {
        connect_endpoint(&mut graph, index.as_ref(), address, &mut ids, &mut report);
    }

    info!(
        endpoints = endpoints.len(),
        created = report.created_count(),
        without_candidates = report.without_candidates,
        id_exhausted = report.id_exhausted.len(),
        lines = graph.line_count(),
        "endpoint pass complete"
    );
    (graph.into_layout(), report)
}
