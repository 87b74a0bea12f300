//! In-memory address/line graph with O(1) degree and adjacency lookups.

use fablink_core::{Address, AddressId, EdgeKey, Layout, Line, LineId};
use indexmap::{IndexMap, IndexSet};

/// Addresses partitioned by degree.
///
/// Addresses of degree two or more appear in neither list. Both lists
/// keep the layout's address order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    /// Degree-0 addresses (appear in no line).
    pub unused: Vec<Address>,
    /// Degree-1 addresses.
    pub endpoints: Vec<Address>,
}

/// A layout snapshot with derived lookup tables.
///
/// Lines appended through [`push_line`](Self::push_line) update every
/// table immediately, so [`edge_exists`](Self::edge_exists) sees both the
/// lines the graph was loaded with and lines added since.
///
/// Degree counts line endpoint appearances: a self-loop adds two to its
/// address, and lines naming an id that is not an address still count
/// toward that id. The graph never validates references.
///
/// # Examples
///
/// ```
/// use fablink_core::{Address, AddressId, Layout, Line, LineId, Position};
/// use fablink_space::LayoutGraph;
///
/// let a = Address::new(AddressId(1), "A", Position::new(0.0, 0.0, 0.0));
/// let b = Address::new(AddressId(2), "B", Position::new(1.0, 0.0, 0.0));
/// let line = Line::connecting(LineId(10), &a, &b);
/// let graph = LayoutGraph::new(Layout::new(vec![a, b], vec![line]));
///
/// assert_eq!(graph.degree(AddressId(1)), 1);
/// assert!(graph.edge_exists(AddressId(2), AddressId(1)));
/// assert_eq!(graph.classify().endpoints.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LayoutGraph {
    addresses: Vec<Address>,
    lines: Vec<Line>,
    address_index: IndexMap<AddressId, usize>,
    degree: IndexMap<AddressId, usize>,
    adjacency: IndexMap<AddressId, IndexSet<AddressId>>,
    edges: IndexMap<EdgeKey, usize>,
}

impl LayoutGraph {
    /// Build the lookup tables for `layout`.
    ///
    /// If address ids repeat, lookups by id resolve to the first one.
    pub fn new(layout: Layout) -> Self {
        let Layout { addresses, lines } = layout;
        let mut address_index = IndexMap::with_capacity(addresses.len());
        for (i, addr) in addresses.iter().enumerate() {
            address_index.entry(addr.id).or_insert(i);
        }
        let mut graph = Self {
            addresses,
            lines: Vec::with_capacity(lines.len()),
            address_index,
            degree: IndexMap::new(),
            adjacency: IndexMap::new(),
            edges: IndexMap::new(),
        };
        for line in lines {
            graph.push_line(line);
        }
        graph
    }

    /// All addresses in layout order.
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// All lines: loaded lines first, then appended ones.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Look up an address by id.
    pub fn address(&self, id: AddressId) -> Option<&Address> {
        self.address_index.get(&id).map(|&i| &self.addresses[i])
    }

    /// Returns `true` if `id` names an address in this layout.
    pub fn contains_address(&self, id: AddressId) -> bool {
        self.address_index.contains_key(&id)
    }

    /// Number of line endpoints equal to `id`.
    pub fn degree(&self, id: AddressId) -> usize {
        self.degree.get(&id).copied().unwrap_or(0)
    }

    /// Degree of every id that appears in at least one line, in first-appearance order.
    pub fn degrees(&self) -> impl Iterator<Item = (AddressId, usize)> + '_ {
        self.degree.iter().map(|(&id, &d)| (id, d))
    }

    /// Every address directly connected to `id`, in connection order.
    pub fn neighbours(&self, id: AddressId) -> IndexSet<AddressId> {
        self.adjacency.get(&id).cloned().unwrap_or_default()
    }

    /// Returns `true` if any line joins `a` and `b`, in either direction.
    pub fn edge_exists(&self, a: AddressId, b: AddressId) -> bool {
        self.edges.contains_key(&EdgeKey::new(a, b))
    }

    /// Partition addresses into degree-0 and degree-1 lists.
    pub fn classify(&self) -> Classification {
        let mut out = Classification::default();
        for addr in &self.addresses {
            match self.degree(addr.id) {
                0 => out.unused.push(addr.clone()),
                1 => out.endpoints.push(addr.clone()),
                _ => {}
            }
        }
        out
    }

    /// Largest line id, or `None` if there are no lines.
    pub fn max_line_id(&self) -> Option<LineId> {
        self.lines.iter().map(|l| l.id).max()
    }

    /// Append a line and update degree, adjacency and edge tables.
    pub fn push_line(&mut self, line: Line) {
        let (from, to) = line.endpoints();
        *self.degree.entry(from).or_insert(0) += 1;
        *self.degree.entry(to).or_insert(0) += 1;
        self.adjacency.entry(from).or_default().insert(to);
        self.adjacency.entry(to).or_default().insert(from);
        *self.edges.entry(line.key()).or_insert(0) += 1;
        self.lines.push(line);
    }

    /// Give the snapshot back, with appended lines after the loaded ones.
    pub fn into_layout(self) -> Layout {
        Layout::new(self.addresses, self.lines)
    }
}

impl From<Layout> for LayoutGraph {
    fn from(layout: Layout) -> Self {
        Self::new(layout)
    }
}
