//! Undirected adjacency and breadth-first shortest paths.

use std::collections::VecDeque;

use fablink_core::{AddressId, Layout, Line};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::debug;

/// Neighbour lists derived from a line set.
///
/// Each line appends its far end to both endpoints' lists, in line order,
/// so repeated lines produce repeated entries. Only ids that appear in a
/// line have an entry; addresses are not consulted.
#[derive(Clone, Debug, Default)]
pub struct Adjacency {
    lists: IndexMap<AddressId, SmallVec<[AddressId; 4]>>,
}

impl Adjacency {
    /// Build the adjacency for `lines`.
    pub fn from_lines(lines: &[Line]) -> Self {
        let mut lists: IndexMap<AddressId, SmallVec<[AddressId; 4]>> = IndexMap::new();
        for line in lines {
            let (from, to) = line.endpoints();
            lists.entry(from).or_default().push(to);
            lists.entry(to).or_default().push(from);
        }
        Self { lists }
    }

    /// Build the adjacency for a layout's lines.
    pub fn from_layout(layout: &Layout) -> Self {
        Self::from_lines(&layout.lines)
    }

    /// Returns `true` if `id` appears in any line.
    pub fn contains(&self, id: AddressId) -> bool {
        self.lists.contains_key(&id)
    }

    /// `id`'s neighbour list in line order; empty for unknown ids.
    pub fn neighbours(&self, id: AddressId) -> &[AddressId] {
        self.lists.get(&id).map(|l| l.as_slice()).unwrap_or(&[])
    }

    /// Number of ids with an entry.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns `true` if there are no lines.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

impl From<&Layout> for Adjacency {
    fn from(layout: &Layout) -> Self {
        Self::from_layout(layout)
    }
}

/// Shortest path from `start` to `goal` as a vertex sequence.
///
/// Returns `Some(vec![start])` when `start == goal`, whether or not the id
/// is known. Returns `None` if either id has no adjacency entry or no
/// path exists. Among equal-length paths the one reached first in
/// breadth-first order over the neighbour lists wins.
///
/// ```
/// use fablink_core::{Address, AddressId, Line, LineId, Position};
/// use fablink_sim::{shortest_path, Adjacency};
///
/// let a: Vec<Address> = (1..=3)
///     .map(|i| Address::new(AddressId(i), format!("ADDR_{i}"), Position::default()))
///     .collect();
/// let lines = vec![
///     Line::connecting(LineId(1), &a[0], &a[1]),
///     Line::connecting(LineId(2), &a[1], &a[2]),
/// ];
/// let adj = Adjacency::from_lines(&lines);
/// assert_eq!(
///     shortest_path(&adj, AddressId(3), AddressId(1)),
///     Some(vec![AddressId(3), AddressId(2), AddressId(1)])
/// );
/// ```
pub fn shortest_path(adj: &Adjacency, start: AddressId, goal: AddressId) -> Option<Vec<AddressId>> {
    if start == goal {
        return Some(vec![start]);
    }
    if !adj.contains(start) || !adj.contains(goal) {
        debug!(%start, %goal, "endpoint not in adjacency");
        return None;
    }

    // Parent of every discovered node; the start maps to itself.
    let mut parent: IndexMap<AddressId, AddressId> = IndexMap::new();
    parent.insert(start, start);
    let mut queue = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for &next in adj.neighbours(current) {
            if parent.contains_key(&next) {
                continue;
            }
            parent.insert(next, current);
            if next == goal {
                let path = unwind(&parent, start, goal);
                debug!(%start, %goal, hops = path.len() - 1, "path found");
                return Some(path);
            }
            queue.push_back(next);
        }
    }
    debug!(%start, %goal, "no path");
    None
}

fn unwind(parent: &IndexMap<AddressId, AddressId>, start: AddressId, goal: AddressId) -> Vec<AddressId> {
    let mut path = vec![goal];
    let mut node = goal;
    while node != start {
        match parent.get(&node) {
            Some(&p) => {
                path.push(p);
                node = p;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use fablink_test_utils::fixtures::scenario_d;
    use fablink_test_utils::{arb_layout, reference_distance, LayoutBuilder};
    use proptest::prelude::*;

    fn ids(path: Option<Vec<AddressId>>) -> Option<Vec<u64>> {
        path.map(|p| p.into_iter().map(|a| a.0).collect())
    }

    #[test]
    fn path_graph() {
        let adj = Adjacency::from_layout(&scenario_d());
        assert_eq!(ids(shortest_path(&adj, AddressId(1), AddressId(4))), Some(vec![1, 2, 3, 4]));
        assert_eq!(ids(shortest_path(&adj, AddressId(1), AddressId(1))), Some(vec![1]));
        assert_eq!(shortest_path(&adj, AddressId(1), AddressId(99)), None);
        assert_eq!(shortest_path(&adj, AddressId(99), AddressId(1)), None);
    }

    #[test]
    fn same_unknown_id_is_trivial_path() {
        let adj = Adjacency::default();
        assert_eq!(ids(shortest_path(&adj, AddressId(7), AddressId(7))), Some(vec![7]));
    }

    #[test]
    fn disconnected_components_have_no_path() {
        let layout = LayoutBuilder::new()
            .address(1, [0.0; 3])
            .address(2, [1.0, 0.0, 0.0])
            .address(3, [5.0, 0.0, 0.0])
            .address(4, [6.0, 0.0, 0.0])
            .line(1, 1, 2)
            .line(2, 3, 4)
            .build();
        let adj = Adjacency::from_layout(&layout);
        assert_eq!(shortest_path(&adj, AddressId(1), AddressId(4)), None);
    }

    #[test]
    fn ties_follow_line_order() {
        // Square 1-2-4 and 1-3-4; the 1-2 line comes first.
        let layout = LayoutBuilder::new()
            .line(1, 1, 2)
            .line(2, 3, 1)
            .line(3, 2, 4)
            .line(4, 4, 3)
            .build();
        let adj = Adjacency::from_layout(&layout);
        assert_eq!(ids(shortest_path(&adj, AddressId(1), AddressId(4))), Some(vec![1, 2, 4]));
        assert_eq!(adj.neighbours(AddressId(1)), &[AddressId(2), AddressId(3)]);
    }

    #[test]
    fn repeated_lines_repeat_neighbours() {
        let layout = LayoutBuilder::new().line(1, 1, 2).line(2, 2, 1).build();
        let adj = Adjacency::from_layout(&layout);
        assert_eq!(adj.neighbours(AddressId(1)), &[AddressId(2), AddressId(2)]);
        assert!(adj.neighbours(AddressId(9)).is_empty());
    }

    proptest! {
        #[test]
        fn bfs_is_minimal(layout in arb_layout(10, 14), s in 1u64..=10, g in 1u64..=10) {
            let adj = Adjacency::from_layout(&layout);
            let (start, goal) = (AddressId(s), AddressId(g));
            let found = shortest_path(&adj, start, goal);
            let expected = if start == goal {
                Some(0)
            } else {
                reference_distance(&layout.lines, start, goal)
            };
            prop_assert_eq!(found.as_ref().map(|p| p.len() - 1), expected);
            if let Some(path) = found {
                prop_assert_eq!(path.first(), Some(&start));
                prop_assert_eq!(path.last(), Some(&goal));
                for hop in path.windows(2) {
                    prop_assert!(adj.neighbours(hop[0]).contains(&hop[1]));
                }
            }
        }
    }
}
