//! Test utilities and layout fixtures for fablink development.
//!
//! Provides [`LayoutBuilder`] for terse layout construction, the standard
//! scenario fixtures in [`fixtures`], a reference shortest-path distance
//! independent of the simulator, and proptest strategies for random
//! layouts.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::{HashMap, VecDeque};

use fablink_core::{Address, AddressId, Layout, Line, LineId, Position};
use proptest::prelude::*;

/// Builder for layouts in tests.
///
/// Addresses get the conventional `ADDR_{id}` name unless one is given.
/// Lines snapshot the positions of addresses added before them; an
/// endpoint that was never added is placed at the origin, which is how
/// tests construct dangling references.
#[derive(Clone, Debug, Default)]
pub struct LayoutBuilder {
    addresses: Vec<Address>,
    lines: Vec<Line>,
}

impl LayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn address(self, id: u64, pos: [f64; 3]) -> Self {
        self.address_named(id, format!("ADDR_{id}"), pos)
    }

    pub fn address_named(mut self, id: u64, name: impl Into<String>, pos: [f64; 3]) -> Self {
        self.addresses
            .push(Address::new(AddressId(id), name, Position::from(pos)));
        self
    }

    fn endpoint(&self, id: u64) -> Address {
        self.addresses
            .iter()
            .find(|a| a.id == AddressId(id))
            .cloned()
            .unwrap_or_else(|| Address::new(AddressId(id), format!("ADDR_{id}"), Position::default()))
    }

    /// Append a line `from -> to` with the conventional name.
    pub fn line(mut self, id: u64, from: u64, to: u64) -> Self {
        let line = Line::connecting(LineId(id), &self.endpoint(from), &self.endpoint(to));
        self.lines.push(line);
        self
    }

    /// Append a fully specified line.
    pub fn raw_line(mut self, line: Line) -> Self {
        self.lines.push(line);
        self
    }

    pub fn build(self) -> Layout {
        Layout::new(self.addresses, self.lines)
    }
}

/// Graph distance in edges from `start` to `goal`, or `None` if
/// unreachable or either id appears in no line.
///
/// Independent of the simulator's adjacency: a plain queue over a
/// `HashMap` of neighbour lists.
pub fn reference_distance(lines: &[Line], start: AddressId, goal: AddressId) -> Option<usize> {
    let mut adj: HashMap<AddressId, Vec<AddressId>> = HashMap::new();
    for line in lines {
        adj.entry(line.from_address).or_default().push(line.to_address);
        adj.entry(line.to_address).or_default().push(line.from_address);
    }
    if !adj.contains_key(&start) || !adj.contains_key(&goal) {
        return None;
    }
    let mut dist: HashMap<AddressId, usize> = HashMap::new();
    dist.insert(start, 0);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        let d = dist[&node];
        if node == goal {
            return Some(d);
        }
        for &next in &adj[&node] {
            if !dist.contains_key(&next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Random layouts with ids `1..=n` on a small integer grid.
///
/// The grid is coarse on purpose so that distance ties and coincident
/// positions are common. Lines never self-loop but may repeat or reverse
/// each other.
pub fn arb_layout(max_addresses: usize, max_lines: usize) -> impl Strategy<Value = Layout> {
    (1..=max_addresses)
        .prop_flat_map(move |n| {
            let coords = prop::collection::vec((0u8..6, 0u8..6, 0u8..2), n);
            let pairs = prop::collection::vec((1..=n as u64, 1..=n as u64), 0..=max_lines);
            (coords, pairs)
        })
        .prop_map(|(coords, pairs)| {
            let mut builder = LayoutBuilder::new();
            for (i, (x, y, z)) in coords.into_iter().enumerate() {
                builder = builder.address(i as u64 + 1, [x as f64, y as f64, z as f64 * 10.0]);
            }
            let mut next_id = 1;
            for (a, b) in pairs.into_iter().filter(|(a, b)| a != b) {
                builder = builder.line(next_id, a, b);
                next_id += 1;
            }
            builder.build()
        })
}
