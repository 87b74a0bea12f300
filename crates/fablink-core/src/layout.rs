//! Addresses and the [`Layout`] snapshot.

use crate::id::{AddressId, LineId};
use crate::line::Line;
use crate::position::Position;
use serde::{Deserialize, Serialize};

/// A spatial point of interest in the layout (a graph node).
///
/// Addresses are produced once by the geometry generator and are
/// read-only to every fablink stage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Unique address id.
    pub id: AddressId,
    /// External address code; the generator sets it equal to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<u64>,
    /// Unique address name, conventionally `ADDR_{id}`.
    pub name: String,
    /// Position in layout space.
    pub pos: Position,
}

impl Address {
    /// Create an address without an external address code.
    pub fn new(id: AddressId, name: impl Into<String>, pos: Position) -> Self {
        Self {
            id,
            address: None,
            name: name.into(),
            pos,
        }
    }
}

/// A persisted graph snapshot: addresses plus lines, in stored order.
///
/// Order is significant only for deterministic tie-breaking (nearest
/// neighbour ties, "later line wins removal" in overlap repair).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// All addresses, in stored order.
    #[serde(default)]
    pub addresses: Vec<Address>,
    /// All lines, in stored order.
    #[serde(default)]
    pub lines: Vec<Line>,
}

impl Layout {
    /// Create a layout from its two collections.
    pub fn new(addresses: Vec<Address>, lines: Vec<Line>) -> Self {
        Self { addresses, lines }
    }

    /// Largest line id present, or `None` for a line-free layout.
    pub fn max_line_id(&self) -> Option<LineId> {
        self.lines.iter().map(|l| l.id).max()
    }

    /// Look up an address by id with a linear scan.
    ///
    /// Stages that look up repeatedly build an index instead.
    pub fn address(&self, id: AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }

    /// Returns `true` if there are neither addresses nor lines.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty() && self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_collections_default_to_empty() {
        let layout: Layout = serde_json::from_str("{}").unwrap();
        assert!(layout.is_empty());

        let layout: Layout =
            serde_json::from_str(r#"{"addresses":[{"id":1,"name":"A","pos":{"x":0,"y":0,"z":0}}]}"#)
                .unwrap();
        assert_eq!(layout.addresses.len(), 1);
        assert!(layout.lines.is_empty());
    }

    #[test]
    fn address_code_round_trips_when_present() {
        let json = r#"{"id":100001,"address":100001,"name":"ADDR_100001","pos":{"x":1.5,"y":2.0,"z":6022.0}}"#;
        let addr: Address = serde_json::from_str(json).unwrap();
        assert_eq!(addr.address, Some(100001));
        let out = serde_json::to_value(&addr).unwrap();
        assert_eq!(out["address"], 100001);

        let bare = Address::new(AddressId(1), "A", Position::default());
        let out = serde_json::to_value(&bare).unwrap();
        assert!(out.get("address").is_none());
    }

    #[test]
    fn max_line_id_of_empty_layout_is_none() {
        assert_eq!(Layout::default().max_line_id(), None);
    }
}
