//! In-process snapshot store.

use fablink_core::Layout;

use crate::error::StoreError;
use crate::SnapshotStore;

/// Keeps the persisted snapshot in memory.
///
/// Loads return a clone, so a stage holding a loaded layout never aliases
/// the stored one. `saves()` counts successful saves so tests can check
/// that each stage persisted exactly once.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<Layout>,
    saves: usize,
}

impl MemoryStore {
    /// An empty store; `load` fails until something is saved.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `layout` (not counted as a save).
    pub fn with_layout(layout: Layout) -> Self {
        Self {
            snapshot: Some(layout),
            saves: 0,
        }
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// The stored snapshot, if any.
    pub fn snapshot(&self) -> Option<&Layout> {
        self.snapshot.as_ref()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Layout, StoreError> {
        self.snapshot.clone().ok_or(StoreError::Empty)
    }

    fn save(&mut self, layout: &Layout) -> Result<(), StoreError> {
        self.snapshot = Some(layout.clone());
        self.saves += 1;
        Ok(())
    }
}
