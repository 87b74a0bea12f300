//! Runs the stages against a snapshot store.
//!
//! Every stage loads the latest snapshot, computes, and saves. No layout
//! is carried between stages in memory, so pass 2 always classifies the
//! graph pass 1 actually persisted.

use fablink_core::Layout;
use fablink_store::SnapshotStore;
use tracing::{info, instrument};

use crate::config::RepairConfig;
use crate::connect::{connect_endpoints, connect_unused, PassReport};
use crate::error::{EngineError, Stage};
use crate::integrity::{check_and_repair, IntegrityReport};

/// Reports from both repair passes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Pass 1.
    pub unused: PassReport,
    /// Pass 2.
    pub endpoints: PassReport,
}

/// Reports from a full [`Pipeline::run_all`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineReport {
    /// Both repair passes.
    pub repair: RepairReport,
    /// The integrity stage.
    pub integrity: IntegrityReport,
}

/// Drives the repair and integrity stages over a [`SnapshotStore`].
///
/// ```
/// use fablink_core::{Address, AddressId, Layout, Position};
/// use fablink_engine::{Pipeline, RepairConfig};
/// use fablink_store::MemoryStore;
///
/// let addresses = (0..4)
///     .map(|i| Address::new(AddressId(i), format!("ADDR_{i}"), Position::new(i as f64, 0.0, 0.0)))
///     .collect();
/// let mut store = MemoryStore::with_layout(Layout::new(addresses, vec![]));
///
/// let report = Pipeline::new(&mut store, RepairConfig::default())?.run_all()?;
/// assert!(report.integrity.passed());
/// assert_eq!(store.saves(), 3);
/// # Ok::<(), fablink_engine::EngineError>(())
/// ```
pub struct Pipeline<'a, S> {
    store: S,
    config: RepairConfig,
    export: Option<Box<dyn SnapshotStore + 'a>>,
}

impl<'a, S: SnapshotStore> Pipeline<'a, S> {
    /// Validate `config` and wrap `store`.
    pub fn new(store: S, config: RepairConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            export: None,
        })
    }

    /// Also save the integrity stage's result to `export`.
    ///
    /// The export is a mirror written after the primary store commits,
    /// and only when that commit succeeded. An export failure is reported
    /// as [`Stage::Export`] and leaves the primary snapshot committed; the
    /// export itself keeps its previous content. Rerunning
    /// [`run_integrity_check`](Self::run_integrity_check) on the committed
    /// snapshot removes nothing and retries the export.
    pub fn with_export(mut self, export: impl SnapshotStore + 'a) -> Self {
        self.export = Some(Box::new(export));
        self
    }

    /// The active config.
    pub fn config(&self) -> &RepairConfig {
        &self.config
    }

    /// The primary store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the primary store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn load(&self, stage: Stage) -> Result<Layout, EngineError> {
        self.store
            .load()
            .map_err(|source| EngineError::Stage { stage, source })
    }

    fn save(&mut self, stage: Stage, layout: &Layout) -> Result<(), EngineError> {
        self.store
            .save(layout)
            .map_err(|source| EngineError::Stage { stage, source })
    }

    /// Pass 1: connect degree-0 addresses, then save.
    #[instrument(name = "unused_pass", skip_all)]
    pub fn run_unused_pass(&mut self) -> Result<PassReport, EngineError> {
        let layout = self.load(Stage::UnusedPass)?;
        let (layout, report) = connect_unused(layout, &self.config);
        self.save(Stage::UnusedPass, &layout)?;
        Ok(report)
    }

    /// Pass 2: connect degree-1 addresses, then save.
    #[instrument(name = "endpoint_pass", skip_all)]
    pub fn run_endpoint_pass(&mut self) -> Result<PassReport, EngineError> {
        let layout = self.load(Stage::EndpointPass)?;
        let (layout, report) = connect_endpoints(layout, &self.config);
        self.save(Stage::EndpointPass, &layout)?;
        Ok(report)
    }

    /// Both repair passes, with a save and reload between them.
    pub fn run_repair(&mut self) -> Result<RepairReport, EngineError> {
        let unused = self.run_unused_pass()?;
        let endpoints = self.run_endpoint_pass()?;
        info!(
            created = unused.created_count() + endpoints.created_count(),
            "repair complete"
        );
        Ok(RepairReport { unused, endpoints })
    }

    /// Check integrity, remove overlaps, then save (and export).
    ///
    /// With `reject_dangling` set, a layout with dangling references
    /// fails with [`EngineError::DanglingReferences`] and nothing is
    /// saved.
    #[instrument(name = "integrity_check", skip_all)]
    pub fn run_integrity_check(&mut self) -> Result<IntegrityReport, EngineError> {
        let layout = self.load(Stage::IntegrityCheck)?;
        let (report, layout) = check_and_repair(layout, &self.config);
        if self.config.reject_dangling && !report.dangling.is_empty() {
            return Err(EngineError::DanglingReferences {
                references: report.dangling.iter().map(|d| (d.line, d.missing)).collect(),
            });
        }
        self.save(Stage::IntegrityCheck, &layout)?;
        if let Some(export) = self.export.as_mut() {
            export.save(&layout).map_err(|source| EngineError::Stage {
                stage: Stage::Export,
                source,
            })?;
        }
        Ok(report)
    }

    /// Repair, then check.
    pub fn run_all(&mut self) -> Result<PipelineReport, EngineError> {
        let repair = self.run_repair()?;
        let integrity = self.run_integrity_check()?;
        Ok(PipelineReport { repair, integrity })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fablink_core::{Address, AddressId, Line, LineId, Position};
    use fablink_store::{MemoryStore, StoreError};

    fn addr(id: u64, x: f64, y: f64) -> Address {
        Address::new(AddressId(id), format!("ADDR_{id}"), Position::new(x, y, 0.0))
    }

    #[test]
    fn each_stage_saves_once() {
        let layout = Layout::new(
            vec![addr(1, 0.0, 0.0), addr(2, 10.0, 0.0), addr(3, 0.0, 10.0)],
            vec![],
        );
        let mut store = MemoryStore::with_layout(layout);
        let mut pipeline = Pipeline::new(&mut store, RepairConfig::default()).unwrap();
        pipeline.run_unused_pass().unwrap();
        pipeline.run_endpoint_pass().unwrap();
        pipeline.run_integrity_check().unwrap();
        drop(pipeline);
        assert_eq!(store.saves(), 3);
        assert_eq!(store.snapshot().map(|l| l.lines.len()), Some(3));
    }

    #[test]
    fn empty_store_fails_with_stage() {
        let mut pipeline = Pipeline::new(MemoryStore::new(), RepairConfig::default()).unwrap();
        let err = pipeline.run_unused_pass().unwrap_err();
        assert!(matches!(
            err,
            EngineError::Stage {
                stage: Stage::UnusedPass,
                source: StoreError::Empty
            }
        ));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = RepairConfig {
            unused_fanout: 0,
            ..RepairConfig::default()
        };
        assert!(matches!(
            Pipeline::new(MemoryStore::new(), config),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn dangling_references_abort_without_saving() {
        let a = addr(1, 0.0, 0.0);
        let ghost = addr(99, 1.0, 0.0);
        let line = Line::connecting(LineId(1), &a, &ghost);
        let mut store = MemoryStore::with_layout(Layout::new(vec![a], vec![line]));
        let mut pipeline = Pipeline::new(&mut store, RepairConfig::default()).unwrap();
        let err = pipeline.run_integrity_check().unwrap_err();
        assert!(matches!(err, EngineError::DanglingReferences { ref references }
            if references == &[(LineId(1), AddressId(99))]));
        drop(pipeline);
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn dangling_references_allowed_when_configured() {
        let a = addr(1, 0.0, 0.0);
        let ghost = addr(99, 1.0, 0.0);
        let line = Line::connecting(LineId(1), &a, &ghost);
        let config = RepairConfig {
            reject_dangling: false,
            ..RepairConfig::default()
        };
        let mut pipeline =
            Pipeline::new(MemoryStore::with_layout(Layout::new(vec![a], vec![line])), config)
                .unwrap();
        let report = pipeline.run_integrity_check().unwrap();
        assert!(!report.passed());
        assert_eq!(pipeline.store().saves(), 1);
    }

    /// Refuses every save.
    struct ReadOnlyStore;

    impl SnapshotStore for ReadOnlyStore {
        fn load(&self) -> Result<Layout, StoreError> {
            Err(StoreError::Empty)
        }

        fn save(&mut self, _layout: &Layout) -> Result<(), StoreError> {
            Err(StoreError::Write {
                path: "export.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    #[test]
    fn export_failure_keeps_primary_commit() {
        let a = addr(1, 0.0, 0.0);
        let b = addr(2, 1.0, 0.0);
        let lines = vec![
            Line::connecting(LineId(10), &a, &b),
            Line::connecting(LineId(11), &b, &a),
        ];
        let mut store = MemoryStore::with_layout(Layout::new(vec![a, b], lines));
        let mut pipeline = Pipeline::new(&mut store, RepairConfig::default())
            .unwrap()
            .with_export(ReadOnlyStore);

        let err = pipeline.run_integrity_check().unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Export));
        assert!(err.to_string().starts_with("export failed"));

        // The primary commit stands, so a retry finds nothing left to remove.
        let retry = pipeline.run_integrity_check().unwrap_err();
        assert_eq!(retry.stage(), Some(Stage::Export));
        drop(pipeline);
        assert_eq!(store.saves(), 2);
        let committed = store.snapshot().map(|l| l.lines.len());
        assert_eq!(committed, Some(1));
    }

    #[test]
    fn export_receives_final_layout() {
        let layout = Layout::new(
            vec![addr(1, 0.0, 0.0), addr(2, 1.0, 0.0), addr(3, 2.0, 0.0)],
            vec![],
        );
        let mut export = MemoryStore::new();
        let store = {
            let mut pipeline = Pipeline::new(MemoryStore::with_layout(layout), RepairConfig::default())
                .unwrap()
                .with_export(&mut export);
            pipeline.run_all().unwrap();
            pipeline.into_store()
        };
        assert_eq!(export.saves(), 1);
        assert_eq!(export.snapshot(), store.snapshot());
    }
}
