//! Engine error types.

use std::fmt;

use fablink_core::{AddressId, LineId};
use fablink_store::StoreError;
use thiserror::Error;

use crate::config::ConfigError;

/// A pipeline stage, named in errors and log spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Pass 1: connect degree-0 addresses.
    UnusedPass,
    /// Pass 2: connect degree-1 addresses.
    EndpointPass,
    /// Duplicate, overlap and dangling-reference checks.
    IntegrityCheck,
    /// Mirroring the committed integrity result to the export store.
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnusedPass => write!(f, "unused pass"),
            Self::EndpointPass => write!(f, "endpoint pass"),
            Self::IntegrityCheck => write!(f, "integrity check"),
            Self::Export => write!(f, "export"),
        }
    }
}

/// Errors raised by [`Pipeline`](crate::Pipeline) stages.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Loading or saving a snapshot failed. Nothing was persisted by the
    /// failing stage, except for [`Stage::Export`]: the export runs after
    /// the primary store committed, and that commit stands.
    #[error("{stage} failed: {source}")]
    Stage {
        /// The stage that failed.
        stage: Stage,
        /// The store failure.
        #[source]
        source: StoreError,
    },
    /// Lines reference addresses that do not exist.
    #[error("integrity check rejected {} dangling reference(s)", .references.len())]
    DanglingReferences {
        /// `(line, missing address)` pairs in line order.
        references: Vec<(LineId, AddressId)>,
    },
    /// The pipeline was given an invalid config.
    #[error("invalid repair config: {0}")]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// The stage this error was raised in, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            Self::DanglingReferences { .. } => Some(Stage::IntegrityCheck),
            Self::Config(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_names_stage() {
        let err = EngineError::Stage {
            stage: Stage::EndpointPass,
            source: StoreError::Empty,
        };
        assert_eq!(err.to_string(), "endpoint pass failed: no snapshot has been saved");
        assert_eq!(err.stage(), Some(Stage::EndpointPass));
    }

    #[test]
    fn dangling_error_counts_references() {
        let err = EngineError::DanglingReferences {
            references: vec![(LineId(7), AddressId(99)), (LineId(8), AddressId(98))],
        };
        let msg = err.to_string();
        assert_eq!(msg, "integrity check rejected 2 dangling reference(s)");
        assert_eq!(err.stage(), Some(Stage::IntegrityCheck));
    }
}
