//! Repair configuration, validation, and error types.
//!
//! [`RepairConfig`] collects every tunable the repair and integrity stages
//! read. It deserializes from TOML with every field optional; missing
//! fields take the defaults listed on each field.

use std::fs;
use std::path::{Path, PathBuf};

use fablink_space::IndexKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── OverlapScan ────────────────────────────────────────────────────

/// Strategy for finding overlapping lines.
///
/// Both strategies report the same findings in the same order and remove
/// the same lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapScan {
    /// Compare every pair of lines. O(n²).
    #[default]
    Pairwise,
    /// Bucket lines by their unordered endpoint pair, then pair up within
    /// each bucket.
    CanonicalIndex,
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while loading or validating a [`RepairConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The TOML document could not be parsed into a config.
    #[error("failed to parse config: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },
    /// `unused_fanout` was zero.
    #[error("unused_fanout must be at least 1")]
    ZeroFanout,
    /// `high_degree_threshold` was zero, which would flag every address.
    #[error("high_degree_threshold must be at least 1")]
    ZeroHighDegreeThreshold,
    /// The id floor leaves no room for a single new line id.
    #[error("line_id_floor {floor} leaves no room for new line ids")]
    LineIdFloorOverflow {
        /// The configured floor.
        floor: u64,
    },
}

// ── RepairConfig ───────────────────────────────────────────────────

/// Tunables for the repair passes and the integrity check.
///
/// ```
/// use fablink_engine::{OverlapScan, RepairConfig};
///
/// let config = RepairConfig::from_toml_str(
///     r#"
///     index = "rtree"
///     overlap_scan = "canonical_index"
///     "#,
/// )?;
/// assert_eq!(config.overlap_scan, OverlapScan::CanonicalIndex);
/// assert_eq!(config.line_id_floor, 200_000);
/// # Ok::<(), fablink_engine::ConfigError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepairConfig {
    /// New line ids start after `max(line_id_floor, largest existing id)`.
    /// Default: 200000.
    pub line_id_floor: u64,
    /// Nearest neighbours requested for each unused address. The address
    /// is connected only when this many candidates exist. Default: 2.
    pub unused_fanout: usize,
    /// Addresses with at least this degree are listed in the integrity
    /// report. Default: 4.
    pub high_degree_threshold: usize,
    /// Nearest-neighbour backend. Default: brute force.
    pub index: IndexKind,
    /// Overlap detection strategy. Default: pairwise.
    pub overlap_scan: OverlapScan,
    /// Abort the integrity stage without saving when a line references a
    /// missing address. Default: true.
    pub reject_dangling: bool,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            line_id_floor: 200_000,
            unused_fanout: 2,
            high_degree_threshold: 4,
            index: IndexKind::BruteForce,
            overlap_scan: OverlapScan::Pairwise,
            reject_dangling: true,
        }
    }
}

impl RepairConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML config file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unused_fanout == 0 {
            return Err(ConfigError::ZeroFanout);
        }
        if self.high_degree_threshold == 0 {
            return Err(ConfigError::ZeroHighDegreeThreshold);
        }
        if self.line_id_floor == u64::MAX {
            return Err(ConfigError::LineIdFloorOverflow {
                floor: self.line_id_floor,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = RepairConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.unused_fanout, 2);
        assert_eq!(config.high_degree_threshold, 4);
        assert!(config.reject_dangling);
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(RepairConfig::from_toml_str("").unwrap(), RepairConfig::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config = RepairConfig::from_toml_str(
            "line_id_floor = 10\nreject_dangling = false\nindex = \"brute_force\"",
        )
        .unwrap();
        assert_eq!(config.line_id_floor, 10);
        assert!(!config.reject_dangling);
        assert_eq!(config.index, IndexKind::BruteForce);
        assert_eq!(config.unused_fanout, 2);
    }

    #[test]
    fn zero_fanout_rejected() {
        let err = RepairConfig::from_toml_str("unused_fanout = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroFanout));
    }

    #[test]
    fn zero_threshold_rejected() {
        let config = RepairConfig {
            high_degree_threshold: 0,
            ..RepairConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroHighDegreeThreshold)
        ));
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let err = RepairConfig::from_toml_str("fanout = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_scan_is_a_parse_error() {
        let err = RepairConfig::from_toml_str("overlap_scan = \"quadtree\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_names_path() {
        let err = RepairConfig::from_path("/nonexistent/fablink.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/fablink.toml"));
    }
}
