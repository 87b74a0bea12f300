//! fablink quickstart: repair a small two-level layout end to end.
//!
//! Demonstrates:
//!   1. Building an under-connected layout of two address loops
//!   2. Persisting it to a JSON snapshot
//!   3. Running both repair passes and the integrity check
//!   4. Exporting the final layout to a second file
//!
//! Run with:
//!   RUST_LOG=fablink_engine=debug cargo run --example quickstart

use std::error::Error;

use fablink_core::{Address, AddressId, Layout, Line, LineId, Position};
use fablink_engine::{Pipeline, RepairConfig};
use fablink_store::{JsonFileStore, SnapshotStore};
use tracing_subscriber::EnvFilter;

// ─── Layout parameters ──────────────────────────────────────────

const PER_LEVEL: u64 = 12;
const SPACING: f64 = 54.0;
const LEVELS: [f64; 2] = [6022.0, 4822.0];

fn build_layout() -> Layout {
    let mut addresses = Vec::new();
    for (level, &z) in LEVELS.iter().enumerate() {
        for i in 0..PER_LEVEL {
            let id = 100_001 + level as u64 * 1_000 + i;
            let pos = Position::new(i as f64 * SPACING, level as f64 * 30.0, z);
            addresses.push(Address::new(AddressId(id), format!("ADDR_{id}"), pos));
        }
    }
    // Only the upper level has a partial rail; the lower level is bare.
    let lines = addresses[..PER_LEVEL as usize / 2]
        .windows(2)
        .enumerate()
        .map(|(i, pair)| Line::connecting(LineId(1 + i as u64), &pair[0], &pair[1]))
        .collect();
    Layout::new(addresses, lines)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = tempfile::tempdir()?;
    let output = dir.path().join("output.json");
    let export = dir.path().join("layout.json");
    JsonFileStore::new(&output).save(&build_layout())?;

    let config = RepairConfig::from_toml_str(
        r#"
        index = "rtree"
        high_degree_threshold = 3
        "#,
    )?;
    let report = Pipeline::new(JsonFileStore::new(&output), config)?
        .with_export(JsonFileStore::new(&export))
        .run_all()?;

    println!(
        "pass 1: {} unused, {} lines created",
        report.repair.unused.examined,
        report.repair.unused.created_count()
    );
    println!(
        "pass 2: {} endpoints, {} lines created",
        report.repair.endpoints.examined,
        report.repair.endpoints.created_count()
    );
    println!(
        "integrity: passed={} removed={} high-degree={}",
        report.integrity.passed(),
        report.integrity.removed.len(),
        report.integrity.high_degree.len()
    );

    let layout = JsonFileStore::new(&export).load()?;
    println!(
        "exported {} addresses and {} lines to {}",
        layout.addresses.len(),
        layout.lines.len(),
        export.display()
    );
    Ok(())
}
