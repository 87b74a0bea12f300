//! fablink route log: repair a layout, then log a vehicle trip across it.
//!
//! Demonstrates:
//!   1. Repairing a sparse layout through the pipeline
//!   2. Routing between two addresses on the repaired graph
//!   3. Rendering a seeded, reproducible UDP movement log
//!
//! Run with:
//!   cargo run --example route_log

use std::error::Error;
use std::io;

use fablink::prelude::*;
use fablink::sim::now_millis;
use tracing_subscriber::EnvFilter;

fn grid(rows: u64, cols: u64) -> Layout {
    let mut addresses = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let id = 100_001 + r * 100 + c;
            addresses.push(Address::new(
                AddressId(id),
                format!("ADDR_{id}"),
                Position::new(c as f64 * 54.0, r as f64 * 80.0, 6022.0),
            ));
        }
    }
    Layout::new(addresses, Vec::new())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("output.json");
    JsonFileStore::new(&path).save(&grid(4, 6))?;

    Pipeline::new(JsonFileStore::new(&path), RepairConfig::default())?.run_all()?;
    let layout = JsonFileStore::new(&path).load()?;
    let adj = Adjacency::from_layout(&layout);

    let movement = MovementConfig::from_toml_str("seed = 7")?;
    let log = MovementLog::from_config(&movement)?;
    let (start, goal) = (AddressId(100_001), AddressId(100_306));
    let Some(records) = log.generate(&adj, start, goal, now_millis(), &mut movement.rng()) else {
        eprintln!("no route from {start} to {goal}");
        return Ok(());
    };

    let mut writer = UdpLogWriter::new(io::stdout().lock(), UdpTemplate::default());
    writer.write_all(&records)?;
    Ok(())
}
