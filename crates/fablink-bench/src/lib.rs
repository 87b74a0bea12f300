//! Benchmark layouts for the fablink repair engine.
//!
//! - [`loop_layout`]: addresses sampled around rectangular loops on two
//!   levels, with every other rail segment missing
//! - [`scattered_layout`]: uniformly scattered, unconnected addresses
//! - [`repaired`]: a layout after both repair passes, for path benchmarks

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use fablink_core::{Address, AddressId, Layout, Line, LineId, Position};
use fablink_engine::{connect_endpoints, connect_unused, RepairConfig};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

const LEVELS: [f64; 2] = [6022.0, 4822.0];

/// `loops` rectangular loops per level, `per_side` addresses per side.
///
/// Rail segments alternate between present and missing, so both repair
/// passes have work to do.
pub fn loop_layout(loops: usize, per_side: usize) -> Layout {
    let mut addresses = Vec::new();
    let mut lines = Vec::new();
    let mut next_id = 100_001u64;
    let mut next_line = 1u64;
    let step = 54.0;
    let side = per_side as f64 * step;

    for &z in &LEVELS {
        for l in 0..loops {
            let origin_x = l as f64 * (side + 200.0);
            let start = addresses.len();
            for corner in 0..4 {
                for i in 0..per_side {
                    let t = i as f64 * step;
                    let (x, y) = match corner {
                        0 => (t, 0.0),
                        1 => (side, t),
                        2 => (side - t, side),
                        _ => (0.0, side - t),
                    };
                    addresses.push(Address::new(
                        AddressId(next_id),
                        format!("ADDR_{next_id}"),
                        Position::new(origin_x + x, y, z),
                    ));
                    next_id += 1;
                }
            }
            let ring = &addresses[start..];
            for i in (0..ring.len()).step_by(2) {
                let next = &ring[(i + 1) % ring.len()];
                lines.push(Line::connecting(LineId(next_line), &ring[i], next));
                next_line += 1;
            }
        }
    }
    Layout::new(addresses, lines)
}

/// `n` unconnected addresses scattered over a 10 km square on two levels.
pub fn scattered_layout(n: usize, seed: u64) -> Layout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let addresses = (0..n as u64)
        .map(|i| {
            let id = 100_001 + i;
            let pos = Position::new(
                rng.random_range(0.0..10_000.0),
                rng.random_range(0.0..10_000.0),
                LEVELS[rng.random_range(0..LEVELS.len())],
            );
            Address::new(AddressId(id), format!("ADDR_{id}"), pos)
        })
        .collect();
    Layout::new(addresses, Vec::new())
}

/// `layout` after both repair passes with the default config.
pub fn repaired(layout: Layout) -> Layout {
    let config = RepairConfig::default();
    let (layout, _) = connect_unused(layout, &config);
    connect_endpoints(layout, &config).0
}
