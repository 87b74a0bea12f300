//! Layout digests for determinism and idempotence checks.
//!
//! Uses FNV-1a for fast, deterministic hashing. These hashes are not
//! cryptographically secure; they are used for fast equality checks
//! between runs.

use fablink_core::{Layout, Position};

/// FNV-1a offset basis for 64-bit.
const FNV_OFFSET: u64 = 0xcbf29ce484222325;
/// FNV-1a prime for 64-bit.
const FNV_PRIME: u64 = 0x00000100000001B3;

#[inline]
fn fnv1a_bytes(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash = (hash ^ b as u64).wrapping_mul(FNV_PRIME);
    }
    hash
}

#[inline]
fn fnv1a_u64(hash: u64, v: u64) -> u64 {
    fnv1a_bytes(hash, &v.to_le_bytes())
}

#[inline]
fn fnv1a_str(hash: u64, s: &str) -> u64 {
    // Length prefix keeps ("ab","c") and ("a","bc") apart.
    let hash = fnv1a_u64(hash, s.len() as u64);
    fnv1a_bytes(hash, s.as_bytes())
}

#[inline]
fn fnv1a_pos(hash: u64, pos: &Position) -> u64 {
    pos.bits_key().iter().fold(hash, |h, &bits| fnv1a_u64(h, bits))
}

/// Digest every field of a layout, in stored order.
///
/// Collection lengths are folded in at each boundary so that moving a
/// record between collections changes the hash. Positions hash by bit
/// pattern.
pub fn layout_hash(layout: &Layout) -> u64 {
    let mut hash = fnv1a_u64(FNV_OFFSET, layout.addresses.len() as u64);
    for addr in &layout.addresses {
        hash = fnv1a_u64(hash, addr.id.0);
        hash = fnv1a_u64(hash, addr.address.map_or(0, |a| a.wrapping_add(1)));
        hash = fnv1a_str(hash, &addr.name);
        hash = fnv1a_pos(hash, &addr.pos);
    }
    hash = fnv1a_u64(hash, layout.lines.len() as u64);
    for line in &layout.lines {
        hash = fnv1a_u64(hash, line.id.0);
        hash = fnv1a_str(hash, &line.name);
        hash = fnv1a_u64(hash, line.from_address.0);
        hash = fnv1a_u64(hash, line.to_address.0);
        hash = fnv1a_pos(hash, &line.from_pos);
        hash = fnv1a_pos(hash, &line.to_pos);
        hash = fnv1a_bytes(hash, &[line.curve as u8]);
    }
    hash
}
