//! 3D positions and Euclidean distance.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in layout space.
///
/// `z` is the layer height (e.g. 6022.0 or 4822.0 in a two-level fab);
/// it takes part in distance like any other axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate (layer height).
    pub z: f64,
}

impl Position {
    /// Construct a position from its three coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Summed in x, y, z order so that every index backend produces
    /// bit-identical values for the same pair.
    #[inline]
    pub fn distance_squared(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Euclidean distance to `other`: `sqrt(dx² + dy² + dz²)`.
    #[inline]
    pub fn distance(&self, other: &Position) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Exact bit-pattern key, used to group coincident positions.
    ///
    /// `0.0` and `-0.0` map to different keys, as do distinct NaN payloads.
    pub fn bits_key(&self) -> [u64; 3] {
        [self.x.to_bits(), self.y.to_bits(), self.z.to_bits()]
    }

    /// Returns `true` if no coordinate is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// The position as an `[x, y, z]` array.
    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Position {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn distance_worked() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 12.0);
        assert_eq!(a.distance(&b), 13.0);
        assert_eq!(a.distance_squared(&b), 169.0);
    }

    #[test]
    fn bits_key_separates_signed_zero() {
        let a = Position::new(0.0, 1.0, 2.0);
        let b = Position::new(-0.0, 1.0, 2.0);
        assert_eq!(a, b);
        assert_ne!(a.bits_key(), b.bits_key());
    }

    #[test]
    fn is_finite_checks_every_axis() {
        assert!(Position::new(1.0, -2.0, 6022.0).is_finite());
        assert!(!Position::new(f64::NAN, 0.0, 0.0).is_finite());
        assert!(!Position::new(0.0, f64::INFINITY, 0.0).is_finite());
        assert!(!Position::new(0.0, 0.0, f64::NEG_INFINITY).is_finite());
    }

    #[test]
    fn display_matches_tuple_form() {
        assert_eq!(Position::new(1.5, 2.0, 6022.0).to_string(), "(1.5, 2, 6022)");
    }

    proptest! {
        #[test]
        fn distance_symmetric_and_reflexive(
            ax in -1.0e4f64..1.0e4, ay in -1.0e4f64..1.0e4, az in -1.0e4f64..1.0e4,
            bx in -1.0e4f64..1.0e4, by in -1.0e4f64..1.0e4, bz in -1.0e4f64..1.0e4,
        ) {
            let a = Position::new(ax, ay, az);
            let b = Position::new(bx, by, bz);
            prop_assert_eq!(a.distance(&b), b.distance(&a));
            prop_assert_eq!(a.distance(&a), 0.0);
        }
    }
}
