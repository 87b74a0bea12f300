//! Timestamped movement logs along shortest paths.
//!
//! A [`MovementLog`] turns a path into one [`MoveRecord`] per hop. The
//! first record is stamped with the base time; each later record follows
//! the previous one by a random increment drawn uniformly from the
//! configured inclusive range.
//!
//! Constructed via the builder pattern: [`MovementLog::builder`], or from
//! a [`MovementConfig`] read from TOML.

use chrono::Utc;
use fablink_core::AddressId;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::path::{shortest_path, Adjacency};

/// One hop of a vehicle's journey.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Address the vehicle is at.
    pub current: AddressId,
    /// Address the vehicle moves to next.
    pub next: AddressId,
    /// Final destination of the journey.
    pub destination: AddressId,
}

// ── MovementConfig ─────────────────────────────────────────────────

/// Timing parameters for movement logs, as read from configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MovementConfig {
    /// Smallest per-hop increment in milliseconds. Default: 500.
    pub min_increment_ms: u64,
    /// Largest per-hop increment in milliseconds. Default: 1000.
    pub max_increment_ms: u64,
    /// RNG seed. `None` seeds from the thread-local generator.
    pub seed: Option<u64>,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            min_increment_ms: 500,
            max_increment_ms: 1000,
            seed: None,
        }
    }
}

impl MovementConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, SimError> {
        let config: Self = toml::from_str(s).map_err(|e| SimError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// The increment range as `(low, high)`, swapping reversed bounds.
    pub fn bounds(&self) -> (u64, u64) {
        if self.min_increment_ms <= self.max_increment_ms {
            (self.min_increment_ms, self.max_increment_ms)
        } else {
            (self.max_increment_ms, self.min_increment_ms)
        }
    }

    /// Reject ranges that could produce a zero increment.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.bounds().0 == 0 {
            return Err(SimError::ZeroIncrement);
        }
        Ok(())
    }

    /// A generator seeded from `seed`, or from entropy if unset.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        }
    }
}

// ── MovementLog ────────────────────────────────────────────────────

/// Generates movement records along shortest paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovementLog {
    min_ms: u64,
    max_ms: u64,
}

/// Builder for [`MovementLog`].
///
/// Defaults to the 500..=1000 ms range.
pub struct MovementLogBuilder {
    min_ms: u64,
    max_ms: u64,
}

impl MovementLog {
    /// Create a new builder.
    pub fn builder() -> MovementLogBuilder {
        MovementLogBuilder {
            min_ms: 500,
            max_ms: 1000,
        }
    }

    /// Build from a validated config.
    pub fn from_config(config: &MovementConfig) -> Result<Self, SimError> {
        Self::builder()
            .min_increment_ms(config.min_increment_ms)
            .max_increment_ms(config.max_increment_ms)
            .build()
    }

    /// The normalized `(low, high)` increment range.
    pub fn bounds(&self) -> (u64, u64) {
        (self.min_ms, self.max_ms)
    }

    /// One record per hop of `path`, toward the path's last address.
    ///
    /// Paths with fewer than two addresses produce no records.
    pub fn records_for_path<R: Rng>(
        &self,
        path: &[AddressId],
        base_ms: u64,
        rng: &mut R,
    ) -> Vec<MoveRecord> {
        let Some(&destination) = path.last() else {
            return Vec::new();
        };
        let mut timestamp_ms = base_ms;
        let mut records = Vec::with_capacity(path.len().saturating_sub(1));
        for (i, hop) in path.windows(2).enumerate() {
            if i > 0 {
                timestamp_ms = timestamp_ms.saturating_add(rng.random_range(self.min_ms..=self.max_ms));
            }
            records.push(MoveRecord {
                timestamp_ms,
                current: hop[0],
                next: hop[1],
                destination,
            });
        }
        records
    }

    /// Route from `start` to `goal` and log every hop.
    ///
    /// Returns `Some(vec![])` when `start == goal` and `None` when no path
    /// exists.
    ///
    /// ```
    /// use fablink_core::{Address, AddressId, Line, LineId, Position};
    /// use fablink_sim::{Adjacency, MovementLog};
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let a: Vec<Address> = (1..=3)
    ///     .map(|i| Address::new(AddressId(i), format!("ADDR_{i}"), Position::default()))
    ///     .collect();
    /// let adj = Adjacency::from_lines(&[
    ///     Line::connecting(LineId(1), &a[0], &a[1]),
    ///     Line::connecting(LineId(2), &a[1], &a[2]),
    /// ]);
    /// let log = MovementLog::builder().min_increment_ms(100).max_increment_ms(100).build()?;
    /// let mut rng = ChaCha8Rng::seed_from_u64(7);
    ///
    /// let records = log.generate(&adj, AddressId(1), AddressId(3), 1_000, &mut rng).unwrap();
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(records[1].timestamp_ms, 1_100);
    /// # Ok::<(), fablink_sim::SimError>(())
    /// ```
    pub fn generate<R: Rng>(
        &self,
        adjacency: &Adjacency,
        start: AddressId,
        goal: AddressId,
        base_ms: u64,
        rng: &mut R,
    ) -> Option<Vec<MoveRecord>> {
        if start == goal {
            return Some(Vec::new());
        }
        let path = shortest_path(adjacency, start, goal)?;
        Some(self.records_for_path(&path, base_ms, rng))
    }
}

impl MovementLogBuilder {
    /// Set the smallest per-hop increment.
    pub fn min_increment_ms(mut self, ms: u64) -> Self {
        self.min_ms = ms;
        self
    }

    /// Set the largest per-hop increment.
    pub fn max_increment_ms(mut self, ms: u64) -> Self {
        self.max_ms = ms;
        self
    }

    /// Build the log generator, swapping reversed bounds.
    ///
    /// Fails if the lower bound is zero, since timestamps must strictly
    /// increase.
    pub fn build(self) -> Result<MovementLog, SimError> {
        let (min_ms, max_ms) = if self.min_ms <= self.max_ms {
            (self.min_ms, self.max_ms)
        } else {
            (self.max_ms, self.min_ms)
        };
        if min_ms == 0 {
            return Err(SimError::ZeroIncrement);
        }
        Ok(MovementLog { min_ms, max_ms })
    }
}

/// Current wall-clock time in milliseconds since the Unix epoch.
pub fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fablink_test_utils::fixtures::scenario_d;

    fn path_adjacency() -> Adjacency {
        Adjacency::from_layout(&scenario_d())
    }

    #[test]
    fn builder_defaults() {
        let log = MovementLog::builder().build().unwrap();
        assert_eq!(log.bounds(), (500, 1000));
    }

    #[test]
    fn builder_swaps_reversed_bounds() {
        let log = MovementLog::builder()
            .min_increment_ms(900)
            .max_increment_ms(200)
            .build()
            .unwrap();
        assert_eq!(log.bounds(), (200, 900));
    }

    #[test]
    fn builder_rejects_zero_lower_bound() {
        let result = MovementLog::builder().min_increment_ms(0).build();
        assert!(matches!(result, Err(SimError::ZeroIncrement)));
    }

    #[test]
    fn one_record_per_hop_with_increasing_timestamps() {
        let log = MovementLog::builder().build().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let records = log
            .generate(&path_adjacency(), AddressId(1), AddressId(4), 10_000, &mut rng)
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp_ms, 10_000);
        for pair in records.windows(2) {
            let step = pair[1].timestamp_ms - pair[0].timestamp_ms;
            assert!((500..=1000).contains(&step), "step {step} out of range");
            assert_eq!(pair[0].next, pair[1].current);
        }
        assert!(records.iter().all(|r| r.destination == AddressId(4)));
        assert_eq!(records[0].current, AddressId(1));
        assert_eq!(records[2].next, AddressId(4));
    }

    #[test]
    fn same_seed_same_log() {
        let log = MovementLog::builder().build().unwrap();
        let adj = path_adjacency();
        let config = MovementConfig {
            seed: Some(9),
            ..MovementConfig::default()
        };
        let a = log.generate(&adj, AddressId(4), AddressId(1), 0, &mut config.rng());
        let b = log.generate(&adj, AddressId(4), AddressId(1), 0, &mut config.rng());
        assert_eq!(a, b);
    }

    #[test]
    fn start_equals_goal_is_empty() {
        let log = MovementLog::builder().build().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let records = log.generate(&path_adjacency(), AddressId(2), AddressId(2), 0, &mut rng);
        assert_eq!(records, Some(vec![]));
    }

    #[test]
    fn unreachable_goal_is_none() {
        let log = MovementLog::builder().build().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            log.generate(&path_adjacency(), AddressId(1), AddressId(99), 0, &mut rng),
            None
        );
    }

    #[test]
    fn zero_bound_rejected_in_either_position() {
        let reversed = MovementLog::builder()
            .min_increment_ms(800)
            .max_increment_ms(0)
            .build();
        assert!(matches!(reversed, Err(SimError::ZeroIncrement)));

        let config = MovementConfig {
            min_increment_ms: 300,
            max_increment_ms: 0,
            seed: None,
        };
        assert!(matches!(config.validate(), Err(SimError::ZeroIncrement)));
        assert!(matches!(
            MovementLog::from_config(&config),
            Err(SimError::ZeroIncrement)
        ));
    }

    #[test]
    fn smallest_range_still_strictly_increases() {
        let log = MovementLog::builder()
            .min_increment_ms(1)
            .max_increment_ms(1)
            .build()
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let path = [AddressId(1), AddressId(2), AddressId(3), AddressId(4)];
        let stamps: Vec<u64> = log
            .records_for_path(&path, 0, &mut rng)
            .iter()
            .map(|r| r.timestamp_ms)
            .collect();
        assert_eq!(stamps, vec![0, 1, 2]);
    }

    #[test]
    fn config_from_toml() {
        let config =
            MovementConfig::from_toml_str("min_increment_ms = 2000\nmax_increment_ms = 100\nseed = 3")
                .unwrap();
        assert_eq!(config.bounds(), (100, 2000));
        assert_eq!(config.seed, Some(3));
        let log = MovementLog::from_config(&config).unwrap();
        assert_eq!(log.bounds(), (100, 2000));
    }

    #[test]
    fn config_rejects_zero_increment() {
        assert!(matches!(
            MovementConfig::from_toml_str("min_increment_ms = 0"),
            Err(SimError::ZeroIncrement)
        ));
        assert!(matches!(
            MovementConfig::from_toml_str("speed = 3"),
            Err(SimError::Parse { .. })
        ));
    }
}
