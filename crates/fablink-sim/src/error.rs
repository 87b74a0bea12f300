//! Simulator error types.

use std::io;
use thiserror::Error;

/// Errors raised while configuring the simulator or writing logs.
#[derive(Debug, Error)]
pub enum SimError {
    /// A TOML config document could not be parsed.
    #[error("failed to parse simulator config: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
    },
    /// An increment range whose lower bound is zero.
    #[error("time increment lower bound must be at least 1 ms")]
    ZeroIncrement,
    /// A timestamp chrono cannot represent.
    #[error("timestamp {timestamp_ms} ms is out of range")]
    TimestampOutOfRange {
        /// The offending milliseconds since the Unix epoch.
        timestamp_ms: u64,
    },
    /// Writing a log line failed.
    #[error("failed to write movement log: {0}")]
    Write(#[from] io::Error),
}
