//! Error types for snapshot persistence.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving a snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The snapshot file does not exist.
    #[error("snapshot file '{}' not found", .path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },
    /// Reading the snapshot failed.
    #[error("failed to read snapshot '{}': {source}", .path.display())]
    Read {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The snapshot is not a valid layout document.
    #[error("malformed snapshot '{}': {source}", .path.display())]
    Malformed {
        /// The path being parsed.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: serde_json::Error,
    },
    /// Encoding the snapshot failed.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    /// Writing or replacing the snapshot failed.
    #[error("failed to write snapshot '{}': {source}", .path.display())]
    Write {
        /// The path being written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// An in-memory store was loaded before anything was saved to it.
    #[error("no snapshot has been saved")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_path() {
        let err = StoreError::NotFound {
            path: PathBuf::from("output.json"),
        };
        assert_eq!(err.to_string(), "snapshot file 'output.json' not found");
    }

    #[test]
    fn io_source_is_preserved() {
        use std::error::Error as _;
        let err = StoreError::Write {
            path: PathBuf::from("layout.json"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("layout.json"));
    }
}
