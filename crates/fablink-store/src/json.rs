//! JSON file snapshot store.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fablink_core::Layout;
use tracing::debug;

use crate::error::StoreError;
use crate::SnapshotStore;

/// Persists a [`Layout`] as a pretty-printed JSON document.
///
/// Saves write to a sibling `*.tmp` file, sync it, then rename it over
/// the target, so a failed save never leaves a truncated snapshot behind.
///
/// # Examples
///
/// ```no_run
/// use fablink_store::{JsonFileStore, SnapshotStore};
///
/// let mut store = JsonFileStore::new("output.json");
/// let layout = store.load()?;
/// store.save(&layout)?;
/// # Ok::<(), fablink_store::StoreError>(())
/// ```
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// A store backed by the file at `path`. Nothing is read until `load`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Layout, StoreError> {
        let file = File::open(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                StoreError::Read {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;
        let layout: Layout =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                if source.is_io() {
                    StoreError::Read {
                        path: self.path.clone(),
                        source: source.into(),
                    }
                } else {
                    StoreError::Malformed {
                        path: self.path.clone(),
                        source,
                    }
                }
            })?;
        debug!(
            path = %self.path.display(),
            addresses = layout.addresses.len(),
            lines = layout.lines.len(),
            "snapshot loaded"
        );
        Ok(layout)
    }

    fn save(&mut self, layout: &Layout) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(layout).map_err(StoreError::Encode)?;
        let temp_path = self.temp_path();
        let write_err = |source| StoreError::Write {
            path: temp_path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        {
            let file = File::create(&temp_path).map_err(write_err)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&bytes).map_err(write_err)?;
            writer.write_all(b"\n").map_err(write_err)?;
            let file = writer
                .into_inner()
                .map_err(|e| write_err(e.into_error()))?;
            file.sync_all().map_err(write_err)?;
        }
        fs::rename(&temp_path, &self.path).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(
            path = %self.path.display(),
            addresses = layout.addresses.len(),
            lines = layout.lines.len(),
            "snapshot saved"
        );
        Ok(())
    }
}
