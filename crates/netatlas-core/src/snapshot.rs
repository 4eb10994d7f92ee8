// ── Snapshot persistence ──
//
// Key-value snapshot store for the last-known diagram state, one JSON
// file per key under the data directory. Persistence is best-effort by
// contract: a full disk or missing directory must never take the view
// down, so `save` logs and swallows failures and `load` treats malformed
// data as absent.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Key holding the serialized node array.
pub const NODES_KEY: &str = "nodes";

/// Key holding the serialized edge array.
pub const EDGES_KEY: &str = "edges";

/// File-backed key-value store for diagram snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Serialize `value` and write it under `key`. Best-effort: failures
    /// are logged at `warn` and the caller keeps running from memory.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            warn!(key, error = %e, "snapshot save failed, continuing in-memory");
        } else {
            debug!(key, "snapshot saved");
        }
    }

    fn try_save<T: Serialize>(&self, key: &str, value: &T) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec_pretty(value).map_err(io::Error::other)?;
        fs::write(self.path_for(key), json)
    }

    /// Load and deserialize the value under `key`.
    ///
    /// Returns `None` when the key is missing *or* the stored data fails
    /// to parse -- callers fall back to freshly computed defaults either
    /// way.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key);
        let bytes = fs::read(&path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "discarding malformed snapshot");
                None
            }
        }
    }

    /// Remove both well-known keys (layout reset).
    pub fn clear(&self) {
        for key in [NODES_KEY, EDGES_KEY] {
            match fs::remove_file(self.path_for(key)) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => warn!(key, error = %e, "snapshot clear failed"),
            }
        }
    }
}
