//! JSON file persistence for hint snapshots (`--hints_cache`).

use mrce_domain::HintSnapshot;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum HintStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not serialize hint snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Loads and saves a [`HintSnapshot`] at a fixed path.
///
/// Only router guidance and expert hints are stored; the round counter is
/// never persisted.
#[derive(Debug, Clone)]
pub struct HintFileStore {
    path: PathBuf,
}

impl HintFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored snapshot.
    ///
    /// A missing file is a normal first run and yields `None`. An unreadable
    /// or corrupt file is logged and also yields `None`: the session then
    /// starts from empty hints.
    pub fn load(&self) -> Option<HintSnapshot> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No hint snapshot at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Could not read hint snapshot {}: {}", self.path.display(), e);
                return None;
            }
        };

        match HintSnapshot::from_json(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(
                    "Ignoring unreadable hint snapshot {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Write the snapshot as pretty JSON, creating parent directories.
    pub fn save(&self, snapshot: &HintSnapshot) -> Result<(), HintStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| HintStoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = snapshot.to_json_pretty()?;
        std::fs::write(&self.path, json).map_err(|source| HintStoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        debug!("Saved hint snapshot to {}", self.path.display());
        Ok(())
    }
}
