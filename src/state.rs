//! Persisted monitor state.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The singleton record carried between runs.
///
/// Field names and order are part of the on-disk contract; the file must
/// round-trip exactly through save/load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorState {
    /// SHA-256 hex digest of the normalized page content.
    pub hash: Option<String>,
    /// Monitored URL, informational only.
    pub url: String,
    /// Latest successful run (JST, `YYYY-MM-DD HH:MM:SS`).
    pub last_checked: String,
    /// Latest detected change, if any.
    pub last_changed: Option<String>,
}

/// Errors surfaced by the state store.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to read state file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file exists but does not hold the expected structure. Treating
    /// this as a first run would silently swallow a legitimate change
    /// notification, so it is fatal instead.
    #[error("state file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write state file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load/save of the state file. Only the orchestrator touches this.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `None` when the file does not exist yet (first ever run).
    pub fn load(&self) -> Result<Option<MonitorState>, StateError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| StateError::Read {
            path: self.path.clone(),
            source,
        })?;

        let state = serde_json::from_str(&content).map_err(|source| StateError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        Ok(Some(state))
    }

    /// Overwrite the state file in place with pretty-printed JSON.
    pub fn save(&self, state: &MonitorState) -> Result<(), StateError> {
        let content = serde_json::to_string_pretty(state).map_err(StateError::Encode)?;
        fs::write(&self.path, content).map_err(|source| StateError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
