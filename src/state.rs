//! Persisted CLI connection state
//!
//! The CLI remembers one thing between invocations: the currently connected
//! target. This module stores that as a small JSON file under the platform
//! config directory.
//!
//! The store is an explicit collaborator: `main` constructs a [`StateStore`]
//! and passes it into command handlers, which keeps the path injectable in
//! tests and the state out of ambient globals.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ToolgateError};

/// What the CLI persists between invocations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliState {
    /// The currently connected target, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

/// On-disk JSON store for [`CliState`].
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// A store at an explicit path (tests inject a temp dir here).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store at the platform default location
    /// (`<config_dir>/toolgate/state.json`).
    ///
    /// # Errors
    ///
    /// Returns [`ToolgateError::State`] when no home directory can be
    /// resolved.
    pub fn default_location() -> Result<Self> {
        let dirs = directories::ProjectDirs::from("", "", "toolgate")
            .ok_or_else(|| ToolgateError::State("no home directory found".to_string()))?;
        Ok(Self::new(dirs.config_dir().join("state.json")))
    }

    /// The path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state.
    ///
    /// A missing or unreadable file yields the default (empty) state, so a
    /// corrupt state file never wedges the CLI.
    pub fn load(&self) -> CliState {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring corrupt state file");
                CliState::default()
            }),
            Err(_) => CliState::default(),
        }
    }

    /// Persist `state`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be written.
    pub fn save(&self, state: &CliState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    /// Drop any persisted state.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing file cannot be removed.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
