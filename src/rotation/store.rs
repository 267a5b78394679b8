//! Persistence for [`RotationState`].

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::warn;

use super::state::RotationState;
use crate::error::RotationError;

/// Load/save contract for the rotation singleton.
pub trait RotationStore: Send + Sync {
    /// Returns `None` when nothing has been persisted yet.
    fn load(&self) -> Result<Option<RotationState>, RotationError>;

    fn save(&self, state: &RotationState) -> Result<(), RotationError>;
}

/// Stores the state as pretty JSON in a single file.
///
/// Writes go to a temp file in the same directory which is then renamed
/// over the target, so readers never observe a half-written file.
#[derive(Debug, Clone)]
pub struct JsonFileRotationStore {
    path: PathBuf,
}

impl JsonFileRotationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> RotationError {
        RotationError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl RotationStore for JsonFileRotationStore {
    fn load(&self) -> Result<Option<RotationState>, RotationError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        match serde_json::from_str(&content) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Rotation state is unreadable, starting a fresh rotation"
                );
                Ok(None)
            }
        }
    }

    fn save(&self, state: &RotationState) -> Result<(), RotationError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.io_error(e))?;

        let json = serde_json::to_string_pretty(state)?;
        let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        Ok(())
    }
}
