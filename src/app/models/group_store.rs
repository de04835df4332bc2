use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use crate::app::error::Result;
use crate::app::models::app_group::AppGroup;
use crate::app::models::json_file::{read_json, write_json_atomic};

/// File name of the groups document inside the data directory.
pub const GROUPS_FILE_NAME: &str = "startie_groups.json";

/// Storage for the list of groups, serialized as one JSON array.
/// Identifiers are written as-is so they stay stable across restarts.
#[derive(Debug, Clone)]
pub struct GroupStore {
    path: PathBuf,
}

impl GroupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the groups from disk.
    ///
    /// A missing file yields an empty list. A file that cannot be read or
    /// parsed is logged and also yields an empty list; the broken file is left
    /// in place until the next successful save.
    pub fn load(&self) -> Vec<AppGroup> {
        match read_json::<Vec<AppGroup>>(&self.path) {
            Ok(Some(groups)) => {
                debug!(path = %self.path.display(), count = groups.len(), "Loaded groups");
                groups
            }
            Ok(None) => {
                debug!(path = %self.path.display(), "No groups file yet");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "Error loading groups, starting empty");
                Vec::new()
            }
        }
    }

    /// Writes the full snapshot, replacing the previous file atomically.
    pub fn try_save(&self, groups: &[AppGroup]) -> Result<()> {
        write_json_atomic(&self.path, groups)
    }

    /// Saves the snapshot; a failure is logged and the file on disk keeps its
    /// previous contents.
    pub fn save(&self, groups: &[AppGroup]) -> bool {
        match self.try_save(groups) {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Error saving groups");
                false
            }
        }
    }
}
