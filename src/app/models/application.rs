use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use os_api::LaunchTarget;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn enabled_by_default() -> bool {
    true
}

/// One launchable program inside a group.
///
/// Two applications are equal when they point at the same path; the
/// identifier only addresses an entry inside its group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub name: String,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_identifier: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub is_enabled: bool,
}

impl Application {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, bundle_identifier: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            path: path.into(),
            bundle_identifier,
            is_enabled: true,
        }
    }

    /// Builds an entry for a chosen bundle, naming it after the bundle's file
    /// name without extensions ("Visual Studio Code.app" -> "Visual Studio Code").
    pub fn from_path(path: impl Into<PathBuf>, bundle_identifier: Option<String>) -> Self {
        let path = path.into();
        let name = Self::display_name_for(&path);
        Self::new(name, path, bundle_identifier)
    }

    fn display_name_for(path: &Path) -> String {
        path.file_name()
            .and_then(|s| s.to_str())
            .and_then(|file_name| file_name.split('.').find(|part| !part.is_empty()))
            .unwrap_or("Unknown")
            .to_string()
    }

    pub fn launch_target(&self) -> LaunchTarget {
        LaunchTarget {
            path: self.path.clone(),
            bundle_identifier: self.bundle_identifier.clone(),
        }
    }

    pub fn display(&self) -> String {
        match &self.bundle_identifier {
            Some(bundle) => format!("{} ({}, {})", self.name, self.path.display(), bundle),
            None => format!("{} ({})", self.name, self.path.display()),
        }
    }
}

impl PartialEq for Application {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for Application {}

impl Hash for Application {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
