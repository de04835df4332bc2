use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// What the OS launcher is asked to open.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct LaunchTarget {
    pub path: PathBuf,
    pub bundle_identifier: Option<String>,
}

/// Registration state of this program as a login item.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum LoginItemStatus {
    Enabled,
    NotRegistered,
}

impl LoginItemStatus {
    pub fn is_enabled(self) -> bool {
        self == LoginItemStatus::Enabled
    }
}

/// "Open application" facility.
///
/// `Ok` only means the OS accepted the request; the launched program may
/// still fail during its own startup.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait AppLauncher: Send + Sync {
    fn open_application(&self, target: &LaunchTarget) -> Result<(), String>;
}

/// Register/unregister/query facility for the login item of this program.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait LoginItemService: Send + Sync {
    fn status(&self) -> Result<LoginItemStatus, String>;
    fn register(&self) -> Result<(), String>;
    fn unregister(&self) -> Result<(), String>;
}

/// Filesystem probes used before handing a path to the launcher.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Platform bundle identifier of the application at `path`, if it has one.
    fn bundle_identifier(&self, path: &Path) -> Option<String>;
}
