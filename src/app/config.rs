//! Runtime configuration: where state lives and how startup is paced.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use tracing::warn;

use crate::app::models::group_store::GROUPS_FILE_NAME;
use crate::app::models::preferences::PREFERENCES_FILE_NAME;

pub const DATA_DIR_ENV: &str = "STARTIE_DATA_DIR";
pub const LOGIN_REFRESH_ENV: &str = "STARTIE_LOGIN_REFRESH_SECS";

/// Reverse-DNS label of the login item.
pub const LOGIN_ITEM_LABEL: &str = "com.startie.Startie";

const DEFAULT_LOGIN_REFRESH: Duration = Duration::from_secs(2);

// Parts of the reverse-DNS identifier; they join to `LOGIN_ITEM_LABEL`
const QUALIFIER: &str = "com";
const ORGANIZATION: &str = "startie";
const APPLICATION: &str = "Startie";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION));

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// Wait after startup before the login item is reconciled
    pub login_refresh_delay: Duration,
    pub login_item_label: String,
}

impl Settings {
    /// Resolves settings from the environment, falling back to the per-user
    /// data directory.
    pub fn from_env() -> Self {
        let data_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| PROJECT_DIRS.as_ref().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."));

        let login_refresh_delay = std::env::var(LOGIN_REFRESH_ENV)
            .ok()
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(e) => {
                    warn!(value = %raw, error = %e, "Ignoring invalid {}", LOGIN_REFRESH_ENV);
                    None
                }
            })
            .unwrap_or(DEFAULT_LOGIN_REFRESH);

        Self {
            data_dir,
            login_refresh_delay,
            login_item_label: LOGIN_ITEM_LABEL.to_string(),
        }
    }

    /// Settings rooted at `data_dir` with default timings.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            login_refresh_delay: DEFAULT_LOGIN_REFRESH,
            login_item_label: LOGIN_ITEM_LABEL.to_string(),
        }
    }

    pub fn groups_file(&self) -> PathBuf {
        self.data_dir.join(GROUPS_FILE_NAME)
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE_NAME)
    }
}
