use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::models::application::Application;

/// A named, ordered set of applications launched together.
///
/// Groups compare equal by identifier only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppGroup {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub launch_at_login: bool,
}

impl AppGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            applications: Vec::new(),
            launch_at_login: false,
        }
    }

    /// Applications that take part in a launch, in stored order.
    pub fn enabled_applications(&self) -> impl Iterator<Item = &Application> {
        self.applications.iter().filter(|app| app.is_enabled)
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled_applications().count()
    }

    pub fn contains_path(&self, path: &std::path::Path) -> bool {
        self.applications.iter().any(|app| app.path == path)
    }

    /// Appends `application` unless its path is already in the group.
    /// Returns whether the group changed.
    pub fn add_application(&mut self, application: Application) -> bool {
        if self.contains_path(&application.path) {
            return false;
        }
        self.applications.push(application);
        true
    }

    /// Drops later applications whose path already appeared earlier.
    /// Returns how many were dropped.
    pub fn dedup_paths(&mut self) -> usize {
        let before = self.applications.len();
        let mut seen = HashSet::new();
        self.applications.retain(|app| seen.insert(app.path.clone()));
        before - self.applications.len()
    }

    pub fn remove_application(&mut self, application_id: Uuid) -> bool {
        let before = self.applications.len();
        self.applications.retain(|app| app.id != application_id);
        self.applications.len() != before
    }

    /// Flips the enabled flag and returns the new value.
    pub fn toggle_application(&mut self, application_id: Uuid) -> Option<bool> {
        let app = self
            .applications
            .iter_mut()
            .find(|app| app.id == application_id)?;
        app.is_enabled = !app.is_enabled;
        Some(app.is_enabled)
    }
}

impl PartialEq for AppGroup {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AppGroup {}

impl Hash for AppGroup {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
