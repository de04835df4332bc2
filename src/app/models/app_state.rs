use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use os_api::{AppLauncher, FileSystem, LoginItemService, LoginItemStatus};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::auto_start::AutoStartCoordinator;
use crate::app::config::Settings;
use crate::app::error::{Result, StartieError};
use crate::app::launcher::{LaunchSummary, Launcher};
use crate::app::login_item::LoginItemRegistrar;
use crate::app::models::app_group::AppGroup;
use crate::app::models::application::Application;
use crate::app::models::auto_start_config::AutoStartConfig;
use crate::app::models::group_store::GroupStore;
use crate::app::models::preferences::Preferences;

/// The OS collaborators the state talks to.
#[derive(Clone)]
pub struct OsServices {
    pub launcher: Arc<dyn AppLauncher>,
    pub login_items: Arc<dyn LoginItemService>,
    pub fs: Arc<dyn FileSystem>,
}

impl OsServices {
    /// Uses one platform value for every collaborator.
    pub fn from_platform<T>(os: Arc<T>) -> Self
    where
        T: AppLauncher + LoginItemService + FileSystem + 'static,
    {
        Self {
            launcher: os.clone(),
            login_items: os.clone(),
            fs: os,
        }
    }
}

/// Owner of the in-memory group list.
///
/// Every mutation goes through here and is followed by a save of the full
/// snapshot. A failed save is logged; memory then runs ahead of the disk
/// until the next successful save.
pub struct AppState {
    groups: Vec<AppGroup>,
    store: GroupStore,
    auto_start: AutoStartConfig,
    login_items: LoginItemRegistrar,
    launcher: Launcher,
    fs: Arc<dyn FileSystem>,
}

impl AppState {
    /// Loads groups and preferences from the locations in `settings`.
    pub fn new(settings: &Settings, services: OsServices) -> Self {
        let store = GroupStore::new(settings.groups_file());
        let prefs = Preferences::open(settings.preferences_file());
        Self::with_stores(store, prefs, services)
    }

    pub fn with_stores(store: GroupStore, prefs: Preferences, services: OsServices) -> Self {
        let auto_start = AutoStartConfig::new(prefs);
        let mut state = Self {
            groups: store.load(),
            login_items: LoginItemRegistrar::new(services.login_items, auto_start.clone()),
            launcher: Launcher::new(services.launcher, services.fs.clone()),
            fs: services.fs,
            store,
            auto_start,
        };
        state.sync_auto_launch_flags();
        state
    }

    /// The auto-launch set decides what launches; group flags follow it.
    ///
    /// When the preferences hold no auto-launch set at all (first run, or a
    /// lost or corrupt file) the set is rebuilt from the group flags instead.
    fn sync_auto_launch_flags(&mut self) {
        if !self.auto_start.has_auto_launch_set() {
            let flagged: Vec<Uuid> = self
                .groups
                .iter()
                .filter(|group| group.launch_at_login)
                .map(|group| group.id)
                .collect();
            if flagged.is_empty() {
                return;
            }
            match self.auto_start.replace_auto_launch(&flagged) {
                Ok(()) => info!(groups = flagged.len(), "Auto-launch set rebuilt from group flags"),
                Err(e) => warn!(error = %e, "Could not rebuild the auto-launch set"),
            }
            return;
        }

        let mut changed = false;
        for group in &mut self.groups {
            let flagged = self.auto_start.is_auto_launch(group.id);
            if group.launch_at_login != flagged {
                group.launch_at_login = flagged;
                changed = true;
            }
        }
        if changed {
            info!("Group login flags realigned with auto-launch preferences");
            self.persist();
        }
    }

    fn persist(&self) {
        self.store.save(&self.groups);
    }

    fn group_index(&self, group_id: Uuid) -> Result<usize> {
        self.groups
            .iter()
            .position(|group| group.id == group_id)
            .ok_or_else(|| StartieError::not_found("Group", group_id))
    }

    fn group_mut(&mut self, group_id: Uuid) -> Result<&mut AppGroup> {
        let index = self.group_index(group_id)?;
        Ok(&mut self.groups[index])
    }

    fn validated_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(StartieError::validation("Group name cannot be empty"));
        }
        Ok(trimmed.to_string())
    }

    pub fn groups(&self) -> &[AppGroup] {
        &self.groups
    }

    pub fn group(&self, group_id: Uuid) -> Option<&AppGroup> {
        self.groups.iter().find(|group| group.id == group_id)
    }

    pub fn store(&self) -> &GroupStore {
        &self.store
    }

    pub fn auto_start_config(&self) -> &AutoStartConfig {
        &self.auto_start
    }

    pub fn login_items(&self) -> &LoginItemRegistrar {
        &self.login_items
    }

    pub fn launcher(&self) -> &Launcher {
        &self.launcher
    }

    /// Creates an empty group and returns its identifier.
    pub fn add_group(&mut self, name: &str) -> Result<Uuid> {
        let group = AppGroup::new(Self::validated_name(name)?);
        let id = group.id;
        info!(group = %group.name, "Group created");
        self.groups.push(group);
        self.persist();
        Ok(id)
    }

    pub fn rename_group(&mut self, group_id: Uuid, name: &str) -> Result<()> {
        let name = Self::validated_name(name)?;
        self.group_mut(group_id)?.name = name;
        self.persist();
        Ok(())
    }

    /// Replaces the stored group with the same identifier. Applications with
    /// a path seen earlier in the group are dropped. A changed login flag is
    /// routed through `set_launch_at_login`.
    pub fn update_group(&mut self, mut group: AppGroup) -> Result<()> {
        group.name = Self::validated_name(&group.name)?;
        let index = self.group_index(group.id)?;
        let dropped = group.dedup_paths();
        if dropped > 0 {
            warn!(group = %group.name, dropped, "Dropped applications with duplicate paths");
        }
        let wants_login = group.launch_at_login;
        group.launch_at_login = self.groups[index].launch_at_login;
        let id = group.id;

        self.groups[index] = group;
        self.persist();

        if self.groups[index].launch_at_login != wants_login {
            self.set_launch_at_login(id, wants_login)?;
        }
        Ok(())
    }

    /// Deletes the group together with its auto-launch and delay entries.
    pub fn delete_group(&mut self, group_id: Uuid) -> Result<AppGroup> {
        let index = self.group_index(group_id)?;
        let group = self.groups.remove(index);
        self.persist();

        if let Err(e) = self.auto_start.remove_group(group_id) {
            warn!(group = %group.name, error = %e, "Could not prune auto-start entries");
        }
        self.login_items.refresh_registration();

        info!(group = %group.name, "Group deleted");
        Ok(group)
    }

    /// Adds `application` to the group. Returns `false` when the group already
    /// holds an application with the same path.
    pub fn add_application(&mut self, group_id: Uuid, application: Application) -> Result<bool> {
        let group = self.group_mut(group_id)?;
        let added = group.add_application(application);
        if added {
            self.persist();
        }
        Ok(added)
    }

    /// Adds the application bundle chosen by the user.
    pub fn add_application_from_path(&mut self, group_id: Uuid, path: impl Into<PathBuf>) -> Result<bool> {
        let path = path.into();
        self.group_index(group_id)?;
        if !self.fs.exists(&path) {
            return Err(StartieError::application_not_found(path));
        }
        let bundle_identifier = self.fs.bundle_identifier(&path);
        self.add_application(group_id, Application::from_path(path, bundle_identifier))
    }

    pub fn remove_application(&mut self, group_id: Uuid, application_id: Uuid) -> Result<()> {
        if !self.group_mut(group_id)?.remove_application(application_id) {
            return Err(StartieError::not_found("Application", application_id));
        }
        self.persist();
        Ok(())
    }

    /// Flips the enabled flag and returns its new value.
    pub fn toggle_application(&mut self, group_id: Uuid, application_id: Uuid) -> Result<bool> {
        let enabled = self
            .group_mut(group_id)?
            .toggle_application(application_id)
            .ok_or_else(|| StartieError::not_found("Application", application_id))?;
        self.persist();
        Ok(enabled)
    }

    /// Flags or unflags a group for launch at login and reconciles the login item.
    pub fn set_launch_at_login(&mut self, group_id: Uuid, enabled: bool) -> Result<()> {
        let index = self.group_index(group_id)?;
        let previous = self.groups[index].launch_at_login;
        self.groups[index].launch_at_login = enabled;

        if let Err(e) = self.login_items.set_launch_at_login(group_id, enabled) {
            self.groups[index].launch_at_login = previous;
            return Err(e);
        }

        self.persist();
        Ok(())
    }

    pub fn is_group_set_to_auto_launch(&self, group_id: Uuid) -> bool {
        self.auto_start.is_auto_launch(group_id)
    }

    pub fn set_launch_delay(&mut self, group_id: Uuid, seconds: u32) -> Result<()> {
        self.group_index(group_id)?;
        self.auto_start.set_launch_delay(group_id, seconds)
    }

    pub fn launch_delay(&self, group_id: Uuid) -> Duration {
        self.auto_start.launch_delay(group_id)
    }

    pub fn set_launch_at_startup(&self, enabled: bool) -> Result<()> {
        self.login_items.set_launch_at_startup(enabled)
    }

    pub fn refresh_login_item(&self) -> Option<LoginItemStatus> {
        self.login_items.refresh_registration()
    }

    /// Launches a group without blocking; see [`Launcher::launch_group`].
    pub fn launch_group<F>(&self, group_id: Uuid, on_complete: F) -> Result<JoinHandle<()>>
    where
        F: FnOnce(LaunchSummary) + 'static,
    {
        let group = self
            .group(group_id)
            .cloned()
            .ok_or_else(|| StartieError::not_found("Group", group_id))?;
        Ok(self.launcher.launch_group(group, on_complete))
    }

    pub fn auto_start(&self) -> AutoStartCoordinator {
        AutoStartCoordinator::new(self.launcher.clone(), self.auto_start.clone(), self.store.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::group_store::GROUPS_FILE_NAME;
    use crate::app::models::preferences::PREFERENCES_FILE_NAME;
    use os_api::{MockAppLauncher, MockFileSystem, MockLoginItemService};
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tempfile::{tempdir, TempDir};

    fn services(login_enabled: Arc<AtomicBool>) -> OsServices {
        let mut launcher = MockAppLauncher::new();
        launcher.expect_open_application().returning(|_| Ok(()));

        let mut fs = MockFileSystem::new();
        fs.expect_exists()
            .returning(|path: &Path| !path.starts_with("/Volumes/Gone"));
        fs.expect_bundle_identifier()
            .returning(|path: &Path| path.ends_with("Safari.app").then(|| "com.apple.Safari".to_string()));

        let mut login = MockLoginItemService::new();
        let status = login_enabled.clone();
        login.expect_status().returning(move || {
            Ok(if status.load(Ordering::SeqCst) {
                LoginItemStatus::Enabled
            } else {
                LoginItemStatus::NotRegistered
            })
        });
        let on = login_enabled.clone();
        login.expect_register().returning(move || {
            on.store(true, Ordering::SeqCst);
            Ok(())
        });
        let off = login_enabled;
        login.expect_unregister().returning(move || {
            off.store(false, Ordering::SeqCst);
            Ok(())
        });

        OsServices {
            launcher: Arc::new(launcher),
            login_items: Arc::new(login),
            fs: Arc::new(fs),
        }
    }

    fn state_in(dir: &Path, login_enabled: Arc<AtomicBool>) -> AppState {
        AppState::with_stores(
            GroupStore::new(dir.join(GROUPS_FILE_NAME)),
            Preferences::open(dir.join(PREFERENCES_FILE_NAME)),
            services(login_enabled),
        )
    }

    fn state() -> (AppState, Arc<AtomicBool>, TempDir) {
        let dir = tempdir().unwrap();
        let login = Arc::new(AtomicBool::new(false));
        (state_in(dir.path(), login.clone()), login, dir)
    }

    #[test]
    fn groups_persist_across_instances() {
        let (mut state, login, dir) = state();
        let work = state.add_group("  Work ").unwrap();
        state.add_application_from_path(work, "/Applications/Safari.app").unwrap();
        state.add_application_from_path(work, "/Applications/Notes.app").unwrap();

        let reopened = state_in(dir.path(), login);
        let group = reopened.group(work).unwrap();
        assert_eq!(group.name, "Work");
        assert_eq!(group.applications.len(), 2);
        assert_eq!(group.applications[0].bundle_identifier.as_deref(), Some("com.apple.Safari"));
        assert_eq!(group.applications[1].name, "Notes");
    }

    #[test]
    fn empty_group_name_is_rejected() {
        let (mut state, _login, _dir) = state();
        assert!(matches!(state.add_group("   "), Err(StartieError::Validation(_))));
        assert!(state.groups().is_empty());
    }

    #[test]
    fn duplicate_path_leaves_count_unchanged() {
        let (mut state, _login, _dir) = state();
        let id = state.add_group("Work").unwrap();

        assert!(state.add_application_from_path(id, "/Applications/Notes.app").unwrap());
        assert!(!state.add_application_from_path(id, "/Applications/Notes.app").unwrap());
        assert_eq!(state.group(id).unwrap().applications.len(), 1);
    }

    #[test]
    fn missing_bundle_cannot_be_added() {
        let (mut state, _login, _dir) = state();
        let id = state.add_group("Work").unwrap();

        let err = state
            .add_application_from_path(id, "/Volumes/Gone/Tool.app")
            .unwrap_err();
        assert!(matches!(err, StartieError::ApplicationNotFound { .. }));
    }

    #[test]
    fn toggle_and_remove_applications() {
        let (mut state, _login, _dir) = state();
        let id = state.add_group("Work").unwrap();
        state.add_application_from_path(id, "/Applications/Notes.app").unwrap();
        let app = state.group(id).unwrap().applications[0].id;

        assert!(!state.toggle_application(id, app).unwrap());
        assert_eq!(state.group(id).unwrap().enabled_count(), 0);

        state.remove_application(id, app).unwrap();
        assert!(matches!(
            state.remove_application(id, app),
            Err(StartieError::NotFound { entity: "Application", .. })
        ));
    }

    #[test]
    fn unknown_group_is_not_found() {
        let (mut state, _login, _dir) = state();
        let err = state.rename_group(Uuid::new_v4(), "Nope").unwrap_err();
        assert!(matches!(err, StartieError::NotFound { entity: "Group", .. }));
    }

    #[test]
    fn login_flag_drives_registration() {
        let (mut state, login, _dir) = state();
        let work = state.add_group("Work").unwrap();
        let play = state.add_group("Play").unwrap();

        state.set_launch_at_login(work, true).unwrap();
        state.set_launch_at_login(play, true).unwrap();
        assert!(login.load(Ordering::SeqCst));
        assert!(state.group(work).unwrap().launch_at_login);
        assert!(state.is_group_set_to_auto_launch(work));

        state.set_launch_at_login(work, false).unwrap();
        assert!(login.load(Ordering::SeqCst));

        state.set_launch_at_login(play, false).unwrap();
        assert!(!login.load(Ordering::SeqCst));
    }

    #[test]
    fn deleting_a_group_prunes_auto_start_and_unregisters() {
        let (mut state, login, _dir) = state();
        let work = state.add_group("Work").unwrap();
        state.set_launch_at_login(work, true).unwrap();
        state.set_launch_delay(work, 9).unwrap();

        state.delete_group(work).unwrap();

        assert!(!state.is_group_set_to_auto_launch(work));
        assert_eq!(state.launch_delay(work), Duration::ZERO);
        assert!(!state.auto_start_config().has_auto_launch_groups());
        assert!(!login.load(Ordering::SeqCst));
    }

    #[test]
    fn update_group_routes_login_flag() {
        let (mut state, login, _dir) = state();
        let id = state.add_group("Work").unwrap();

        let mut edited = state.group(id).unwrap().clone();
        edited.name = "Office".into();
        edited.launch_at_login = true;
        state.update_group(edited).unwrap();

        assert_eq!(state.group(id).unwrap().name, "Office");
        assert!(state.is_group_set_to_auto_launch(id));
        assert!(login.load(Ordering::SeqCst));
    }

    #[test]
    fn flags_follow_auto_launch_set_on_load() {
        let dir = tempdir().unwrap();
        let login = Arc::new(AtomicBool::new(false));
        let mut flagged = AppGroup::new("Flagged in file only");
        flagged.launch_at_login = true;
        GroupStore::new(dir.path().join(GROUPS_FILE_NAME))
            .try_save(&[flagged.clone()])
            .unwrap();
        AutoStartConfig::new(Preferences::open(dir.path().join(PREFERENCES_FILE_NAME)))
            .replace_auto_launch(&[])
            .unwrap();

        let state = state_in(dir.path(), login);
        assert!(!state.group(flagged.id).unwrap().launch_at_login);
    }

    #[test]
    fn corrupt_preferences_keep_group_flags() {
        let dir = tempdir().unwrap();
        let login = Arc::new(AtomicBool::new(false));
        let mut flagged = AppGroup::new("Work");
        flagged.launch_at_login = true;
        let store = GroupStore::new(dir.path().join(GROUPS_FILE_NAME));
        store.try_save(&[flagged.clone()]).unwrap();
        std::fs::write(dir.path().join(PREFERENCES_FILE_NAME), "{oops").unwrap();

        let state = state_in(dir.path(), login);

        assert!(state.group(flagged.id).unwrap().launch_at_login);
        assert!(state.is_group_set_to_auto_launch(flagged.id));
        assert!(store.load()[0].launch_at_login);
    }

    #[test]
    fn update_group_drops_duplicate_paths() {
        let (mut state, _login, _dir) = state();
        let id = state.add_group("Work").unwrap();
        state.add_application_from_path(id, "/Applications/A.app").unwrap();

        let mut edited = state.group(id).unwrap().clone();
        edited
            .applications
            .push(Application::new("A again", "/Applications/A.app", None));
        state.update_group(edited).unwrap();

        let group = state.group(id).unwrap();
        assert_eq!(group.applications.len(), 1);
        assert_eq!(group.applications[0].name, "A");
        assert_eq!(state.store().load()[0].applications.len(), 1);
    }

    #[test]
    fn delay_requires_a_known_group() {
        let (mut state, _login, _dir) = state();
        assert!(state.set_launch_delay(Uuid::new_v4(), 3).is_err());
    }

    #[tokio::test]
    async fn launch_group_reports_through_callback() {
        let (mut state, _login, _dir) = state();
        let id = state.add_group("Work").unwrap();
        state.add_application_from_path(id, "/Applications/Notes.app").unwrap();
        let result = std::rc::Rc::new(std::cell::Cell::new((0, 0)));

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let sink = result.clone();
                state
                    .launch_group(id, move |summary| sink.set((summary.total, summary.succeeded)))
                    .unwrap()
                    .await
                    .unwrap();
            })
            .await;

        assert_eq!(result.get(), (1, 1));
    }
}
