use std::time::Duration;

use uuid::Uuid;

use crate::app::error::Result;
use crate::app::models::preferences::Preferences;

pub const AUTO_LAUNCH_GROUPS_KEY: &str = "AutoLaunchGroups";
const LAUNCH_DELAY_KEY_PREFIX: &str = "LaunchDelay-";

/// Which groups launch at startup, and how long each one waits first.
///
/// Both maps live in the preference store keyed by group identifier and are
/// only ever changed through this type, so deleting a group prunes both.
#[derive(Debug, Clone)]
pub struct AutoStartConfig {
    prefs: Preferences,
}

impl AutoStartConfig {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    fn delay_key(group_id: Uuid) -> String {
        format!("{LAUNCH_DELAY_KEY_PREFIX}{group_id}")
    }

    // Keys written by older builds use upper-case identifiers
    fn legacy_delay_key(group_id: Uuid) -> String {
        format!("{LAUNCH_DELAY_KEY_PREFIX}{}", group_id.to_string().to_uppercase())
    }

    /// Raw entries of the auto-launch set, in insertion order.
    pub fn auto_launch_entries(&self) -> Vec<String> {
        self.prefs.string_array(AUTO_LAUNCH_GROUPS_KEY)
    }

    /// Entries that parse as group identifiers.
    pub fn auto_launch_group_ids(&self) -> Vec<Uuid> {
        self.auto_launch_entries()
            .iter()
            .filter_map(|entry| Uuid::parse_str(entry).ok())
            .collect()
    }

    pub fn has_auto_launch_groups(&self) -> bool {
        !self.auto_launch_entries().is_empty()
    }

    pub fn is_auto_launch(&self, group_id: Uuid) -> bool {
        self.auto_launch_group_ids().contains(&group_id)
    }

    /// Whether the auto-launch set has ever been written, even as empty.
    pub fn has_auto_launch_set(&self) -> bool {
        self.prefs.contains(AUTO_LAUNCH_GROUPS_KEY)
    }

    /// Overwrites the auto-launch set with `group_ids`.
    pub fn replace_auto_launch(&self, group_ids: &[Uuid]) -> Result<()> {
        let entries: Vec<String> = group_ids.iter().map(Uuid::to_string).collect();
        self.prefs.set(AUTO_LAUNCH_GROUPS_KEY, entries)
    }

    /// Adds or removes the group from the auto-launch set.
    pub fn set_auto_launch(&self, group_id: Uuid, enabled: bool) -> Result<()> {
        let mut entries = self.auto_launch_entries();
        let present = entries
            .iter()
            .any(|entry| Uuid::parse_str(entry).is_ok_and(|id| id == group_id));

        if enabled == present {
            return Ok(());
        }
        if enabled {
            entries.push(group_id.to_string());
        } else {
            entries.retain(|entry| Uuid::parse_str(entry).map_or(true, |id| id != group_id));
        }
        self.prefs.set(AUTO_LAUNCH_GROUPS_KEY, entries)
    }

    /// Configured wait before the group auto-launches; zero when unset.
    pub fn launch_delay(&self, group_id: Uuid) -> Duration {
        let seconds = self
            .prefs
            .integer(&Self::delay_key(group_id))
            .or_else(|| self.prefs.integer(&Self::legacy_delay_key(group_id)))
            .unwrap_or(0);
        Duration::from_secs(u64::try_from(seconds).unwrap_or(0))
    }

    /// Stores the delay in whole seconds.
    pub fn set_launch_delay(&self, group_id: Uuid, seconds: u32) -> Result<()> {
        let key = Self::delay_key(group_id);
        let legacy = Self::legacy_delay_key(group_id);
        self.prefs.update(|values| {
            values.remove(&legacy);
            values.insert(key, seconds.into());
        })
    }

    /// Drops every auto-start entry of a deleted group in one write.
    pub fn remove_group(&self, group_id: Uuid) -> Result<()> {
        let mut entries = self.auto_launch_entries();
        entries.retain(|entry| Uuid::parse_str(entry).map_or(true, |id| id != group_id));
        let key = Self::delay_key(group_id);
        let legacy = Self::legacy_delay_key(group_id);

        self.prefs.update(|values| {
            values.insert(AUTO_LAUNCH_GROUPS_KEY.to_string(), entries.into());
            values.remove(&key);
            values.remove(&legacy);
        })
    }
}
