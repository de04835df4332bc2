//! Launches the auto-launch groups when the process starts.

use std::borrow::Cow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::app::launch_source::LaunchSource;
use crate::app::launcher::{LaunchSummary, Launcher};
use crate::app::models::{AppGroup, AutoStartConfig, GroupStore};

/// Group launched while the coordinator ran.
#[derive(Debug)]
pub struct ImmediateLaunch {
    pub group_id: Uuid,
    pub summary: LaunchSummary,
}

/// Group waiting for its delay; the handle resolves once it has launched.
#[derive(Debug)]
pub struct DeferredLaunch {
    pub group_id: Uuid,
    pub delay: Duration,
    pub handle: JoinHandle<LaunchSummary>,
}

#[derive(Debug)]
pub struct StartupReport {
    pub source: LaunchSource,
    pub immediate: Vec<ImmediateLaunch>,
    pub deferred: Vec<DeferredLaunch>,
    /// Auto-launch entries that did not resolve to a group
    pub skipped: Vec<String>,
}

impl StartupReport {
    fn empty(source: LaunchSource) -> Self {
        Self {
            source,
            immediate: Vec::new(),
            deferred: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

pub struct AutoStartCoordinator {
    launcher: Launcher,
    config: AutoStartConfig,
    store: GroupStore,
}

impl AutoStartCoordinator {
    pub fn new(launcher: Launcher, config: AutoStartConfig, store: GroupStore) -> Self {
        Self {
            launcher,
            config,
            store,
        }
    }

    /// Launches every auto-launch group.
    ///
    /// `resolved` is the in-memory group list when the caller already has
    /// one; otherwise the groups file is decoded, and only if some group is
    /// flagged. A zero delay launches right away; any other delay is scheduled
    /// with `spawn_local`, so this must run inside a `LocalSet`. A group that
    /// fails, or no longer exists, never keeps the others from launching.
    pub fn run(&self, source: LaunchSource, resolved: Option<&[AppGroup]>) -> StartupReport {
        let mut report = StartupReport::empty(source);
        let entries = self.config.auto_launch_entries();
        if entries.is_empty() {
            info!(?source, "No auto-launch groups configured");
            return report;
        }

        let groups: Cow<'_, [AppGroup]> = match resolved {
            Some(groups) => Cow::Borrowed(groups),
            None => Cow::Owned(self.store.load()),
        };

        for entry in entries {
            let Some(group) = Uuid::parse_str(&entry)
                .ok()
                .and_then(|id| groups.iter().find(|group| group.id == id))
            else {
                warn!(group_id = %entry, "Auto-launch group not found, skipping");
                report.skipped.push(entry);
                continue;
            };

            let delay = self.config.launch_delay(group.id);
            info!(
                group = %group.name,
                delay_secs = delay.as_secs(),
                "Auto-launching group with delay: {} seconds",
                delay.as_secs()
            );

            if delay.is_zero() {
                let summary = self.launcher.run_group(group);
                report.immediate.push(ImmediateLaunch {
                    group_id: group.id,
                    summary,
                });
            } else {
                let handle = Self::schedule(self.launcher.clone(), group.clone(), delay);
                report.deferred.push(DeferredLaunch {
                    group_id: group.id,
                    delay,
                    handle,
                });
            }
        }

        report
    }

    fn schedule(launcher: Launcher, group: AppGroup, delay: Duration) -> JoinHandle<LaunchSummary> {
        tokio::task::spawn_local(async move {
            tokio::time::sleep(delay).await;
            let summary = launcher.run_group(&group);
            info!(
                group = %group.name,
                "Auto-launched {} of {} applications",
                summary.succeeded,
                summary.total
            );
            summary
        })
    }
}
